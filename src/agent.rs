use std::mem;
use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AgentSettings;
use crate::error::{AgentError, Result};
use crate::history::{History, HistoryMode};
use crate::hooks::AgentObserver;
use crate::llm::LanguageModel;
use crate::message::{Message, Role};
use crate::parser::{has_final_answer, parse_action, trim_reasoning, ActionDirective};
use crate::prompt::format_instructions;
use crate::tool::ToolRegistry;

/// How a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The reasoning contained `Final Answer`.
    FinalAnswer,
    /// The reasoning had neither an action nor a final answer.
    NoAction,
    /// The round limit was reached before either of the above.
    RoundLimit,
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub session_id: Uuid,
    pub termination: Termination,
    /// The trimmed reasoning of the final round, set only for
    /// [`Termination::FinalAnswer`].
    pub answer: Option<String>,
    /// Number of reasoning requests made.
    pub rounds: usize,
    pub messages: Vec<Message>,
}

impl RunOutcome {
    pub fn is_final_answer(&self) -> bool {
        self.termination == Termination::FinalAnswer
    }

    /// The text after `Final Answer:`, if the answer has that shape.
    pub fn final_answer(&self) -> Option<&str> {
        let answer = self.answer.as_deref()?;
        let (_, tail) = answer.split_once("Final Answer:")?;
        Some(tail.trim())
    }
}

/// What one call to [`Session::step`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The model asked for a tool; call [`Session::observe`] with its result.
    Action(ActionDirective),
    Done(RunOutcome),
}

impl Step {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }

    pub fn action(&self) -> Option<&ActionDirective> {
        match self {
            Step::Action(directive) => Some(directive),
            Step::Done(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        match self {
            Step::Done(outcome) => Some(outcome),
            Step::Action(_) => None,
        }
    }
}

struct AgentCore {
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    mode: HistoryMode,
    round_limit: usize,
    instructions: String,
    observers: Vec<Arc<dyn AgentObserver>>,
}

/// Collects the agent configuration. Nothing can change once built.
#[derive(Default)]
pub struct AgentBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    tools: ToolRegistry,
    settings: AgentSettings,
    observers: Vec<Arc<dyn AgentObserver>>,
}

impl AgentBuilder {
    pub fn model<M: LanguageModel + 'static>(mut self, model: Arc<M>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_mode(mut self, mode: HistoryMode) -> Self {
        self.settings.mode = mode;
        self
    }

    pub fn with_round_limit(mut self, round_limit: usize) -> Self {
        self.settings.round_limit = round_limit;
        self
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<ReactAgent> {
        let model = self.model.ok_or_else(|| {
            AgentError::Configuration("a language model is required to build an agent".into())
        })?;
        self.settings.validate()?;
        let instructions = format_instructions(&self.tools.signatures());

        Ok(ReactAgent {
            core: Arc::new(AgentCore {
                model,
                tools: self.tools,
                mode: self.settings.mode,
                round_limit: self.settings.round_limit,
                instructions,
                observers: self.observers,
            }),
        })
    }
}

/// A reason-then-act agent. Cheap to clone; every question gets its own
/// [`Session`].
#[derive(Clone)]
pub struct ReactAgent {
    core: Arc<AgentCore>,
}

impl ReactAgent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    pub fn instructions(&self) -> &str {
        &self.core.instructions
    }

    pub fn mode(&self) -> HistoryMode {
        self.core.mode
    }

    pub fn round_limit(&self) -> usize {
        self.core.round_limit
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.core.tools
    }

    /// Seeds a fresh history with the question, for callers that run tools
    /// themselves through [`Session::step`] and [`Session::observe`].
    pub fn start(&self, question: impl Into<String>) -> Session {
        let mut history = History::new(self.core.instructions.clone(), self.core.mode);
        history.append_as(format!("Question: {}", question.into()), Role::User);
        Session {
            core: self.core.clone(),
            id: Uuid::new_v4(),
            history,
            round: 0,
            phase: Phase::Ready,
        }
    }

    /// Answers `question`, dispatching actions to the registered tools.
    /// An action with no registered tool fails the run.
    pub async fn run(&self, question: impl Into<String>) -> Result<RunOutcome> {
        let mut session = self.start(question);
        let span = tracing::info_span!("react_session", session = %session.id);
        session.run().instrument(span).await
    }
}

enum Phase {
    Ready,
    Pending(ActionDirective),
    Finished(RunOutcome),
}

/// One question worth of loop state: history, round counter and the action
/// waiting for its observation.
pub struct Session {
    core: Arc<AgentCore>,
    id: Uuid,
    history: History,
    round: usize,
    phase: Phase,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        self.history.messages()
    }

    /// Reasoning requests made so far.
    pub fn rounds(&self) -> usize {
        self.round.min(self.core.round_limit)
    }

    pub fn pending(&self) -> Option<&ActionDirective> {
        match &self.phase {
            Phase::Pending(directive) => Some(directive),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Advances one round. Fails without touching state if an action is
    /// still waiting for [`Session::observe`]; once finished, keeps returning
    /// the same outcome without asking the model again.
    pub async fn step(&mut self) -> Result<Step> {
        match &self.phase {
            Phase::Pending(directive) => {
                return Err(AgentError::ProtocolViolation(format!(
                    "step() called while action `{}` is waiting for observe()",
                    directive.action
                )))
            }
            Phase::Finished(outcome) => return Ok(Step::Done(outcome.clone())),
            Phase::Ready => {}
        }

        let round = self.round + 1;
        if round > self.core.round_limit {
            self.round = round;
            let outcome = self.conclude(Termination::RoundLimit, None);
            self.notify_finish(&outcome).await?;
            return Ok(Step::Done(outcome));
        }
        for observer in &self.core.observers {
            observer.on_round_start(self.id, round).await?;
        }

        self.round = round;
        let raw = self.core.model.complete(self.history.messages()).await?;
        let reasoning = trim_reasoning(&raw);
        self.history.append(reasoning.clone());

        // state settles before observers run so their errors cannot strand it
        let step = if has_final_answer(&reasoning) {
            Step::Done(self.conclude(Termination::FinalAnswer, Some(reasoning.clone())))
        } else {
            match parse_action(&reasoning) {
                None => Step::Done(self.conclude(Termination::NoAction, None)),
                Some(directive) => {
                    self.phase = Phase::Pending(directive.clone());
                    Step::Action(directive)
                }
            }
        };

        for observer in &self.core.observers {
            observer.on_reasoning(self.id, &raw, &reasoning).await?;
        }
        match &step {
            Step::Action(directive) => {
                for observer in &self.core.observers {
                    observer.on_action(self.id, directive).await?;
                }
            }
            Step::Done(outcome) => self.notify_finish(outcome).await?,
        }
        Ok(step)
    }

    /// Records the result of the pending action as a system observation.
    pub async fn observe(&mut self, observation: impl Into<String>) -> Result<()> {
        match mem::replace(&mut self.phase, Phase::Ready) {
            Phase::Pending(_) => {}
            other => {
                self.phase = other;
                return Err(AgentError::ProtocolViolation(
                    "observe() called with no pending action".into(),
                ));
            }
        }

        let observation = observation.into();
        self.history
            .append_as(format!("Observation: {observation}"), Role::System);
        for observer in &self.core.observers {
            observer.on_observation(self.id, &observation).await?;
        }
        Ok(())
    }

    /// Drives the session to a terminal state using the agent's tools.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        loop {
            match self.step().await? {
                Step::Done(outcome) => return Ok(outcome),
                Step::Action(directive) => {
                    let observation = self
                        .core
                        .tools
                        .call(&directive.action, directive.action_input)
                        .await?;
                    self.observe(observation).await?;
                }
            }
        }
    }

    fn conclude(&mut self, termination: Termination, answer: Option<String>) -> RunOutcome {
        let outcome = RunOutcome {
            session_id: self.id,
            termination,
            answer,
            rounds: self.rounds(),
            messages: self.history.to_vec(),
        };
        self.phase = Phase::Finished(outcome.clone());
        outcome
    }

    async fn notify_finish(&self, outcome: &RunOutcome) -> Result<()> {
        for observer in &self.core.observers {
            observer.on_finish(self.id, outcome).await?;
        }
        Ok(())
    }
}
