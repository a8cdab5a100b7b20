use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::error::{AgentError, Result};
use crate::message::Message;

/// The model-call collaborator. Receives the full context and returns the
/// plain-text reasoning for one round.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

type CompletionFn = Box<dyn Fn(Vec<Message>) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Wraps an async closure as a [`LanguageModel`].
pub struct FnModel {
    complete: CompletionFn,
}

impl FnModel {
    pub fn new<F, Fut>(complete: F) -> Arc<Self>
    where
        F: Fn(Vec<Message>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Arc::new(Self {
            complete: Box::new(move |messages: Vec<Message>| complete(messages).boxed()),
        })
    }
}

impl fmt::Debug for FnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModel").finish_non_exhaustive()
    }
}

#[async_trait]
impl LanguageModel for FnModel {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        (self.complete)(messages.to_vec()).await
    }
}

/// A deterministic model used for tests and demos. Replays scripted
/// responses in order and keeps every request it was sent.
#[derive(Debug, Default)]
pub struct StubModel {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl StubModel {
    pub fn new<I, S>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Contexts received so far, one entry per round.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.requests
            .lock()
            .map_err(|_| AgentError::LanguageModel("stub model poisoned".into()))?
            .push(messages.to_vec());
        let mut locked = self
            .responses
            .lock()
            .map_err(|_| AgentError::LanguageModel("stub model poisoned".into()))?;
        locked.pop_front().ok_or_else(|| {
            AgentError::LanguageModel("StubModel ran out of scripted responses".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_replays_in_order_and_records() {
        let model = StubModel::new(["first", "second"]);
        let context = vec![Message::system("rules")];

        assert_eq!(model.complete(&context).await.unwrap(), "first");
        assert_eq!(model.complete(&context).await.unwrap(), "second");
        assert!(matches!(
            model.complete(&context).await,
            Err(AgentError::LanguageModel(_))
        ));
        assert_eq!(model.call_count(), 3);
        assert_eq!(model.requests()[0], context);
    }

    #[tokio::test]
    async fn fn_model_sees_the_context() {
        let model = FnModel::new(|messages: Vec<Message>| async move {
            Ok(format!("saw {} messages", messages.len()))
        });

        let reply = model
            .complete(&[Message::system("a"), Message::user("b")])
            .await
            .unwrap();
        assert_eq!(reply, "saw 2 messages");
    }
}
