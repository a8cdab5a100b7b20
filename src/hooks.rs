use async_trait::async_trait;
use uuid::Uuid;

use crate::agent::RunOutcome;
use crate::error::Result;
use crate::parser::ActionDirective;

/// Notified on every transition of a session. All methods default to no-ops;
/// an error returned from any of them aborts the current call.
#[async_trait]
pub trait AgentObserver: Send + Sync {
    async fn on_round_start(&self, _session: Uuid, _round: usize) -> Result<()> {
        Ok(())
    }

    async fn on_reasoning(&self, _session: Uuid, _raw: &str, _trimmed: &str) -> Result<()> {
        Ok(())
    }

    async fn on_action(&self, _session: Uuid, _directive: &ActionDirective) -> Result<()> {
        Ok(())
    }

    async fn on_observation(&self, _session: Uuid, _observation: &str) -> Result<()> {
        Ok(())
    }

    async fn on_finish(&self, _session: Uuid, _outcome: &RunOutcome) -> Result<()> {
        Ok(())
    }
}

/// Emits every transition as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[async_trait]
impl AgentObserver for TracingObserver {
    async fn on_round_start(&self, session: Uuid, round: usize) -> Result<()> {
        tracing::info!(%session, round, "round started");
        Ok(())
    }

    async fn on_reasoning(&self, session: Uuid, raw: &str, trimmed: &str) -> Result<()> {
        tracing::debug!(%session, raw, "raw reasoning");
        if raw.len() != trimmed.len() {
            tracing::debug!(%session, trimmed, "dropped hallucinated observation");
        }
        Ok(())
    }

    async fn on_action(&self, session: Uuid, directive: &ActionDirective) -> Result<()> {
        tracing::info!(
            %session,
            action = %directive.action,
            input = ?directive.action_input,
            "action requested"
        );
        Ok(())
    }

    async fn on_observation(&self, session: Uuid, observation: &str) -> Result<()> {
        tracing::debug!(%session, observation, "observation recorded");
        Ok(())
    }

    async fn on_finish(&self, session: Uuid, outcome: &RunOutcome) -> Result<()> {
        tracing::info!(
            %session,
            termination = ?outcome.termination,
            rounds = outcome.rounds,
            "session finished"
        );
        Ok(())
    }
}
