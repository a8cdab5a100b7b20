//! Reason-then-act agents for Rust.
//!
//! The crate provides:
//! - A language model abstraction (`LanguageModel`).
//! - A tool interface with declared signatures (`Tool` and `ToolRegistry`).
//! - Two history layouts, a single scratchpad or a growing message list (`History`).
//! - A `ReactAgent` that alternates between model reasoning and tool
//!   observations, either run to completion or stepped by the caller.

mod agent;
mod config;
mod error;
mod history;
mod hooks;
mod llm;
mod message;
mod parser;
mod prompt;
mod signature;
mod tool;
pub mod tools;

pub use agent::{AgentBuilder, ReactAgent, RunOutcome, Session, Step, Termination};
pub use config::{AgentSettings, ENV_MODE, ENV_ROUND_LIMIT};
pub use error::{AgentError, Result};
pub use history::{History, HistoryMode};
pub use hooks::{AgentObserver, TracingObserver};
pub use llm::{FnModel, LanguageModel, StubModel};
pub use message::{Message, Role};
pub use parser::{has_final_answer, parse_action, trim_reasoning, ActionDirective};
pub use prompt::format_instructions;
pub use signature::{render_signatures, ToolSignature};
pub use tool::{FnTool, Tool, ToolRegistry};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Installs a `fmt` subscriber with an explicit filter such as `"sayr_react=debug"`.
pub fn init_tracing_with_filter(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
