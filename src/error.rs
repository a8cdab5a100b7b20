use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid action: `{0}` is not a registered tool")]
    UnknownAction(String),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("language model error: {0}")]
    LanguageModel(String),

    #[error("tool `{name}` invocation failed: {source}")]
    ToolInvocation {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
