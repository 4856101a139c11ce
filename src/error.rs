use std::fmt;
use thiserror::Error;

/// Failure to complete a request/response exchange with a provider.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("could not read response body: {0}")]
    Body(String),
    #[error("malformed response payload: {0}")]
    Malformed(String),
}

/// Outcome classification for a single generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The remote service reported a problem itself.
    #[error("provider error: {0}")]
    Provider(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The service answered but gave nothing usable.
    #[error("provider returned no content")]
    Empty,
    /// Caller precondition failure, raised before any request is sent. Not one of
    /// the provider outcomes above.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Details,
    Script,
    Audio,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Details => "details",
            Stage::Script => "script",
            Stage::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// Anything that ends a pipeline run early.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} generation failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: GenerationError,
    },
    #[error("operator I/O failed: {0}")]
    Operator(#[source] std::io::Error),
    #[error("could not persist voicemail: {0}")]
    Persistence(#[source] std::io::Error),
    #[error("pipeline already aborted at {stage} stage: {reason}")]
    Aborted { stage: Stage, reason: String },
}

#[derive(Debug, Error)]
#[error("missing credentials: {}", .missing.join(", "))]
pub struct MissingCredentials {
    pub missing: Vec<&'static str>,
}

/// Startup failures, reported before any pipeline state exists.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Credentials(#[from] MissingCredentials),
    #[error("could not build HTTP client: {0}")]
    Http(String),
}
