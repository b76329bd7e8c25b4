use deck_sandbox::SandboxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The compiled script failed in the sandbox.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}
