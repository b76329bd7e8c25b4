//! Isolated runner for python-pptx generation scripts.
//!
//! A script arrives as text together with the path the presentation must be
//! saved to. The runner rejects obviously wrong input, runs the script in a
//! fresh interpreter process inside a scoped temporary directory, classifies
//! whatever goes wrong, and finally checks that the file was written.
//!
//! ```no_run
//! use deck_sandbox::{InvocationRequest, SandboxConfig, ScriptRunner};
//! use std::path::Path;
//!
//! let script = "import os\nopen(os.environ['PPTX_OUTPUT_PATH'], 'wb').close()\n";
//! let request = InvocationRequest::new(Some(Path::new("out.pptx")), script.to_string())?;
//! ScriptRunner::new(SandboxConfig::from_env()).run(&request)?;
//! # Ok::<(), deck_sandbox::SandboxError>(())
//! ```

mod bootstrap;
pub mod config;
pub mod error;
pub mod guard;
pub mod process;
pub mod request;
pub mod runner;
pub mod workdir;

pub use config::{SandboxConfig, DEFAULT_TIMEOUT_SECS, OUTPUT_PATH_ENV, WORKDIR_PREFIX};
pub use error::{FailureKind, SandboxError, ScriptError};
pub use guard::detect_foreign_language;
pub use request::InvocationRequest;
pub use runner::{RunReport, ScriptRunner};
pub use workdir::ScopedWorkdir;
