//! Error types for script runs.

use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

use crate::config::OUTPUT_PATH_ENV;

/// Help text returned when a script looks like JavaScript.
const WRONG_LANGUAGE_HELP: &str = "The script looks like JavaScript/PptxGenJS, not Python.\n\
Please generate the script in Python using python-pptx.\n\
The script must start with:\n  \
from pptx import Presentation\n  \
from pptx.util import Inches, Pt\n  \
...\n\
And end with:\n  \
prs.save(os.environ['PPTX_OUTPUT_PATH'])";

/// Everything that can end a script run.
///
/// Most variants are *classified* failures: they are reported to the caller
/// as a result record. [`Spawn`](Self::Spawn), [`Crashed`](Self::Crashed) and
/// [`Io`](Self::Io) are process-level faults and are not classified.
#[derive(Error, Debug)]
pub enum SandboxError {
    /// The output path argument was not supplied.
    #[error("Missing output path argument")]
    MissingArgument,

    /// The script could not be read as UTF-8 text.
    #[error("Failed to read script from stdin: {0}")]
    UnreadableInput(String),

    /// The script is empty or only whitespace.
    #[error("Empty script received")]
    EmptyInput,

    /// The script starts like a JavaScript program.
    #[error("{}", WRONG_LANGUAGE_HELP)]
    WrongLanguage { marker: &'static str },

    /// The script raised an exception.
    #[error("{0}")]
    RuntimeFailure(ScriptError),

    /// The script finished cleanly but the output file does not exist.
    #[error(
        "Script executed but did not save the presentation. Make sure the last line is:\n  \
         prs.save(os.environ['{}'])",
        OUTPUT_PATH_ENV
    )]
    NoArtifactProduced { output_path: PathBuf },

    /// The script ran past the configured wall-clock bound and was killed.
    #[error("Script did not finish within {} seconds", .0.as_secs())]
    TimedOut(Duration),

    /// The interpreter could not be started.
    #[error("Failed to start interpreter '{}': {source}", .python.display())]
    Spawn {
        python: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The interpreter died without reporting a result.
    #[error("Interpreter terminated abnormally ({status}) without reporting a result")]
    Crashed { status: ExitStatus },

    #[error("Sandbox I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Classification of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingArgument,
    UnreadableInput,
    EmptyInput,
    WrongLanguage,
    RuntimeFailure,
    NoArtifactProduced,
    TimedOut,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingArgument => "missing_argument",
            Self::UnreadableInput => "unreadable_input",
            Self::EmptyInput => "empty_input",
            Self::WrongLanguage => "wrong_language",
            Self::RuntimeFailure => "runtime_failure",
            Self::NoArtifactProduced => "no_artifact_produced",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SandboxError {
    /// The classification of this error, or `None` for process-level faults.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::MissingArgument => Some(FailureKind::MissingArgument),
            Self::UnreadableInput(_) => Some(FailureKind::UnreadableInput),
            Self::EmptyInput => Some(FailureKind::EmptyInput),
            Self::WrongLanguage { .. } => Some(FailureKind::WrongLanguage),
            Self::RuntimeFailure(_) => Some(FailureKind::RuntimeFailure),
            Self::NoArtifactProduced { .. } => Some(FailureKind::NoArtifactProduced),
            Self::TimedOut(_) => Some(FailureKind::TimedOut),
            Self::Spawn { .. } | Self::Crashed { .. } | Self::Io(_) => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.kind().is_some()
    }
}

/// An exception raised by a script, as reported by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptError {
    /// Exception type name, e.g. `ValueError`.
    pub kind: String,
    pub message: String,
    /// Formatted traceback starting at the script's own frames.
    #[serde(default)]
    pub traceback: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        let traceback = self.traceback.trim_end();
        if !traceback.is_empty() {
            write!(f, "\n{}", traceback)?;
        }
        Ok(())
    }
}
