//! Reading and validating an invocation.

use std::io::Read;
use std::path::{self, Path, PathBuf};

use crate::error::SandboxError;
use crate::guard::detect_foreign_language;

/// A validated script run request.
///
/// Construction fails with a classified [`SandboxError`] when the output path
/// is missing, the script is blank, or it looks like JavaScript. The output
/// path is made absolute against the current directory immediately, so later
/// directory changes cannot move the artifact.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    script_source: String,
    output_path: PathBuf,
}

impl InvocationRequest {
    pub fn new(output_path: Option<&Path>, script_source: String) -> Result<Self, SandboxError> {
        let output_path = output_path.ok_or(SandboxError::MissingArgument)?;
        Self::validated(output_path, script_source)
    }

    /// Read the whole script from `reader`. The output path is checked
    /// before any input is consumed.
    pub fn read_from<R: Read>(output_path: Option<&Path>, mut reader: R) -> Result<Self, SandboxError> {
        let output_path = output_path.ok_or(SandboxError::MissingArgument)?;

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| SandboxError::UnreadableInput(e.to_string()))?;
        let script_source =
            String::from_utf8(bytes).map_err(|e| SandboxError::UnreadableInput(e.to_string()))?;

        Self::validated(output_path, script_source)
    }

    fn validated(output_path: &Path, script_source: String) -> Result<Self, SandboxError> {
        if output_path.as_os_str().is_empty() {
            return Err(SandboxError::MissingArgument);
        }

        if script_source.trim().is_empty() {
            return Err(SandboxError::EmptyInput);
        }

        if let Some(marker) = detect_foreign_language(&script_source) {
            log::debug!("Rejecting script starting with {:?}", marker);
            return Err(SandboxError::WrongLanguage { marker });
        }

        let output_path = path::absolute(output_path)?;

        Ok(Self {
            script_source,
            output_path,
        })
    }

    pub fn script_source(&self) -> &str {
        &self.script_source
    }

    /// Absolute path the script must save to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
