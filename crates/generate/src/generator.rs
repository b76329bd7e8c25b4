use deck_sandbox::{InvocationRequest, SandboxConfig, ScriptRunner};
use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::script::compile_script;
use crate::spec::DeckSpec;

/// Builds decks by running their compiled script in the sandbox.
#[derive(Debug, Clone, Default)]
pub struct DeckGenerator {
    runner: ScriptRunner,
}

impl DeckGenerator {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            runner: ScriptRunner::new(config),
        }
    }

    /// Write `deck` to `output_path` and return the absolute path written.
    pub fn generate(&self, deck: &DeckSpec, output_path: &Path) -> Result<PathBuf, GenerateError> {
        let script = compile_script(deck);
        log::debug!("Compiled {} slides into {} bytes of script", deck.slides.len(), script.len());

        let request = InvocationRequest::new(Some(output_path), script)?;
        let report = self.runner.run(&request)?;
        Ok(report.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_sandbox::{FailureKind, SandboxError};

    #[test]
    fn test_empty_output_path_is_missing_argument() {
        let err = DeckGenerator::default()
            .generate(&DeckSpec::default(), Path::new(""))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Sandbox(SandboxError::MissingArgument)
        ));
        assert_eq!(err.to_string(), "Missing output path argument");
    }

    #[test]
    fn test_missing_interpreter_is_unclassified() {
        let dir = tempfile::tempdir().unwrap();
        let generator = DeckGenerator::new(
            SandboxConfig::default()
                .with_overrides(Some(PathBuf::from("/no/such/python3")), None)
                .with_forward_output(false),
        );
        let err = generator
            .generate(&DeckSpec::default(), &dir.path().join("deck.pptx"))
            .unwrap_err();

        match err {
            GenerateError::Sandbox(inner) => {
                assert!(matches!(inner, SandboxError::Spawn { .. }));
                assert_eq!(inner.kind(), None::<FailureKind>);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
