//! Script execution and artifact verification.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::bootstrap::{parse_report, BOOTSTRAP, REPORT_ENV, REPORT_PREFIX};
use crate::config::{SandboxConfig, OUTPUT_PATH_ENV};
use crate::error::SandboxError;
use crate::process::{wait_with_timeout, CapturedOutput, ProcessOutcome};
use crate::request::InvocationRequest;
use crate::workdir::ScopedWorkdir;

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the artifact was found.
    pub output_path: PathBuf,
    pub elapsed: Duration,
    /// What the script printed, for diagnostics.
    pub stdout: String,
    pub stderr: String,
}

/// Runs generation scripts, one fresh interpreter per request.
#[derive(Debug, Clone, Default)]
pub struct ScriptRunner {
    config: SandboxConfig,
}

impl ScriptRunner {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Execute the script, then check that it saved the artifact.
    ///
    /// The working directory is gone by the time this returns, whatever
    /// the outcome.
    pub fn run(&self, request: &InvocationRequest) -> Result<RunReport, SandboxError> {
        let output = self.execute(request)?;

        verify_artifact(request.output_path())?;

        log::info!(
            "Script saved {} in {:.2}s",
            request.output_path().display(),
            output.elapsed.as_secs_f64()
        );

        Ok(RunReport {
            output_path: request.output_path().to_path_buf(),
            elapsed: output.elapsed,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Run the script in a scoped working directory and classify how it
    /// ended. Returns the captured output on a clean exit.
    fn execute(&self, request: &InvocationRequest) -> Result<CapturedOutput, SandboxError> {
        let workdir = ScopedWorkdir::create(&self.config.workdir_prefix)?;
        let report_path = tempfile::Builder::new()
            .prefix(REPORT_PREFIX)
            .suffix(".json")
            .tempfile()?
            .into_temp_path();

        let mut cmd = Command::new(&self.config.python);
        cmd.arg("-c")
            .arg(BOOTSTRAP)
            .current_dir(workdir.path())
            .env(OUTPUT_PATH_ENV, request.output_path())
            .env(REPORT_ENV, &*report_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!(
            "Running script with {} in {}",
            self.config.python.display(),
            workdir.path().display()
        );

        let mut child = cmd.spawn().map_err(|source| SandboxError::Spawn {
            python: self.config.python.clone(),
            source,
        })?;

        let output = wait_with_timeout(
            &mut child,
            Some(request.script_source().as_bytes()),
            self.config.timeout,
            self.config.forward_output,
        )?;

        let status = match output.outcome {
            ProcessOutcome::TimedOut => {
                return Err(SandboxError::TimedOut(self.config.timeout.unwrap_or_default()));
            }
            ProcessOutcome::Exited(status) => status,
        };

        let report = fs::read(&report_path).unwrap_or_default();
        if let Some(script_error) = parse_report(&String::from_utf8_lossy(&report)) {
            log::debug!("Script raised {}", script_error.kind);
            return Err(SandboxError::RuntimeFailure(script_error));
        }

        if !status.success() {
            return Err(SandboxError::Crashed { status });
        }

        Ok(output)
    }
}

/// The artifact must exist as a regular file once the script has finished.
pub fn verify_artifact(output_path: &Path) -> Result<(), SandboxError> {
    if output_path.is_file() {
        Ok(())
    } else {
        Err(SandboxError::NoArtifactProduced {
            output_path: output_path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        assert!(matches!(
            verify_artifact(&path),
            Err(SandboxError::NoArtifactProduced { .. })
        ));

        fs::write(&path, b"PK").unwrap();
        assert!(verify_artifact(&path).is_ok());
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_artifact(dir.path()).is_err());
    }

    #[test]
    fn test_missing_interpreter_is_not_classified() {
        let runner = ScriptRunner::new(
            SandboxConfig::default()
                .with_overrides(Some(PathBuf::from("/nonexistent/python-for-deck-tests")), None)
                .with_forward_output(false),
        );
        let out = tempfile::tempdir().unwrap();
        let request =
            InvocationRequest::new(Some(&out.path().join("x.pptx")), "print('hi')".into()).unwrap();

        let err = runner.run(&request).unwrap_err();
        assert!(matches!(err, SandboxError::Spawn { .. }));
        assert!(!err.is_classified());
    }
}
