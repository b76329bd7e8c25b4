//! Runner configuration.
//!
//! Defaults, then environment variables, then explicit overrides (CLI flags).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment key holding the absolute output path inside the script.
pub const OUTPUT_PATH_ENV: &str = "PPTX_OUTPUT_PATH";

/// Name prefix of the per-run working directory.
pub const WORKDIR_PREFIX: &str = "dome_ppt_sandbox_";

/// Default wall-clock bound for one script run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default interpreter, resolved through `PATH`.
pub const DEFAULT_PYTHON: &str = "python3";

const PYTHON_ENV: &str = "PPTX_SANDBOX_PYTHON";
const TIMEOUT_ENV: &str = "PPTX_SANDBOX_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Interpreter executable.
    pub python: PathBuf,

    /// Wall-clock bound; `None` lets a script run forever.
    pub timeout: Option<Duration>,

    /// Prefix for the scoped working directory.
    pub workdir_prefix: String,

    /// Copy the script's stdout/stderr to our stderr as it runs.
    pub forward_output: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from(DEFAULT_PYTHON),
            timeout: timeout_from_secs(DEFAULT_TIMEOUT_SECS),
            workdir_prefix: WORKDIR_PREFIX.to_string(),
            forward_output: true,
        }
    }
}

impl SandboxConfig {
    /// Defaults overridden by `PPTX_SANDBOX_PYTHON` and
    /// `PPTX_SANDBOX_TIMEOUT_SECS` (0 disables the bound).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(python) = env::var(PYTHON_ENV) {
            if !python.trim().is_empty() {
                config.python = PathBuf::from(python);
            }
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.timeout = timeout_from_secs(secs),
                Err(_) => log::warn!(
                    "Invalid {}: {:?}, using default ({})",
                    TIMEOUT_ENV,
                    raw,
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// Apply CLI overrides on top of the current values.
    pub fn with_overrides(mut self, python: Option<PathBuf>, timeout_secs: Option<u64>) -> Self {
        if let Some(python) = python {
            self.python = python;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = timeout_from_secs(secs);
        }
        self
    }

    pub fn with_forward_output(mut self, forward: bool) -> Self {
        self.forward_output = forward;
        self
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SandboxConfig::default();
        assert_eq!(config.python, PathBuf::from("python3"));
        assert_eq!(config.timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.workdir_prefix, "dome_ppt_sandbox_");
        assert!(config.forward_output);
    }

    #[test]
    fn test_overrides() {
        let config = SandboxConfig::default()
            .with_overrides(Some(PathBuf::from("/usr/bin/python3.12")), Some(7))
            .with_forward_output(false);

        assert_eq!(config.python, PathBuf::from("/usr/bin/python3.12"));
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));
        assert!(!config.forward_output);
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let config = SandboxConfig::default().with_overrides(None, Some(0));
        assert_eq!(config.timeout, None);
        assert_eq!(config.python, PathBuf::from("python3"));
    }
}
