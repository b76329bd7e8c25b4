//! Bounded child process execution.
//!
//! Shared by the script runner and the slide image extractor.

use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Child, ExitStatus};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running child is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Minimum time given to the pipe threads after the child exits.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Exited(ExitStatus),
    /// Killed after exceeding the timeout.
    TimedOut,
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(status) => write!(f, "{}", status),
            Self::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Result of [`wait_with_timeout`].
#[derive(Debug)]
pub struct CapturedOutput {
    pub outcome: ProcessOutcome,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        matches!(self.outcome, ProcessOutcome::Exited(status) if status.success())
    }

    pub fn timed_out(&self) -> bool {
        self.outcome == ProcessOutcome::TimedOut
    }
}

/// Feed `input` to the child's stdin, collect its stdout/stderr, and wait
/// for it to exit, killing it once `timeout` has elapsed.
///
/// The pipes are drained on background threads while the child runs. A child
/// writing more than the pipe buffer would otherwise block forever on write
/// while we wait for it to exit. With `forward_to_stderr`, the child's output
/// is also copied to our stderr as it arrives; our stdout is never touched.
///
/// The timeout also bounds draining the pipes after the child exits: a
/// background process it started may keep them open indefinitely.
pub fn wait_with_timeout(
    child: &mut Child,
    input: Option<&[u8]>,
    timeout: Option<Duration>,
    forward_to_stderr: bool,
) -> io::Result<CapturedOutput> {
    let start = Instant::now();

    let stdin_handle = match (child.stdin.take(), input) {
        (Some(mut stdin), Some(input)) => {
            let input = input.to_vec();
            Some(thread::spawn(move || {
                // The child may exit without reading everything.
                if let Err(e) = stdin.write_all(&input) {
                    if e.kind() != io::ErrorKind::BrokenPipe {
                        log::debug!("Failed to write child stdin: {}", e);
                    }
                }
            }))
        }
        // Dropping the handle closes the pipe so the child sees EOF.
        _ => None,
    };

    let stdout_handle = child
        .stdout
        .take()
        .map(|out| spawn_reader(out, forward_to_stderr));
    let stderr_handle = child
        .stderr
        .take()
        .map(|err| spawn_reader(err, forward_to_stderr));

    loop {
        if let Some(status) = child.try_wait()? {
            // Processes the child left behind inherit its pipes, so EOF may
            // never come. The pipes get whatever remains of the timeout.
            let deadline =
                timeout.map(|limit| (start + limit).max(Instant::now() + DRAIN_GRACE));
            if let Some(handle) = stdin_handle {
                if join_until(handle, deadline).is_none() {
                    log::warn!("Child stdin still open after exit; detaching writer");
                }
            }
            return Ok(CapturedOutput {
                outcome: ProcessOutcome::Exited(status),
                stdout: join_reader(stdout_handle, deadline),
                stderr: join_reader(stderr_handle, deadline),
                elapsed: start.elapsed(),
            });
        }

        if let Some(limit) = timeout {
            if start.elapsed() > limit {
                log::warn!(
                    "Killing process {} after {} seconds",
                    child.id(),
                    limit.as_secs()
                );
                let _ = child.kill();
                let _ = child.wait();
                // Descendants of the child may still hold the pipes open, so
                // the reader threads are detached rather than joined.
                return Ok(CapturedOutput {
                    outcome: ProcessOutcome::TimedOut,
                    stdout: String::new(),
                    stderr: String::new(),
                    elapsed: start.elapsed(),
                });
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R, forward: bool) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut collected = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if forward {
                        let mut stderr = io::stderr().lock();
                        let _ = stderr.write_all(&buf[..n]);
                        let _ = stderr.flush();
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        String::from_utf8_lossy(&collected).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>, deadline: Option<Instant>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    join_until(handle, deadline).unwrap_or_else(|| {
        log::warn!("Child output pipe still open after exit; detaching reader");
        String::new()
    })
}

/// Join `handle`, or give up at `deadline` and leave the thread detached.
fn join_until<T>(handle: JoinHandle<T>, deadline: Option<Instant>) -> Option<T> {
    if let Some(deadline) = deadline {
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return None;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
    handle.join().ok()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn sh(script: &str) -> Child {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[test]
    fn test_captures_output_and_status() {
        let mut child = sh("cat; echo oops >&2; exit 3");
        let output = wait_with_timeout(&mut child, Some(b"hello"), None, false).unwrap();

        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "oops\n");
        assert!(!output.success());
        match output.outcome {
            ProcessOutcome::Exited(status) => assert_eq!(status.code(), Some(3)),
            ProcessOutcome::TimedOut => panic!("unexpected timeout"),
        }
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let mut child = sh("head -c 300000 /dev/zero | tr '\\0' 'x'");
        let output =
            wait_with_timeout(&mut child, None, Some(Duration::from_secs(30)), false).unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.len(), 300_000);
    }

    #[test]
    fn test_leftover_process_holding_pipes_does_not_block() {
        let mut child = sh("sleep 30 & echo started");
        let output =
            wait_with_timeout(&mut child, None, Some(Duration::from_secs(1)), false).unwrap();

        assert!(output.success());
        assert!(output.elapsed < Duration::from_secs(10));
    }

    #[test]
    fn test_pipes_are_drained_after_exit() {
        let mut child = sh("echo done");
        let output =
            wait_with_timeout(&mut child, None, Some(Duration::from_secs(30)), false).unwrap();

        assert_eq!(output.stdout, "done\n");
    }

    #[test]
    fn test_timeout_kills_child() {
        let mut child = sh("exec sleep 30");
        let output =
            wait_with_timeout(&mut child, None, Some(Duration::from_millis(200)), false).unwrap();

        assert!(output.timed_out());
        assert!(!output.success());
        assert!(output.elapsed < Duration::from_secs(10));
    }
}
