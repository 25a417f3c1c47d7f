//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit polls while waiting on a child with a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output is still collected after a timed-out child was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(50);

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

/// Captured result of a finished (or killed) subprocess.
#[derive(Debug)]
pub struct TimedOutput {
    /// Exit status; `None` if the process was killed after the timeout.
    pub status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl TimedOutput {
    pub fn timed_out(&self) -> bool {
        self.status.is_none()
    }

    pub fn success(&self) -> bool {
        self.status.map(|s| s.success()).unwrap_or(false)
    }
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Kill the process if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// With a timeout set, the child is killed once the deadline passes and
    /// the returned output has no exit status. Pipes inherited by the child's
    /// own descendants are not waited on past the deadline; whatever was read
    /// by then is returned. Only spawn and wait failures are reported as
    /// errors; a non-zero exit is left to the caller.
    pub fn exec_captured(&self) -> io::Result<TimedOutput> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let started = Instant::now();
        let mut child = cmd.spawn()?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => wait_with_deadline(&mut child, started + timeout)?,
            None => Some(child.wait()?),
        };

        let drain_deadline = self
            .timeout
            .map(|timeout| (started + timeout).max(Instant::now() + DRAIN_GRACE));

        Ok(TimedOutput {
            status,
            stdout: collect(stdout, drain_deadline),
            stderr: collect(stderr, drain_deadline),
            elapsed: started.elapsed(),
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn wait_with_deadline(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may have exited between the poll and the kill.
            if let Err(e) = child.kill() {
                if e.kind() != io::ErrorKind::InvalidInput {
                    return Err(e);
                }
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Output read so far from one pipe, plus a signal sent at EOF.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    eof: Receiver<()>,
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drain> {
    pipe.map(|mut pipe| {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, eof) = mpsc::channel();
        let sink = Arc::clone(&buf);

        thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend_from_slice(&chunk[..n]),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            let _ = tx.send(());
        });

        Drain { buf, eof }
    })
}

/// Wait for EOF until `deadline` (forever without one), then take what was read.
///
/// A reader still blocked after the deadline is left behind; it exits once
/// the last holder of the pipe does.
fn collect(drain: Option<Drain>, deadline: Option<Instant>) -> String {
    let Some(drain) = drain else {
        return String::new();
    };

    // A disconnected channel means the reader already finished.
    match deadline {
        Some(deadline) => {
            let _ = drain
                .eof
                .recv_timeout(deadline.saturating_duration_since(Instant::now()));
        }
        None => {
            let _ = drain.eof.recv();
        }
    }

    let buf = drain.buf.lock().unwrap_or_else(PoisonError::into_inner);
    let output = String::from_utf8_lossy(&buf).into_owned();
    output
}

/// Find an executable in PATH.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}
