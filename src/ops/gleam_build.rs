//! Implementation of `gleam build --target javascript`.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::project::BuildFlags;
use crate::core::Project;
use crate::error::{CompilerError, FailureReason};
use crate::util::process::{find_executable, ProcessBuilder};

/// Output of a successful compiler run.
///
/// The generated files under the output root are the real artifact; the
/// captured text is only kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl BuildResult {
    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }

    /// stdout followed by stderr.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Compiler arguments, in a fixed order.
pub fn build_args(flags: &BuildFlags) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "--target".to_string(),
        "javascript".to_string(),
    ];

    if flags.warnings_as_errors {
        args.push("--warnings-as-errors".to_string());
    }

    if flags.no_print_progress {
        args.push("--no-print-progress".to_string());
    }

    args
}

/// Run the compiler in the project root and wait for it, bounded by the
/// configured timeout.
pub fn build(project: &Project) -> Result<BuildResult, CompilerError> {
    let log = project.log();
    let flags = project.build_flags();

    let pb = ProcessBuilder::new(program(project))
        .args(build_args(flags))
        .cwd(project.cwd())
        .timeout(flags.timeout);

    let command = display_command(project, &pb);
    log.command(&command);

    let failed = |reason: FailureReason, stdout: String, stderr: String| {
        let err = CompilerError {
            command: command.clone(),
            reason,
            stdout,
            stderr,
        };
        log.error(format_args!("Failed '{}'", command));
        err
    };

    let output = pb
        .exec_captured()
        .map_err(|e| failed(FailureReason::Spawn(e.to_string()), String::new(), String::new()))?;

    if output.timed_out() {
        return Err(failed(
            FailureReason::TimedOut {
                timeout_ms: flags.timeout.as_millis(),
            },
            output.stdout,
            output.stderr,
        ));
    }

    if !output.success() {
        let code = output.status.and_then(|s| s.code());
        return Err(failed(FailureReason::Exit(code), output.stdout, output.stderr));
    }

    let result = BuildResult {
        stdout: output.stdout,
        stderr: output.stderr,
        duration: output.elapsed,
    };

    let combined = result.combined_output();
    if !combined.is_empty() {
        log.info(format_args!("out: {}", combined));
    }
    log.detail(format_args!("[build] {}ms", result.duration_ms()));

    Ok(result)
}

/// Bare binary names are looked up in PATH up front; paths are used as given.
fn program(project: &Project) -> PathBuf {
    let bin = project.bin();
    if bin.components().count() == 1 {
        if let Some(found) = find_executable(bin) {
            return found;
        }
    }
    bin.to_path_buf()
}

fn display_command(project: &Project, pb: &ProcessBuilder) -> String {
    let mut parts = vec![project.bin().display().to_string()];
    parts.extend(pb.get_args().iter().cloned());
    parts.join(" ")
}
