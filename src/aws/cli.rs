//! AWS CLI command execution.

use crate::config;
use crate::error::BoxError;
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]+)\s*"#).expect("Invalid Regex")
    })
}

/// Stderr fragments of failures worth retrying.
const TRANSIENT_MARKERS: [&str; 6] = [
    "Throttling",
    "RequestLimitExceeded",
    "TooManyRequests",
    "ServiceUnavailable",
    "InternalError",
    "Could not connect",
];

/// Run a command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
pub fn run(cmd: &str) -> Result<String, BoxError> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);
    let (program, args) = cmds.split_first().ok_or("Empty command")?;

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running {program}: {}", stderr.trim()).into());
    }

    log::debug!("Success output.stdout.len(): {}", output.stdout.len());
    if output.stdout.len() > config::MAX_CLI_OUTPUT {
        return Err(format!(
            "Response too large: {} bytes for command: {:?}",
            output.stdout.len(),
            cmds
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;
    Ok(stdout)
}

/// Run a command, retrying transient failures with a growing pause.
pub fn run_with_retry(cmd: &str, attempts: u32) -> Result<String, BoxError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match run(cmd) {
            Ok(out) => return Ok(out),
            Err(e) if attempt < attempts && is_transient(&e.to_string()) => {
                let pause = config::SLEEP_MSEC * u64::from(attempt);
                log::warn!("attempt {attempt}/{attempts} failed, retry in {pause}ms: {e}");
                std::thread::sleep(Duration::from_millis(pause));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_transient(message: &str) -> bool {
    TRANSIENT_MARKERS.iter().any(|m| message.contains(m))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}
