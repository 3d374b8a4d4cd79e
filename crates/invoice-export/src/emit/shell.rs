use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Command `{0}` failed with status {1}")]
    CommandFailed(String, std::process::ExitStatus),
}

/// Run a shell command with `input` written to its stdin.
///
/// The command's stdout is discarded; stderr is inherited. If `timeout`
/// elapses first the process is killed.
pub fn feed_command(
    command_str: &str,
    input: &str,
    timeout: Option<Duration>,
) -> Result<(), ShellError> {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_str);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_str);
        c
    };

    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn()?;

    // stdin is closed at the end of this block so the command sees EOF
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(input.as_bytes()) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err.into());
        }
    }

    let status = match timeout {
        Some(duration) => match child.wait_timeout(duration)? {
            Some(status) => status,
            None => {
                child.kill()?;
                child.wait()?;
                return Err(ShellError::Timeout(command_str.to_string(), duration));
            }
        },
        None => child.wait()?,
    };

    if !status.success() {
        return Err(ShellError::CommandFailed(command_str.to_string(), status));
    }
    Ok(())
}
