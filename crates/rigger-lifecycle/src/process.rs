//! External process execution
//!
//! Both output streams are drained to completion before the exit status is
//! awaited, so a tool writing more than a pipe buffer never blocks.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::{LifecycleError, Result};

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args`, failing on a non-zero exit
///
/// `label` names the invocation in errors and logs, e.g. `helm template`.
pub async fn run_captured<I, S>(program: &Path, args: I, label: &str) -> Result<CapturedOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    tracing::debug!(
        command = label,
        program = %program.display(),
        args = ?args,
        "running external command"
    );

    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| LifecycleError::io(format!("start {} ({})", label, program.display()), e))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (stdout, stderr) = tokio::try_join!(drain(stdout), drain(stderr))
        .map_err(|e| LifecycleError::io(format!("read output of {}", label), e))?;

    let status = child
        .wait()
        .await
        .map_err(|e| LifecycleError::io(format!("wait for {}", label), e))?;

    tracing::debug!(command = label, status = %status, "external command finished");

    if !status.success() {
        return Err(LifecycleError::Process {
            command: label.to_string(),
            status: status.to_string(),
            stdout,
            stderr,
        });
    }

    Ok(CapturedOutput { stdout, stderr })
}

async fn drain<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buffer).await?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
