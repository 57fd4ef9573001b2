//! Fire-and-forget restart of the system DHCP service.
//!
//! The restart runs on a detached task. Its outcome is only logged; callers
//! keep the `JoinHandle` if they want to wait for it, the publish pipeline
//! drops it.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{Result, ZtpError};

/// Spawn `<command...> <service>` on a detached task.
/// An empty `command` disables restarts.
pub fn spawn_service_restart(
    command: Vec<String>,
    service: String,
    limit: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if command.is_empty() {
            info!("Service restart disabled, not restarting {}", service);
            return;
        }
        match run_restart(&command, &service, limit).await {
            Ok(()) => info!("Restarted {}", service),
            Err(e) => warn!("{}", e),
        }
    })
}

async fn run_restart(command: &[String], service: &str, limit: Duration) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ZtpError::Internal("empty restart command".into()))?;
    let rendered = format!("{} {}", command.join(" "), service);
    let failed = |message: String| ZtpError::ServiceRestart {
        service: service.to_string(),
        command: rendered.clone(),
        message,
    };

    debug!("Running '{}'", rendered);
    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(service)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    match timeout(limit, cmd.status()).await {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(failed(format!("exited with {}", status))),
        Ok(Err(e)) => Err(failed(e.to_string())),
        Err(_) => Err(failed(format!("timed out after {:?}", limit))),
    }
}
