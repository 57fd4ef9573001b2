//! ResponderActor - owns the deletion backlog and runs the publish pipeline

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::{encode_settings, CoreSettings, HostMap, ZtpConfig};
use crate::dhcpd::{render_interface_config, render_server_config};
use crate::envelope::ShutdownTx;
use crate::errors::{Result, ZtpError};
use crate::host::device_config_path;
use crate::inventory::InventoryHandle;
use crate::persistence::{remove_file_logged, write_file_atomic};
use crate::restart::spawn_service_restart;
use crate::templates::{DeviceTemplatePayload, TemplateRenderer, Vendor};

use super::command::{PublishReport, ResponderCommand};
use super::handle::ResponderHandle;

const INBOX_CAPACITY: usize = 32;

pub struct ResponderActor {
    core: Arc<CoreSettings>,
    /// Where the `{core, hosts}` document is saved
    config_path: PathBuf,
    /// Hostnames whose device config is removed at the next publish
    backlog: Vec<String>,
    inventory: InventoryHandle,
    renderer: TemplateRenderer,
    rx: mpsc::Receiver<ResponderCommand>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl ResponderActor {
    /// Create the responder actor.
    /// Returns the handle, the actor to spawn, and its shutdown signal.
    pub fn create(
        core: Arc<CoreSettings>,
        config_path: PathBuf,
        inventory: InventoryHandle,
    ) -> (ResponderHandle, Self, ShutdownTx) {
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handle = ResponderHandle::new(tx, core.request_timeout);
        let renderer = TemplateRenderer::new(core.templates_dir.clone());
        let actor = Self {
            core,
            config_path,
            backlog: Vec::new(),
            inventory,
            renderer,
            rx,
            shutdown_rx,
        };
        (handle, actor, shutdown_tx)
    }

    pub async fn run(mut self) {
        info!("Responder actor started for {:?}", self.config_path);
        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.process_command(cmd).await,
                    None => break,
                },
                Some(()) = self.shutdown_rx.recv() => {
                    debug!("Responder actor received shutdown");
                    break;
                }
            }
        }
        if !self.backlog.is_empty() {
            info!(
                "Responder stopping with {} unpublished deletions",
                self.backlog.len()
            );
        }
        info!("Responder actor stopped for {:?}", self.config_path);
    }

    async fn process_command(&mut self, cmd: ResponderCommand) {
        debug!("Processing {}", cmd.operation());
        match cmd {
            ResponderCommand::Delete { fixed_ip, reply } => {
                let result = self.queue_deletion(&fixed_ip).await;
                let _ = reply.send(result);
            }
            ResponderCommand::SaveAndPublish { reply } => {
                let result = self.save_and_publish().await;
                if let Err(e) = &result {
                    error!("Publish failed: {}", e);
                }
                let _ = reply.send(result);
            }
            ResponderCommand::DumpSettings { reply } => {
                let _ = reply.send(encode_settings(&self.core));
            }
        }
    }

    async fn queue_deletion(&mut self, fixed_ip: &str) -> Result<()> {
        let hosts = self.inventory.snapshot().await?;
        let host = hosts
            .get(fixed_ip)
            .ok_or_else(|| ZtpError::HostNotFound(fixed_ip.to_string()))?;
        debug!("Queued {} for removal", host.hostname);
        self.backlog.push(host.hostname.clone());
        Ok(())
    }

    /// Publish pipeline. Steps run in order and the first fatal error stops
    /// it; earlier steps are not rolled back.
    async fn save_and_publish(&mut self) -> Result<PublishReport> {
        let removed_files = self.drain_backlog();

        let hosts: HostMap = self
            .inventory
            .snapshot()
            .await?
            .into_iter()
            .map(|(ip, host)| {
                let derived = host.with_derived_paths(&self.core);
                (ip, derived)
            })
            .collect();
        self.save_document(&hosts)?;

        let generated_at = Utc::now();
        let server_config = render_server_config(&self.core, hosts.values(), generated_at);
        write_file_atomic(&self.core.dhcpd_path, server_config.as_bytes())?;
        let interface_config = render_interface_config(&self.core, generated_at);
        write_file_atomic(&self.core.dhcp_path, interface_config.as_bytes())?;

        let (device_configs_written, skipped_vendors) = self.write_device_configs(&hosts)?;

        spawn_service_restart(
            self.core.restart_command.clone(),
            self.core.dhcp_service.clone(),
            self.core.restart_timeout,
        );

        let report = PublishReport {
            removed_files,
            hosts: hosts.len(),
            device_configs_written,
            skipped_vendors,
        };
        info!(
            "Published {} hosts ({} device configs, {} removed)",
            report.hosts, report.device_configs_written, report.removed_files
        );
        Ok(report)
    }

    /// Remove the device config of every queued hostname. Misses are logged.
    fn drain_backlog(&mut self) -> usize {
        let dir = &self.core.file_configs_location;
        let removed = self
            .backlog
            .iter()
            .filter(|hostname| remove_file_logged(&device_config_path(dir, hostname)))
            .count();
        self.backlog.clear();
        removed
    }

    fn save_document(&self, hosts: &HostMap) -> Result<()> {
        let document = ZtpConfig::new((*self.core).clone(), hosts.clone());
        let text = document.encode()?;
        write_file_atomic(&self.config_path, text.as_bytes())
    }

    fn write_device_configs(&self, hosts: &HostMap) -> Result<(usize, usize)> {
        let dir = &self.core.file_configs_location;
        std::fs::create_dir_all(dir).map_err(|e| ZtpError::io(dir, e))?;

        let mut written = 0;
        let mut skipped = 0;
        for host in hosts.values() {
            let Some(vendor) = Vendor::from_tag(&host.vendor) else {
                debug!("No template for vendor '{}' of {}, skipping", host.vendor, host.hostname);
                skipped += 1;
                continue;
            };
            let payload = DeviceTemplatePayload::new(&self.core, host);
            self.renderer
                .write_device_config(vendor, &payload, &host.device_config_path(dir))?;
            written += 1;
        }
        Ok((written, skipped))
    }
}
