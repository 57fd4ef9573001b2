//! Request-layer facade over the two actors.
//!
//! `ZtpService` is what an outer request layer (HTTP or otherwise) calls.
//! `ZtpRuntime` spawns both actors from a loaded document and owns their
//! shutdown.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ZtpConfig;
use crate::envelope::ShutdownTx;
use crate::errors::Result;
use crate::host::HostRecord;
use crate::inventory::{create_inventory_actor, InventoryHandle};
use crate::responder::{PublishReport, ResponderActor, ResponderHandle};

#[derive(Clone)]
pub struct ZtpService {
    inventory: InventoryHandle,
    responder: ResponderHandle,
}

impl ZtpService {
    pub fn new(inventory: InventoryHandle, responder: ResponderHandle) -> Self {
        Self {
            inventory,
            responder,
        }
    }

    pub fn inventory(&self) -> &InventoryHandle {
        &self.inventory
    }

    pub fn responder(&self) -> &ResponderHandle {
        &self.responder
    }

    pub async fn create_host(&self, host: HostRecord) -> Result<HostRecord> {
        self.inventory.create(host.normalized()).await
    }

    pub async fn read_host(&self, fixed_ip: &str) -> Result<HostRecord> {
        self.inventory.read_one(fixed_ip).await
    }

    pub async fn read_hosts(&self) -> Result<Vec<String>> {
        self.inventory.read_all().await
    }

    pub async fn update_host(&self, previous_ip: &str, host: HostRecord) -> Result<HostRecord> {
        self.inventory.update(previous_ip, host.normalized()).await
    }

    /// Queue the device config for removal, then drop the host.
    /// The responder must see the host before the inventory forgets it.
    ///
    /// A locked or unknown host fails the read before anything is queued. If
    /// the inventory is locked between the queueing and the removal, the
    /// host stays in the registry while its device config is still removed
    /// at the next publish and regenerated by it.
    pub async fn delete_host(&self, fixed_ip: &str) -> Result<()> {
        self.inventory.read_one(fixed_ip).await?;
        self.responder.delete(fixed_ip).await?;
        self.inventory.delete(fixed_ip).await
    }

    pub async fn publish(&self) -> Result<PublishReport> {
        self.responder.save_and_publish().await
    }

    pub async fn serialize_hosts(&self) -> Result<String> {
        self.inventory.serialize().await
    }

    /// Settings and hosts as two YAML documents separated by a blank line
    pub async fn dump(&self) -> Result<String> {
        let settings = self.responder.dump_settings().await?;
        let hosts = self.inventory.serialize().await?;
        Ok(format!("{}\n{}", settings, hosts))
    }

    pub async fn lock(&self) -> Result<()> {
        self.inventory.lock().await
    }

    pub async fn unlock(&self) -> Result<()> {
        self.inventory.unlock().await
    }
}

/// Both actors running on the current tokio runtime
pub struct ZtpRuntime {
    service: ZtpService,
    shutdown: Vec<ShutdownTx>,
    tasks: Vec<JoinHandle<()>>,
}

impl ZtpRuntime {
    /// Seed the inventory from `config.hosts` and spawn both actors.
    /// `config_path` is where publishes save the document.
    pub fn spawn(config: ZtpConfig, config_path: PathBuf) -> Self {
        let ZtpConfig { core, hosts } = config;
        let core = Arc::new(core);

        let (inventory, inventory_actor, inventory_shutdown) =
            create_inventory_actor(hosts, core.request_timeout);
        let (responder, responder_actor, responder_shutdown) =
            ResponderActor::create(core, config_path, inventory.clone());

        let tasks = vec![
            tokio::spawn(inventory_actor.run()),
            tokio::spawn(responder_actor.run()),
        ];

        Self {
            service: ZtpService::new(inventory, responder),
            shutdown: vec![inventory_shutdown, responder_shutdown],
            tasks,
        }
    }

    pub fn service(&self) -> &ZtpService {
        &self.service
    }

    /// Signal both actors and wait for them to finish
    pub async fn shutdown(self) {
        for tx in &self.shutdown {
            let _ = tx.send(()).await;
        }
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!("Actor task failed: {}", e);
            }
        }
        info!("All actors stopped");
    }
}
