//! Inventory store actor.
//!
//! The actor exclusively owns the host registry and serves one command at a
//! time, in arrival order. Callers talk to it through `InventoryHandle`.
//! While locked, every command except LOCK, UNLOCK and the internal
//! SNAPSHOT is answered with `ZtpError::Locked`.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::{encode_hosts, HostMap};
use crate::envelope::{Operation, ReplyTx, ShutdownTx};
use crate::errors::{Result, ZtpError};
use crate::host::HostRecord;

const INBOX_CAPACITY: usize = 32;

/// Commands that can be sent to the inventory actor
pub enum InventoryCommand {
    Create {
        host: HostRecord,
        reply: ReplyTx<HostRecord>,
    },
    ReadOne {
        fixed_ip: String,
        reply: ReplyTx<HostRecord>,
    },
    ReadAll {
        reply: ReplyTx<Vec<String>>,
    },
    Update {
        previous_ip: String,
        host: HostRecord,
        reply: ReplyTx<HostRecord>,
    },
    Delete {
        fixed_ip: String,
        reply: ReplyTx<()>,
    },
    Serialize {
        reply: ReplyTx<String>,
    },
    Lock {
        reply: ReplyTx<()>,
    },
    Unlock {
        reply: ReplyTx<()>,
    },
    /// Copy of the whole registry, served even while locked.
    Snapshot {
        reply: ReplyTx<HostMap>,
    },
}

impl InventoryCommand {
    pub fn operation(&self) -> Operation {
        match self {
            InventoryCommand::Create { .. } => Operation::Create,
            InventoryCommand::ReadOne { .. } => Operation::ReadOne,
            InventoryCommand::ReadAll { .. } => Operation::ReadAll,
            InventoryCommand::Update { .. } => Operation::Update,
            InventoryCommand::Delete { .. } => Operation::Delete,
            InventoryCommand::Serialize { .. } => Operation::Serialize,
            InventoryCommand::Lock { .. } => Operation::Lock,
            InventoryCommand::Unlock { .. } => Operation::Unlock,
            InventoryCommand::Snapshot { .. } => Operation::Snapshot,
        }
    }

    /// Answer the command with `err` without executing it
    fn reject(self, err: ZtpError) {
        match self {
            InventoryCommand::Create { reply, .. }
            | InventoryCommand::ReadOne { reply, .. }
            | InventoryCommand::Update { reply, .. } => {
                let _ = reply.send(Err(err));
            }
            InventoryCommand::ReadAll { reply } => {
                let _ = reply.send(Err(err));
            }
            InventoryCommand::Delete { reply, .. }
            | InventoryCommand::Lock { reply }
            | InventoryCommand::Unlock { reply } => {
                let _ = reply.send(Err(err));
            }
            InventoryCommand::Serialize { reply } => {
                let _ = reply.send(Err(err));
            }
            InventoryCommand::Snapshot { reply } => {
                let _ = reply.send(Err(err));
            }
        }
    }
}

/// Handle for sending commands to the inventory actor.
/// This is cheap to clone (just clones the channel sender).
#[derive(Clone)]
pub struct InventoryHandle {
    tx: mpsc::Sender<InventoryCommand>,
    request_timeout: Duration,
}

impl InventoryHandle {
    pub fn new(tx: mpsc::Sender<InventoryCommand>, request_timeout: Duration) -> Self {
        Self {
            tx,
            request_timeout,
        }
    }

    /// Send one command and wait for its reply, bounded by the request timeout
    async fn request<T>(
        &self,
        operation: Operation,
        build: impl FnOnce(ReplyTx<T>) -> InventoryCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let exchange = async {
            self.tx
                .send(build(reply_tx))
                .await
                .map_err(|_| ZtpError::Internal("Inventory actor closed".into()))?;
            reply_rx
                .await
                .map_err(|_| ZtpError::Internal("Inventory actor dropped response".into()))?
        };
        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| ZtpError::Timeout {
                operation,
                after: self.request_timeout,
            })?
    }

    /// Insert or overwrite the host at its fixed IP
    pub async fn create(&self, host: HostRecord) -> Result<HostRecord> {
        self.request(Operation::Create, |reply| InventoryCommand::Create { host, reply })
            .await
    }

    pub async fn read_one(&self, fixed_ip: &str) -> Result<HostRecord> {
        let fixed_ip = fixed_ip.to_string();
        self.request(Operation::ReadOne, |reply| InventoryCommand::ReadOne { fixed_ip, reply })
            .await
    }

    /// All known fixed IPs
    pub async fn read_all(&self) -> Result<Vec<String>> {
        self.request(Operation::ReadAll, |reply| InventoryCommand::ReadAll { reply })
            .await
    }

    /// Replace the host at `previous_ip` with `host` under its own fixed IP
    pub async fn update(&self, previous_ip: &str, host: HostRecord) -> Result<HostRecord> {
        let previous_ip = previous_ip.to_string();
        self.request(Operation::Update, |reply| InventoryCommand::Update {
            previous_ip,
            host,
            reply,
        })
        .await
    }

    pub async fn delete(&self, fixed_ip: &str) -> Result<()> {
        let fixed_ip = fixed_ip.to_string();
        self.request(Operation::Delete, |reply| InventoryCommand::Delete { fixed_ip, reply })
            .await
    }

    /// The registry as a YAML document
    pub async fn serialize(&self) -> Result<String> {
        self.request(Operation::Serialize, |reply| InventoryCommand::Serialize { reply })
            .await
    }

    pub async fn lock(&self) -> Result<()> {
        self.request(Operation::Lock, |reply| InventoryCommand::Lock { reply })
            .await
    }

    pub async fn unlock(&self) -> Result<()> {
        self.request(Operation::Unlock, |reply| InventoryCommand::Unlock { reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<HostMap> {
        self.request(Operation::Snapshot, |reply| InventoryCommand::Snapshot { reply })
            .await
    }
}

/// The inventory actor - owns the registry and processes commands
pub struct InventoryActor {
    hosts: HostMap,
    locked: bool,
    rx: mpsc::Receiver<InventoryCommand>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl InventoryActor {
    pub fn new(
        hosts: HostMap,
        rx: mpsc::Receiver<InventoryCommand>,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            hosts,
            locked: false,
            rx,
            shutdown_rx,
        }
    }

    /// Run the actor event loop until shutdown or until every handle is gone
    pub async fn run(mut self) {
        info!("Inventory actor started with {} hosts", self.hosts.len());
        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.process_command(cmd),
                    None => break,
                },
                Some(()) = self.shutdown_rx.recv() => {
                    debug!("Inventory actor received shutdown");
                    break;
                }
            }
        }
        info!("Inventory actor stopped");
    }

    fn process_command(&mut self, cmd: InventoryCommand) {
        let operation = cmd.operation();
        if self.locked && !operation.bypasses_lock() {
            debug!("Rejecting {} while locked", operation);
            cmd.reject(ZtpError::Locked(operation));
            return;
        }
        debug!("Processing {}", operation);

        match cmd {
            InventoryCommand::Create { host, reply } => {
                let _ = reply.send(self.create(host));
            }
            InventoryCommand::ReadOne { fixed_ip, reply } => {
                let result = self
                    .hosts
                    .get(&fixed_ip)
                    .cloned()
                    .ok_or(ZtpError::HostNotFound(fixed_ip));
                let _ = reply.send(result);
            }
            InventoryCommand::ReadAll { reply } => {
                let _ = reply.send(Ok(self.hosts.keys().cloned().collect()));
            }
            InventoryCommand::Update {
                previous_ip,
                host,
                reply,
            } => {
                let _ = reply.send(self.update(&previous_ip, host));
            }
            InventoryCommand::Delete { fixed_ip, reply } => {
                let result = match self.hosts.remove(&fixed_ip) {
                    Some(_) => Ok(()),
                    None => Err(ZtpError::HostNotFound(fixed_ip)),
                };
                let _ = reply.send(result);
            }
            InventoryCommand::Serialize { reply } => {
                let _ = reply.send(encode_hosts(&self.hosts));
            }
            InventoryCommand::Lock { reply } => {
                self.locked = true;
                let _ = reply.send(Ok(()));
            }
            InventoryCommand::Unlock { reply } => {
                self.locked = false;
                let _ = reply.send(Ok(()));
            }
            InventoryCommand::Snapshot { reply } => {
                let _ = reply.send(Ok(self.hosts.clone()));
            }
        }
    }

    fn create(&mut self, host: HostRecord) -> Result<HostRecord> {
        host.validate()?;
        let key = host.fixed_ip.clone();
        self.hosts.insert(key.clone(), host);
        self.hosts
            .get(&key)
            .cloned()
            .ok_or(ZtpError::HostNotFound(key))
    }

    fn update(&mut self, previous_ip: &str, host: HostRecord) -> Result<HostRecord> {
        // Validate before removing so a bad record never costs the old one.
        host.validate()?;
        if self.hosts.remove(previous_ip).is_none() {
            debug!("Update of unknown host {}, inserting as new", previous_ip);
        }
        self.create(host)
    }
}

/// Create the inventory actor seeded with `hosts`.
/// Returns the handle, the actor to spawn, and its shutdown signal.
pub fn create_inventory_actor(
    hosts: HostMap,
    request_timeout: Duration,
) -> (InventoryHandle, InventoryActor, ShutdownTx) {
    let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let handle = InventoryHandle::new(tx, request_timeout);
    let actor = InventoryActor::new(hosts, rx, shutdown_rx);
    (handle, actor, shutdown_tx)
}

#[cfg(test)]
mod tests;
