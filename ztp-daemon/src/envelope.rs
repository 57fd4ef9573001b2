//! Envelope protocol shared by the inventory and responder actors.
//!
//! Every request carries its operation (the command variant), its payload
//! fields and a one-shot reply channel. A `oneshot::Sender` is consumed by
//! `send`, so a reply channel can never be reused across requests.

use std::fmt;
use tokio::sync::oneshot;

use crate::errors::{Result, ZtpError};

/// Reply channel carried by every command.
pub type ReplyTx<T> = oneshot::Sender<Result<T>>;

/// Shutdown signal for an actor loop. Distinct from the command channel.
pub type ShutdownTx = tokio::sync::mpsc::Sender<()>;

/// Operation tag of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    ReadOne,
    ReadAll,
    Update,
    Delete,
    Serialize,
    Lock,
    Unlock,
    SaveAndPublish,
    /// Internal registry export used by the responder
    Snapshot,
    /// Internal settings dump used by the service facade
    DumpSettings,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::ReadOne => "READ_ONE",
            Operation::ReadAll => "READ_ALL",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Serialize => "SERIALIZE",
            Operation::Lock => "LOCK",
            Operation::Unlock => "UNLOCK",
            Operation::SaveAndPublish => "SAVE_AND_PUBLISH",
            Operation::Snapshot => "SNAPSHOT",
            Operation::DumpSettings => "DUMP_SETTINGS",
        }
    }

    /// LOCK and UNLOCK always apply, and the internal snapshot is the
    /// consistent read the lock exists for.
    pub fn bypasses_lock(&self) -> bool {
        matches!(
            self,
            Operation::Lock | Operation::Unlock | Operation::Snapshot
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse reply status as seen by a request layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Locked,
}

impl Status {
    pub fn of<T>(reply: &Result<T>) -> Self {
        match reply {
            Ok(_) => Status::Ok,
            Err(ZtpError::Locked(_)) => Status::Locked,
            Err(_) => Status::Error,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::Error => f.write_str("ERROR"),
            Status::Locked => f.write_str("LOCKED"),
        }
    }
}
