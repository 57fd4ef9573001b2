//! Commands for the ResponderActor

use crate::envelope::{Operation, ReplyTx};

/// Commands that can be sent to the responder actor
pub enum ResponderCommand {
    /// Queue the device config of the host at `fixed_ip` for removal
    Delete {
        fixed_ip: String,
        reply: ReplyTx<()>,
    },
    SaveAndPublish {
        reply: ReplyTx<PublishReport>,
    },
    DumpSettings {
        reply: ReplyTx<String>,
    },
}

impl ResponderCommand {
    pub fn operation(&self) -> Operation {
        match self {
            ResponderCommand::Delete { .. } => Operation::Delete,
            ResponderCommand::SaveAndPublish { .. } => Operation::SaveAndPublish,
            ResponderCommand::DumpSettings { .. } => Operation::DumpSettings,
        }
    }
}

/// What a successful publish did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Backlogged device configs actually removed
    pub removed_files: usize,
    /// Hosts written to the document and the server config
    pub hosts: usize,
    pub device_configs_written: usize,
    /// Hosts whose vendor has no template
    pub skipped_vendors: usize,
}
