//! ResponderHandle - handle for communicating with ResponderActor

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::envelope::{Operation, ReplyTx};
use crate::errors::{Result, ZtpError};

use super::command::{PublishReport, ResponderCommand};

/// Handle for sending commands to the responder actor.
/// This is cheap to clone (just clones the channel sender).
#[derive(Clone)]
pub struct ResponderHandle {
    tx: mpsc::Sender<ResponderCommand>,
    request_timeout: Duration,
}

impl ResponderHandle {
    pub(super) fn new(tx: mpsc::Sender<ResponderCommand>, request_timeout: Duration) -> Self {
        Self {
            tx,
            request_timeout,
        }
    }

    async fn request<T>(
        &self,
        operation: Operation,
        build: impl FnOnce(ReplyTx<T>) -> ResponderCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let exchange = async {
            self.tx
                .send(build(reply_tx))
                .await
                .map_err(|_| ZtpError::Internal("Responder actor closed".into()))?;
            reply_rx
                .await
                .map_err(|_| ZtpError::Internal("Responder actor dropped response".into()))?
        };
        tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| ZtpError::Timeout {
                operation,
                after: self.request_timeout,
            })?
    }

    /// Queue the host's device config for removal at the next publish
    pub async fn delete(&self, fixed_ip: &str) -> Result<()> {
        let fixed_ip = fixed_ip.to_string();
        self.request(Operation::Delete, |reply| ResponderCommand::Delete { fixed_ip, reply })
            .await
    }

    /// Persist the document and regenerate every artifact
    pub async fn save_and_publish(&self) -> Result<PublishReport> {
        self.request(Operation::SaveAndPublish, |reply| {
            ResponderCommand::SaveAndPublish { reply }
        })
        .await
    }

    /// Core settings as YAML
    pub async fn dump_settings(&self) -> Result<String> {
        self.request(Operation::DumpSettings, |reply| ResponderCommand::DumpSettings { reply })
            .await
    }
}
