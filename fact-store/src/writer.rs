//! Single-writer discipline for the transaction log
//!
//! One tokio task owns the log; every append flows through its mailbox,
//! so ledger mutations apply in exactly one total order with no lock
//! contention and no conflicting interleavings. Readers clone a handle
//! and run with unbounded parallelism.
//!
//! Every handle operation runs under the configured timeout. A timeout
//! is a retryable persistence failure, and because the append executes
//! atomically inside the actor, an abandoned call leaves no partial
//! record: the envelope is either durably present or it is as if the
//! call never happened.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::log::{BitemporalEnvelope, LogEvent, LogRecord, TransactionLog};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the log writer actor
enum WriterMessage {
    /// Append an envelope
    Append {
        envelope: BitemporalEnvelope<LogEvent>,
        response: oneshot::Sender<Result<()>>,
    },

    /// Replay the full history
    Replay {
        response: oneshot::Sender<Result<Vec<LogRecord>>>,
    },

    /// Replay records with `system_time >= since`
    ReplaySince {
        since: DateTime<Utc>,
        response: oneshot::Sender<Result<Vec<LogRecord>>>,
    },

    /// Shutdown the actor
    Shutdown,
}

/// Actor that owns the log and serializes all writes
struct LogWriter<L: TransactionLog> {
    log: L,
    mailbox: mpsc::Receiver<WriterMessage>,
}

impl<L: TransactionLog> LogWriter<L> {
    async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                WriterMessage::Append { envelope, response } => {
                    let result = self.log.append(envelope).await;
                    if let Err(ref e) = result {
                        tracing::warn!(error = %e, "append rejected");
                    }
                    let _ = response.send(result);
                }
                WriterMessage::Replay { response } => {
                    let _ = response.send(self.log.replay().await);
                }
                WriterMessage::ReplaySince { since, response } => {
                    let _ = response.send(self.log.replay_since(since).await);
                }
                WriterMessage::Shutdown => break,
            }
        }
        tracing::debug!("log writer stopped");
    }
}

/// Cloneable handle to the single log writer
#[derive(Clone)]
pub struct LogWriterHandle {
    sender: mpsc::Sender<WriterMessage>,
    timeout: Duration,
}

impl LogWriterHandle {
    /// Append an envelope through the single writer
    pub async fn append(&self, envelope: BitemporalEnvelope<LogEvent>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.request(
            "append",
            WriterMessage::Append {
                envelope,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Replay the full ordered history
    pub async fn replay(&self) -> Result<Vec<LogRecord>> {
        let (tx, rx) = oneshot::channel();
        self.request("replay", WriterMessage::Replay { response: tx }, rx)
            .await
    }

    /// Replay records with `system_time >= since`
    pub async fn replay_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
        let (tx, rx) = oneshot::channel();
        self.request(
            "replay_since",
            WriterMessage::ReplaySince {
                since,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Stop the writer; subsequent operations fail as writer-unavailable
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(WriterMessage::Shutdown)
            .await
            .map_err(|_| Error::Writer("mailbox closed".to_string()))
    }

    async fn request<T>(
        &self,
        operation: &'static str,
        message: WriterMessage,
        rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        let deadline = self.timeout;
        let exchange = async {
            self.sender
                .send(message)
                .await
                .map_err(|_| Error::Writer("mailbox closed".to_string()))?;
            rx.await
                .map_err(|_| Error::Writer("reply channel closed".to_string()))?
        };

        tokio::time::timeout(deadline, exchange)
            .await
            .map_err(|_| Error::Timeout {
                operation,
                elapsed_ms: deadline.as_millis() as u64,
            })?
    }
}

/// Spawn the log writer actor and return its handle
pub fn spawn_log_writer<L>(log: L, config: &StoreConfig) -> LogWriterHandle
where
    L: TransactionLog + 'static,
{
    let (tx, rx) = mpsc::channel(config.writer_mailbox_capacity);
    let writer = LogWriter { log, mailbox: rx };

    tokio::spawn(async move {
        writer.run().await;
    });

    LogWriterHandle {
        sender: tx,
        timeout: config.operation_timeout(),
    }
}
