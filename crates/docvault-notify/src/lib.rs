//! Daily expiry-digest batch service.
//!
//! One invocation is one run: for every user, fetch their live documents
//! that are expiring soon or already expired (a single query per user),
//! compose one consolidated digest, and push it onto a bounded channel
//! consumed by a mail worker. Each user is an independent unit of work — a
//! failed fetch or delivery is logged and the run continues. The external
//! scheduler guarantees runs never overlap; nothing here takes a lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use docvault_core::{
  digest::{ExpiryDigest, OutboundEmail},
  mail::MailSink,
  store::DocumentStore,
};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("mail worker task panicked: {0}")]
  Worker(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Run summary ─────────────────────────────────────────────────────────────

/// What one batch run accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  /// Users whose digest was handed to the mail sink successfully.
  pub notified: usize,
  /// Users whose digest could not be delivered (or fetched).
  pub failed:   usize,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Capacity of the digest channel between composer and mail worker.
const DISPATCH_BUFFER: usize = 16;

pub struct NotificationService<S, M> {
  store: Arc<S>,
  sink:  Arc<M>,
}

impl<S, M> NotificationService<S, M>
where
  S: DocumentStore + 'static,
  M: MailSink + 'static,
{
  pub fn new(store: Arc<S>, sink: Arc<M>) -> Self {
    Self { store, sink }
  }

  /// Execute one batch run as of `now`.
  ///
  /// The user enumeration itself failing is fatal (there is nothing to
  /// iterate); everything after that is isolated per user.
  pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary> {
    let users = self
      .store
      .list_users()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let (tx, rx) = mpsc::channel::<(Uuid, OutboundEmail)>(DISPATCH_BUFFER);
    let worker = tokio::spawn(mail_worker(Arc::clone(&self.sink), rx));

    let mut fetch_failures = 0usize;
    for user in users {
      let documents =
        match self.store.list_needing_notice(user.id, now).await {
          Ok(docs) => docs,
          Err(e) => {
            tracing::warn!(
              user_id = %user.id,
              error = %e,
              "skipping user: could not fetch documents needing notice"
            );
            fetch_failures += 1;
            continue;
          }
        };

      // No qualifying documents means no message for this user.
      if documents.is_empty() {
        continue;
      }

      let Some(digest) = ExpiryDigest::build(&user, &documents, now) else {
        continue;
      };

      tracing::debug!(
        user_id = %user.id,
        expiring_soon = digest.expiring_soon.len(),
        expired = digest.expired.len(),
        "composed expiry digest"
      );

      // The worker only stops receiving if it panicked; surface that below.
      if tx.send((user.id, digest.into_email(now))).await.is_err() {
        break;
      }
    }

    drop(tx);
    let mut summary = worker.await??;
    summary.failed += fetch_failures;

    tracing::info!(
      notified = summary.notified,
      failed = summary.failed,
      "expiry notification run complete"
    );
    Ok(summary)
  }
}

/// Drain the digest channel into the mail sink, isolating failures per
/// message.
async fn mail_worker<M: MailSink>(
  sink: Arc<M>,
  mut rx: mpsc::Receiver<(Uuid, OutboundEmail)>,
) -> Result<RunSummary> {
  let mut summary = RunSummary::default();
  while let Some((user_id, email)) = rx.recv().await {
    match sink.deliver(email).await {
      Ok(()) => summary.notified += 1,
      Err(e) => {
        tracing::warn!(
          user_id = %user_id,
          error = %e,
          "failed to deliver expiry digest"
        );
        summary.failed += 1;
      }
    }
  }
  Ok(summary)
}

// ─── Sinks ───────────────────────────────────────────────────────────────────

/// Production stand-in for the opaque mail transport: logs each outbound
/// message instead of sending it anywhere.
#[derive(Debug, Clone, Default)]
pub struct LogMailSink;

impl MailSink for LogMailSink {
  type Error = std::convert::Infallible;

  async fn deliver(&self, message: OutboundEmail) -> Result<(), Self::Error> {
    tracing::info!(
      to = %message.to,
      subject = %message.subject,
      body_len = message.body.len(),
      "outbound mail"
    );
    Ok(())
  }
}
