//! The `MailSink` trait — an opaque outbound message transport.
//!
//! The notification service composes [`OutboundEmail`] values and hands them
//! to whatever sink is configured. Delivery is fire-and-forget from the
//! batch job's perspective; a sink error is logged per user, never fatal to
//! the run.

use std::future::Future;

use crate::digest::OutboundEmail;

pub trait MailSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Hand one message to the transport.
  fn deliver(
    &self,
    message: OutboundEmail,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
