// ABOUTME: Fire-and-forget notification dispatch for account and connection emails
// ABOUTME: Queued through a channel to a worker task; delivery failures never propagate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitness Hub

//! # Notification Dispatch
//!
//! Email delivery is a side channel: primary operations enqueue a message
//! and move on. A background worker drains the queue and hands messages to
//! a [`Mailer`] implementation (the actual delivery mechanism is an
//! external collaborator). Failures anywhere on this path are logged and
//! swallowed — a verification email bouncing must never roll back the
//! registration that triggered it.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// An email waiting to be delivered
#[derive(Debug, Clone)]
pub struct EmailNotification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery backend for notification emails
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason on delivery failure; the worker logs
    /// it and drops the message.
    async fn send(&self, message: &EmailNotification) -> Result<(), String>;
}

/// Development mailer that logs messages instead of delivering them
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailNotification) -> Result<(), String> {
        debug!(
            to = %message.to,
            subject = %message.subject,
            "Would send notification email"
        );
        Ok(())
    }
}

/// Handle for enqueueing notifications from request handlers
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<EmailNotification>,
}

impl Notifier {
    /// Spawn the delivery worker and return the enqueue handle
    #[must_use]
    pub fn spawn(mailer: Box<dyn Mailer>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EmailNotification>();

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(reason) = mailer.send(&message).await {
                    warn!(
                        to = %message.to,
                        subject = %message.subject,
                        %reason,
                        "Failed to deliver notification email"
                    );
                }
            }
        });

        Self { tx }
    }

    /// Queue a message for delivery. Errors (a dropped worker) are logged
    /// and swallowed; the caller's operation proceeds regardless.
    pub fn enqueue(&self, message: EmailNotification) {
        if self.tx.send(message).is_err() {
            warn!("Notification worker is gone; dropping email");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingMailer {
        delivered: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send(&self, _message: &EmailNotification) -> Result<(), String> {
            if self.fail {
                return Err("smtp unavailable".into());
            }
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_enqueue_delivers_through_worker() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::spawn(Box::new(CountingMailer {
            delivered: Arc::clone(&delivered),
            fail: false,
        }));

        notifier.enqueue(EmailNotification {
            to: "client@example.com".into(),
            subject: "Verify Your Email".into(),
            body: "link".into(),
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::spawn(Box::new(CountingMailer {
            delivered: Arc::clone(&delivered),
            fail: true,
        }));

        // Must not panic or surface anywhere
        notifier.enqueue(EmailNotification {
            to: "client@example.com".into(),
            subject: "Verify Your Email".into(),
            body: "link".into(),
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }
}
