use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn address_changed(to: &str, issued: &str, current: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "IP address mismatch".into(),
            body: format!(
                "your IP address has changed from {issued} to {current} since your last sign-in"
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, n: Notification) -> anyhow::Result<()> {
        info!(to = %n.to, subject = %n.subject, body = %n.body, "notification sent");
        Ok(())
    }
}

/// Forwards notifications into a channel; lets tests observe dispatches.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, n: Notification) -> anyhow::Result<()> {
        self.tx
            .send(n)
            .map_err(|_| anyhow::anyhow!("notification receiver dropped"))
    }
}

/// Sends in the background; the caller never waits and never sees a failure.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        let to = notification.to.clone();
        if let Err(e) = notifier.send(notification).await {
            warn!(error = %e, %to, "notification delivery failed");
        }
    });
}
