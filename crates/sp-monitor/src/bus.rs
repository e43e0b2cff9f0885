use std::sync::Arc;

use async_trait::async_trait;

use crate::{Message, MonitorResult};

/// Outbound side of the message bus.
///
/// The transport (broker connection, reconnects, subscriptions) lives behind
/// this trait; the monitor only ever publishes.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, message: Message) -> MonitorResult<()>;
}

/// Blanket implementation so `Arc<dyn MessageBus>` can be used directly.
#[async_trait]
impl<T: MessageBus + ?Sized> MessageBus for Arc<T> {
    async fn publish(&self, message: Message) -> MonitorResult<()> {
        (**self).publish(message).await
    }
}
