use application::{BroadcastError, LikeEvent, LikeEventBroadcaster};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// In-process fan-out of like events to every subscribed socket.
#[derive(Clone)]
pub struct LocalLikeBroadcaster {
    sender: broadcast::Sender<LikeEvent>,
}

impl LocalLikeBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LikeEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl LikeEventBroadcaster for LocalLikeBroadcaster {
    async fn broadcast(&self, event: LikeEvent) -> Result<(), BroadcastError> {
        if self.sender.receiver_count() == 0 {
            tracing::trace!(event = event.name(), "no listeners connected");
            return Ok(());
        }
        let delivered = self
            .sender
            .send(event)
            .map_err(|err| BroadcastError::failed(err.to_string()))?;
        tracing::debug!(listeners = delivered, "like event broadcast");
        Ok(())
    }
}
