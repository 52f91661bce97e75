use tokio::sync::broadcast;

use crate::domain::TopicEvent;

/// Port for the backend event channel.
///
/// Events are fire-and-forget with one-to-many fan-out: each subscriber
/// receives its own stream, delivered in the order the channel delivers
/// them. No ordering is guaranteed across distinct topics beyond that
/// channel order, and a slow subscriber may lose events (broadcast lag);
/// consumers must tolerate any interleaving.
pub trait EventSource: Send + Sync {
    /// Subscribe to the full event stream.
    fn subscribe(&self) -> broadcast::Receiver<TopicEvent>;
}
