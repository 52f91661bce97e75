use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{DomainError, TopicEvent};

/// Handler invoked once per received event of its topic.
///
/// Handlers mutate shell-owned state and push presentational updates; the
/// registry itself holds no domain state.
pub type TopicHandler<S> = Box<dyn FnMut(&mut S, Value) -> Result<(), DomainError> + Send>;

/// Routes incoming backend events to per-topic handlers.
///
/// Each topic is attached exactly once at startup and stays active for
/// the process lifetime; there is no teardown. A failing handler is
/// logged and swallowed so the remaining subscriptions stay live.
pub struct SubscriptionRegistry<S> {
    handlers: HashMap<String, TopicHandler<S>>,
}

impl<S> SubscriptionRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for a topic.
    ///
    /// At most one handler per topic: registering a topic twice is a
    /// wiring bug and returns `DuplicateSubscription` instead of silently
    /// replacing the first handler.
    pub fn subscribe(
        &mut self,
        topic: impl Into<String>,
        handler: TopicHandler<S>,
    ) -> Result<(), DomainError> {
        let topic = topic.into();
        if self.handlers.contains_key(&topic) {
            return Err(DomainError::DuplicateSubscription(topic));
        }
        self.handlers.insert(topic, handler);
        Ok(())
    }

    /// Number of attached topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[must_use]
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.handlers.contains_key(topic)
    }

    /// Deliver one event to its topic handler.
    ///
    /// Unknown topics are dropped with a debug log. Handler failures
    /// (malformed payloads included) are logged and swallowed; they never
    /// reach other handlers or the event loop.
    pub fn dispatch(&mut self, state: &mut S, event: TopicEvent) {
        let Some(handler) = self.handlers.get_mut(&event.topic) else {
            debug!(topic = %event.topic, "Dropping event for unsubscribed topic");
            return;
        };
        if let Err(err) = handler(state, event.payload) {
            warn!(topic = %event.topic, error = %err, "Event handler failed; event dropped");
        }
    }
}

impl<S> Default for SubscriptionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Tally {
        seen: Vec<String>,
    }

    fn recording_handler(tag: &'static str) -> TopicHandler<Tally> {
        Box::new(move |tally, _payload| {
            tally.seen.push(tag.to_string());
            Ok(())
        })
    }

    #[test]
    fn test_duplicate_subscription_is_rejected() {
        let mut registry = SubscriptionRegistry::<Tally>::new();
        registry
            .subscribe("recording-start", recording_handler("a"))
            .unwrap();
        let err = registry
            .subscribe("recording-start", recording_handler("b"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateSubscription(ref t) if t == "recording-start"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dispatch_routes_by_topic() {
        let mut registry = SubscriptionRegistry::<Tally>::new();
        registry.subscribe("a", recording_handler("a")).unwrap();
        registry.subscribe("b", recording_handler("b")).unwrap();

        let mut tally = Tally::default();
        registry.dispatch(&mut tally, TopicEvent::new("b", json!(true)));
        registry.dispatch(&mut tally, TopicEvent::new("a", json!(true)));
        registry.dispatch(&mut tally, TopicEvent::new("b", json!(true)));
        assert_eq!(tally.seen, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_unknown_topic_is_dropped() {
        let mut registry = SubscriptionRegistry::<Tally>::new();
        registry.subscribe("a", recording_handler("a")).unwrap();

        let mut tally = Tally::default();
        registry.dispatch(&mut tally, TopicEvent::new("nope", json!(null)));
        assert!(tally.seen.is_empty());
    }

    #[test]
    fn test_handler_failure_does_not_poison_other_topics() {
        let mut registry = SubscriptionRegistry::<Tally>::new();
        registry
            .subscribe(
                "bad",
                Box::new(|_: &mut Tally, _| Err(DomainError::malformed("bad", "boom"))),
            )
            .unwrap();
        registry.subscribe("good", recording_handler("good")).unwrap();

        let mut tally = Tally::default();
        registry.dispatch(&mut tally, TopicEvent::new("bad", json!(null)));
        registry.dispatch(&mut tally, TopicEvent::new("good", json!(null)));
        registry.dispatch(&mut tally, TopicEvent::new("bad", json!(null)));
        registry.dispatch(&mut tally, TopicEvent::new("good", json!(null)));
        assert_eq!(tally.seen, vec!["good", "good"]);
    }
}
