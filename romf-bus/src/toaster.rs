use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::error::{BusError, ListenerError, Result};

/// Payload carried by every notification.
pub type Payload = serde_json::Value;

/// What a listener hands back after handling one notification.
pub type ListenerResult = std::result::Result<(), ListenerError>;

type Listener = Box<dyn Fn(&str, &Payload) -> ListenerResult>;

/// Handle returned by [`Toaster::on`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A listener that failed while a notification was being delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub subscription: SubscriptionId,
    pub error: ListenerError,
}

/// Outcome of a single [`Toaster::emit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners invoked, including the ones that failed.
    pub invoked: usize,
    pub failures: Vec<ListenerFailure>,
}

impl Delivery {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.invoked - self.failures.len()
    }
}

/// Single-topic publish/subscribe channel for user-facing notifications.
///
/// Every notification is a `(title, payload)` pair; the title is the only
/// discriminator. Listeners run synchronously in subscription order, and a
/// listener that fails (by returning an error or panicking) is isolated: the
/// failure is logged and recorded in the [`Delivery`], and the remaining
/// listeners still run.
///
/// There is no buffering. A notification emitted while nobody listens is
/// dropped.
///
/// Catching a panic does not silence it: the process panic hook runs before
/// [`Toaster::emit`] regains control, so the default hook still prints the
/// panic message to stderr. Binaries that want quiet isolation install their
/// own hook with [`std::panic::set_hook`].
#[derive(Default)]
pub struct Toaster {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. It sees every notification emitted from now on.
    pub fn on<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&str, &Payload) -> ListenerResult + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        tracing::debug!(subscription = %id, total = self.listeners.len(), "listener subscribed");
        id
    }

    /// Remove the listener behind `id`. Returns `false` for unknown handles.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        let removed = self.listeners.len() != before;
        if removed {
            tracing::debug!(subscription = %id, "listener unsubscribed");
        }
        removed
    }

    /// Deliver `(title, payload)` to every listener, in subscription order.
    ///
    /// A panicking listener is caught and recorded, but the panic hook has
    /// already reported it.
    pub fn emit(&self, title: &str, payload: &Payload) -> Delivery {
        let mut delivery = Delivery::default();
        for (id, listener) in &self.listeners {
            delivery.invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(title, payload)))
                .unwrap_or_else(|cause| Err(ListenerError::Panicked(panic_message(&*cause))));
            if let Err(error) = outcome {
                tracing::warn!(subscription = %id, title, %error, "notification listener failed");
                delivery.failures.push(ListenerFailure {
                    subscription: *id,
                    error,
                });
            }
        }
        delivery
    }

    /// Serialize `payload` and emit it.
    pub fn emit_serialized<T: Serialize + ?Sized>(&self, title: &str, payload: &T) -> Result<Delivery> {
        let payload = serde_json::to_value(payload).map_err(|source| BusError::Serialize {
            title: title.to_string(),
            source,
        })?;
        Ok(self.emit(title, &payload))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    type Seen = Rc<RefCell<Vec<(usize, String, Payload)>>>;

    fn recording(toaster: &mut Toaster, seen: &Seen, tag: usize) -> SubscriptionId {
        let seen = Rc::clone(seen);
        toaster.on(move |title, payload| {
            seen.borrow_mut().push((tag, title.to_string(), payload.clone()));
            Ok(())
        })
    }

    #[test]
    fn test_all_listeners_invoked_in_subscription_order() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        for tag in 0..5 {
            recording(&mut toaster, &seen, tag);
        }

        let delivery = toaster.emit("saved", &json!({"id": 7}));

        assert_eq!(delivery.invoked, 5);
        assert!(delivery.is_clean());
        let seen = seen.borrow();
        let tags: Vec<usize> = seen.iter().map(|(tag, _, _)| *tag).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4]);
        assert!(
            seen.iter()
                .all(|(_, title, payload)| title == "saved" && *payload == json!({"id": 7}))
        );
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let toaster = Toaster::new();
        let delivery = toaster.emit("nobody", &json!(null));
        assert_eq!(delivery, Delivery::default());
    }

    #[test]
    fn test_two_emits_preserve_order_across_events() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        recording(&mut toaster, &seen, 0);
        recording(&mut toaster, &seen, 1);

        toaster.emit("a", &json!(1));
        toaster.emit("b", &json!(2));

        assert_eq!(
            *seen.borrow(),
            vec![
                (0, "a".to_string(), json!(1)),
                (1, "a".to_string(), json!(1)),
                (0, "b".to_string(), json!(2)),
                (1, "b".to_string(), json!(2)),
            ]
        );
    }

    #[test]
    fn test_emit_before_subscribe_is_not_replayed() {
        let mut toaster = Toaster::new();
        toaster.emit("early", &json!("lost"));

        let seen: Seen = Rc::default();
        recording(&mut toaster, &seen, 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_off_stops_only_that_listener() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        let first = recording(&mut toaster, &seen, 0);
        recording(&mut toaster, &seen, 1);

        assert!(toaster.off(first));
        assert!(!toaster.off(first));
        assert_eq!(toaster.len(), 1);

        toaster.emit("after", &json!(true));
        let tags: Vec<usize> = seen.borrow().iter().map(|(tag, _, _)| *tag).collect();
        assert_eq!(tags, vec![1]);
    }

    #[test]
    fn test_subscription_ids_are_not_reused() {
        let mut toaster = Toaster::new();
        let a = toaster.on(|_, _| Ok(()));
        toaster.off(a);
        let b = toaster.on(|_, _| Ok(()));
        assert_ne!(a, b);
    }

    #[test]
    #[traced_test]
    fn test_failing_listener_does_not_stop_delivery() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        recording(&mut toaster, &seen, 0);
        let broken = toaster.on(|_, _| Err(ListenerError::failed("render target gone")));
        recording(&mut toaster, &seen, 2);

        let delivery = toaster.emit("upload", &json!({"ok": false}));

        assert_eq!(delivery.invoked, 3);
        assert_eq!(delivery.succeeded(), 2);
        assert_eq!(
            delivery.failures,
            vec![ListenerFailure {
                subscription: broken,
                error: ListenerError::failed("render target gone"),
            }]
        );
        let tags: Vec<usize> = seen.borrow().iter().map(|(tag, _, _)| *tag).collect();
        assert_eq!(tags, vec![0, 2]);
        assert!(logs_contain("notification listener failed"));
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        toaster.on(|title, _| panic!("cannot render {title}"));
        recording(&mut toaster, &seen, 1);

        let delivery = toaster.emit("boom", &json!(null));

        assert_eq!(delivery.failures.len(), 1);
        assert_eq!(
            delivery.failures[0].error,
            ListenerError::Panicked("cannot render boom".to_string())
        );
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_emit_serialized() {
        let mut toaster = Toaster::new();
        let seen: Seen = Rc::default();
        recording(&mut toaster, &seen, 0);

        let mut payload = BTreeMap::new();
        payload.insert("file", "cat.png");
        toaster.emit_serialized("uploaded", &payload).unwrap();

        assert_eq!(seen.borrow()[0].2, json!({"file": "cat.png"}));
    }

    #[test]
    fn test_emit_serialized_rejects_non_string_keys() {
        let toaster = Toaster::new();
        let mut payload = BTreeMap::new();
        payload.insert((1, 2), "tuple keys are not valid JSON object keys");

        let err = toaster.emit_serialized("bad", &payload).unwrap_err();
        assert!(err.to_string().contains("'bad'"));
    }
}
