use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use corebox_base::CoreboxResult;

/// Listener cap applied per event name when a channel is created with `0`.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/* 📖 # How does the EventChannel dispatch?

Each event name maps to the registrations in the order they were made. `emit`
takes a snapshot of that list, drops the one-shot registrations from the
registry, then runs the snapshot in order on the calling thread. A one-shot
handler therefore never runs twice, even if a later handler fails.

Handlers return a CoreboxResult. The first error stops the dispatch and is
returned from `emit` as is; the channel does not isolate handlers from each
other.

Handler identity is the identity of the shared closure: `off` removes a
registration made with a clone of the same Handler.
*/

/// Shared event callback receiving the arguments passed to [`EventChannel::emit`].
pub struct Handler<A>(Arc<dyn Fn(&A) -> CoreboxResult<()> + Send + Sync>);

impl<A> Handler<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) -> CoreboxResult<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &A) -> CoreboxResult<()> {
        (self.0)(args)
    }

    /// True when both handles refer to the same callback.
    pub fn same_as(&self, other: &Handler<A>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<A> Eq for Handler<A> {}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

struct Registration<A> {
    handler: Handler<A>,
    once: bool,
}

/// Named-event publish/subscribe channel.
///
/// # Examples
/// ```
/// use std::sync::{Arc, Mutex};
/// use corebox_fs::{EventChannel, Handler};
///
/// let received = Arc::new(Mutex::new(String::new()));
/// let sink = Arc::clone(&received);
///
/// let mut channel = EventChannel::new(0);
/// channel.on("message", Handler::new(move |msg: &String| {
///     *sink.lock().unwrap() = msg.clone();
///     Ok(())
/// }));
/// channel.emit("message", &"foobar".to_string()).unwrap();
///
/// assert_eq!(*received.lock().unwrap(), "foobar");
/// ```
pub struct EventChannel<A> {
    max_listeners: usize,
    registry: BTreeMap<String, Vec<Registration<A>>>,
    warned: BTreeSet<String>,
}

impl<A> EventChannel<A> {
    /// Creates an empty channel. `0` selects [`DEFAULT_MAX_LISTENERS`].
    pub fn new(max_listeners: usize) -> Self {
        let max_listeners = if max_listeners == 0 {
            DEFAULT_MAX_LISTENERS
        } else {
            max_listeners
        };
        Self {
            max_listeners,
            registry: BTreeMap::new(),
            warned: BTreeSet::new(),
        }
    }

    /// Effective listener cap per event name.
    pub fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    /// Registers `handler` for every future emit of `event`.
    pub fn on(&mut self, event: &str, handler: Handler<A>) -> &mut Self {
        self.register(event, handler, false)
    }

    /// Registers `handler` for the next emit of `event` only.
    pub fn once(&mut self, event: &str, handler: Handler<A>) -> &mut Self {
        self.register(event, handler, true)
    }

    /// Removes the most recent registration of `handler` for `event`.
    ///
    /// Unknown handlers and events are ignored.
    pub fn off(&mut self, event: &str, handler: &Handler<A>) -> &mut Self {
        if let Some(registrations) = self.registry.get_mut(event) {
            if let Some(index) = registrations
                .iter()
                .rposition(|registration| registration.handler.same_as(handler))
            {
                registrations.remove(index);
                trace!(event, remaining = registrations.len(), "handler removed");
            }
            if registrations.is_empty() {
                self.registry.remove(event);
            }
        }
        self
    }

    /// Invokes the handlers registered for `event`, in registration order.
    ///
    /// Emitting an event without handlers does nothing. The first handler error
    /// aborts the remaining handlers and is returned.
    pub fn emit(&mut self, event: &str, args: &A) -> CoreboxResult<&mut Self> {
        let Some(registrations) = self.registry.get_mut(event) else {
            trace!(event, "no handlers registered");
            return Ok(self);
        };
        let snapshot: Vec<Handler<A>> = registrations
            .iter()
            .map(|registration| registration.handler.clone())
            .collect();
        registrations.retain(|registration| !registration.once);
        if registrations.is_empty() {
            self.registry.remove(event);
        }

        trace!(event, handlers = snapshot.len(), "emitting event");
        for handler in &snapshot {
            handler.call(args)?;
        }
        Ok(self)
    }

    /// Handlers currently registered for `event`, persistent and one-shot alike.
    pub fn listeners(&self, event: &str) -> Vec<Handler<A>> {
        self.registry
            .get(event)
            .map(|registrations| {
                registrations
                    .iter()
                    .map(|registration| registration.handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.get(event).map_or(0, Vec::len)
    }

    /// Names of the events that have at least one handler, sorted.
    pub fn event_names(&self) -> Vec<&str> {
        self.registry.keys().map(String::as_str).collect()
    }

    fn register(&mut self, event: &str, handler: Handler<A>, once: bool) -> &mut Self {
        let registrations = self.registry.entry(event.to_string()).or_default();
        registrations.push(Registration { handler, once });
        let count = registrations.len();
        trace!(event, count, once, "handler registered");

        if count > self.max_listeners && self.warned.insert(event.to_string()) {
            warn!(
                event,
                count,
                max_listeners = self.max_listeners,
                "possible event handler leak: more handlers than the listener cap"
            );
        }
        self
    }
}

impl<A> Default for EventChannel<A> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<A> fmt::Debug for EventChannel<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .registry
            .iter()
            .map(|(event, registrations)| (event.as_str(), registrations.len()))
            .collect();
        f.debug_struct("EventChannel")
            .field("max_listeners", &self.max_listeners)
            .field("listeners", &counts)
            .finish()
    }
}
