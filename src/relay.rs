use std::fmt::Debug;

use crate::{cell::ValueCell, subscription::SubscriptionHandle};

/// A relay in front of a [`ValueCell`] whose source can be swapped at
/// runtime without disturbing downstream subscribers.
///
/// The relay keeps its own broadcast channel, seeded from the wrapped cell's
/// current value and kept in sync by a single forwarding subscription into
/// the upstream. Downstream subscribers only ever attach to the relay's own
/// channel, so [`rebind`](RelayCell::rebind) can tear down the forwarding
/// subscription and re-establish it against a different cell while every
/// downstream subscription stays attached.
///
/// # Examples
/// ```
/// use recell::{RelayCell, ValueCell};
/// use std::sync::{Arc, Mutex};
///
/// let first = ValueCell::new(String::from("First"));
/// let mut relay = RelayCell::wrap(first.clone());
///
/// let changes: Arc<Mutex<Vec<String>>> = Default::default();
/// relay.subscribe({
///     let changes = changes.clone();
///     move |val| changes.lock().unwrap().push(val.clone())
/// });
///
/// first.update(String::from("changed"));
///
/// let second = ValueCell::new(String::from("Second"));
/// relay.rebind(second);
///
/// // the old source no longer reaches the relay's subscribers
/// first.update(String::from("ignored"));
///
/// assert_eq!(
///     vec![
///         String::from("First"),
///         String::from("changed"),
///         String::from("Second"),
///     ],
///     changes.lock().unwrap().clone()
/// );
/// ```
pub struct RelayCell<T> {
    upstream: ValueCell<T>,
    channel: ValueCell<T>,
    // Exactly one forwarding subscription is alive for as long as the relay
    // exists; `None` outside of construction/drop means corrupted bookkeeping.
    forwarding: Option<SubscriptionHandle<T>>,
}

impl<T: Clone + Send + 'static> RelayCell<T> {
    /// Wraps `source`, snapshotting its current value and subscribing to its
    /// future updates.
    ///
    /// The relay holds its own handle to `source`; it does not control the
    /// cell's lifetime beyond the forwarding subscription it owns.
    ///
    /// # Examples
    /// ```
    /// use recell::{RelayCell, ValueCell};
    ///
    /// let cell = ValueCell::new(7);
    /// let relay = RelayCell::wrap(cell.clone());
    ///
    /// assert_eq!(7, relay.read());
    ///
    /// cell.update(8);
    /// assert_eq!(8, relay.read());
    /// ```
    pub fn wrap(source: ValueCell<T>) -> Self {
        let channel = ValueCell::new(source.read());
        let forwarding = forward(&source, &channel);
        Self {
            upstream: source,
            channel,
            forwarding: Some(forwarding),
        }
    }

    /// Returns the relay channel's current value, which equals the upstream
    /// cell's value as of the last forwarded update.
    pub fn read(&self) -> T {
        self.channel.read()
    }

    /// Attaches an observer to the relay's own channel, never to the
    /// upstream directly. Same replay-on-subscribe contract as
    /// [`ValueCell::subscribe`].
    ///
    /// # Examples
    /// ```
    /// use recell::{RelayCell, ValueCell};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let cell = ValueCell::new(1);
    /// let relay = RelayCell::wrap(cell);
    ///
    /// let changes: Arc<Mutex<Vec<i32>>> = Default::default();
    /// relay.subscribe({
    ///     let changes = changes.clone();
    ///     move |val| changes.lock().unwrap().push(*val)
    /// });
    ///
    /// assert_eq!(vec![1], changes.lock().unwrap().clone());
    /// ```
    pub fn subscribe(&self, observer: impl FnMut(&T) + Send + 'static) -> SubscriptionHandle<T> {
        self.channel.subscribe(observer)
    }

    /// Delegates an update to the current upstream cell.
    ///
    /// The relay's own channel is not written directly: the new value comes
    /// back through the forwarding subscription, so subscribers of both the
    /// upstream and the relay observe the update exactly once.
    ///
    /// # Examples
    /// ```
    /// use recell::{RelayCell, ValueCell};
    ///
    /// let cell = ValueCell::new(1);
    /// let relay = RelayCell::wrap(cell.clone());
    ///
    /// relay.push(2);
    ///
    /// assert_eq!(2, cell.read());
    /// assert_eq!(2, relay.read());
    /// ```
    pub fn push(&self, value: T) {
        self.upstream.update(value);
    }

    /// Swaps the wrapped source for `source`.
    ///
    /// The forwarding subscription into the old upstream is cancelled, the
    /// upstream handle is replaced, and a fresh forwarding subscription is
    /// established. Downstream subscribers stay attached to the relay's
    /// channel throughout; re-subscribing to the new source replays its
    /// current value, so the next value they observe is `source.read()` as
    /// of this call. Nothing from the old source is re-delivered.
    ///
    /// # Panics
    ///
    /// Panics if no forwarding subscription is alive. That can only happen
    /// when the relay's internal bookkeeping has been corrupted, so it is
    /// treated as a fatal invariant violation rather than a recoverable
    /// error.
    ///
    /// # Examples
    /// ```
    /// use recell::{RelayCell, ValueCell};
    ///
    /// let a = ValueCell::new(1);
    /// let b = ValueCell::new(10);
    /// let mut relay = RelayCell::wrap(a.clone());
    ///
    /// relay.rebind(b.clone());
    /// assert_eq!(10, relay.read());
    ///
    /// // updates to the old source no longer reach the relay
    /// a.update(2);
    /// assert_eq!(10, relay.read());
    ///
    /// b.update(20);
    /// assert_eq!(20, relay.read());
    /// ```
    pub fn rebind(&mut self, source: ValueCell<T>) {
        let Some(forwarding) = self.forwarding.take() else {
            panic!("no live forwarding subscription while rebinding; relay bookkeeping is corrupted");
        };
        forwarding.cancel();
        self.upstream = source;
        self.forwarding = Some(forward(&self.upstream, &self.channel));
        tracing::trace!("relay rebound to new upstream");
    }
}

/// Subscribes `channel` to every value `upstream` delivers, including the
/// immediate replay of its current value.
fn forward<T: Clone + Send + 'static>(
    upstream: &ValueCell<T>,
    channel: &ValueCell<T>,
) -> SubscriptionHandle<T> {
    let channel = channel.clone();
    upstream.subscribe(move |value| channel.update(value.clone()))
}

impl<T> Drop for RelayCell<T> {
    fn drop(&mut self) {
        // Release the forwarding subscription so a discarded relay does not
        // linger in its upstream's observer list.
        if let Some(forwarding) = self.forwarding.take() {
            forwarding.cancel();
        }
    }
}

impl<T: Debug> Debug for RelayCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.channel
            .with_current(|value| f.debug_tuple("RelayCell").field(value).finish())
    }
}
