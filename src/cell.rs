use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::subscription::{SubscriptionHandle, SubscriptionId};

type Observer<T> = Box<dyn FnMut(&T) + Send>;

/// A mutable value holder that broadcasts every update to its subscribers.
///
/// `ValueCell` is a cheap shared handle (cloning it clones the handle, not
/// the value), so the owning application and any relays wrapping the cell all
/// see the same current value and the same subscriber list.
///
/// Observers are notified synchronously on the updating thread, in the order
/// they were attached. A newly attached observer is immediately called once
/// with the current value.
///
/// # Examples
/// ```
/// use recell::ValueCell;
///
/// let cell = ValueCell::new(String::from("hello"));
/// assert_eq!("hello", cell.read());
/// ```
#[derive(Clone, Default)]
pub struct ValueCell<T> {
    inner: Arc<Mutex<CellInner<T>>>,
}

impl<T> ValueCell<T> {
    /// Constructs a new `ValueCell` holding `value`.
    ///
    /// # Examples
    /// ```
    /// use recell::ValueCell;
    ///
    /// let cell = ValueCell::new(42);
    /// ```
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner::new(value))),
        }
    }

    /// Returns a clone of the current value. No side effects.
    ///
    /// # Examples
    /// ```
    /// use recell::ValueCell;
    ///
    /// let cell = ValueCell::new(String::from("hello"));
    /// assert_eq!("hello", cell.read());
    /// ```
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.acq_lock().value.clone()
    }

    /// Replaces the current value and synchronously notifies every live
    /// subscriber, in attachment order, before returning.
    ///
    /// Observers are always notified, even when the new value equals the old
    /// one. Calling `update` again from inside an observer is a caller error
    /// and deadlocks.
    ///
    /// # Examples
    /// ```
    /// use recell::ValueCell;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let cell: ValueCell<String> = ValueCell::default();
    /// let changes: Arc<Mutex<Vec<String>>> = Default::default();
    ///
    /// cell.subscribe({
    ///     let changes = changes.clone();
    ///     move |val| changes.lock().unwrap().push(val.clone())
    /// });
    ///
    /// cell.update(String::from("a"));
    /// cell.update(String::from("b"));
    ///
    /// assert_eq!(
    ///     vec![String::from(""), String::from("a"), String::from("b")],
    ///     changes.lock().unwrap().clone()
    /// );
    /// ```
    pub fn update(&self, value: T) {
        let mut inner = self.acq_lock();
        inner.value = value;
        inner.notify();
    }

    /// Attaches an observer and returns a handle that detaches it again.
    ///
    /// The observer is invoked once, immediately and synchronously, with the
    /// current value (replay-on-subscribe), and then on every subsequent
    /// `update` until the handle is cancelled.
    ///
    /// # Examples
    /// ```
    /// use recell::ValueCell;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let cell = ValueCell::new(10);
    /// let changes: Arc<Mutex<Vec<i32>>> = Default::default();
    ///
    /// let handle = cell.subscribe({
    ///     let changes = changes.clone();
    ///     move |val| changes.lock().unwrap().push(*val)
    /// });
    ///
    /// // the current value is replayed at subscribe time
    /// assert_eq!(vec![10], changes.lock().unwrap().clone());
    ///
    /// cell.update(20);
    /// assert_eq!(vec![10, 20], changes.lock().unwrap().clone());
    ///
    /// handle.cancel();
    /// cell.update(30);
    /// assert_eq!(vec![10, 20], changes.lock().unwrap().clone());
    /// ```
    pub fn subscribe(&self, mut observer: impl FnMut(&T) + Send + 'static) -> SubscriptionHandle<T> {
        let mut inner = self.acq_lock();
        observer(&inner.value);
        let id = inner.attach(Box::new(observer));
        tracing::trace!(id = id.as_u64(), "observer attached");
        SubscriptionHandle::new(Arc::downgrade(&self.inner), id)
    }

    pub(crate) fn with_current<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.acq_lock().value)
    }

    fn acq_lock(&self) -> MutexGuard<'_, CellInner<T>> {
        self.inner.lock().expect("unable to acquire lock on cell")
    }
}

impl<T: Debug> Debug for ValueCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueCell")
            .field(&self.acq_lock().value)
            .finish()
    }
}

/// Current value plus the ordered observer registry, behind the cell's lock.
pub(crate) struct CellInner<T> {
    value: T,
    next_id: SubscriptionId,
    observers: BTreeMap<SubscriptionId, Observer<T>>,
}

impl<T> CellInner<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            next_id: SubscriptionId::new(0),
            observers: BTreeMap::new(),
        }
    }

    fn attach(&mut self, observer: Observer<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id = id.next();
        self.observers.insert(id, observer);
        id
    }

    pub(crate) fn detach(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    fn notify(&mut self) {
        let value = &self.value;
        for obs in self.observers.values_mut() {
            obs(value);
        }
    }
}

impl<T: Default> Default for CellInner<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
