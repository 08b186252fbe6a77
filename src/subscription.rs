use std::{
    fmt::Debug,
    sync::{Mutex, Weak},
};

use crate::cell::CellInner;

/// Identifier of a single observer attachment on a cell.
///
/// Ids are allocated from a per-cell monotonic counter, so iterating
/// observers in id order is the same as iterating them in attachment order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub(crate) const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Handle returned by `subscribe`, used to detach the observer again.
///
/// The handle holds a weak reference to the cell it came from, so it never
/// keeps the cell alive and `cancel` after the cell is gone is a no-op.
///
/// # Examples
/// ```
/// use recell::ValueCell;
///
/// let cell = ValueCell::new(0);
/// let handle = cell.subscribe(|_| {});
///
/// handle.cancel();
/// handle.cancel(); // cancelling twice is a no-op
/// ```
pub struct SubscriptionHandle<T> {
    cell: Weak<Mutex<CellInner<T>>>,
    id: SubscriptionId,
}

impl<T> SubscriptionHandle<T> {
    pub(crate) fn new(cell: Weak<Mutex<CellInner<T>>>, id: SubscriptionId) -> Self {
        Self { cell, id }
    }

    /// The id of the observer attachment this handle controls.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Detaches the observer. After this returns, the observer receives no
    /// further deliveries.
    ///
    /// Idempotent: cancelling twice, or cancelling after the cell itself has
    /// been dropped, does nothing.
    ///
    /// # Examples
    /// ```
    /// use recell::ValueCell;
    /// use std::sync::{Arc, Mutex};
    ///
    /// let cell = ValueCell::new(1);
    /// let changes: Arc<Mutex<Vec<i32>>> = Default::default();
    ///
    /// let handle = cell.subscribe({
    ///     let changes = changes.clone();
    ///     move |val| changes.lock().unwrap().push(*val)
    /// });
    ///
    /// cell.update(2);
    /// handle.cancel();
    /// cell.update(3);
    ///
    /// assert_eq!(vec![1, 2], changes.lock().unwrap().clone());
    /// ```
    pub fn cancel(&self) {
        if let Some(cell) = self.cell.upgrade() {
            let removed = cell
                .lock()
                .expect("unable to acquire lock on cell")
                .detach(self.id);
            if removed {
                tracing::trace!(id = self.id.as_u64(), "observer detached");
            }
        }
    }
}

impl<T> Debug for SubscriptionHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SubscriptionHandle").field(&self.id).finish()
    }
}
