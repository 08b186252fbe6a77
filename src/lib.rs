//! Reactive value cell with a swappable-source relay
//!
//! [`ValueCell`] holds one current value and broadcasts every update to its
//! subscribers, replaying the current value whenever a new subscriber
//! attaches. [`RelayCell`] sits in front of a `ValueCell` and forwards its
//! updates into a channel of its own, so the wrapped source can be swapped
//! with [`RelayCell::rebind`] while downstream subscribers stay attached.
//!
//! Delivery is synchronous and runs on the updating thread; cells are safe
//! to share across threads, but there is no queuing or cross-thread handoff.
//!
//! # Examples
//! ```
//! use recell::{RelayCell, ValueCell};
//! use std::sync::{Arc, Mutex};
//!
//! let celsius = ValueCell::new(21.5);
//! let mut display = RelayCell::wrap(celsius.clone());
//!
//! let readings: Arc<Mutex<Vec<f64>>> = Default::default();
//! display.subscribe({
//!     let readings = readings.clone();
//!     move |val| readings.lock().unwrap().push(*val)
//! });
//!
//! celsius.update(23.0);
//!
//! // swap the sensor feeding the display; its subscribers are untouched
//! let backup = ValueCell::new(20.0);
//! display.rebind(backup);
//!
//! assert_eq!(vec![21.5, 23.0, 20.0], readings.lock().unwrap().clone());
//! ```

mod cell;
mod relay;
mod subscription;

pub use cell::ValueCell;
pub use relay::RelayCell;
pub use subscription::{SubscriptionHandle, SubscriptionId};
