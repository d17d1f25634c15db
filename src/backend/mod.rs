//! Device sources
//!
//! A [`DeviceSource`] is polled once per request and hands back a fresh
//! [`DeviceSnapshot`]. Sources that can drive motors also implement
//! [`Haptics`](crate::haptics::Haptics).
//!
//! - [`gilrs_backend`] - real gamepads through `gilrs`
//! - [`static_source`] - fixed, in-memory pads for tests and demo mode

pub mod gilrs_backend;
pub mod static_source;

use crate::device::DeviceSnapshot;

pub use gilrs_backend::{BackendSettings, GilrsBackend};
pub use static_source::StaticSource;

/// Supplies the current set of connected pads.
pub trait DeviceSource {
    /// Poll the platform and return what is connected right now.
    fn snapshot(&mut self) -> DeviceSnapshot;
}
