//! padbridge - gamepad readings for block-style callers
//!
//! Polls connected gamepads and answers simple queries about them: is a pad
//! connected, is a button down, how far is a stick pushed and in which
//! direction. Readings are deadzone-filtered and, when a query targets `any`
//! pad, aggregated across all of them.
//!
//! # Architecture
//!
//! ```text
//! DeviceSource ──► DeviceSnapshot ──► InputNormalizer ──► Reply
//!  (gilrs / static)   (per request)    (deadzones, reduce)
//!                                            │
//!                                     Haptics (rumble)
//! ```
//!
//! - [`backend`] - device sources, including the `gilrs` backend
//! - [`device`] - snapshot data model
//! - [`normalizer`] - filtering and aggregation
//! - [`surface`] - request parsing and dispatch
//! - [`config`] - TOML settings

pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod haptics;
pub mod normalizer;
pub mod selector;
pub mod surface;

pub use backend::{DeviceSource, GilrsBackend, StaticSource};
pub use device::{ButtonReading, Device, DeviceSnapshot};
pub use error::{BackendError, ConfigError, HapticsError, NormalizerError, SurfaceError};
pub use haptics::{Haptics, RumbleEffect};
pub use normalizer::{InputNormalizer, NormalizerConfig};
pub use selector::{ButtonSelector, DetailField, PadSelector};
pub use surface::{GamepadBridge, Reply, Request};
