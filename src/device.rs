//! Point-in-time view of connected gamepads.
//!
//! A [`DeviceSnapshot`] is produced by a [`DeviceSource`](crate::backend::DeviceSource)
//! once per request and borrowed read-only by the normalizer. Nothing here is
//! cached between requests.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// State of a single button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonReading {
    pub pressed: bool,
    /// Analog value in `[0, 1]`.
    pub value: f64,
}

impl ButtonReading {
    pub fn new(pressed: bool, value: f64) -> Self {
        Self { pressed, value }
    }

    /// A digital button at rest.
    pub fn released() -> Self {
        Self::default()
    }

    /// A digital button held fully down.
    pub fn held() -> Self {
        Self::new(true, 1.0)
    }
}

/// One connected gamepad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// 1-based slot assigned by the enumerator.
    pub slot: usize,
    /// Free-form identifier; may embed `Vendor: xxxx` and `Product: yyyy`.
    pub id: String,
    /// Mapping label, `"standard"` or empty.
    pub mapping: String,
    pub buttons: Vec<ButtonReading>,
    /// Axis values in `[-1, 1]`.
    pub axes: Vec<f64>,
    /// Whether the pad can play rumble effects.
    pub haptics: bool,
}

impl Device {
    pub fn new(slot: usize, id: impl Into<String>) -> Self {
        Self {
            slot,
            id: id.into(),
            mapping: String::new(),
            buttons: Vec::new(),
            axes: Vec::new(),
            haptics: false,
        }
    }

    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = mapping.into();
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<ButtonReading>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_axes(mut self, axes: Vec<f64>) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_haptics(mut self, haptics: bool) -> Self {
        self.haptics = haptics;
        self
    }

    /// Button at a 1-based index.
    pub fn button(&self, index: usize) -> Option<&ButtonReading> {
        index.checked_sub(1).and_then(|i| self.buttons.get(i))
    }

    /// Raw axis value at a 1-based index. Non-finite readings count as absent.
    pub fn axis(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(1)
            .and_then(|i| self.axes.get(i))
            .copied()
            .filter(|value| value.is_finite())
    }

    pub fn any_pressed(&self) -> bool {
        self.buttons.iter().any(|button| button.pressed)
    }
}

/// Connected devices in enumeration order.
#[derive(Clone, Debug)]
pub struct DeviceSnapshot {
    devices: Vec<Device>,
    captured_at: DateTime<Local>,
}

impl DeviceSnapshot {
    /// Build a snapshot; devices are ordered by slot.
    pub fn new(mut devices: Vec<Device>) -> Self {
        devices.sort_by_key(|device| device.slot);
        Self {
            devices,
            captured_at: Local::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn slot(&self, slot: usize) -> Option<&Device> {
        self.devices.iter().find(|device| device.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }
}

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
