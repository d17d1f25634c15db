//! Input Normalizer - deadzone filtering and multi-pad aggregation
//!
//! Turns a [`DeviceSnapshot`] into single scalar readings. Every query takes a
//! [`PadSelector`]; when it matches several pads the per-pad readings are
//! reduced to one value:
//!
//! ```text
//! is_button_down      logical OR
//! button_value        maximum
//! axis_value          greatest |value|, sign kept
//! axis_pair_*         stick with the greatest magnitude
//! ```
//!
//! Pads are visited in snapshot order and a running best is only replaced by a
//! strictly greater candidate, so ties go to the lowest slot.
//!
//! Missing pads, buttons and axes read as `false`, `0` or `"not connected"`.

use crate::device::{Device, DeviceSnapshot};
use crate::error::NormalizerError;
use crate::haptics::{Haptics, RumbleEffect};
use crate::selector::{ButtonSelector, DetailField, PadSelector};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Reply for identifier queries when no pad matches.
pub const NOT_CONNECTED: &str = "not connected";

/// Direction reported when no stick is deflected.
pub const DEFAULT_DIRECTION: f64 = 90.0;

static VENDOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vendor:\s*(\w+)").expect("vendor pattern is valid"));
static PRODUCT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)product:\s*(\w+)").expect("product pattern is valid"));

/// Deadzone thresholds
///
/// Readings whose magnitude is strictly below the threshold are reported as
/// exactly zero. No range check is applied: a deadzone above 1.0 silences
/// every reading until it is lowered again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Deadzone for stick axes
    pub axis_deadzone: f64,
    /// Deadzone for analog button values
    pub button_deadzone: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            axis_deadzone: 0.1,
            button_deadzone: 0.05,
        }
    }
}

/// Stick reading for one pad after filtering.
#[derive(Clone, Copy, Debug, PartialEq)]
struct StickReading {
    horizontal: f64,
    vertical: f64,
    magnitude: f64,
}

impl StickReading {
    /// Heading in degrees with up at 0, clockwise, in `[0, 360)`.
    fn direction(&self) -> f64 {
        let direction = self.vertical.atan2(self.horizontal).to_degrees() + 90.0;
        if direction < 0.0 {
            direction + 360.0
        } else {
            direction
        }
    }
}

/// Translates raw pad state into filtered, aggregated readings.
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    config: NormalizerConfig,
}

impl InputNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        debug!("Creating InputNormalizer with config: {:?}", config);
        Self { config }
    }

    // Thresholds

    pub fn axis_deadzone(&self) -> f64 {
        self.config.axis_deadzone
    }

    pub fn button_deadzone(&self) -> f64 {
        self.config.button_deadzone
    }

    pub fn set_axis_deadzone(&mut self, value: f64) {
        debug!(
            "Axis deadzone: {} -> {}",
            self.config.axis_deadzone, value
        );
        if !(0.0..1.0).contains(&value) {
            warn!("Axis deadzone {} is outside [0, 1)", value);
        }
        self.config.axis_deadzone = value;
    }

    pub fn set_button_deadzone(&mut self, value: f64) {
        debug!(
            "Button deadzone: {} -> {}",
            self.config.button_deadzone, value
        );
        if !(0.0..1.0).contains(&value) {
            warn!("Button deadzone {} is outside [0, 1)", value);
        }
        self.config.button_deadzone = value;
    }

    // Queries

    /// Pads matched by `pad`, in enumeration order.
    pub fn select_devices<'a>(
        &self,
        snapshot: &'a DeviceSnapshot,
        pad: PadSelector,
    ) -> Vec<&'a Device> {
        match pad {
            PadSelector::Any => snapshot.devices().iter().collect(),
            PadSelector::Slot(slot) => snapshot.slot(slot).into_iter().collect(),
        }
    }

    pub fn is_connected(&self, snapshot: &DeviceSnapshot, pad: PadSelector) -> bool {
        !self.select_devices(snapshot, pad).is_empty()
    }

    /// Identifier field of the first matched pad.
    ///
    /// # Errors
    ///
    /// [`NormalizerError::MalformedIdentifier`] when a vendor or product is
    /// requested and the pad's identifier does not carry one.
    pub fn describe(
        &self,
        snapshot: &DeviceSnapshot,
        field: DetailField,
        pad: PadSelector,
    ) -> Result<String, NormalizerError> {
        let Some(device) = self.select_devices(snapshot, pad).into_iter().next() else {
            return Ok(NOT_CONNECTED.to_string());
        };

        match field {
            DetailField::Id => Ok(device.id.clone()),
            DetailField::Mapping => Ok(device.mapping.clone()),
            DetailField::Vendor => extract(&VENDOR_PATTERN, field, &device.id),
            DetailField::Product => extract(&PRODUCT_PATTERN, field, &device.id),
        }
    }

    pub fn is_button_down(
        &self,
        snapshot: &DeviceSnapshot,
        button: ButtonSelector,
        pad: PadSelector,
    ) -> bool {
        self.select_devices(snapshot, pad)
            .into_iter()
            .any(|device| match button {
                ButtonSelector::Any => device.any_pressed(),
                ButtonSelector::Index(index) => {
                    device.button(index).is_some_and(|reading| reading.pressed)
                }
            })
    }

    pub fn button_value(&self, snapshot: &DeviceSnapshot, button: usize, pad: PadSelector) -> f64 {
        let mut greatest = 0.0;
        for device in self.select_devices(snapshot, pad) {
            let value = self.filtered_button(device, button);
            if value > greatest {
                greatest = value;
            }
        }
        greatest
    }

    pub fn axis_value(&self, snapshot: &DeviceSnapshot, axis: usize, pad: PadSelector) -> f64 {
        let mut greatest = 0.0_f64;
        for device in self.select_devices(snapshot, pad) {
            let value = self.filtered_axis(device, axis);
            if value.abs() > greatest.abs() {
                greatest = value;
            }
        }
        greatest
    }

    /// Heading of the stick formed by axes `first_axis` and `first_axis + 1`.
    ///
    /// Up reads 0, right 90, down 180, left 270. Returns
    /// [`DEFAULT_DIRECTION`] when no matched stick is outside the deadzone.
    pub fn axis_pair_direction(
        &self,
        snapshot: &DeviceSnapshot,
        first_axis: usize,
        pad: PadSelector,
    ) -> f64 {
        self.strongest_stick(snapshot, first_axis, pad)
            .map(|stick| stick.direction())
            .unwrap_or(DEFAULT_DIRECTION)
    }

    pub fn axis_pair_magnitude(
        &self,
        snapshot: &DeviceSnapshot,
        first_axis: usize,
        pad: PadSelector,
    ) -> f64 {
        self.strongest_stick(snapshot, first_axis, pad)
            .map(|stick| stick.magnitude)
            .unwrap_or(0.0)
    }

    // Commands

    /// Start a dual rumble on every matched pad that supports it.
    ///
    /// Returns immediately. Pads without haptics are skipped and playback
    /// failures are logged, never reported.
    pub fn rumble<H: Haptics + ?Sized>(
        &self,
        snapshot: &DeviceSnapshot,
        haptics: &mut H,
        strong_magnitude: f64,
        weak_magnitude: f64,
        duration_secs: f64,
        pad: PadSelector,
    ) {
        let effect = RumbleEffect::from_seconds(strong_magnitude, weak_magnitude, duration_secs);

        for device in self.select_devices(snapshot, pad) {
            if !device.haptics {
                debug!("Pad {} has no haptics, skipping rumble", device.slot);
                continue;
            }

            debug!("Rumble on pad {}: {:?}", device.slot, effect);
            if let Err(e) = haptics.play(device.slot, &effect) {
                warn!("Rumble on pad {} failed: {}", device.slot, e);
            }
        }
    }

    // Filtering

    fn filtered_button(&self, device: &Device, button: usize) -> f64 {
        match device.button(button) {
            Some(reading) if reading.value.abs() < self.config.button_deadzone => 0.0,
            Some(reading) => reading.value,
            None => 0.0,
        }
    }

    fn filtered_axis(&self, device: &Device, axis: usize) -> f64 {
        match device.axis(axis) {
            Some(value) if value.abs() < self.config.axis_deadzone => 0.0,
            Some(value) => value,
            None => 0.0,
        }
    }

    fn strongest_stick(
        &self,
        snapshot: &DeviceSnapshot,
        first_axis: usize,
        pad: PadSelector,
    ) -> Option<StickReading> {
        // index 0 addresses nothing, and neither does its partner
        let second_axis = if first_axis == 0 {
            0
        } else {
            first_axis.saturating_add(1)
        };
        let mut strongest: Option<StickReading> = None;

        for device in self.select_devices(snapshot, pad) {
            let horizontal = self.filtered_axis(device, first_axis);
            let vertical = self.filtered_axis(device, second_axis);
            let magnitude = horizontal.hypot(vertical);

            let best = strongest.map_or(0.0, |stick| stick.magnitude);
            if magnitude > best {
                strongest = Some(StickReading {
                    horizontal,
                    vertical,
                    magnitude,
                });
            }
        }

        strongest
    }
}

fn extract(pattern: &Regex, field: DetailField, id: &str) -> Result<String, NormalizerError> {
    pattern
        .captures(id)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().to_string())
        .ok_or_else(|| NormalizerError::MalformedIdentifier {
            field,
            id: id.to_string(),
        })
}
