use crate::backend::DeviceSource;
use crate::device::{ButtonReading, Device, DeviceSnapshot};
use crate::error::HapticsError;
use crate::haptics::{Haptics, RumbleEffect};
use tracing::{debug, info};

/// In-memory pads with settable state.
///
/// Every rumble request that reaches a haptics-capable pad is recorded and can
/// be inspected with [`StaticSource::played`].
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    devices: Vec<Device>,
    played: Vec<(usize, RumbleEffect)>,
}

impl StaticSource {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            played: Vec::new(),
        }
    }

    /// Two standard pads: slot 1 with rumble, slot 2 without, both at rest.
    pub fn demo() -> Self {
        let at_rest = |slot: usize, id: &str| {
            Device::new(slot, id)
                .with_mapping("standard")
                .with_buttons(vec![ButtonReading::released(); 17])
                .with_axes(vec![0.0; 4])
        };

        let first = at_rest(1, "Demo Pad (STANDARD GAMEPAD Vendor: 045e Product: 028e)")
            .with_haptics(true);
        let second = at_rest(2, "Demo Pad (STANDARD GAMEPAD Vendor: 054c Product: 09cc)");

        info!("Created demo source with 2 pads");
        Self::new(vec![first, second])
    }

    /// Plug in a pad, replacing whatever sits in its slot.
    pub fn connect(&mut self, device: Device) {
        debug!("Static pad connected in slot {}", device.slot);
        self.devices.retain(|d| d.slot != device.slot);
        self.devices.push(device);
    }

    pub fn disconnect(&mut self, slot: usize) {
        debug!("Static pad disconnected from slot {}", slot);
        self.devices.retain(|d| d.slot != slot);
    }

    pub fn device_mut(&mut self, slot: usize) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.slot == slot)
    }

    pub fn played(&self) -> &[(usize, RumbleEffect)] {
        &self.played
    }
}

impl DeviceSource for StaticSource {
    fn snapshot(&mut self) -> DeviceSnapshot {
        DeviceSnapshot::new(self.devices.clone())
    }
}

impl Haptics for StaticSource {
    fn play(&mut self, slot: usize, effect: &RumbleEffect) -> Result<(), HapticsError> {
        let device = self
            .devices
            .iter()
            .find(|d| d.slot == slot)
            .ok_or(HapticsError::UnknownSlot(slot))?;
        if !device.haptics {
            return Err(HapticsError::Unsupported(slot));
        }

        self.played.push((slot, effect.clone()));
        Ok(())
    }
}
