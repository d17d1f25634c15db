use crate::backend::DeviceSource;
use crate::device::{ButtonReading, Device, DeviceSnapshot};
use crate::error::{BackendError, HapticsError};
use crate::haptics::{magnitude_to_u16, Haptics, RumbleEffect, DUAL_RUMBLE};
use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs, MappingSource};
use statum::{machine, state};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

// Standard gamepad button order
const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

// Standard gamepad axis order; `true` marks axes whose sign is flipped so that
// pushing a stick up reads negative.
const STANDARD_AXES: [(Axis, bool); 4] = [
    (Axis::LeftStickX, false),
    (Axis::LeftStickY, true),
    (Axis::RightStickX, false),
    (Axis::RightStickY, true),
];

// Backend settings
#[derive(Clone, Debug)]
pub struct BackendSettings {
    /// Highest slot exposed to callers
    pub max_slots: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self { max_slots: 4 }
    }
}

// Backend lifecycle
#[state]
#[derive(Debug, Clone)]
pub enum BackendState {
    Initializing,
    Ready,
}

#[machine]
#[derive(Debug)]
pub struct GilrsBackend<S: BackendState> {
    // Gilrs context
    gilrs: Gilrs,

    // Backend settings
    settings: BackendSettings,

    // Rumble handles kept alive until they finish
    active_effects: ActiveEffects,
}

// gilrs stops an effect as soon as its handle is dropped
#[derive(Default)]
struct ActiveEffects(Vec<(Effect, Instant)>);

impl fmt::Debug for ActiveEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActiveEffects({} playing)", self.0.len())
    }
}

impl GilrsBackend<Initializing> {
    pub fn create(settings: Option<BackendSettings>) -> Result<Self, BackendError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating gilrs backend with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, settings, ActiveEffects::default()))
    }

    // Report what is plugged in and move to Ready
    pub fn initialize(self) -> GilrsBackend<Ready> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, slots stay empty until one is plugged in");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (id, gamepad) in &gamepads {
                info!(
                    "  [slot {}] Name: {}, UUID: {:?}, force feedback: {}",
                    slot_of(*id),
                    gamepad.name(),
                    gamepad.uuid(),
                    gamepad.is_ff_supported()
                );
            }
        }

        info!("Gilrs backend ready, exposing slots 1-{}", self.settings.max_slots);
        self.transition()
    }
}

impl GilrsBackend<Ready> {
    // Drain pending events so cached gamepad state is current
    fn pump_events(&mut self) {
        let mut count = 0;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            count += 1;
            match event {
                EventType::Connected => info!("Gamepad connected in slot {}", slot_of(id)),
                EventType::Disconnected => warn!("Gamepad disconnected from slot {}", slot_of(id)),
                _ => {}
            }
        }
        if count > 0 {
            debug!("Pumped {} gilrs events", count);
        }
    }

    fn prune_effects(&mut self) {
        let now = Instant::now();
        let before = self.active_effects.0.len();
        self.active_effects.0.retain(|(_, until)| *until > now);
        let finished = before - self.active_effects.0.len();
        if finished > 0 {
            debug!("Released {} finished rumble effects", finished);
        }
    }

    fn to_device(&self, id: GamepadId, gamepad: &Gamepad<'_>) -> Device {
        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|button| {
                gamepad
                    .button_data(*button)
                    .map(|data| ButtonReading::new(data.is_pressed(), f64::from(data.value())))
                    .unwrap_or_default()
            })
            .collect();

        let axes = STANDARD_AXES
            .iter()
            .map(|(axis, flip)| {
                let value = gamepad
                    .axis_data(*axis)
                    .map(|data| f64::from(data.value()))
                    .unwrap_or(0.0);
                if *flip {
                    -value
                } else {
                    value
                }
            })
            .collect();

        let mapping = match gamepad.mapping_source() {
            MappingSource::None => "",
            _ => "standard",
        };

        Device::new(slot_of(id), identifier(gamepad))
            .with_mapping(mapping)
            .with_buttons(buttons)
            .with_axes(axes)
            .with_haptics(gamepad.is_ff_supported())
    }

    fn gamepad_in_slot(&self, slot: usize) -> Option<GamepadId> {
        self.gilrs
            .gamepads()
            .map(|(id, _)| id)
            .find(|id| slot_of(*id) == slot)
    }
}

impl DeviceSource for GilrsBackend<Ready> {
    fn snapshot(&mut self) -> DeviceSnapshot {
        self.pump_events();
        self.prune_effects();

        let devices = self
            .gilrs
            .gamepads()
            .filter(|(id, _)| slot_of(*id) <= self.settings.max_slots)
            .map(|(id, gamepad)| self.to_device(id, &gamepad))
            .collect();

        DeviceSnapshot::new(devices)
    }
}

impl Haptics for GilrsBackend<Ready> {
    fn play(&mut self, slot: usize, effect: &RumbleEffect) -> Result<(), HapticsError> {
        let id = self
            .gamepad_in_slot(slot)
            .ok_or(HapticsError::UnknownSlot(slot))?;
        if !self.gilrs.gamepad(id).is_ff_supported() {
            return Err(HapticsError::Unsupported(slot));
        }
        if effect.duration_ms == 0 {
            debug!("Zero-length rumble on slot {}, nothing to play", slot);
            return Ok(());
        }

        let play_for = Ticks::from_ms(effect.duration_ms);
        let scheduling = Replay {
            after: Ticks::from_ms(effect.start_delay_ms),
            play_for,
            with_delay: Ticks::from_ms(0),
        };

        let handle = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong {
                    magnitude: magnitude_to_u16(effect.strong_magnitude),
                },
                scheduling,
                envelope: Default::default(),
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: magnitude_to_u16(effect.weak_magnitude),
                },
                scheduling,
                envelope: Default::default(),
            })
            .repeat(Repeat::For(play_for))
            .gamepads(&[id])
            .finish(&mut self.gilrs)
            .map_err(|e| HapticsError::EffectBuild(e.to_string()))?;

        handle
            .play()
            .map_err(|e| HapticsError::Playback(e.to_string()))?;

        let until = Instant::now()
            + Duration::from_millis(u64::from(effect.start_delay_ms) + u64::from(effect.duration_ms));
        self.active_effects.0.push((handle, until));
        debug!(
            "Rumble ({}) started on slot {} for {} ms",
            DUAL_RUMBLE, slot, effect.duration_ms
        );
        Ok(())
    }
}

fn slot_of(id: GamepadId) -> usize {
    usize::from(id) + 1
}

/// Identifier in the browser style, e.g.
/// `Xbox Controller (STANDARD GAMEPAD Vendor: 045e Product: 028e)`.
fn identifier(gamepad: &Gamepad<'_>) -> String {
    format_identifier(gamepad.name(), gamepad.vendor_id(), gamepad.product_id())
}

fn format_identifier(name: &str, vendor: Option<u16>, product: Option<u16>) -> String {
    match (vendor, product) {
        (Some(vendor), Some(product)) => format!(
            "{} (STANDARD GAMEPAD Vendor: {:04x} Product: {:04x})",
            name, vendor, product
        ),
        _ => format!("{} (STANDARD GAMEPAD)", name),
    }
}
