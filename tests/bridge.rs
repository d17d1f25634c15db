use approx::assert_relative_eq;
use padbridge::{
    ButtonReading, Device, GamepadBridge, InputNormalizer, NormalizerConfig, Reply, StaticSource,
};

const PAD_ONE: &str = "Xbox 360 Controller (STANDARD GAMEPAD Vendor: 045e Product: 028e)";
const PAD_TWO: &str = "Wireless Controller (STANDARD GAMEPAD Vendor: 054c Product: 09cc)";

fn standard_pad(slot: usize, id: &str) -> Device {
    Device::new(slot, id)
        .with_mapping("standard")
        .with_buttons(vec![ButtonReading::released(); 17])
        .with_axes(vec![0.0; 4])
}

fn bridge(devices: Vec<Device>) -> GamepadBridge<StaticSource> {
    GamepadBridge::new(StaticSource::new(devices), InputNormalizer::default())
}

fn number(reply: Reply) -> f64 {
    match reply {
        Reply::Number(value) => value,
        other => panic!("expected a number, got {:?}", other),
    }
}

fn run(bridge: &mut GamepadBridge<StaticSource>, line: &str) -> Reply {
    bridge.execute(line).unwrap()
}

#[test]
fn test_missing_pad_reads_defaults_everywhere() {
    let mut bridge = bridge(vec![standard_pad(1, PAD_ONE).with_haptics(true)]);

    assert_eq!(run(&mut bridge, "connected 3"), Reply::Bool(false));
    assert_eq!(run(&mut bridge, "detail id 3"), Reply::Text("not connected".into()));
    assert_eq!(run(&mut bridge, "button any 3"), Reply::Bool(false));
    assert_eq!(run(&mut bridge, "button_value 1 3"), Reply::Number(0.0));
    assert_eq!(run(&mut bridge, "axis 1 3"), Reply::Number(0.0));
    assert_eq!(run(&mut bridge, "direction 1 3"), Reply::Number(90.0));
    assert_eq!(run(&mut bridge, "magnitude 1 3"), Reply::Number(0.0));
    assert_eq!(run(&mut bridge, "rumble 1 1 1 3"), Reply::Done);
    assert!(bridge.source().played().is_empty());
}

#[test]
fn test_details() {
    let mut bridge = bridge(vec![
        standard_pad(1, PAD_ONE),
        standard_pad(2, PAD_TWO),
        standard_pad(3, "Arcade Stick"),
    ]);

    assert_eq!(run(&mut bridge, "detail vendor any"), Reply::Text("045e".into()));
    assert_eq!(run(&mut bridge, "detail product 2"), Reply::Text("09cc".into()));
    assert_eq!(run(&mut bridge, "detail mapping 2"), Reply::Text("standard".into()));
    assert_eq!(run(&mut bridge, "detail id 3"), Reply::Text("Arcade Stick".into()));
    // malformed identifiers answer with an empty string
    assert_eq!(run(&mut bridge, "detail vendor 3"), Reply::Text(String::new()));
    // unknown fields behave as if nothing matched
    assert_eq!(run(&mut bridge, "detail serial 1"), Reply::Text("not connected".into()));
}

#[test]
fn test_reconnect_is_seen_on_next_request() {
    let mut bridge = bridge(vec![standard_pad(1, PAD_ONE)]);
    assert_eq!(run(&mut bridge, "connected 2"), Reply::Bool(false));

    bridge.source_mut().connect(standard_pad(2, PAD_TWO));
    assert_eq!(run(&mut bridge, "connected 2"), Reply::Bool(true));
    assert_eq!(
        run(&mut bridge, "devices"),
        Reply::Text(format!("1: {}\n2: {}", PAD_ONE, PAD_TWO))
    );

    bridge.source_mut().disconnect(1);
    bridge.source_mut().disconnect(2);
    assert_eq!(run(&mut bridge, "connected any"), Reply::Bool(false));
    assert_eq!(run(&mut bridge, "devices"), Reply::Text("not connected".into()));
}

#[test]
fn test_any_button_across_pads() {
    let mut pressed = standard_pad(2, PAD_TWO);
    pressed.buttons[9] = ButtonReading::held();
    let mut bridge = bridge(vec![standard_pad(1, PAD_ONE), pressed]);

    assert_eq!(run(&mut bridge, "button any 1"), Reply::Bool(false));
    assert_eq!(run(&mut bridge, "button any any"), Reply::Bool(true));
    assert_eq!(run(&mut bridge, "button 10 any"), Reply::Bool(true));
    assert_eq!(run(&mut bridge, "button 10 1"), Reply::Bool(false));
    assert_eq!(run(&mut bridge, "button 40 any"), Reply::Bool(false));
}

#[test]
fn test_trigger_values() {
    let mut first = standard_pad(1, PAD_ONE);
    first.buttons[6] = ButtonReading::new(false, 0.03);
    let mut second = standard_pad(2, PAD_TWO);
    second.buttons[6] = ButtonReading::new(true, 0.65);
    let mut bridge = bridge(vec![first, second]);

    assert_eq!(run(&mut bridge, "button_value 7 1"), Reply::Number(0.0));
    assert_eq!(run(&mut bridge, "button_value 7 any"), Reply::Number(0.65));

    run(&mut bridge, "deadzone_button 0.7");
    assert_eq!(run(&mut bridge, "button_value 7 any"), Reply::Number(0.0));
}

#[test]
fn test_axis_deadzone_changes() {
    let mut pad = standard_pad(1, PAD_ONE);
    pad.axes = vec![0.3, 0.6, 0.0, 0.0];
    let mut bridge = bridge(vec![pad]);

    assert_eq!(run(&mut bridge, "axis 1"), Reply::Number(0.3));
    assert_eq!(run(&mut bridge, "deadzone 0.5"), Reply::Done);
    assert_eq!(run(&mut bridge, "get_deadzone"), Reply::Number(0.5));
    assert_eq!(run(&mut bridge, "axis 1 1"), Reply::Number(0.0));
    assert_eq!(run(&mut bridge, "axis 2 1"), Reply::Number(0.6));
}

#[test]
fn test_nan_deadzone_passes_readings_through() {
    let mut pad = standard_pad(1, PAD_ONE);
    pad.axes = vec![0.6, 0.0, 0.0, 0.0];
    let mut bridge = bridge(vec![pad]);

    assert_eq!(run(&mut bridge, "deadzone NaN"), Reply::Done);
    assert_eq!(run(&mut bridge, "axis 1 1"), Reply::Number(0.6));
}

#[test]
fn test_readings_follow_the_live_pad() {
    let mut bridge = bridge(vec![standard_pad(1, PAD_ONE)]);
    assert_eq!(run(&mut bridge, "magnitude 1 1"), Reply::Number(0.0));

    if let Some(pad) = bridge.source_mut().device_mut(1) {
        pad.axes[1] = -1.0;
        pad.buttons[0] = ButtonReading::held();
    }
    assert_relative_eq!(number(run(&mut bridge, "direction 1 1")), 0.0, epsilon = 1e-9);
    assert_eq!(run(&mut bridge, "button 1 1"), Reply::Bool(true));
    assert!(bridge.source_mut().device_mut(2).is_none());
}

#[test]
fn test_stick_direction_and_magnitude() {
    let mut down = standard_pad(1, PAD_ONE);
    down.axes = vec![0.0, 1.0, 0.0, 0.0];
    let mut diagonal = standard_pad(2, PAD_TWO);
    diagonal.axes = vec![0.0, 0.0, 0.4, -0.3];
    let mut bridge = bridge(vec![down, diagonal]);

    assert_relative_eq!(number(run(&mut bridge, "direction 1 1")), 180.0, epsilon = 1e-9);
    assert_relative_eq!(number(run(&mut bridge, "magnitude 1 any")), 1.0, epsilon = 1e-12);
    assert_relative_eq!(number(run(&mut bridge, "magnitude 3 any")), 0.5, epsilon = 1e-12);

    let expected = (-0.3_f64).atan2(0.4).to_degrees() + 90.0;
    assert_relative_eq!(number(run(&mut bridge, "direction 3 any")), expected, epsilon = 1e-9);
}

#[test]
fn test_rumble_reaches_capable_pads() {
    let mut bridge = bridge(vec![
        standard_pad(1, PAD_ONE).with_haptics(true),
        standard_pad(2, PAD_TWO),
    ]);

    assert_eq!(run(&mut bridge, "rumble 0.25 0.5 0.25 any"), Reply::Done);
    let played = bridge.source().played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].0, 1);
    assert_eq!(played[0].1.duration_ms, 250);
    assert_eq!(played[0].1.start_delay_ms, 0);
    assert_eq!(played[0].1.strong_magnitude, 0.25);
    assert_eq!(played[0].1.weak_magnitude, 0.5);
}

#[test]
fn test_configured_deadzones_are_initial_values() {
    let config = NormalizerConfig {
        axis_deadzone: 0.2,
        button_deadzone: 0.3,
    };
    let mut bridge = GamepadBridge::new(StaticSource::default(), InputNormalizer::new(config));

    assert_eq!(run(&mut bridge, "get_deadzone"), Reply::Number(0.2));
    assert_eq!(run(&mut bridge, "get_deadzone_button"), Reply::Number(0.3));
    run(&mut bridge, "deadzone_button 0.01");
    assert_eq!(run(&mut bridge, "get_deadzone_button"), Reply::Number(0.01));
    assert_eq!(bridge.normalizer().button_deadzone(), 0.01);
}

#[test]
fn test_bad_requests_are_errors_not_panics() {
    let mut bridge = bridge(vec![]);
    assert!(bridge.execute("fly away").is_err());
    assert!(bridge.execute("rumble 1 1").is_err());
    assert!(bridge.execute("").is_err());
}
