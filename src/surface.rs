//! Command surface - the operations callers can issue
//!
//! Each request names one operation and carries primitive arguments. Text
//! requests are one line each, opcode first:
//!
//! ```text
//! connected any            detail vendor 1         button any 2
//! button_value 7 1         axis 1 any              direction 3 1
//! magnitude 1 any          rumble 0.25 0.5 0.25 1  deadzone 0.2
//! deadzone_button 0.1      get_deadzone            get_deadzone_button
//! devices
//! ```
//!
//! Pad, button and axis arguments accept `any` (where meaningful) or a 1-based
//! number. A value that cannot address anything selects nothing and yields the
//! default reply. A trailing pad argument may be left out and means pad 1.

use crate::backend::DeviceSource;
use crate::error::SurfaceError;
use crate::haptics::Haptics;
use crate::normalizer::{InputNormalizer, NOT_CONNECTED};
use crate::selector::{parse_index, ButtonSelector, DetailField, PadSelector};
use std::fmt;
use std::str::SplitWhitespace;
use tracing::{debug, warn};

/// One caller operation with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Connected {
        pad: PadSelector,
    },
    /// `field` is `None` for a name that is not a known field
    Detail {
        field: Option<DetailField>,
        pad: PadSelector,
    },
    ButtonDown {
        button: ButtonSelector,
        pad: PadSelector,
    },
    ButtonValue {
        button: usize,
        pad: PadSelector,
    },
    AxisValue {
        axis: usize,
        pad: PadSelector,
    },
    AxisDirection {
        axis: usize,
        pad: PadSelector,
    },
    AxisMagnitude {
        axis: usize,
        pad: PadSelector,
    },
    Rumble {
        strong: f64,
        weak: f64,
        seconds: f64,
        pad: PadSelector,
    },
    SetAxisDeadzone(f64),
    SetButtonDeadzone(f64),
    GetAxisDeadzone,
    GetButtonDeadzone,
    /// Connected slots and their identifiers
    Devices,
}

/// Result of a request.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Commands that report nothing
    Done,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Bool(value) => write!(f, "{}", value),
            Reply::Number(value) => write!(f, "{}", value),
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Done => Ok(()),
        }
    }
}

// Positional argument reader for one request line
struct Args<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, argument: &'static str) -> Result<&'a str, SurfaceError> {
        self.tokens.next().ok_or(SurfaceError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn number(&mut self, argument: &'static str) -> Result<f64, SurfaceError> {
        let value = self.required(argument)?;
        value.parse::<f64>().map_err(|_| SurfaceError::NotANumber {
            command: self.command,
            argument,
            value: value.to_string(),
        })
    }

    fn index(&mut self, argument: &'static str) -> Result<usize, SurfaceError> {
        self.required(argument).map(parse_index)
    }

    fn pad(&mut self) -> PadSelector {
        self.tokens
            .next()
            .map(PadSelector::from_arg)
            .unwrap_or_default()
    }

    fn finish<T>(mut self, request: T) -> Result<T, SurfaceError> {
        match self.tokens.next() {
            Some(_) => Err(SurfaceError::TooManyArguments(self.command)),
            None => Ok(request),
        }
    }
}

impl Request {
    /// Parse a single text request.
    pub fn parse(line: &str) -> Result<Self, SurfaceError> {
        let mut tokens = line.split_whitespace();
        let opcode = tokens.next().ok_or(SurfaceError::Empty)?;
        let lowered = opcode.to_ascii_lowercase();

        let command: &'static str = match lowered.as_str() {
            "connected" => "connected",
            "detail" => "detail",
            "button" => "button",
            "button_value" => "button_value",
            "axis" => "axis",
            "direction" => "direction",
            "magnitude" => "magnitude",
            "rumble" => "rumble",
            "deadzone" => "deadzone",
            "deadzone_button" => "deadzone_button",
            "get_deadzone" => "get_deadzone",
            "get_deadzone_button" => "get_deadzone_button",
            "devices" => "devices",
            _ => return Err(SurfaceError::UnknownCommand(opcode.to_string())),
        };
        let mut args = Args { command, tokens };

        match command {
            "connected" => {
                let pad = args.pad();
                args.finish(Request::Connected { pad })
            }
            "detail" => {
                let field = args.required("field")?.parse::<DetailField>().ok();
                let pad = args.pad();
                args.finish(Request::Detail { field, pad })
            }
            "button" => {
                let button = ButtonSelector::from_arg(args.required("button")?);
                let pad = args.pad();
                args.finish(Request::ButtonDown { button, pad })
            }
            "button_value" => {
                let button = args.index("button")?;
                let pad = args.pad();
                args.finish(Request::ButtonValue { button, pad })
            }
            "axis" => {
                let axis = args.index("axis")?;
                let pad = args.pad();
                args.finish(Request::AxisValue { axis, pad })
            }
            "direction" => {
                let axis = args.index("axis")?;
                let pad = args.pad();
                args.finish(Request::AxisDirection { axis, pad })
            }
            "magnitude" => {
                let axis = args.index("axis")?;
                let pad = args.pad();
                args.finish(Request::AxisMagnitude { axis, pad })
            }
            "rumble" => {
                let strong = args.number("strong")?;
                let weak = args.number("weak")?;
                let seconds = args.number("seconds")?;
                let pad = args.pad();
                args.finish(Request::Rumble {
                    strong,
                    weak,
                    seconds,
                    pad,
                })
            }
            "deadzone" => {
                let value = args.number("value")?;
                args.finish(Request::SetAxisDeadzone(value))
            }
            "deadzone_button" => {
                let value = args.number("value")?;
                args.finish(Request::SetButtonDeadzone(value))
            }
            "get_deadzone" => args.finish(Request::GetAxisDeadzone),
            "get_deadzone_button" => args.finish(Request::GetButtonDeadzone),
            _ => args.finish(Request::Devices),
        }
    }
}

/// Serves requests against a device source.
///
/// The source is polled once per request; nothing about the pads is kept
/// between requests except the deadzones held by the normalizer.
pub struct GamepadBridge<S> {
    source: S,
    normalizer: InputNormalizer,
}

impl<S: DeviceSource + Haptics> GamepadBridge<S> {
    pub fn new(source: S, normalizer: InputNormalizer) -> Self {
        Self { source, normalizer }
    }

    pub fn normalizer(&self) -> &InputNormalizer {
        &self.normalizer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Parse and serve one text request.
    pub fn execute(&mut self, line: &str) -> Result<Reply, SurfaceError> {
        let request = Request::parse(line)?;
        Ok(self.handle(&request))
    }

    /// Serve one request. Never fails.
    pub fn handle(&mut self, request: &Request) -> Reply {
        debug!("Handling request: {:?}", request);

        match *request {
            Request::SetAxisDeadzone(value) => {
                self.normalizer.set_axis_deadzone(value);
                return Reply::Done;
            }
            Request::SetButtonDeadzone(value) => {
                self.normalizer.set_button_deadzone(value);
                return Reply::Done;
            }
            Request::GetAxisDeadzone => return Reply::Number(self.normalizer.axis_deadzone()),
            Request::GetButtonDeadzone => {
                return Reply::Number(self.normalizer.button_deadzone())
            }
            _ => {}
        }

        let snapshot = self.source.snapshot();
        debug!(
            "Snapshot at {} with {} pads",
            snapshot.captured_at().format("%H:%M:%S.%3f"),
            snapshot.len()
        );
        let normalizer = &self.normalizer;

        match *request {
            Request::Connected { pad } => Reply::Bool(normalizer.is_connected(&snapshot, pad)),
            Request::Detail { field: None, .. } => Reply::Text(NOT_CONNECTED.to_string()),
            Request::Detail {
                field: Some(field),
                pad,
            } => match normalizer.describe(&snapshot, field, pad) {
                Ok(text) => Reply::Text(text),
                Err(e) => {
                    warn!("{}", e);
                    Reply::Text(String::new())
                }
            },
            Request::ButtonDown { button, pad } => {
                Reply::Bool(normalizer.is_button_down(&snapshot, button, pad))
            }
            Request::ButtonValue { button, pad } => {
                Reply::Number(normalizer.button_value(&snapshot, button, pad))
            }
            Request::AxisValue { axis, pad } => {
                Reply::Number(normalizer.axis_value(&snapshot, axis, pad))
            }
            Request::AxisDirection { axis, pad } => {
                Reply::Number(normalizer.axis_pair_direction(&snapshot, axis, pad))
            }
            Request::AxisMagnitude { axis, pad } => {
                Reply::Number(normalizer.axis_pair_magnitude(&snapshot, axis, pad))
            }
            Request::Rumble {
                strong,
                weak,
                seconds,
                pad,
            } => {
                normalizer.rumble(&snapshot, &mut self.source, strong, weak, seconds, pad);
                Reply::Done
            }
            Request::Devices => {
                let lines: Vec<String> = snapshot
                    .devices()
                    .iter()
                    .map(|device| format!("{}: {}", device.slot, device.id))
                    .collect();
                if lines.is_empty() {
                    Reply::Text(NOT_CONNECTED.to_string())
                } else {
                    Reply::Text(lines.join("\n"))
                }
            }
            Request::SetAxisDeadzone(_)
            | Request::SetButtonDeadzone(_)
            | Request::GetAxisDeadzone
            | Request::GetButtonDeadzone => Reply::Done,
        }
    }
}
