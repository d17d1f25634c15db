//! Selectors for pads, buttons and identifier fields.
//!
//! Callers address everything with 1-based indices or the literal `any`.
//! Arguments arrive as loosely typed text, so parsing never fails: anything
//! that is not `any` or a positive whole number becomes index `0`, which is
//! never populated and therefore selects nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which connected pad(s) a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadSelector {
    /// Every connected pad, in enumeration order.
    Any,
    /// The pad in the given 1-based slot.
    Slot(usize),
}

impl PadSelector {
    /// Coerce a caller argument into a selector.
    pub fn from_arg(arg: &str) -> Self {
        if is_any(arg) {
            PadSelector::Any
        } else {
            PadSelector::Slot(parse_index(arg))
        }
    }
}

impl Default for PadSelector {
    fn default() -> Self {
        PadSelector::Slot(1)
    }
}

impl fmt::Display for PadSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadSelector::Any => write!(f, "any"),
            PadSelector::Slot(slot) => write!(f, "{}", slot),
        }
    }
}

/// Which button(s) on a pad a press query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonSelector {
    /// True if any button is pressed.
    Any,
    /// The button at the given 1-based index.
    Index(usize),
}

impl ButtonSelector {
    pub fn from_arg(arg: &str) -> Self {
        if is_any(arg) {
            ButtonSelector::Any
        } else {
            ButtonSelector::Index(parse_index(arg))
        }
    }
}

impl fmt::Display for ButtonSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonSelector::Any => write!(f, "any"),
            ButtonSelector::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Identifier fields reported by `describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailField {
    Id,
    Vendor,
    Product,
    Mapping,
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailField::Id => write!(f, "id"),
            DetailField::Vendor => write!(f, "vendor"),
            DetailField::Product => write!(f, "product"),
            DetailField::Mapping => write!(f, "mapping"),
        }
    }
}

impl FromStr for DetailField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(DetailField::Id),
            "vendor" => Ok(DetailField::Vendor),
            "product" => Ok(DetailField::Product),
            "mapping" => Ok(DetailField::Mapping),
            other => Err(format!("unknown detail field: {}", other)),
        }
    }
}

fn is_any(arg: &str) -> bool {
    arg.trim().eq_ignore_ascii_case("any")
}

/// Parse a 1-based index; `0` for anything that cannot address an element.
///
/// Whole-valued decimals such as `"2.0"` are accepted, fractions are not.
pub fn parse_index(arg: &str) -> usize {
    match arg.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 && value.fract() == 0.0 => {
            value as usize
        }
        _ => 0,
    }
}
