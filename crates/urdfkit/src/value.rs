//! Typed attribute and text values
//!
//! A [`Value`] only carries data. How it is written out is decided by the
//! [`ValueKind`] that the schema declares for the slot, so `0.0` stored in a
//! `Real` slot renders as `0` while the same number in a `Float` slot renders
//! as `0.0`.

use std::fmt;

/// Semantic type of an attribute or text slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Whole number
    Int,
    /// Real scalar written in its shortest exact form
    Real,
    /// Real scalar that always keeps a floating-point form
    Float,
    /// `true` / `false`
    Bool,
    /// Free text
    Text,
    /// Fixed-length list of reals
    Vector(usize),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "integer"),
            Self::Real | Self::Float => write!(f, "number"),
            Self::Bool => write!(f, "boolean"),
            Self::Text => write!(f, "string"),
            Self::Vector(n) => write!(f, "{n} numbers"),
        }
    }
}

/// Attribute or text value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Int(i64),
    Number(f64),
    Bool(bool),
    Text(String),
    Vector(Vec<f64>),
}

impl Value {
    /// Returns the number if this value is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Int(i) => i64_to_f64(*i),
            _ => None,
        }
    }

    /// Returns the integer if this value is a whole number
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Number(n) => f64_to_i64(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Short description of the stored variant, used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Number(n) => render_real(*n),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Vector(v) => render_vector(v),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Self::Vector(value)
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(value: [f64; N]) -> Self {
        Self::Vector(value.to_vec())
    }
}

/// Why a value did not fit a kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindMismatch {
    pub expected: ValueKind,
    pub found: String,
}

impl ValueKind {
    /// Parse source text into a value of this kind
    pub fn parse(self, text: &str) -> Result<Value, KindMismatch> {
        let mismatch = || KindMismatch {
            expected: self,
            found: text.to_string(),
        };
        let trimmed = text.trim();
        match self {
            Self::Int => trimmed.parse::<i64>().map(Value::Int).map_err(|_| mismatch()),
            Self::Real | Self::Float => parse_finite(trimmed).map(Value::Number).ok_or_else(mismatch),
            Self::Bool => match trimmed {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(mismatch()),
            },
            Self::Text => Ok(Value::Text(text.to_string())),
            Self::Vector(n) => {
                let items = trimmed
                    .split_whitespace()
                    .map(parse_finite)
                    .collect::<Option<Vec<f64>>>()
                    .ok_or_else(mismatch)?;
                if items.len() == n {
                    Ok(Value::Vector(items))
                } else {
                    Err(mismatch())
                }
            }
        }
    }

    /// Convert an assigned value into the storage form for this kind
    pub fn coerce(self, value: Value) -> Result<Value, KindMismatch> {
        let mismatch = |value: &Value| KindMismatch {
            expected: self,
            found: value.describe(),
        };
        match (self, value) {
            (Self::Int, value) => value.as_i64().map(Value::Int).ok_or_else(|| mismatch(&value)),
            (Self::Real | Self::Float, value) => match value.as_f64() {
                Some(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(mismatch(&value)),
            },
            (Self::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Self::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (Self::Vector(n), Value::Vector(v)) if v.len() == n && v.iter().all(|x| x.is_finite()) => {
                Ok(Value::Vector(v))
            }
            (_, value) => Err(mismatch(&value)),
        }
    }

    /// Canonical text of a value stored under this kind
    pub fn render(self, value: &Value) -> String {
        match (self, value) {
            (Self::Float, Value::Number(n)) => render_float(*n),
            (Self::Float, Value::Int(i)) => i64_to_f64(*i).map_or_else(|| i.to_string(), render_float),
            (_, Value::Number(n)) => render_real(*n),
            (_, Value::Int(i)) => i.to_string(),
            (_, Value::Bool(b)) => b.to_string(),
            (_, Value::Text(s)) => s.clone(),
            (_, Value::Vector(v)) => render_vector(v),
        }
    }
}

/// Shortest text that reads back to the same number; whole numbers carry no fraction
pub fn render_real(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

/// Shortest text that reads back to the same number, always in floating-point form
///
/// Large and tiny magnitudes switch to exponent notation (`1e16`, `1e-7`).
pub fn render_float(n: f64) -> String {
    if n == 0.0 {
        return "0.0".to_string();
    }
    format!("{n:?}")
}

fn render_vector(items: &[f64]) -> String {
    items
        .iter()
        .map(|x| render_real(*x))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[allow(clippy::as_conversions)]
fn i64_to_f64(i: i64) -> Option<f64> {
    let n = i as f64;
    (n as i64 == i).then_some(n)
}

#[allow(clippy::as_conversions)]
fn f64_to_i64(n: f64) -> Option<i64> {
    let in_range = n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64;
    in_range.then_some(n as i64)
}
