//! Parameter values and constants.
//!
//! Every parameter carries its value as a closed tagged union; typed access
//! is a `match`, so a parameter can never be read back as the wrong type
//! without the caller seeing a `None`/`TypeMismatch`.

use std::fmt;

use glam::DVec2;
use sc_core::Duration;

use crate::{AgentError, AgentResult, QualifiedName};

/// The declared type of a parameter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamKind {
    Scalar,
    Vector,
    Duration,
    Integer,
    Bool,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Scalar   => "scalar",
            ParamKind::Vector   => "vector",
            ParamKind::Duration => "duration",
            ParamKind::Integer  => "integer",
            ParamKind::Bool     => "bool",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter value.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Scalar(f64),
    Vector(DVec2),
    Duration(Duration),
    Integer(i64),
    Bool(bool),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Scalar(_)   => ParamKind::Scalar,
            ParamValue::Vector(_)   => ParamKind::Vector,
            ParamValue::Duration(_) => ParamKind::Duration,
            ParamValue::Integer(_)  => ParamKind::Integer,
            ParamValue::Bool(_)     => ParamKind::Bool,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            ParamValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<DVec2> {
        match *self {
            ParamValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match *self {
            ParamValue::Duration(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            ParamValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// `true` unless a float component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match *self {
            ParamValue::Scalar(v) => v.is_finite(),
            ParamValue::Vector(v) => v.is_finite(),
            _ => true,
        }
    }
}

/// An immutable named value.
///
/// Constants are never edited in place: a correction replaces the stored
/// constant with a new one.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    name:  QualifiedName,
    value: ParamValue,
}

impl Constant {
    pub fn new(name: QualifiedName, value: ParamValue) -> Self {
        Self { name, value }
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> ParamValue {
        self.value
    }

    #[inline]
    pub fn kind(&self) -> ParamKind {
        self.value.kind()
    }

    /// The value, checked against `expected`.
    pub fn expect_kind(&self, expected: ParamKind) -> AgentResult<ParamValue> {
        if self.kind() == expected {
            Ok(self.value)
        } else {
            Err(AgentError::TypeMismatch {
                name: self.name.full(),
                expected,
                found: self.kind(),
            })
        }
    }
}
