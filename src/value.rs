use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FlagValueError {
    #[error("A flag value cannot be {0}; only booleans, integers, doubles and strings are supported")]
    Unsupported(&'static str),

    #[error("The integer {0} does not fit in a 64-bit flag value")]
    IntegerOutOfRange(serde_json::Number),

    #[error("The double {0} has no JSON representation")]
    NonFinite(f64),
}

/// The kind of value a flag currently holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Bool,
    Int,
    Double,
    Text,
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Text => "string",
        };
        f.write_str(name)
    }
}

/// A flag's value. Only these four kinds can be stored.
///
/// Equality is by identity of the stored value: doubles compare by bit
/// pattern, so a `NaN` flag equals itself and `0.0` differs from `-0.0`.
#[derive(Clone, Debug)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl PartialEq for FlagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FlagValue {}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            Self::Bool(_) => FlagKind::Bool,
            Self::Int(_) => FlagKind::Int,
            Self::Double(_) => FlagKind::Double,
            Self::Text(_) => FlagKind::Text,
        }
    }

    /// The value as `T`, if and only if it currently holds `T`'s kind.
    ///
    /// There is no coercion between kinds: an `Int` read as `f64` is `None`.
    pub fn get<T: FlagType>(&self) -> Option<T> {
        T::from_flag_value(self)
    }

    /// Like [`FlagValue::get`], but falls back to `T::default()` on a kind mismatch.
    pub fn get_or_default<T: FlagType + Default>(&self) -> T {
        self.get().unwrap_or_default()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FlagValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for FlagValue {
    fn from(value: f32) -> Self {
        Self::Double(value.into())
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl TryFrom<serde_json::Value> for FlagValue {
    type Error = FlagValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Self::Int(i));
                }

                match n.as_f64() {
                    Some(d) if n.is_f64() => Ok(Self::Double(d)),
                    _ => Err(FlagValueError::IntegerOutOfRange(n)),
                }
            }
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Null => Err(FlagValueError::Unsupported("null")),
            serde_json::Value::Array(_) => Err(FlagValueError::Unsupported("an array")),
            serde_json::Value::Object(_) => Err(FlagValueError::Unsupported("an object")),
        }
    }
}

impl TryFrom<FlagValue> for serde_json::Value {
    type Error = FlagValueError;

    fn try_from(value: FlagValue) -> Result<Self, Self::Error> {
        match value {
            FlagValue::Bool(b) => Ok(b.into()),
            FlagValue::Int(i) => Ok(i.into()),
            FlagValue::Double(d) => serde_json::Number::from_f64(d)
                .map(serde_json::Value::Number)
                .ok_or(FlagValueError::NonFinite(d)),
            FlagValue::Text(s) => Ok(s.into()),
        }
    }
}

impl Serialize for FlagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Double(d) if d.is_finite() => serializer.serialize_f64(*d),
            Self::Double(d) => Err(ser::Error::custom(FlagValueError::NonFinite(*d))),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for FlagValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        FlagValue::try_from(value).map_err(de::Error::custom)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// A Rust type that one of the [`FlagValue`] kinds maps onto exactly.
///
/// Implemented for `bool`, `i64`, `f64` and `String`. Used by the typed
/// accessors such as [`crate::Registry::get_value`].
pub trait FlagType: sealed::Sealed + Into<FlagValue> + Sized {
    const KIND: FlagKind;

    fn from_flag_value(value: &FlagValue) -> Option<Self>;
}

impl FlagType for bool {
    const KIND: FlagKind = FlagKind::Bool;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FlagType for i64 {
    const KIND: FlagKind = FlagKind::Int;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_int()
    }
}

impl FlagType for f64 {
    const KIND: FlagKind = FlagKind::Double;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_double()
    }
}

impl FlagType for String {
    const KIND: FlagKind = FlagKind::Text;

    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        value.as_str().map(String::from)
    }
}
