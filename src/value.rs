use crate::error::InspectError;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::{self, Write},
    sync::Arc,
};

type Func = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named, shareable function value
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Arc<Func>,
}

impl Callable {
    pub fn new(name: impl Into<String>, func: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish_non_exhaustive()
    }
}

// Two callables are equal only if they share the same function allocation
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// A dynamically typed value that guards inspect
///
/// `Undefined` and `Null` are distinct: the first means "no value was supplied at all",
/// the second "a value was supplied and it is null". Guards report them with different
/// error kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Entries keep their insertion order
    Object(Vec<(String, Value)>),
    Function(Callable),
}

impl Value {
    /// Build a function value
    pub fn function(name: impl Into<String>, func: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self::Function(Callable::new(name, func))
    }

    /// Build an object from key/value pairs, keeping their order
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for both `Null` and `Undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// True for numbers that are neither NaN nor infinite
    pub fn is_finite_number(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_finite())
    }

    /// Raw type tag, the way `typeof` reports it (`null` and arrays are "object")
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Array(_) | Self::Object(_) => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Callable> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up an object member by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    // Members that JSON cannot represent: dropped from objects, null in arrays
    fn is_json_absent(&self) -> bool {
        matches!(self, Self::Undefined | Self::Function(_))
    }
}

/// Serializes with JSON semantics: non-finite numbers and absent members become `null`,
/// absent object members are skipped, integral numbers are written without a fraction.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            // Integral values below 1e21 are exact in i128 and print without a fraction
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e21 => serializer.serialize_i128(*n as i128),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    if item.is_json_absent() {
                        seq.serialize_element(&Value::Null)?;
                    } else {
                        seq.serialize_element(item)?;
                    }
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in entries.iter().filter(|(_, v)| !v.is_json_absent()) {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }

            impl Inspect for $t {
                fn inspect(&self) -> Result<Value, InspectError> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::String(c.to_string())
    }
}

impl From<Callable> for Value {
    fn from(f: Callable) -> Self {
        Self::Function(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

// None is a present-but-null value, not a missing one
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

/// Conversion of an arbitrary Rust value into a [`Value`] for checking or for use as a
/// message fragment
///
/// Conversion happens only when a message is actually built, so failing conversions
/// surface inside the formatter, never at the call site. Derive it with
/// `#[derive(Inspect)]`.
pub trait Inspect {
    fn inspect(&self) -> Result<Value, InspectError>;
}

impl Inspect for Value {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(self.clone())
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(Value::Bool(*self))
    }
}

impl Inspect for str {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(Value::from(self))
    }
}

impl Inspect for String {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(Value::from(self.as_str()))
    }
}

impl Inspect for char {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(Value::from(*self))
    }
}

impl Inspect for Callable {
    fn inspect(&self) -> Result<Value, InspectError> {
        Ok(Value::Function(self.clone()))
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Result<Value, InspectError> {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        (**self).inspect()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        match self {
            Some(v) => v.inspect(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Result<Value, InspectError> {
        self.iter().map(Inspect::inspect).collect::<Result<Vec<_>, _>>().map(Value::Array)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Result<Value, InspectError> {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for BTreeMap<String, T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        let mut entries = Vec::with_capacity(self.len());
        for (key, value) in self {
            entries.push((key.clone(), value.inspect()?));
        }
        Ok(Value::Object(entries))
    }
}

// Keys are sorted so the rendering does not depend on hash order
impl<T: Inspect, S> Inspect for HashMap<String, T, S> {
    fn inspect(&self) -> Result<Value, InspectError> {
        let mut sorted: Vec<(&String, &T)> = self.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let mut entries = Vec::with_capacity(sorted.len());
        for (key, value) in sorted {
            entries.push((key.clone(), value.inspect()?));
        }
        Ok(Value::Object(entries))
    }
}

/// Fragment wrapper that goes through `serde_json`
///
/// Fails to inspect when serialization fails, e.g. for maps with non-string keys.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> Inspect for Json<T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        serde_json::to_value(&self.0).map(Value::from).map_err(|e| InspectError::Serialize {
            type_name: std::any::type_name::<T>(),
            reason: e.to_string(),
        })
    }
}

/// Fragment wrapper that renders through `Display`, as a string value
#[derive(Debug, Clone)]
pub struct Displayed<T>(pub T);

impl<T: fmt::Display> Inspect for Displayed<T> {
    fn inspect(&self) -> Result<Value, InspectError> {
        let mut out = String::new();
        write!(out, "{}", self.0).map_err(|_| InspectError::Display {
            type_name: std::any::type_name::<T>(),
        })?;
        Ok(Value::String(out))
    }
}
