//! Operator attributes and typed lookup by name.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::infer_shapes::InferShapesError;

/// Element type named by a type attribute such as `Tsplits`.
///
/// Type attributes are part of an operator's signature. They do not affect
/// inferred shapes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DataType {
    Bool,
    Float,
    Int32,
    Int64,
    String,
    Variant,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Variant => "variant",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value of an operator attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Type(DataType),
    String(String),
}

impl AttrValue {
    /// Name of the attribute type, as used in operator signatures.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Type(_) => "type",
            Self::String(_) => "string",
        }
    }
}

macro_rules! attr_value_from {
    ($variant:ident, $from:ty) => {
        impl From<$from> for AttrValue {
            fn from(val: $from) -> Self {
                Self::$variant(val)
            }
        }
    };
}

attr_value_from!(Bool, bool);
attr_value_from!(Int, i64);
attr_value_from!(Type, DataType);
attr_value_from!(String, String);

// Integer literals default to `i32`, so accept those as well.
impl From<i32> for AttrValue {
    fn from(val: i32) -> Self {
        Self::Int(val.into())
    }
}

impl From<&str> for AttrValue {
    fn from(val: &str) -> Self {
        Self::String(val.to_string())
    }
}

/// Attributes of an operator instance, keyed by name.
///
/// ```
/// use ragged_shape_inference::Attrs;
///
/// let attrs = Attrs::new()
///     .with("RAGGED_RANK", 2)
///     .with("batched_input", true);
/// assert_eq!(attrs.require_int("RAGGED_RANK"), Ok(2));
/// assert_eq!(attrs.require_bool("batched_input"), Ok(true));
/// assert!(attrs.require_int("batched_input").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    values: FxHashMap<String, AttrValue>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute and return the updated map.
    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an attribute.
    pub fn insert(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Get an optional attribute.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get a required attribute.
    pub fn require(&self, name: &str) -> Result<&AttrValue, InferShapesError> {
        self.get(name).ok_or_else(|| InferShapesError::MissingAttr {
            name: name.to_string(),
        })
    }

    /// Get a required integer attribute.
    pub fn require_int(&self, name: &str) -> Result<i64, InferShapesError> {
        match self.require(name)? {
            AttrValue::Int(val) => Ok(*val),
            _ => Err(type_error(name, "int")),
        }
    }

    /// Get a required boolean attribute.
    pub fn require_bool(&self, name: &str) -> Result<bool, InferShapesError> {
        match self.require(name)? {
            AttrValue::Bool(val) => Ok(*val),
            _ => Err(type_error(name, "bool")),
        }
    }

    /// Get a required type attribute.
    pub fn require_type(&self, name: &str) -> Result<DataType, InferShapesError> {
        match self.require(name)? {
            AttrValue::Type(val) => Ok(*val),
            _ => Err(type_error(name, "type")),
        }
    }
}

fn type_error(name: &str, expected: &'static str) -> InferShapesError {
    InferShapesError::AttrType {
        name: name.to_string(),
        expected,
    }
}
