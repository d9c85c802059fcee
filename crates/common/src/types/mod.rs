use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Unsigned byte, also used for boolean results (0 / 1).
    UInt8,
    Int32,
    Int64,
    String,
    Nullable(Box<DataType>),
}

impl DataType {
    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    /// Wraps the type in `Nullable` unless it already is.
    pub fn make_nullable(self) -> DataType {
        match self {
            DataType::Nullable(_) => self,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    pub fn remove_nullable(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.remove_nullable(),
            other => other,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.remove_nullable(),
            DataType::UInt8 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self.remove_nullable(), DataType::String)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::UInt8 => write!(f, "UINT8"),
            DataType::Int32 => write!(f, "INT32"),
            DataType::Int64 => write!(f, "INT64"),
            DataType::String => write!(f, "STRING"),
            DataType::Nullable(inner) => write!(f, "NULLABLE({})", inner),
        }
    }
}

/// A single logical value, used for constants and row inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Null,
    UInt8(u8),
    Int32(i32),
    Int64(i64),
    /// Raw string payload; not required to be valid UTF-8.
    String(Vec<u8>),
}

impl Value {
    pub fn null() -> Self {
        Value::Null
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into().into_bytes())
    }

    pub fn int32(v: i32) -> Self {
        Value::Int32(v)
    }

    pub fn boolean(v: bool) -> Self {
        Value::UInt8(v as u8)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type of a non-null value. `Null` has no type of its own and
    /// reports `None`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::UInt8(_) => Some(DataType::UInt8),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::String(_) => Some(DataType::String),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::UInt8(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::UInt8(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::String(b) => write!(f, "'{}'", String::from_utf8_lossy(b)),
        }
    }
}
