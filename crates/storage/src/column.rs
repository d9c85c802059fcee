use std::borrow::Cow;
use std::sync::Arc;

use aligned_vec::{AVec, ConstAlign};
use strand_common::error::{Error, Result};
use strand_common::types::{DataType, Value};

use crate::NullBitmap;
use crate::string_column::StringColumn;

pub type A64 = ConstAlign<64>;

/// Shared, immutable handle to a column once it is placed in a block.
pub type ColumnPtr = Arc<Column>;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    UInt8 {
        data: Vec<u8>,
    },
    Int32 {
        data: AVec<i32, A64>,
    },
    Int64 {
        data: AVec<i64, A64>,
    },
    String(StringColumn),
    /// Any column with a null overlay. `nested` is never itself nullable.
    Nullable {
        nested: ColumnPtr,
        nulls: NullBitmap,
    },
    /// One value logically repeated `len` times; `value` has exactly one row.
    Const {
        value: Box<Column>,
        len: usize,
    },
}

impl Column {
    pub fn uint8(values: impl IntoIterator<Item = u8>) -> Self {
        Column::UInt8 {
            data: values.into_iter().collect(),
        }
    }

    pub fn int32(values: impl IntoIterator<Item = i32>) -> Self {
        Column::Int32 {
            data: AVec::from_iter(64, values),
        }
    }

    pub fn int64(values: impl IntoIterator<Item = i64>) -> Self {
        Column::Int64 {
            data: AVec::from_iter(64, values),
        }
    }

    pub fn string<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Column::String(StringColumn::from_values(values))
    }

    /// Builds a nullable string column; `None` rows get an empty payload.
    pub fn nullable_string<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut data = StringColumn::new();
        let mut nulls = NullBitmap::new();
        for value in values {
            match value {
                Some(v) => {
                    data.push_value(v.as_bytes());
                    nulls.push(false);
                }
                None => {
                    data.push_empty();
                    nulls.push(true);
                }
            }
        }
        Column::Nullable {
            nested: Arc::new(Column::String(data)),
            nulls,
        }
    }

    pub fn nullable(nested: Column, nulls: NullBitmap) -> Result<Self> {
        if nested.is_nullable() || nested.is_const() {
            return Err(Error::internal(format!(
                "cannot wrap {} column in a null map",
                nested.data_type()
            )));
        }
        if nested.len() != nulls.len() {
            return Err(Error::schema_mismatch(format!(
                "null map has {} rows, column has {}",
                nulls.len(),
                nested.len()
            )));
        }
        Ok(Column::Nullable {
            nested: Arc::new(nested),
            nulls,
        })
    }

    pub fn constant(value: Column, len: usize) -> Result<Self> {
        if value.len() != 1 {
            return Err(Error::internal(format!(
                "constant column needs exactly one row, got {}",
                value.len()
            )));
        }
        let value = match value {
            Column::Const { value, .. } => value,
            other => Box::new(other),
        };
        Ok(Column::Const { value, len })
    }

    pub fn const_str(value: impl AsRef<[u8]>, len: usize) -> Self {
        Column::Const {
            value: Box::new(Column::string([value])),
            len,
        }
    }

    pub fn const_int32(value: i32, len: usize) -> Self {
        Column::Const {
            value: Box::new(Column::int32([value])),
            len,
        }
    }

    /// A constant NULL of the given (non-nullable) type.
    pub fn const_null(data_type: &DataType, len: usize) -> Self {
        let nested = Column::default_of(data_type.remove_nullable(), 1);
        Column::Const {
            value: Box::new(Column::Nullable {
                nested: Arc::new(nested),
                nulls: NullBitmap::new_null(1),
            }),
            len,
        }
    }

    /// `rows` default values (0 / empty string) of a plain type.
    pub fn default_of(data_type: &DataType, rows: usize) -> Self {
        match data_type.remove_nullable() {
            DataType::UInt8 => Column::uint8(std::iter::repeat_n(0, rows)),
            DataType::Int32 => Column::int32(std::iter::repeat_n(0, rows)),
            DataType::Int64 => Column::int64(std::iter::repeat_n(0, rows)),
            DataType::String | DataType::Nullable(_) => {
                let mut data = StringColumn::with_capacity(rows, 0);
                for _ in 0..rows {
                    data.push_empty();
                }
                Column::String(data)
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::UInt8 { data } => data.len(),
            Column::Int32 { data } => data.len(),
            Column::Int64 { data } => data.len(),
            Column::String(data) => data.len(),
            Column::Nullable { nested, .. } => nested.len(),
            Column::Const { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::UInt8 { .. } => DataType::UInt8,
            Column::Int32 { .. } => DataType::Int32,
            Column::Int64 { .. } => DataType::Int64,
            Column::String(_) => DataType::String,
            Column::Nullable { nested, .. } => nested.data_type().make_nullable(),
            Column::Const { value, .. } => value.data_type(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Column::Nullable { .. } => true,
            Column::Const { value, .. } => value.is_nullable(),
            _ => false,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Column::Const { .. })
    }

    /// True for a constant whose single value is NULL.
    pub fn is_const_null(&self) -> bool {
        match self {
            Column::Const { value, .. } => value.is_null_at(0),
            _ => false,
        }
    }

    /// Splits a nullable column into its nested column and null map.
    /// Non-nullable columns come back unchanged with no map.
    pub fn unwrap_nullable(&self) -> (&Column, Option<&NullBitmap>) {
        match self {
            Column::Nullable { nested, nulls } => (nested.as_ref(), Some(nulls)),
            other => (other, None),
        }
    }

    pub fn make_nullable(self) -> Column {
        match self {
            Column::Nullable { .. } => self,
            Column::Const { value, len } => Column::Const {
                value: Box::new(value.make_nullable()),
                len,
            },
            other => {
                let nulls = NullBitmap::new_valid(other.len());
                Column::Nullable {
                    nested: Arc::new(other),
                    nulls,
                }
            }
        }
    }

    /// Shares `column` under an all-valid null map. Constants stay constant.
    pub fn wrap_nullable(column: &ColumnPtr) -> Column {
        match column.as_ref() {
            Column::Nullable { .. } => column.as_ref().clone(),
            Column::Const { .. } => column.as_ref().clone().make_nullable(),
            _ => Column::Nullable {
                nested: Arc::clone(column),
                nulls: NullBitmap::new_valid(column.len()),
            },
        }
    }

    pub fn convert_to_full_column_if_const(&self) -> Cow<'_, Column> {
        match self {
            Column::Const { value, len } => Cow::Owned(value.replicate(0, *len)),
            other => Cow::Borrowed(other),
        }
    }

    /// A full column holding row `row` copied `n` times.
    pub fn replicate(&self, row: usize, n: usize) -> Column {
        match self {
            Column::UInt8 { data } => Column::uint8(std::iter::repeat_n(data[row], n)),
            Column::Int32 { data } => Column::int32(std::iter::repeat_n(data[row], n)),
            Column::Int64 { data } => Column::int64(std::iter::repeat_n(data[row], n)),
            Column::String(data) => Column::String(data.replicate_row(row, n)),
            Column::Nullable { nested, nulls } => {
                let flags = if nulls.is_null(row) {
                    NullBitmap::new_null(n)
                } else {
                    NullBitmap::new_valid(n)
                };
                Column::Nullable {
                    nested: Arc::new(nested.replicate(row, n)),
                    nulls: flags,
                }
            }
            Column::Const { value, .. } => value.replicate(0, n),
        }
    }

    /// A copy of a plain column with every row flagged in `nulls` reset to
    /// the type's default (0 / empty string). Nullable and constant columns
    /// are returned unchanged.
    pub fn mask_nulls(&self, nulls: &NullBitmap) -> Column {
        debug_assert_eq!(self.len(), nulls.len());
        match self {
            Column::UInt8 { data } => Column::uint8(
                data.iter().enumerate().map(|(row, &v)| if nulls.is_null(row) { 0 } else { v }),
            ),
            Column::Int32 { data } => Column::int32(
                data.iter().enumerate().map(|(row, &v)| if nulls.is_null(row) { 0 } else { v }),
            ),
            Column::Int64 { data } => Column::int64(
                data.iter().enumerate().map(|(row, &v)| if nulls.is_null(row) { 0 } else { v }),
            ),
            Column::String(data) => {
                let mut out = StringColumn::with_capacity(data.len(), data.payload_bytes());
                for (row, value) in data.iter().enumerate() {
                    if nulls.is_null(row) {
                        out.push_empty();
                    } else {
                        out.push_value(value);
                    }
                }
                Column::String(out)
            }
            Column::Nullable { .. } | Column::Const { .. } => self.clone(),
        }
    }

    pub fn is_null_at(&self, row: usize) -> bool {
        match self {
            Column::Nullable { nulls, .. } => nulls.is_null(row),
            Column::Const { value, .. } => value.is_null_at(0),
            _ => false,
        }
    }

    pub fn get(&self, row: usize) -> Result<Value> {
        if row >= self.len() {
            return Err(Error::column_not_found(format!(
                "row {} out of bounds (len: {})",
                row,
                self.len()
            )));
        }
        Ok(match self {
            Column::UInt8 { data } => Value::UInt8(data[row]),
            Column::Int32 { data } => Value::Int32(data[row]),
            Column::Int64 { data } => Value::Int64(data[row]),
            Column::String(data) => Value::String(data.value(row).to_vec()),
            Column::Nullable { nested, nulls } => {
                if nulls.is_null(row) {
                    Value::Null
                } else {
                    nested.get(row)?
                }
            }
            Column::Const { value, .. } => value.get(0)?,
        })
    }

    pub fn as_string(&self) -> Result<&StringColumn> {
        match self {
            Column::String(data) => Ok(data),
            other => Err(Error::type_mismatch("STRING", other.data_type().to_string())),
        }
    }

    pub fn as_uint8(&self) -> Result<&[u8]> {
        match self {
            Column::UInt8 { data } => Ok(data.as_slice()),
            other => Err(Error::type_mismatch("UINT8", other.data_type().to_string())),
        }
    }

    pub fn as_int32(&self) -> Result<&[i32]> {
        match self {
            Column::Int32 { data } => Ok(data.as_slice()),
            other => Err(Error::type_mismatch("INT32", other.data_type().to_string())),
        }
    }

    pub fn as_int64(&self) -> Result<&[i64]> {
        match self {
            Column::Int64 { data } => Ok(data.as_slice()),
            other => Err(Error::type_mismatch("INT64", other.data_type().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn test_const_expansion() {
        let column = Column::const_str("ab", 3);
        assert!(column.is_const());
        assert_eq!(column.len(), 3);
        let full = column.convert_to_full_column_if_const();
        assert!(!full.is_const());
        let strings = full.as_string().unwrap();
        assert_eq!(strings.len(), 3);
        assert!(strings.iter().all(|v| v == b"ab"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_const_null_expands_to_null_rows() {
        let column = Column::const_null(&DataType::String, 4);
        assert!(column.is_nullable());
        assert!(column.is_const_null());
        let full = column.convert_to_full_column_if_const().into_owned();
        let (nested, nulls) = full.unwrap_nullable();
        assert_eq!(nested.len(), 4);
        assert_eq!(nulls.map(|n| n.count_null()), Some(4));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_make_nullable_keeps_values() {
        let column = Column::string(["a", "b"]).make_nullable();
        assert_eq!(column.data_type(), DataType::String.make_nullable());
        assert_eq!(column.get(1).unwrap(), Value::string("b"));
        assert!(!column.is_null_at(0));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_nullable_rejects_length_mismatch() {
        let result = Column::nullable(Column::int32([1, 2]), NullBitmap::new_valid(3));
        assert!(result.is_err());
        let result = Column::nullable(
            Column::nullable_string([Some("a")]),
            NullBitmap::new_valid(1),
        );
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_get_null_and_out_of_bounds() {
        let column = Column::nullable_string([Some("x"), None]);
        assert_eq!(column.get(0).unwrap(), Value::string("x"));
        assert_eq!(column.get(1).unwrap(), Value::Null);
        assert!(column.get(2).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_mask_nulls_resets_null_rows() {
        let mut nulls = NullBitmap::new_valid(3);
        nulls.set(1, true);

        let counts = Column::int32([2, i32::MAX, 5]).mask_nulls(&nulls);
        assert_eq!(counts.as_int32().unwrap(), &[2, 0, 5]);

        let strings = Column::string(["ab", "hidden", "c"]).mask_nulls(&nulls);
        let strings = strings.as_string().unwrap();
        assert_eq!(strings.iter().collect::<Vec<_>>(), vec![&b"ab"[..], b"", b"c"]);

        let untouched = Column::int64([7, 8, 9]).mask_nulls(&NullBitmap::new_valid(3));
        assert_eq!(untouched.as_int64().unwrap(), &[7, 8, 9]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_typed_accessors() {
        let column = Column::int32([1, 2, 3]);
        assert_eq!(column.as_int32().unwrap(), &[1, 2, 3]);
        assert!(column.as_string().is_err());
        assert!(Column::int64([9]).as_int64().is_ok());
    }
}
