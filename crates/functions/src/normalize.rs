//! Argument normalization shared by every function: constant expansion,
//! nullable unwrapping and null map accumulation.

use std::borrow::Cow;
use std::sync::Arc;

use strand_common::error::{Error, Result};
use strand_storage::{Block, Column, ColumnPtr, NullBitmap, StringColumn};

/// The argument at `position` as a full column; constants are expanded.
pub fn full_argument(block: &Block, position: usize) -> Result<ColumnPtr> {
    let column = block.column(position)?;
    if column.is_const() {
        Ok(Arc::new(column.convert_to_full_column_if_const().into_owned()))
    } else {
        Ok(Arc::clone(column))
    }
}

/// The argument at `position` as a full, non-nullable column. Its null map,
/// if any, is ORed into `null_map`.
pub fn unpack_argument(
    block: &Block,
    position: usize,
    null_map: &mut NullBitmap,
) -> Result<ColumnPtr> {
    let (nested, nulls) = unpack_argument_with_nulls(block, position)?;
    if let Some(nulls) = nulls {
        null_map.merge(&nulls);
    }
    Ok(nested)
}

/// Like [`unpack_argument`] but hands the null map back to the caller.
pub fn unpack_argument_with_nulls(
    block: &Block,
    position: usize,
) -> Result<(ColumnPtr, Option<NullBitmap>)> {
    let full = full_argument(block, position)?;
    match full.as_ref() {
        Column::Nullable { nested, nulls } => Ok((Arc::clone(nested), Some(nulls.clone()))),
        _ => Ok((full, None)),
    }
}

pub fn string_argument<'a>(column: &'a Column, function: &str) -> Result<&'a StringColumn> {
    column.as_string().map_err(|_| unsupported_argument(column, function))
}

/// Integer argument values narrowed to `i32`. Wider values saturate.
pub fn integer_argument<'a>(column: &'a Column, function: &str) -> Result<Cow<'a, [i32]>> {
    match column {
        Column::Int32 { data } => Ok(Cow::Borrowed(data.as_slice())),
        Column::Int64 { data } => Ok(Cow::Owned(
            data.iter()
                .map(|&v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
                .collect(),
        )),
        Column::UInt8 { data } => Ok(Cow::Owned(data.iter().map(|&v| v as i32).collect())),
        other => Err(unsupported_argument(other, function)),
    }
}

pub fn unsupported_argument(column: &Column, function: &str) -> Error {
    Error::execution(
        function,
        format!(
            "unsupported argument type {} for {}",
            column.data_type(),
            function
        ),
    )
}
