use debug_print::debug_eprintln;
use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column, ColumnPtr, NullBitmap, NullableStringBuilder, StringColumn};

use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{
    string_argument, unpack_argument, unpack_argument_with_nulls, unsupported_argument,
};

fn check_strings(arg_types: &[DataType]) -> Result<DataType> {
    if let Some(bad) = arg_types.iter().find(|t| !t.is_string()) {
        return Err(Error::type_mismatch("STRING", bad.to_string()));
    }
    Ok(DataType::String.make_nullable())
}

/// Total payload of `columns`, terminators excluded.
fn payload_bytes<'a>(
    function: &str,
    columns: impl IntoIterator<Item = &'a StringColumn>,
) -> Result<usize> {
    columns.into_iter().try_fold(0usize, |acc, c| {
        acc.checked_add(c.payload_bytes()).ok_or_else(|| {
            debug_eprintln!("[functions::string::concat] {} output size overflow", function);
            Error::overflow(format!("{} output size exceeds addressable memory", function))
        })
    })
}

fn is_null_at(nulls: &Option<NullBitmap>, row: usize) -> bool {
    nulls.as_ref().is_some_and(|n| n.is_null(row))
}

/// `concat(s1, s2, ...)`: NULL if any argument is NULL.
#[derive(Debug, Default)]
pub struct Concat;

impl VectorizedFunction for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_strings(arg_types)
    }

    fn use_default_implementation_for_nulls(&self) -> bool {
        false
    }

    fn use_default_implementation_for_constants(&self) -> bool {
        true
    }

    fn execute_impl(
        &self,
        _ctx: &FunctionContext,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
        input_rows_count: usize,
    ) -> Result<()> {
        if let [only] = arguments {
            let column = block.column(*only)?;
            if !column.data_type().is_string() {
                return Err(unsupported_argument(column, self.name()));
            }
            let out = if column.is_nullable() {
                ColumnPtr::clone(column)
            } else {
                ColumnPtr::new(Column::wrap_nullable(column))
            };
            return block.set_column_ptr(result, out);
        }

        let mut null_map = NullBitmap::new_valid(input_rows_count);
        let columns = arguments
            .iter()
            .map(|&pos| unpack_argument(block, pos, &mut null_map))
            .collect::<Result<Vec<_>>>()?;
        let strings = columns
            .iter()
            .map(|c| string_argument(c, self.name()))
            .collect::<Result<Vec<_>>>()?;

        let reserve = payload_bytes(self.name(), strings.iter().copied())?;
        let mut builder = NullableStringBuilder::with_null_map(null_map, reserve);
        for row in 0..input_rows_count {
            if builder.is_current_null() {
                builder.push_empty();
                continue;
            }
            builder
                .values_mut()
                .push_concat(strings.iter().map(|s| s.value(row)));
        }
        block.set_column(result, builder.finish())
    }
}

/// `concat_ws(sep, s1, s2, ...)`: only a NULL separator nulls the row;
/// NULL values among the rest are skipped.
#[derive(Debug, Default)]
pub struct ConcatWs;

impl VectorizedFunction for ConcatWs {
    fn name(&self) -> &str {
        "concat_ws"
    }

    fn arity(&self) -> Arity {
        Arity::AtLeast(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_strings(arg_types)
    }

    fn use_default_implementation_for_nulls(&self) -> bool {
        false
    }

    fn use_default_implementation_for_constants(&self) -> bool {
        true
    }

    fn execute_impl(
        &self,
        _ctx: &FunctionContext,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
        input_rows_count: usize,
    ) -> Result<()> {
        let mut columns = Vec::with_capacity(arguments.len());
        let mut null_maps = Vec::with_capacity(arguments.len());
        for &pos in arguments {
            let (column, nulls) = unpack_argument_with_nulls(block, pos)?;
            columns.push(column);
            null_maps.push(nulls);
        }
        let strings = columns
            .iter()
            .map(|c| string_argument(c, self.name()))
            .collect::<Result<Vec<_>>>()?;

        let (sep, values) = (strings[0], &strings[1..]);
        let value_nulls = &null_maps[1..];
        let sep_nulls = null_maps[0]
            .clone()
            .unwrap_or_else(|| NullBitmap::new_valid(input_rows_count));

        let separators = sep
            .payload_bytes()
            .checked_mul(values.len().saturating_sub(1))
            .ok_or_else(|| Error::overflow("concat_ws output size exceeds addressable memory"))?;
        let reserve = payload_bytes(self.name(), values.iter().copied())?
            .checked_add(separators)
            .ok_or_else(|| Error::overflow("concat_ws output size exceeds addressable memory"))?;

        let mut builder = NullableStringBuilder::with_null_map(sep_nulls, reserve);
        for row in 0..input_rows_count {
            if builder.is_current_null() {
                builder.push_empty();
                continue;
            }
            let parts = values
                .iter()
                .zip(value_nulls)
                .filter(|(_, nulls)| !is_null_at(nulls, row))
                .map(|(s, _)| s.value(row));
            builder.values_mut().push_joined(sep.value(row), parts);
        }
        block.set_column(result, builder.finish())
    }
}
