use std::sync::Arc;

use debug_print::debug_eprintln;
use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column, NullBitmap, NullableStringBuilder};

use super::utf8::{SubstringSpan, char_length, resolve_substring};
use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{
    integer_argument, string_argument, unpack_argument, unpack_argument_with_nulls,
};

/// Shared body of `substring`, `left` and `right`: `arguments` are the
/// positions of (str, pos, len). The result is always nullable.
pub(crate) fn substring_execute(
    block: &mut Block,
    arguments: [usize; 3],
    result: usize,
    input_rows_count: usize,
) -> Result<()> {
    let mut null_map = NullBitmap::new_valid(input_rows_count);
    let str_col = unpack_argument(block, arguments[0], &mut null_map)?;
    let pos_col = unpack_argument(block, arguments[1], &mut null_map)?;
    let len_col = unpack_argument(block, arguments[2], &mut null_map)?;

    let strings = string_argument(&str_col, "substring")?;
    let starts = integer_argument(&pos_col, "substring")?;
    let lens = integer_argument(&len_col, "substring")?;

    let mut builder = NullableStringBuilder::with_null_map(null_map, strings.payload_bytes());
    let mut index = Vec::new();
    for row in 0..input_rows_count {
        if builder.is_current_null() {
            builder.push_empty();
            continue;
        }
        let raw = strings.value(row);
        match resolve_substring(raw, starts[row], lens[row], &mut index) {
            SubstringSpan::Null => builder.push_null(),
            SubstringSpan::Empty => builder.push_empty(),
            SubstringSpan::Bytes { start, len } => builder.push_value(&raw[start..start + len]),
        }
    }
    block.set_column(result, builder.finish())
}

fn expect_string_and_integers(name: &str, arg_types: &[DataType]) -> Result<DataType> {
    if let Some(first) = arg_types.first() {
        if !first.is_string() {
            return Err(Error::type_mismatch("STRING", first.to_string()));
        }
    }
    if let Some(bad) = arg_types.iter().skip(1).find(|t| !t.is_integer()) {
        return Err(Error::type_mismatch(
            format!("integer argument for {}", name),
            bad.to_string(),
        ));
    }
    Ok(DataType::String.make_nullable())
}

#[derive(Debug, Default)]
pub struct Substring;

impl VectorizedFunction for Substring {
    fn name(&self) -> &str {
        "substring"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_string_and_integers(self.name(), arg_types)
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
        substring_execute(
            block,
            [arguments[0], arguments[1], arguments[2]],
            result,
            input_rows_count,
        )
    }
}

/// `substring(str, pos)`: everything from `pos` to the end of the row.
#[derive(Debug, Default)]
pub struct SubstringFrom;

impl VectorizedFunction for SubstringFrom {
    fn name(&self) -> &str {
        "substring"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_string_and_integers(self.name(), arg_types)
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
        let len = block.insert("len", Column::const_int32(i32::MAX, input_rows_count))?;
        substring_execute(block, [arguments[0], arguments[1], len], result, input_rows_count)
    }
}

/// `left(str, n)` is `substring(str, 1, n)`.
#[derive(Debug, Default)]
pub struct Left;

impl VectorizedFunction for Left {
    fn name(&self) -> &str {
        "left"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_string_and_integers(self.name(), arg_types)
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
        let pos = block.insert("pos", Column::const_int32(1, input_rows_count))?;
        substring_execute(block, [arguments[0], pos, arguments[1]], result, input_rows_count)
    }
}

/// `right(str, n)` is `substring(str, max(-n, -char_count), char_count)`.
#[derive(Debug, Default)]
pub struct Right;

impl VectorizedFunction for Right {
    fn name(&self) -> &str {
        "right"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        expect_string_and_integers(self.name(), arg_types)
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
        let (str_col, _) = unpack_argument_with_nulls(block, arguments[0])?;
        let (n_col, n_nulls) = unpack_argument_with_nulls(block, arguments[1])?;
        let strings = string_argument(&str_col, "right")?;
        let counts = integer_argument(&n_col, "right")?;

        let mut index = Vec::with_capacity(input_rows_count);
        let mut strlen = Vec::with_capacity(input_rows_count);
        for (row, &n) in counts.iter().enumerate().take(input_rows_count) {
            let chars = char_length(strings.value(row)).min(i32::MAX as usize) as i32;
            index.push(n.saturating_neg().max(-chars));
            strlen.push(chars);
        }

        // A NULL count must still null the row once `n` is rewritten.
        let index = match n_nulls {
            Some(nulls) => Column::Nullable {
                nested: Arc::new(Column::int32(index)),
                nulls,
            },
            None => Column::int32(index),
        };
        let pos = block.insert("index", index)?;
        let len = block.insert("strlen", Column::int32(strlen))?;
        debug_eprintln!(
            "[functions::string::substring] right rewritten to columns {} and {}",
            pos,
            len
        );
        substring_execute(block, [arguments[0], pos, len], result, input_rows_count)
    }
}
