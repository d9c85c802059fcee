use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column};

use super::utf8::char_length;
use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{full_argument, string_argument};

fn single_string(name: &str, arg_types: &[DataType]) -> Result<DataType> {
    match arg_types {
        [s] if s.is_string() => Ok(DataType::Int32),
        [other] => Err(Error::type_mismatch("STRING", other.to_string())),
        _ => Err(Error::invalid_argument_count(name, "1", arg_types.len())),
    }
}

fn clamp(len: usize) -> i32 {
    len.min(i32::MAX as usize) as i32
}

/// `length(str)`: byte length.
#[derive(Debug, Default)]
pub struct Length;

impl VectorizedFunction for Length {
    fn name(&self) -> &str {
        "length"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        single_string(self.name(), arg_types)
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
        let column = full_argument(block, arguments[0])?;
        let strings = string_argument(&column, self.name())?;
        let out = Column::int32((0..input_rows_count).map(|row| clamp(strings.value_len(row))));
        block.set_column(result, out)
    }
}

/// `char_length(str)`: number of UTF-8 characters.
#[derive(Debug, Default)]
pub struct CharLength;

impl VectorizedFunction for CharLength {
    fn name(&self) -> &str {
        "char_length"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        single_string(self.name(), arg_types)
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
        let column = full_argument(block, arguments[0])?;
        let strings = string_argument(&column, self.name())?;
        let out = Column::int32(
            (0..input_rows_count).map(|row| clamp(char_length(strings.value(row)))),
        );
        block.set_column(result, out)
    }
}
