use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column};

use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{full_argument, string_argument};

fn execute_predicate(
    name: &str,
    block: &mut Block,
    arguments: &[usize],
    result: usize,
    input_rows_count: usize,
    matches: fn(&[u8], &[u8]) -> bool,
) -> Result<()> {
    let haystack = full_argument(block, arguments[0])?;
    let needle = full_argument(block, arguments[1])?;
    let haystack = string_argument(&haystack, name)?;
    let needle = string_argument(&needle, name)?;
    let out = Column::uint8(
        (0..input_rows_count).map(|row| matches(haystack.value(row), needle.value(row)) as u8),
    );
    block.set_column(result, out)
}

fn two_strings(arg_types: &[DataType]) -> Result<DataType> {
    match arg_types.iter().find(|t| !t.is_string()) {
        Some(bad) => Err(Error::type_mismatch("STRING", bad.to_string())),
        None => Ok(DataType::UInt8),
    }
}

#[derive(Debug, Default)]
pub struct StartsWith;

impl VectorizedFunction for StartsWith {
    fn name(&self) -> &str {
        "starts_with"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        two_strings(arg_types)
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
        execute_predicate(
            self.name(),
            block,
            arguments,
            result,
            input_rows_count,
            |s, prefix| s.starts_with(prefix),
        )
    }
}

#[derive(Debug, Default)]
pub struct EndsWith;

impl VectorizedFunction for EndsWith {
    fn name(&self) -> &str {
        "ends_with"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        two_strings(arg_types)
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
        execute_predicate(
            self.name(),
            block,
            arguments,
            result,
            input_rows_count,
            |s, suffix| s.ends_with(suffix),
        )
    }
}
