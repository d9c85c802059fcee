use strand_common::error::Result;
use strand_common::types::DataType;
use strand_storage::{Block, Column};

use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{string_argument, unpack_argument_with_nulls};

/// `null_or_empty(str)`: 1 for NULL or zero-length rows, else 0. Never NULL.
#[derive(Debug, Default)]
pub struct NullOrEmpty;

impl VectorizedFunction for NullOrEmpty {
    fn name(&self) -> &str {
        "null_or_empty"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::UInt8)
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
        let (column, nulls) = unpack_argument_with_nulls(block, arguments[0])?;
        let strings = string_argument(&column, self.name())?;
        let flags = (0..input_rows_count).map(|row| {
            let is_null = nulls.as_ref().is_some_and(|n| n.is_null(row));
            (is_null || strings.value_len(row) == 0) as u8
        });
        let out = Column::uint8(flags);
        block.set_column(result, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_rows_are_flagged() {
        let mut block = Block::from_columns([(
            "s",
            Column::nullable_string([Some("a"), Some(""), None, Some(" ")]),
        )])
        .unwrap();
        let result = block.insert_result_slot("result", DataType::UInt8);
        NullOrEmpty
            .execute_impl(&FunctionContext::default(), &mut block, &[0], result, 4)
            .unwrap();
        let out = block.column(result).unwrap();
        assert_eq!(out.as_uint8().unwrap(), &[0, 1, 1, 0]);
    }
}
