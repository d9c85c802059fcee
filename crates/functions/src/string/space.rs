use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column, StringColumn};

use super::repeat::checked_repeat_len;
use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{full_argument, integer_argument};

/// `space(n)`: `n` ASCII spaces; `n <= 0` gives "".
#[derive(Debug, Default)]
pub struct Space;

impl VectorizedFunction for Space {
    fn name(&self) -> &str {
        "space"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        match arg_types {
            [n] if n.is_integer() => Ok(DataType::String),
            [other] => Err(Error::type_mismatch("integer", other.to_string())),
            _ => Err(Error::invalid_argument_count(self.name(), "1", arg_types.len())),
        }
    }

    fn use_default_implementation_for_constants(&self) -> bool {
        true
    }

    fn execute_impl(
        &self,
        ctx: &FunctionContext,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
        input_rows_count: usize,
    ) -> Result<()> {
        let column = full_argument(block, arguments[0])?;
        let counts = integer_argument(&column, self.name())?;
        let limit = ctx.config().max_string_length;

        let mut total = 0usize;
        for &n in counts.iter().take(input_rows_count) {
            total = total
                .checked_add(checked_repeat_len(self.name(), 1, n, limit)?)
                .ok_or_else(|| Error::overflow("space output size exceeds addressable memory"))?;
        }

        let mut out = StringColumn::with_capacity(input_rows_count, total);
        for &n in counts.iter().take(input_rows_count) {
            out.push_repeated(b" ", n.max(0) as usize);
        }
        block.set_column(result, Column::String(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FunctionConfig;

    #[test]
    fn writes_spaces() {
        let mut block = Block::from_columns([("n", Column::int32([3, 0, -1]))]).unwrap();
        let result = block.insert_result_slot("result", DataType::String);
        Space
            .execute_impl(&FunctionContext::default(), &mut block, &[0], result, 3)
            .unwrap();
        let out = block.column(result).unwrap();
        let values: Vec<_> = out.as_string().unwrap().iter().collect();
        assert_eq!(values, vec![&b"   "[..], b"", b""]);
    }

    #[test]
    fn respects_configured_limit() {
        let ctx = FunctionContext::new(FunctionConfig::default().with_max_string_length(2));
        let mut block = Block::from_columns([("n", Column::int32([3]))]).unwrap();
        let result = block.insert_result_slot("result", DataType::String);
        let err = Space.execute_impl(&ctx, &mut block, &[0], result, 1).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)));
    }
}
