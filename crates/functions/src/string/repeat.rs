use debug_print::debug_eprintln;
use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column, StringColumn};

use crate::context::FunctionContext;
use crate::function::{Arity, VectorizedFunction};
use crate::normalize::{full_argument, integer_argument, string_argument};

/// Output size of `times` copies of `size` bytes, rejected before any
/// allocation if it would exceed `limit`.
pub(crate) fn checked_repeat_len(
    function: &str,
    size: usize,
    times: i32,
    limit: usize,
) -> Result<usize> {
    let times = times.max(0) as usize;
    match size.checked_mul(times) {
        Some(total) if total <= limit => Ok(total),
        _ => {
            debug_eprintln!(
                "[functions::string::repeat] {} rejected: {} bytes x {} over limit {}",
                function,
                size,
                times,
                limit
            );
            Err(Error::overflow(format!(
                "{} result of {} x {} bytes exceeds the {} byte limit",
                function, times, size, limit
            )))
        }
    }
}

/// `repeat(str, n)`: `str` written `n` times; `n <= 0` gives "".
#[derive(Debug, Default)]
pub struct Repeat;

impl VectorizedFunction for Repeat {
    fn name(&self) -> &str {
        "repeat"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        match arg_types {
            [s, n] if s.is_string() && n.is_integer() => Ok(DataType::String),
            [s, n] => Err(Error::type_mismatch(
                "(STRING, integer)",
                format!("({}, {})", s, n),
            )),
            _ => Err(Error::invalid_argument_count(
                self.name(),
                self.arity().describe(),
                arg_types.len(),
            )),
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
        let str_col = full_argument(block, arguments[0])?;
        let n_col = full_argument(block, arguments[1])?;
        let unsupported = || Error::execution(self.name(), "unsupported argument type for repeat");
        let strings = string_argument(&str_col, self.name()).map_err(|_| unsupported())?;
        let repeats = integer_argument(&n_col, self.name()).map_err(|_| unsupported())?;

        let limit = ctx.config().max_string_length;
        let mut total = 0usize;
        for row in 0..input_rows_count {
            let len = checked_repeat_len(self.name(), strings.value_len(row), repeats[row], limit)?;
            total = total
                .checked_add(len)
                .ok_or_else(|| Error::overflow("repeat output size exceeds addressable memory"))?;
        }

        let mut out = StringColumn::with_capacity(input_rows_count, total);
        for row in 0..input_rows_count {
            out.push_repeated(strings.value(row), repeats[row].max(0) as usize);
        }
        block.set_column(result, Column::String(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FunctionConfig;

    fn run(ctx: &FunctionContext, mut block: Block) -> Result<Column> {
        let rows = block.rows();
        let result = block.insert_result_slot("result", DataType::String);
        Repeat.execute_impl(ctx, &mut block, &[0, 1], result, rows)?;
        Ok(block.column(result)?.as_ref().clone())
    }

    #[test]
    fn repeats_each_row() {
        let block = Block::from_columns([
            ("s", Column::string(["ab", "x", "x", ""])),
            ("n", Column::int32([3, 0, -2, 5])),
        ])
        .unwrap();
        let out = run(&FunctionContext::default(), block).unwrap();
        let values: Vec<_> = out.as_string().unwrap().iter().collect();
        assert_eq!(values, vec![&b"ababab"[..], b"", b"", b""]);
    }

    #[test]
    fn overflow_is_rejected_before_allocation() {
        let block = Block::from_columns([
            ("s", Column::string(["abcd"])),
            ("n", Column::int32([i32::MAX])),
        ])
        .unwrap();
        let err = run(&FunctionContext::default(), block).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)));
    }

    #[test]
    fn configured_limit_applies() {
        let ctx = FunctionContext::new(FunctionConfig::default().with_max_string_length(8));
        let block = Block::from_columns([
            ("s", Column::string(["abc", "ab"])),
            ("n", Column::int32([2, 4])),
        ])
        .unwrap();
        assert!(run(&ctx, block.clone()).is_ok());

        let block = Block::from_columns([
            ("s", Column::string(["abc"])),
            ("n", Column::int32([3])),
        ])
        .unwrap();
        assert!(matches!(run(&ctx, block), Err(Error::Overflow(_))));
    }

    #[test]
    fn non_integer_count_is_an_execution_error() {
        let block = Block::from_columns([
            ("s", Column::string(["ab"])),
            ("n", Column::string(["3"])),
        ])
        .unwrap();
        let err = run(&FunctionContext::default(), block).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Execution error in repeat: unsupported argument type for repeat"
        );
    }
}
