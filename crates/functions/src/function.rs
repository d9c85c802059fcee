use std::fmt::Debug;

use strand_common::error::Result;
use strand_common::types::DataType;
use strand_storage::Block;

use crate::context::FunctionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::AtLeast(n) => count >= *n,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Arity::Exact(n) => n.to_string(),
            Arity::AtLeast(n) => format!("at least {}", n),
        }
    }
}

/// A string operation evaluated over a whole block at once.
///
/// `execute_impl` reads the columns at `arguments` and writes exactly one
/// column of `input_rows_count` rows to `result`. It may append helper
/// columns to the block. Callers normally go through
/// [`crate::execute_function`], which applies the default null and constant
/// handling selected by the two policy flags.
pub trait VectorizedFunction: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType>;

    /// When true, nullable arguments are stripped before `execute_impl`
    /// and the merged null map is applied to the result afterwards.
    fn use_default_implementation_for_nulls(&self) -> bool {
        true
    }

    /// When true and every argument is constant, the function runs on a
    /// single row and the result is returned as a constant column.
    fn use_default_implementation_for_constants(&self) -> bool {
        false
    }

    fn prepare(&self, _ctx: &FunctionContext) -> Result<()> {
        Ok(())
    }

    fn close(&self, ctx: &mut FunctionContext) -> Result<()> {
        ctx.clear_state();
        Ok(())
    }

    fn execute_impl(
        &self,
        ctx: &FunctionContext,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
        input_rows_count: usize,
    ) -> Result<()>;
}
