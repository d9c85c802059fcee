use std::sync::Arc;

use debug_print::debug_eprintln;
use strand_common::error::{Error, Result};
use strand_common::types::DataType;
use strand_storage::{Block, Column, ColumnPtr, NullBitmap};

use crate::context::FunctionContext;
use crate::function::VectorizedFunction;

/// Runs `func` over `block`, writing `input_rows_count` rows to `result`.
///
/// Applies constant folding and default null handling according to the
/// function's policy flags, then checks that the result slot was filled
/// with the right number of rows.
pub fn execute_function(
    func: &dyn VectorizedFunction,
    ctx: &FunctionContext,
    block: &mut Block,
    arguments: &[usize],
    result: usize,
    input_rows_count: usize,
) -> Result<()> {
    let arity = func.arity();
    if !arity.accepts(arguments.len()) {
        return Err(Error::invalid_argument_count(
            func.name(),
            arity.describe(),
            arguments.len(),
        ));
    }
    for &pos in arguments {
        let rows = block.column(pos)?.len();
        if rows != input_rows_count {
            return Err(Error::schema_mismatch(format!(
                "{} argument at position {} has {} rows, expected {}",
                func.name(),
                pos,
                rows,
                input_rows_count
            )));
        }
    }

    if func.use_default_implementation_for_constants() && all_constant(block, arguments)? {
        execute_folded(func, ctx, block, arguments, result, input_rows_count)?;
    } else {
        execute_with_nulls(func, ctx, block, arguments, result, input_rows_count)?;
    }

    let produced = block.column(result).map_err(|_| {
        Error::internal(format!("{} did not write its result column", func.name()))
    })?;
    if produced.len() != input_rows_count {
        return Err(Error::internal(format!(
            "{} produced {} rows, expected {}",
            func.name(),
            produced.len(),
            input_rows_count
        )));
    }
    Ok(())
}

fn all_constant(block: &Block, arguments: &[usize]) -> Result<bool> {
    if arguments.is_empty() {
        return Ok(false);
    }
    for &pos in arguments {
        if !block.column(pos)?.is_const() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn argument_types(block: &Block, arguments: &[usize]) -> Result<Vec<DataType>> {
    arguments
        .iter()
        .map(|&pos| Ok(block.get_by_position(pos)?.data_type.clone()))
        .collect()
}

/// Evaluates once on a one-row block and spreads the value over all rows.
fn execute_folded(
    func: &dyn VectorizedFunction,
    ctx: &FunctionContext,
    block: &mut Block,
    arguments: &[usize],
    result: usize,
    input_rows_count: usize,
) -> Result<()> {
    let mut folded = Block::new();
    let mut positions = Vec::with_capacity(arguments.len());
    for &pos in arguments {
        let entry = block.get_by_position(pos)?;
        let value = match block.column(pos)?.as_ref() {
            Column::Const { value, .. } => value.as_ref().clone(),
            other => other.replicate(0, 1),
        };
        positions.push(folded.insert(entry.name.clone(), value)?);
    }
    let result_entry = block.get_by_position(result)?;
    let slot = folded.insert_result_slot(result_entry.name.clone(), result_entry.data_type.clone());

    execute_with_nulls(func, ctx, &mut folded, &positions, slot, 1)?;

    let value = folded.column(slot)?.as_ref().clone();
    debug_eprintln!(
        "[functions::dispatch] {} folded to a constant over {} rows",
        func.name(),
        input_rows_count
    );
    block.set_column(result, Column::constant(value, input_rows_count)?)
}

fn execute_with_nulls(
    func: &dyn VectorizedFunction,
    ctx: &FunctionContext,
    block: &mut Block,
    arguments: &[usize],
    result: usize,
    input_rows_count: usize,
) -> Result<()> {
    if !func.use_default_implementation_for_nulls() {
        return func.execute_impl(ctx, block, arguments, result, input_rows_count);
    }

    let mut any_nullable = false;
    for &pos in arguments {
        let column = block.column(pos)?;
        if column.is_const_null() {
            let return_type = func.return_type(&argument_types(block, arguments)?)?;
            debug_eprintln!(
                "[functions::dispatch] {} has a constant NULL argument",
                func.name()
            );
            return block.set_column(result, Column::const_null(&return_type, input_rows_count));
        }
        any_nullable |= column.is_nullable();
    }
    if !any_nullable {
        return func.execute_impl(ctx, block, arguments, result, input_rows_count);
    }

    let mut null_map = NullBitmap::new_valid(input_rows_count);
    let mut stripped = Block::new();
    let mut positions = Vec::with_capacity(arguments.len());
    for &pos in arguments {
        let name = block.get_by_position(pos)?.name.clone();
        let column = block.column(pos)?;
        let nested: ColumnPtr = match column.as_ref() {
            Column::Nullable { nested, nulls } => {
                null_map.merge(nulls);
                if nulls.has_nulls() {
                    Arc::new(nested.mask_nulls(nulls))
                } else {
                    Arc::clone(nested)
                }
            }
            Column::Const { value, len } if value.is_nullable() => {
                let (inner, _) = value.unwrap_nullable();
                Arc::new(Column::constant(inner.clone(), *len)?)
            }
            _ => Arc::clone(column),
        };
        positions.push(stripped.insert_ptr(name, nested)?);
    }

    let result_entry = block.get_by_position(result)?;
    let slot = stripped.insert_result_slot(
        result_entry.name.clone(),
        result_entry.data_type.remove_nullable().clone(),
    );
    debug_eprintln!(
        "[functions::dispatch] {} runs on stripped arguments, {} null rows",
        func.name(),
        null_map.count_null()
    );
    func.execute_impl(ctx, &mut stripped, &positions, slot, input_rows_count)?;

    let produced = stripped.column(slot).map_err(|_| {
        Error::internal(format!("{} did not write its result column", func.name()))
    })?;
    let wrapped = wrap_result(produced, null_map)?;
    block.set_column(result, wrapped)
}

/// Applies `nulls` on top of whatever nullability the result already has.
fn wrap_result(column: &ColumnPtr, mut nulls: NullBitmap) -> Result<Column> {
    match column.as_ref() {
        Column::Nullable {
            nested,
            nulls: own,
        } => {
            nulls.merge(own);
            Ok(Column::Nullable {
                nested: Arc::clone(nested),
                nulls,
            })
        }
        Column::Const { .. } => {
            let full = Arc::new(column.convert_to_full_column_if_const().into_owned());
            wrap_result(&full, nulls)
        }
        _ => Ok(Column::Nullable {
            nested: Arc::clone(column),
            nulls,
        }),
    }
}
