//! Testing utilities for strand.

#![allow(dead_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![allow(missing_docs)]

use strand_common::{DataType, Result, Value};
use strand_functions::{FunctionContext, FunctionRegistry};
use strand_storage::{Block, Column};

/// A block with one nullable string column named `s`.
pub fn string_block(values: &[Option<&str>]) -> Block {
    Block::from_columns([("s", Column::nullable_string(values.iter().copied()))])
        .expect("single column block")
}

/// Appends a result slot, runs `name` through a fresh registry and returns
/// the produced column.
pub fn evaluate(name: &str, block: &mut Block, arguments: &[usize]) -> Result<Column> {
    evaluate_with(&FunctionContext::default(), name, block, arguments)
}

pub fn evaluate_with(
    ctx: &FunctionContext,
    name: &str,
    block: &mut Block,
    arguments: &[usize],
) -> Result<Column> {
    let registry = FunctionRegistry::new();
    let result = block.insert_result_slot("result", DataType::String);
    registry.execute(ctx, name, block, arguments, result)?;
    Ok(block.column(result)?.as_ref().clone())
}

/// Row values as optional UTF-8 strings; NULL rows come back as `None`.
pub fn string_values(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|row| match column.get(row).expect("row in range") {
            Value::Null => None,
            Value::String(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            other => panic!("Expected string, got {:?}", other),
        })
        .collect()
}

pub fn assert_string_column(column: &Column, expected: &[Option<&str>]) {
    let actual = string_values(column);
    let expected: Vec<Option<String>> = expected.iter().map(|v| v.map(str::to_string)).collect();
    assert_eq!(
        actual, expected,
        "string column mismatch: actual={:?}, expected={:?}",
        actual, expected
    );
}

pub fn assert_error_contains<T>(result: Result<T>, keywords: &[&str]) {
    match result {
        Ok(_) => panic!("Expected error but got Ok result"),
        Err(e) => {
            let error_msg = e.to_string().to_lowercase();
            let found = keywords
                .iter()
                .any(|keyword| error_msg.contains(&keyword.to_lowercase()));
            assert!(
                found,
                "Error message '{}' does not contain any of the expected keywords: {:?}",
                e, keywords
            );
        }
    }
}
