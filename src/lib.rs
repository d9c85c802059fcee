//! strand - vectorized string functions over packed columnar batches.
//!
//! Strings are stored as a byte arena plus cumulative offsets, with a
//! separate null bitmap overlay. Functions run over a whole [`Block`] at a
//! time and write one result column back into it.
//!
//! # Architecture
//!
//! ```text
//! Block → FunctionRegistry::get → execute_function → execute_impl → Block
//!              (const folding, null stripping)
//! ```
//!
//! # Example
//!
//! ```rust
//! use strand::{Block, Column, DataType, FunctionContext, FunctionRegistry};
//!
//! let registry = FunctionRegistry::new();
//! let mut block = Block::from_columns([
//!     ("s", Column::string(["hello", "日本語"])),
//!     ("pos", Column::const_int32(2, 2)),
//!     ("len", Column::const_int32(2, 2)),
//! ])
//! .unwrap();
//! let result = block.insert_result_slot("substring", DataType::String.make_nullable());
//!
//! registry
//!     .execute(&FunctionContext::default(), "substring", &mut block, &[0, 1, 2], result)
//!     .unwrap();
//!
//! let column = block.column(result).unwrap();
//! assert_eq!(column.get(1).unwrap().as_str(), Some("本語"));
//! ```

pub use strand_common::error::{Error, Result};
pub use strand_common::types::{DataType, Value};
pub use strand_functions::{
    Arity, FunctionConfig, FunctionContext, FunctionRegistry, VectorizedFunction,
    execute_function,
};
pub use strand_storage::{
    Block, Column, ColumnPtr, ColumnWithTypeAndName, NullBitmap, NullableStringBuilder,
    StringColumn,
};
