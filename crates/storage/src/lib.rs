//! Columnar storage for the strand string engine: null bitmaps, the packed
//! string buffer, typed columns and row batches.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![allow(missing_docs)]

pub mod bitmap;
pub mod block;
pub mod builder;
pub mod column;
pub mod string_column;

pub use bitmap::NullBitmap;
pub use block::{Block, ColumnWithTypeAndName};
pub use builder::NullableStringBuilder;
pub use column::{A64, Column, ColumnPtr};
pub use string_column::StringColumn;
