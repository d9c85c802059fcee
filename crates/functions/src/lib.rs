//! Vectorized string functions over packed columnar batches.

#![allow(clippy::needless_range_loop)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![allow(missing_docs)]

pub mod context;
pub mod dispatch;
pub mod function;
pub mod normalize;
pub mod registry;
pub mod string;

pub use context::{FunctionConfig, FunctionContext};
pub use dispatch::execute_function;
pub use function::{Arity, VectorizedFunction};
pub use registry::FunctionRegistry;
