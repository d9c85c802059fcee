//! String function implementations.

mod concat;
mod length;
mod null_or_empty;
mod predicates;
mod repeat;
mod space;
mod substring;
pub mod utf8;

pub use concat::{Concat, ConcatWs};
pub use length::{CharLength, Length};
pub use null_or_empty::NullOrEmpty;
pub use predicates::{EndsWith, StartsWith};
pub use repeat::Repeat;
pub use space::Space;
pub use substring::{Left, Right, Substring, SubstringFrom};
