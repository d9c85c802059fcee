use std::sync::Arc;

use super::FunctionRegistry;
use crate::string::{
    CharLength, Concat, ConcatWs, EndsWith, Left, Length, NullOrEmpty, Repeat, Right, Space,
    StartsWith, Substring, SubstringFrom,
};

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Arc::new(Substring));
    registry.register(Arc::new(SubstringFrom));
    registry.register(Arc::new(Left));
    registry.register(Arc::new(Right));
    registry.register(Arc::new(NullOrEmpty));
    registry.register(Arc::new(Concat));
    registry.register(Arc::new(ConcatWs));
    registry.register(Arc::new(Repeat));
    registry.register(Arc::new(Length));
    registry.register(Arc::new(CharLength));
    registry.register(Arc::new(StartsWith));
    registry.register(Arc::new(EndsWith));
    registry.register(Arc::new(Space));

    registry.add_alias("substr", "substring");
    registry.add_alias("character_length", "char_length");
}
