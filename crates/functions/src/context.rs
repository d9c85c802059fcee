use std::any::Any;
use std::sync::{Arc, OnceLock};

use strand_common::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    /// Largest single value a function may produce, in bytes.
    pub max_string_length: usize,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            max_string_length: i32::MAX as usize,
        }
    }
}

impl FunctionConfig {
    pub fn with_max_string_length(mut self, bytes: usize) -> Self {
        self.max_string_length = bytes.min(i32::MAX as usize);
        self
    }
}

/// Per-fragment execution context.
///
/// Holds the configuration and an optional piece of state a function
/// derives in `prepare`. The state is written once and read-only afterwards.
#[derive(Debug, Default)]
pub struct FunctionContext {
    config: FunctionConfig,
    state: OnceLock<Arc<dyn Any + Send + Sync>>,
}

impl FunctionContext {
    pub fn new(config: FunctionConfig) -> Self {
        Self {
            config,
            state: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    pub fn set_state<T: Any + Send + Sync>(&self, state: T) -> Result<()> {
        self.state
            .set(Arc::new(state))
            .map_err(|_| Error::internal("function state already prepared"))
    }

    pub fn state<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.state.get().and_then(|s| s.downcast_ref::<T>())
    }

    pub fn clear_state(&mut self) {
        self.state = OnceLock::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_write_once() {
        let mut ctx = FunctionContext::default();
        ctx.set_state(String::from("pattern")).unwrap();
        assert!(ctx.set_state(String::from("again")).is_err());
        assert_eq!(ctx.state::<String>().map(String::as_str), Some("pattern"));
        assert!(ctx.state::<u32>().is_none());

        ctx.clear_state();
        assert!(ctx.state::<String>().is_none());
    }

    #[test]
    fn max_string_length_is_capped() {
        let config = FunctionConfig::default().with_max_string_length(usize::MAX);
        assert_eq!(config.max_string_length, i32::MAX as usize);
    }
}
