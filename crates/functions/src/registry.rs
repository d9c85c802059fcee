use std::collections::HashMap;
use std::sync::Arc;

use debug_print::debug_eprintln;
use strand_common::error::{Error, Result};
use strand_storage::Block;

use crate::context::FunctionContext;
use crate::dispatch::execute_function;
use crate::function::VectorizedFunction;

mod string_funcs;

/// Name to implementation lookup. A name may carry several overloads that
/// differ by arity; lookup is case-insensitive.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Vec<Arc<dyn VectorizedFunction>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        string_funcs::register(self);
    }

    /// Adds `func` under its own name, replacing an overload with the same arity.
    pub fn register(&mut self, func: Arc<dyn VectorizedFunction>) {
        let name = func.name().to_lowercase();
        self.register_as(name, func);
    }

    fn register_as(&mut self, name: String, func: Arc<dyn VectorizedFunction>) {
        debug_eprintln!(
            "[functions::registry] register {} ({} arguments)",
            name,
            func.arity().describe()
        );
        let overloads = self.functions.entry(name).or_default();
        overloads.retain(|existing| existing.arity() != func.arity());
        overloads.push(func);
    }

    /// Makes every overload of `target` reachable under `alias` as well.
    pub fn register_alias(&mut self, alias: &str, target: &str) -> Result<()> {
        if alias.is_empty() {
            return Err(Error::invalid_argument("function alias must not be empty"));
        }
        if !self.has_function(target) {
            return Err(Error::invalid_argument(format!(
                "cannot alias unknown function {}",
                target
            )));
        }
        self.add_alias(alias, target);
        Ok(())
    }

    fn add_alias(&mut self, alias: &str, target: &str) {
        let overloads = self
            .functions
            .get(&target.to_lowercase())
            .cloned()
            .unwrap_or_default();
        for func in overloads {
            self.register_as(alias.to_lowercase(), func);
        }
    }

    pub fn get(&self, name: &str, arg_count: usize) -> Result<Arc<dyn VectorizedFunction>> {
        let Some(overloads) = self.functions.get(&name.to_lowercase()) else {
            debug_eprintln!("[functions::registry] no function named {}", name);
            return Err(Error::function_not_found(name));
        };
        if let Some(func) = overloads.iter().find(|f| f.arity().accepts(arg_count)) {
            return Ok(Arc::clone(func));
        }
        let expected = overloads
            .iter()
            .map(|f| f.arity().describe())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(Error::invalid_argument_count(name, expected, arg_count))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Resolves `name` for the given arguments and runs it over every row of `block`.
    pub fn execute(
        &self,
        ctx: &FunctionContext,
        name: &str,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
    ) -> Result<()> {
        let func = self.get(name, arguments.len())?;
        let rows = block.rows();
        execute_function(func.as_ref(), ctx, block, arguments, result, rows)
    }
}
