use std::sync::Arc;

use strand::{
    Arity, Block, Column, DataType, Error, FunctionContext, FunctionRegistry, NullBitmap, Result,
    VectorizedFunction,
};
use strand_test_utils::{assert_error_contains, assert_string_column};

fn run(
    registry: &FunctionRegistry,
    ctx: &FunctionContext,
    name: &str,
    block: &mut Block,
    arguments: &[usize],
) -> Result<Column> {
    let result = block.insert_result_slot(name, DataType::String);
    registry.execute(ctx, name, block, arguments, result)?;
    Ok(block.column(result)?.as_ref().clone())
}

fn users() -> Block {
    Block::from_columns([
        (
            "first",
            Column::nullable_string([Some("Ada"), Some("Grace"), None, Some("Линус")]),
        ),
        (
            "last",
            Column::nullable_string([Some("Lovelace"), None, Some("Ritchie"), Some("Торвальдс")]),
        ),
        ("sep", Column::const_str(" ", 4)),
        ("n", Column::int32([1, 2, 3, 4])),
    ])
    .unwrap()
}

#[test]
fn test_full_name_pipeline() {
    let registry = FunctionRegistry::new();
    let ctx = FunctionContext::default();
    let mut block = users();

    let joined = run(&registry, &ctx, "concat_ws", &mut block, &[2, 0, 1]).unwrap();
    assert_string_column(
        &joined,
        &[
            Some("Ada Lovelace"),
            Some("Grace"),
            Some("Ritchie"),
            Some("Линус Торвальдс"),
        ],
    );

    let strict = run(&registry, &ctx, "concat", &mut block, &[0, 2, 1]).unwrap();
    assert_string_column(
        &strict,
        &[Some("Ada Lovelace"), None, None, Some("Линус Торвальдс")],
    );
}

#[test]
fn test_initials_use_characters_not_bytes() {
    let registry = FunctionRegistry::new();
    let ctx = FunctionContext::default();
    let mut block = users();

    let initials = run(&registry, &ctx, "left", &mut block, &[0, 3]).unwrap();
    assert_string_column(&initials, &[Some("A"), Some("Gr"), None, Some("Лину")]);

    let tails = run(&registry, &ctx, "right", &mut block, &[1, 3]).unwrap();
    assert_string_column(&tails, &[Some("e"), None, Some("hie"), Some("льдс")]);
}

#[test]
fn test_null_or_empty_never_returns_null() {
    let registry = FunctionRegistry::new();
    let ctx = FunctionContext::default();
    let mut block = users();

    let out = run(&registry, &ctx, "null_or_empty", &mut block, &[1]).unwrap();
    assert!(!out.is_nullable());
    assert_eq!(out.as_uint8().unwrap(), &[0, 1, 0, 0]);
}

#[test]
fn test_repeat_with_nullable_count() {
    let registry = FunctionRegistry::new();
    let ctx = FunctionContext::default();
    let n = Column::nullable(Column::int32([2, 2]), NullBitmap::from_bools(&[false, true]))
        .unwrap();
    let mut block = Block::from_columns([("s", Column::string(["ab", "cd"])), ("n", n)]).unwrap();

    let out = run(&registry, &ctx, "repeat", &mut block, &[0, 1]).unwrap();
    assert_string_column(&out, &[Some("abab"), None]);
}

#[test]
fn test_arity_errors() {
    let registry = FunctionRegistry::new();
    let ctx = FunctionContext::default();

    let mut block = users();
    assert_error_contains(
        run(&registry, &ctx, "concat_ws", &mut block, &[2]),
        &["concat_ws expects at least 2 arguments, got 1"],
    );
    let mut block = users();
    assert_error_contains(
        run(&registry, &ctx, "left", &mut block, &[0]),
        &["left expects 2 arguments"],
    );
}

/// Counts occurrences of a needle fixed at prepare time.
#[derive(Debug)]
struct CountNeedle {
    needle: &'static str,
}

impl VectorizedFunction for CountNeedle {
    fn name(&self) -> &str {
        "count_needle"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::Int32)
    }

    fn prepare(&self, ctx: &FunctionContext) -> Result<()> {
        ctx.set_state(self.needle.as_bytes().to_vec())
    }

    fn execute_impl(
        &self,
        ctx: &FunctionContext,
        block: &mut Block,
        arguments: &[usize],
        result: usize,
        input_rows_count: usize,
    ) -> Result<()> {
        let needle = ctx
            .state::<Vec<u8>>()
            .ok_or_else(|| Error::internal("count_needle used before prepare"))?;
        let strings = block.column(arguments[0])?.as_string()?.clone();
        let counts = (0..input_rows_count).map(|row| {
            strings
                .value(row)
                .windows(needle.len())
                .filter(|w| *w == needle.as_slice())
                .count() as i32
        });
        block.set_column(result, Column::int32(counts))
    }
}

#[test]
fn test_prepared_state_lives_until_close() {
    let mut registry = FunctionRegistry::new();
    registry.register(Arc::new(CountNeedle { needle: "an" }));
    let func = registry.get("count_needle", 1).unwrap();
    let mut ctx = FunctionContext::default();

    let mut block = Block::from_columns([("s", Column::string(["banana", "xyz"]))]).unwrap();
    assert_error_contains(
        run(&registry, &ctx, "count_needle", &mut block.clone(), &[0]),
        &["before prepare"],
    );

    func.prepare(&ctx).unwrap();
    let out = run(&registry, &ctx, "count_needle", &mut block, &[0]).unwrap();
    assert_eq!(out.as_int32().unwrap(), &[2, 0]);

    func.close(&mut ctx).unwrap();
    assert!(ctx.state::<Vec<u8>>().is_none());
}
