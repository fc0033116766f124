//! Resolution behavior across the public API

use sigforge_types::{
    Builtin, LoadedModules, MissReason, Position, Resolver, SymbolTable, TableVocabulary, TypeExpr,
    Value, Vocabulary, MAX_TUPLE_ARITY,
};

fn core_table() -> SymbolTable {
    let core = TableVocabulary::new("core")
        .class("core.Object")
        .class("core.Object.Kind")
        .constant("core.Object.Kind.Plain")
        .constant("core.Object.Kind.Fancy")
        .token("ObjectList", Value::Type(TypeExpr::list(TypeExpr::class("core.Object"))));
    let mut table = SymbolTable::with_vocabularies(vec![Box::new(core) as Box<dyn Vocabulary>]);
    let host = LoadedModules::from_iter(["core"]);
    assert_eq!(table.refresh(&host), 1);
    table
}

#[test]
fn test_unresolvable_token_is_opaque_and_memoized() {
    let mut table = core_table();

    let first = Resolver::new(&mut table).resolve_type("Foo.Bar::Baz", Some("core.Object"));
    assert_eq!(first, Value::Opaque("Foo.Bar::Baz".into()));
    let runs = table.stats().heuristic_runs;
    assert_eq!(runs, 1);

    let second = Resolver::new(&mut table).resolve_type("Foo.Bar::Baz", Some("core.Object"));
    assert_eq!(second, first);
    assert_eq!(table.stats().heuristic_runs, runs);

    let unresolved = table.take_unresolved();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].token, "Foo.Bar::Baz");
    assert_eq!(unresolved[0].reason, MissReason::UnknownToken);
}

#[test]
fn test_resolution_is_idempotent() {
    let mut table = core_table();
    let token = "std.map[Kind, std.vector[core.Object]]";

    let first = Resolver::new(&mut table).resolve_type(token, Some("core.Object"));
    let stats = table.stats();
    let second = Resolver::new(&mut table).resolve_type(token, Some("core.Object"));

    assert_eq!(first, second);
    assert_eq!(first.to_string(), "Dict[core.Object.Kind, List[core.Object]]");
    assert_eq!(table.stats().heuristic_runs, stats.heuristic_runs);
    assert_eq!(table.stats().memoized, stats.memoized);
    assert_eq!(table.stats().hits, stats.hits + 1);
}

#[test]
fn test_composite_memoized_unwidened() {
    let mut table = core_table();
    let annotation = Resolver::new(&mut table).resolve_annotation(
        "std.vector[int]",
        None,
        Position::Argument,
    );
    assert_eq!(annotation.to_string(), "Sequence[int]");
    assert_eq!(table.lookup("std.vector[int]"), Some(Value::ArrayLike(TypeExpr::Builtin(Builtin::Int))));

    let annotation = Resolver::new(&mut table).resolve_annotation(
        "std.vector[int]",
        None,
        Position::Return,
    );
    assert_eq!(annotation.to_string(), "List[int]");
}

#[test]
fn test_default_qualified_by_parameter_type() {
    let mut table = core_table();
    let mut resolver = Resolver::new(&mut table);
    assert_eq!(
        resolver.resolve_value("Kind.Fancy", Some("core.Object.Kind")),
        Value::Constant("core.Object.Kind.Fancy".into())
    );
    assert_eq!(
        resolver.resolve_value("Plain", Some("core.Object.Kind")),
        Value::Constant("core.Object.Kind.Plain".into())
    );
}

#[test]
fn test_flags_and_instances() {
    let mut table = core_table();
    let mut resolver = Resolver::new(&mut table);
    assert!(matches!(
        resolver.resolve_value(
            "core.Object.Kind.Plain | core.Object.Kind.Fancy",
            Some("core.Object.Kind")
        ),
        Value::Sentinel(_)
    ));
    assert!(matches!(
        resolver.resolve_value("core.Object(1)", Some("core.Object")),
        Value::Sentinel(_)
    ));
}

#[test]
fn test_vocabulary_token_before_module_loaded() {
    let core = TableVocabulary::new("core")
        .token("ObjectList", Value::Type(TypeExpr::list(TypeExpr::class("core.Object"))));
    let mut table = SymbolTable::with_vocabularies(vec![Box::new(core) as Box<dyn Vocabulary>]);

    assert!(Resolver::new(&mut table).resolve_type("ObjectList", None).is_opaque());
}

#[test]
fn test_fixed_arrays_expand_up_to_limit() {
    let mut table = SymbolTable::new();
    let mut resolver = Resolver::new(&mut table);

    assert_eq!(
        resolver.resolve_annotation("int[3]", None, Position::Argument).to_string(),
        "Tuple[int, int, int]"
    );
    let at_limit = format!("int[{}]", MAX_TUPLE_ARITY);
    assert!(matches!(
        resolver.resolve_type(&at_limit, None),
        Value::Type(TypeExpr::Generic { ref args, .. }) if args.len() == MAX_TUPLE_ARITY
    ));

    assert_eq!(
        resolver.resolve_annotation("int[100000000000]", None, Position::Argument).to_string(),
        "Sequence[int]"
    );
    assert_eq!(
        resolver.resolve_annotation("int[100000000000]", None, Position::Return).to_string(),
        "List[int]"
    );
}

#[test]
fn test_huge_fixed_array_does_not_allocate() {
    let mut table = SymbolTable::new();
    let value = Resolver::new(&mut table).resolve_type("int[18446744073709551615]", None);
    assert!(
        matches!(value, Value::ArrayLike(_) | Value::Opaque(_)),
        "got {:?}",
        value
    );
}
