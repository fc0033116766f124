//! End-to-end behavior of the signature engine

use sigforge_engine::{EngineConfig, FunctionKind, LayoutConfig, SignatureEngine, SignatureSet};
use sigforge_parser::{parse_line, ParamKind};
use sigforge_types::{LoadedModules, TableVocabulary, Vocabulary};

fn engine_with(owner: &str, block: &str) -> SignatureEngine {
    let mut engine = SignatureEngine::new();
    engine.add_descriptors(owner, block);
    engine
}

fn rendered(engine: &mut SignatureEngine, owner: &str, member: &str, layout: LayoutConfig) -> String {
    engine
        .signature(owner, member, FunctionKind::Function, &layout)
        .unwrap_or_else(|| panic!("no signature for {}.{}", owner, member))
        .to_string()
}

#[test]
fn test_plain_function_under_full_and_existence() {
    let mut engine = engine_with("core", "sumThree(a0:int,a1:int,a2:int)->int");

    assert_eq!(
        rendered(&mut engine, "core", "sumThree", LayoutConfig::full()),
        "(a0: int, a1: int, a2: int) -> int"
    );
    assert_eq!(
        rendered(&mut engine, "core", "sumThree", LayoutConfig::existence()),
        "(int, int, int)"
    );
}

#[test]
fn test_distinct_overloads_survive_merge() {
    let mut engine = engine_with(
        "core",
        "1:power(base:int=2,exponent:int=1)\n0:power(base:int=1,exponent:int=0)",
    );

    let set = engine
        .signature("core", "power", FunctionKind::Function, &LayoutConfig::full())
        .unwrap();
    assert!(set.is_overloaded());
    assert_eq!(set.len(), 2);

    let bags = engine.property_bags("core", "power").unwrap();
    let last = bags.len() - 1;
    assert_eq!(bags[last].multi_index, Some(0));
    let SignatureSet::Overloads(all) = set else {
        panic!("expected overloads");
    };
    assert_eq!(all[last].to_string(), "(base: int = 1, exponent: int = 0)");
}

#[test]
fn test_identical_overloads_collapse() {
    let mut engine = engine_with("core", "1:size(x:int)->int\n0:size(x:int)->int");
    let set = engine
        .signature("core", "size", FunctionKind::Function, &LayoutConfig::full())
        .unwrap();
    assert!(matches!(set, SignatureSet::Single(_)));
    assert_eq!(engine.property_bags("core", "size").unwrap()[0].multi_index, None);
}

#[test]
fn test_result_variable_becomes_part_of_return() {
    let mut engine = engine_with("core", "checked(value:int*,flags:int)->bool");

    assert_eq!(
        rendered(&mut engine, "core", "checked", LayoutConfig::full()),
        "(flags: int) -> Tuple[int, bool]"
    );
    let bag = &engine.property_bags("core", "checked").unwrap()[0];
    assert_eq!(bag.param_names().collect::<Vec<_>>(), vec!["flags"]);
    assert_eq!(bag.promoted, vec!["value"]);
}

#[test]
fn test_arguments_are_params_plus_promoted() {
    let lines = [
        "a(x:int,ok:bool*)->int",
        "b(x:int,y:double=1.5,arg_1:...,options:...)",
        "c(first:int*,second:double*)",
        "d()",
    ];
    let mut engine = engine_with("core", &lines.join("\n"));

    for line in lines {
        let parsed = parse_line(line).unwrap();
        let bag = &engine.property_bags("core", parsed.short_name()).unwrap()[0];
        assert_eq!(
            parsed.arguments.len(),
            bag.params.len() + bag.promoted.len(),
            "argument count mismatch for {}",
            line
        );
    }
}

#[test]
fn test_kinds_never_decrease() {
    let mut engine = engine_with(
        "core",
        "f(a:int,/,b:int,arg_1:...,*,c:int=0,options:...)\ng(a:int,*,b:int)",
    );
    for member in engine.members("core") {
        for bag in engine.property_bags("core", &member).unwrap() {
            let kinds: Vec<ParamKind> = bag.params.iter().map(|p| p.kind).collect();
            assert!(
                kinds.windows(2).all(|pair| pair[0] <= pair[1]),
                "kinds out of order in {}: {:?}",
                member,
                kinds
            );
        }
    }
}

#[test]
fn test_kind_regression_skips_only_that_line() {
    let mut engine = engine_with(
        "core",
        "1:apply(arg_1:...,x:int)\n0:apply(x:int)\nwidth()->int",
    );

    assert_eq!(engine.members("core"), vec!["apply", "width"]);
    assert_eq!(
        rendered(&mut engine, "core", "apply", LayoutConfig::full()),
        "(x: int)"
    );

    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code().map(|code| code.0), Some("E2001"));
    assert_eq!(engine.diagnostics().error_count(), 1);
}

#[test]
fn test_grammar_error_skips_only_that_line() {
    let mut engine = engine_with("core", "width()->int\nheight(->int\ndepth()->int");
    assert_eq!(engine.members("core"), vec!["depth", "width"]);
    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].code().is_some_and(|code| code.0.starts_with("E1")));
}

#[test]
fn test_layouts_are_independent() {
    let mut engine = engine_with(
        "core.Object",
        "scale(x:double,/,factor:double=1.0,*,clamp:bool=false)->double",
    );
    let render = |engine: &mut SignatureEngine, layout: LayoutConfig| {
        engine
            .signature("core.Object", "scale", FunctionKind::Method, &layout)
            .unwrap()
            .to_string()
    };

    let existence = render(&mut engine, LayoutConfig::existence());
    let full = render(&mut engine, LayoutConfig::full());
    let stub = render(&mut engine, LayoutConfig::hinting_stub());
    let typeerror = render(&mut engine, LayoutConfig::error_message());

    assert_eq!(existence, "(float, /, float, *, bool)");
    assert_eq!(
        full,
        "(self, x: float, /, factor: float = 1.0, *, clamp: bool = False) -> float"
    );
    assert_eq!(
        stub,
        "(self, x: float, /, factor: float = ..., *, clamp: bool = ...) -> float"
    );
    assert_eq!(typeerror, "(float, /, float, *, bool)");

    // asking again in the first layout gives the same answer
    assert_eq!(render(&mut engine, LayoutConfig::existence()), existence);
}

#[test]
fn test_rendering_parses_back() {
    let lines = [
        "scale(x:double,/,factor:double=1.0,*,clamp:bool=false)->double",
        "gather(a:int,arg_1:...,options:...)",
        "names(items:std.vector[std.string])->std.vector[std.string]",
    ];
    let mut engine = engine_with("core", &lines.join("\n"));

    for line in lines {
        let original = parse_line(line).unwrap();
        let name = original.short_name().to_string();
        let set = engine
            .signature("core", &name, FunctionKind::Function, &LayoutConfig::full())
            .unwrap();
        for signature in &set {
            let text = signature.to_descriptor(&name);
            let reparsed = parse_line(&text).unwrap_or_else(|err| panic!("{}: {}", text, err));
            let shape = |d: &sigforge_parser::ParsedCallDescriptor| {
                d.arguments
                    .iter()
                    .map(|a| (a.name.clone(), a.kind))
                    .collect::<Vec<_>>()
            };
            assert_eq!(shape(&reparsed), shape(&original), "round trip of {}", line);
        }
    }
}

#[test]
fn test_array_like_widens_by_position() {
    let mut engine = engine_with("core", "names(items:std.vector[std.string])->std.vector[std.string]");
    assert_eq!(
        rendered(&mut engine, "core", "names", LayoutConfig::full()),
        "(items: Sequence[str]) -> List[str]"
    );
}

#[test]
fn test_null_default_makes_annotation_optional() {
    let core = TableVocabulary::new("core").class("core.Object");
    let mut engine = SignatureEngine::with_vocabularies(
        vec![Box::new(core) as Box<dyn Vocabulary>],
        EngineConfig::default(),
    );
    assert_eq!(engine.refresh(&LoadedModules::from_iter(["core"])), 1);
    engine.add_descriptors("core.Object", "child(name:str,parent:core.Object=None,depth:int=0)->int");

    assert_eq!(
        rendered(&mut engine, "core.Object", "child", LayoutConfig::full()),
        "(name: str, parent: Optional[core.Object] = None, depth: int = 0) -> int"
    );
    assert!(engine.diagnostics().is_empty());
}

#[test]
fn test_unresolved_token_degrades_to_opaque() {
    let mut engine = engine_with("core", "paint(device:Foo.Bar::Baz)->int");
    assert_eq!(
        rendered(&mut engine, "core", "paint", LayoutConfig::full()),
        "(device: 'Foo.Bar::Baz') -> int"
    );

    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code().map(|code| code.0), Some("W3001"));
    assert_eq!(engine.diagnostics().error_count(), 0);

    let json: serde_json::Value = serde_json::from_str(&engine.diagnostics().to_json().unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_oversized_fixed_array_still_renders() {
    let mut engine = engine_with("core", "f(a:int[18446744073709551615])->int");
    let set = engine.signature("core", "f", FunctionKind::Function, &LayoutConfig::existence());
    assert_eq!(set.map(|s| s.len()), Some(1));
}
