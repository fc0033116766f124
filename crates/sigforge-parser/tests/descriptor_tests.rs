use sigforge_parser::{parse_line, DescriptorParser, ParamKind, ParseErrorKind, Token};

#[test]
fn test_multi_index_and_defaults() {
    let parsed = parse_line("2:sumThree(a0:int,a1:int=0,a2:int=1)->int").unwrap();

    assert_eq!(parsed.multi_index, Some(2));
    assert_eq!(parsed.full_name, "sumThree");
    assert_eq!(parsed.return_token.as_deref(), Some("int"));

    let names: Vec<_> = parsed.arguments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a0", "a1", "a2"]);

    let defaults: Vec<_> = parsed.arguments.iter().map(|a| a.default.as_deref()).collect();
    assert_eq!(defaults, vec![None, Some("0"), Some("1")]);

    assert!(parsed
        .arguments
        .iter()
        .all(|a| a.kind == ParamKind::PositionalOrKeyword));
}

#[test]
fn test_dotted_name() {
    let parsed = parse_line("core.Object.setProperty(name:str,value:Variant)->bool").unwrap();
    assert_eq!(parsed.full_name, "core.Object.setProperty");
    assert_eq!(parsed.short_name(), "setProperty");
    assert_eq!(parsed.owner(), Some("core.Object"));
}

#[test]
fn test_generic_argument_not_split() {
    let parsed =
        parse_line("core.Store.insert(items:std.map[std.string,std.vector[int]],flag:bool)")
            .unwrap();
    assert_eq!(parsed.arguments.len(), 2);
    assert_eq!(parsed.arguments[0].type_token, "std.map[std.string,std.vector[int]]");
    assert_eq!(parsed.arguments[1].type_token, "bool");
}

#[test]
fn test_string_default_with_comma() {
    let parsed = parse_line("f(sep:str=', ',n:int=2)").unwrap();
    assert_eq!(parsed.arguments[0].default.as_deref(), Some("', '"));
    assert_eq!(parsed.arguments[1].default.as_deref(), Some("2"));
}

#[test]
fn test_variadic_rewrites() {
    let parsed = parse_line("core.Object.call(name:str,arg__1:...,kwds:...)").unwrap();

    assert_eq!(parsed.arguments[1].name, "args");
    assert_eq!(parsed.arguments[1].kind, ParamKind::VarPositional);
    assert_eq!(parsed.arguments[2].name, "kwds");
    assert_eq!(parsed.arguments[2].kind, ParamKind::VarKeyword);
}

#[test]
fn test_reserved_parameter_names() {
    let parsed = parse_line("f(from:int,lambda:str,to:int)").unwrap();
    let names: Vec<_> = parsed.arguments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["from_", "lambda_", "to"]);
}

#[test]
fn test_markers_assign_kinds() {
    let parsed = parse_line("f(a:int,b:int,/,c:int,*,d:int=3)").unwrap();
    let kinds: Vec<_> = parsed.arguments.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParamKind::PositionalOnly,
            ParamKind::PositionalOnly,
            ParamKind::PositionalOrKeyword,
            ParamKind::KeywordOnly,
        ]
    );
}

#[test]
fn test_plain_after_var_positional_stays_positional_or_keyword() {
    // the assembler rejects this ordering; the parser only records it
    let parsed = parse_line("f(arg__1:...,b:int)").unwrap();
    assert_eq!(parsed.arguments[0].kind, ParamKind::VarPositional);
    assert_eq!(parsed.arguments[1].kind, ParamKind::PositionalOrKeyword);
}

#[test]
fn test_return_type_keeps_spelling() {
    let parsed = parse_line("f()->std.vector[core.Object*]").unwrap();
    assert_eq!(parsed.return_token.as_deref(), Some("std.vector[core.Object*]"));
}

#[test]
fn test_missing_colon_is_error() {
    let err = parse_line("f(a)").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MalformedArgument { .. }));
    assert!(err.suggestion.is_some());
}

#[test]
fn test_missing_paren_is_error() {
    let err = parse_line("f(a:int").unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnclosedDelimiter {
            open: Token::LeftParen
        }
    ));
}

#[test]
fn test_missing_name_is_error() {
    let err = parse_line("(a:int)").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.span.start, 0);
}

#[test]
fn test_empty_argument_is_error() {
    let err = parse_line("f(a:int,,b:int)").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MalformedArgument { .. }));
}

#[test]
fn test_empty_return_is_error() {
    let err = parse_line("f()->").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedEnd { .. }));
}

#[test]
fn test_bracket_depth_is_configurable() {
    let line = "f(a:x[y[z[w[int]]]])";
    let err = parse_line(line).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 3 });

    let parser = DescriptorParser::with_bracket_depth(4);
    let parsed = parser.parse_line(line).unwrap();
    assert_eq!(parsed.arguments[0].type_token, "x[y[z[w[int]]]]");
}

#[test]
fn test_argument_spans_point_into_line() {
    let line = "f(a:int, b:str=\"x\")";
    let parsed = parse_line(line).unwrap();
    let span = parsed.arguments[1].span;
    assert_eq!(&line[span.start..span.end], "b:str=\"x\"");
}
