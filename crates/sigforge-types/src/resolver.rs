//! Native token resolution
//!
//! Type tokens are tried whole against the table first. On a miss, array
//! suffixes and generic containers are resolved part by part; plain atoms
//! run the lookup chain:
//!
//! 1. alias of another token
//! 2. `X()` is a default-constructed `X`
//! 3. evaluation against the namespace
//! 4. qualification heuristic using the surrounding scope
//! 5. give up: the token is kept verbatim as [`Value::Opaque`]
//!
//! Every result, including give-ups, is memoized under the token, so a
//! token is resolved (and reported) at most once per table.

use sigforge_parser::{TypeSyntax, DEFAULT_BRACKET_DEPTH};

use crate::eval::is_path;
use crate::table::{MissReason, SymbolTable};
use crate::ty::{Position, TypeExpr};
use crate::value::{GenericCtor, Literal, Sentinel, SentinelKind, Value};

/// Maximum alias and nesting hops followed for one token.
pub const MAX_NESTING: usize = 16;

/// Longest fixed array spelled out as a tuple. Longer arrays resolve like
/// open ones.
pub const MAX_TUPLE_ARITY: usize = 32;

/// Resolves native tokens against a [`SymbolTable`].
pub struct Resolver<'t> {
    table: &'t mut SymbolTable,
    bracket_depth: usize,
}

impl<'t> Resolver<'t> {
    /// Resolver using the default bracket depth.
    pub fn new(table: &'t mut SymbolTable) -> Self {
        Resolver {
            table,
            bracket_depth: DEFAULT_BRACKET_DEPTH,
        }
    }

    /// Override the bracket depth used when splitting generic arguments.
    pub fn with_bracket_depth(mut self, bracket_depth: usize) -> Self {
        self.bracket_depth = bracket_depth;
        self
    }

    /// Underlying table.
    pub fn table(&self) -> &SymbolTable {
        &*self.table
    }

    /// Resolve a type token. `declaring` is the qualified name of the type
    /// that declares the callable, used to qualify nested names.
    ///
    /// The result is unwidened; see [`Resolver::resolve_annotation`].
    pub fn resolve_type(&mut self, token: &str, declaring: Option<&str>) -> Value {
        self.type_at(token.trim(), declaring, 0)
    }

    /// Resolve a type token and apply the container rule for `position`.
    pub fn resolve_annotation(
        &mut self,
        token: &str,
        declaring: Option<&str>,
        position: Position,
    ) -> TypeExpr {
        self.resolve_type(token, declaring).annotation(position)
    }

    /// Resolve a default-value token. `type_token` is the parameter's native
    /// type, used for zero defaults and as the heuristic's scope.
    pub fn resolve_value(&mut self, token: &str, type_token: Option<&str>) -> Value {
        let token = token.trim();
        if token == "0" || token == "None" {
            if let Some(type_token) = type_token {
                if let Some(zero) = self.zero_for(type_token) {
                    return zero;
                }
            }
        }
        if let Some(value) = self.table.cached(token) {
            return value;
        }
        self.atom(token, type_token, 0)
    }

    /// Zero-ish default for a parameter of `type_token`: the type's zero
    /// value for builtins, `None` for everything else that resolved.
    fn zero_for(&mut self, type_token: &str) -> Option<Value> {
        let ty = self.resolve_type(type_token, None);
        match ty.zero_key() {
            Some(key) => self.table.lookup(&format!("zero({})", key)),
            None if ty.is_opaque() => None,
            None => Some(Value::Literal(Literal::None)),
        }
    }

    fn type_at(&mut self, token: &str, declaring: Option<&str>, level: usize) -> Value {
        if let Some(value) = self.table.cached(token) {
            return value;
        }
        if level >= MAX_NESTING {
            return self.miss(token, MissReason::TooDeep);
        }

        match TypeSyntax::parse(token, self.bracket_depth) {
            TypeSyntax::Array { element, len } => {
                let element = self.type_at(element, declaring, level + 1).element_type();
                let value = match len {
                    Some(n) if n <= MAX_TUPLE_ARITY => Value::Type(TypeExpr::tuple(vec![element; n])),
                    Some(n) => {
                        tracing::debug!(token, len = n, "fixed array too long for a tuple");
                        Value::ArrayLike(element)
                    }
                    None => Value::ArrayLike(element),
                };
                self.table.memoize(token, value.clone());
                value
            }
            TypeSyntax::Generic { container, args } => {
                self.generic(token, container, &args, declaring, level)
            }
            TypeSyntax::Atom(atom) => self.atom(atom, declaring, level),
        }
    }

    fn generic(
        &mut self,
        token: &str,
        container: &str,
        args: &[String],
        declaring: Option<&str>,
        level: usize,
    ) -> Value {
        let ctor = self.type_at(container, declaring, level + 1);
        let value = match ctor {
            Value::Generic(GenericCtor::Matrix { prefix }) => {
                return self.matrix(token, &prefix, args);
            }
            Value::Generic(GenericCtor::ArrayLike) => {
                let mut elements = self.type_args(args, declaring, level);
                if elements.len() != 1 {
                    return self.miss(token, MissReason::BadArguments);
                }
                Value::ArrayLike(elements.remove(0))
            }
            Value::Generic(GenericCtor::Container(kind)) => {
                Value::Type(TypeExpr::generic(kind, self.type_args(args, declaring, level)))
            }
            Value::Type(TypeExpr::Class { path, args: bound }) if bound.is_empty() => {
                Value::Type(TypeExpr::Class {
                    path,
                    args: self.type_args(args, declaring, level),
                })
            }
            Value::Type(TypeExpr::Generic { kind, args: bound }) if bound.is_empty() => {
                Value::Type(TypeExpr::generic(kind, self.type_args(args, declaring, level)))
            }
            _ => return self.miss(token, MissReason::NotAContainer),
        };
        self.table.memoize(token, value.clone());
        value
    }

    fn type_args(&mut self, args: &[String], declaring: Option<&str>, level: usize) -> Vec<TypeExpr> {
        args.iter()
            .map(|arg| self.type_at(arg.trim(), declaring, level + 1).element_type())
            .collect()
    }

    /// `prefix<N, M, float>` names the concrete class `{prefix}{N}x{M}`.
    fn matrix(&mut self, token: &str, prefix: &str, args: &[String]) -> Value {
        let dims = match args {
            [rows, cols, _element] => rows
                .trim()
                .parse::<usize>()
                .ok()
                .zip(cols.trim().parse::<usize>().ok()),
            _ => None,
        };
        let Some((rows, cols)) = dims else {
            return self.miss(token, MissReason::BadArguments);
        };

        let name = format!("{}{}x{}", prefix, rows, cols);
        match self.table.evaluate(&name) {
            Some(value) => {
                self.table.memoize(token, value.clone());
                value
            }
            None => self.miss(token, MissReason::UnknownToken),
        }
    }

    /// Lookup chain for a token already known to miss the table.
    fn atom(&mut self, token: &str, scope: Option<&str>, level: usize) -> Value {
        if let Some(target) = self.table.alias_target(token).map(str::to_string) {
            if level >= MAX_NESTING {
                return self.miss(token, MissReason::TooDeep);
            }
            let value = self.type_at(target.trim(), scope, level + 1);
            self.table.memoize(token, value.clone());
            return value;
        }

        let value = self
            .good_value(token)
            .or_else(|| scope.and_then(|scope| self.guess(token, scope)));
        match value {
            Some(value) => {
                self.table.memoize(token, value.clone());
                value
            }
            None => self.miss(token, MissReason::UnknownToken),
        }
    }

    fn good_value(&self, text: &str) -> Option<Value> {
        if let Some(name) = text.strip_suffix("()") {
            if !name.is_empty() && !name.ends_with('(') {
                return Some(Value::Sentinel(Sentinel::new(SentinelKind::Default, name)));
            }
        }
        self.table.evaluate(text)
    }

    /// Qualify `token` using the words of `scope`.
    ///
    /// A bare name is first tried as a member of `scope`. Otherwise the
    /// scope's words are scanned left to right; at the first word equal to
    /// the token's leading word, the token is spliced onto the words before
    /// it. The first candidate that evaluates wins.
    fn guess(&self, token: &str, scope: &str) -> Option<Value> {
        self.table.bump(|stats| stats.heuristic_runs += 1);

        if !token.contains('.') && !token.contains('(') && is_path(scope) {
            if let Some(value) = self.good_value(&format!("{}.{}", scope, token)) {
                return Some(value);
            }
        }

        let leading = token.split('.').next().unwrap_or(token);
        let leading = leading.split('(').next().unwrap_or(leading);
        let words: Vec<&str> = scope.split('.').collect();
        let idx = words.iter().position(|word| *word == leading)?;
        let candidate = if idx == 0 {
            token.to_string()
        } else {
            format!("{}.{}", words[..idx].join("."), token)
        };
        self.good_value(&candidate)
    }

    fn miss(&mut self, token: &str, reason: MissReason) -> Value {
        tracing::warn!(token, ?reason, "unresolved native token kept verbatim");
        self.table.record_miss(token, reason);
        let value = Value::Opaque(token.to_string());
        self.table.memoize(token, value.clone());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{Builtin, GenericKind};

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.define("core.Object", Value::Type(TypeExpr::class("core.Object")));
        table.define(
            "core.Object.Flags",
            Value::Type(TypeExpr::class("core.Object.Flags")),
        );
        table.define("core.Align", Value::Type(TypeExpr::class("core.Align")));
        table.define("core.Align.Left", Value::Constant("core.Align.Left".into()));
        table
    }

    #[test]
    fn test_table_hit() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_type("double", None),
            Value::builtin(Builtin::Float)
        );
    }

    #[test]
    fn test_fixed_array_is_tuple() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_type("int[2]", None).to_string(),
            "Tuple[int, int]"
        );
    }

    #[test]
    fn test_open_array_widens_by_position() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver
                .resolve_annotation("double[]", None, Position::Argument)
                .to_string(),
            "Sequence[float]"
        );
        assert_eq!(
            resolver
                .resolve_annotation("double[]", None, Position::Return)
                .to_string(),
            "List[float]"
        );
    }

    #[test]
    fn test_generic_container() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        let value = resolver.resolve_type("std.map[std.string, std.vector[int]]", None);
        assert_eq!(value.to_string(), "Dict[str, List[int]]");
        assert_eq!(
            resolver
                .resolve_annotation("std.vector[int]", None, Position::Argument)
                .to_string(),
            "Sequence[int]"
        );
    }

    #[test]
    fn test_generic_over_non_container() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        let value = resolver.resolve_type("int[str]", None);
        assert_eq!(value, Value::Opaque("int[str]".into()));
        let unresolved = table.take_unresolved();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].reason, MissReason::NotAContainer);
    }

    #[test]
    fn test_nested_name_uses_declaring_scope() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_type("Flags", Some("core.Object")),
            Value::Type(TypeExpr::class("core.Object.Flags"))
        );
        assert!(table.contains("Flags"));
    }

    #[test]
    fn test_value_heuristic_splices_prefix() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_value("Align.Left", Some("core.Align")),
            Value::Constant("core.Align.Left".into())
        );
    }

    #[test]
    fn test_zero_defaults() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_value("0", Some("int")),
            Value::Literal(Literal::Int(0))
        );
        assert_eq!(
            resolver.resolve_value("0", Some("double")),
            Value::Literal(Literal::Float(0.0))
        );
        assert_eq!(
            resolver.resolve_value("0", Some("core.Object")),
            Value::Literal(Literal::None)
        );
        assert_eq!(
            resolver.resolve_value("0", Some("Unknown.Thing")),
            Value::Literal(Literal::Int(0))
        );
    }

    #[test]
    fn test_default_constructed() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_value("core.Object()", Some("core.Object")),
            Value::Sentinel(Sentinel::new(SentinelKind::Default, "core.Object"))
        );
    }

    #[test]
    fn test_alias() {
        let mut table = table();
        table.alias("real", "double");
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(resolver.resolve_type("real", None), Value::builtin(Builtin::Float));
        assert_eq!(table.lookup("real"), Some(Value::builtin(Builtin::Float)));
    }

    #[test]
    fn test_alias_cycle_gives_up() {
        let mut table = table();
        table.alias("a", "b");
        table.alias("b", "a");
        let mut resolver = Resolver::new(&mut table);
        assert!(resolver.resolve_type("a", None).is_opaque());
    }

    #[test]
    fn test_matrix() {
        let mut table = table();
        table.define("gfx.Matrix4x4", Value::Type(TypeExpr::class("gfx.Matrix4x4")));
        table.register(
            "Matrix",
            Value::Generic(GenericCtor::Matrix {
                prefix: "gfx.Matrix".into(),
            }),
        );
        let mut resolver = Resolver::new(&mut table);
        assert_eq!(
            resolver.resolve_type("Matrix<4,4,float>", None),
            Value::Type(TypeExpr::class("gfx.Matrix4x4"))
        );
        assert!(resolver.resolve_type("Matrix<4,float>", None).is_opaque());
    }

    #[test]
    fn test_inner_sentinel_becomes_opaque() {
        let mut table = table();
        let mut resolver = Resolver::new(&mut table);
        let value = resolver.resolve_type("List[nullptr]", None);
        assert_eq!(
            value,
            Value::Type(TypeExpr::generic(
                GenericKind::List,
                vec![TypeExpr::Builtin(Builtin::NoneType)]
            ))
        );
        let value = resolver.resolve_type("List[Foo()]", None);
        assert_eq!(value.to_string(), "List['Default('Foo')']");
    }
}
