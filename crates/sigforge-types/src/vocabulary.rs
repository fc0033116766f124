//! Token vocabularies
//!
//! A vocabulary is the set of table entries contributed by one host module.
//! [`Baseline`] covers the native primitive and standard-library spellings and
//! is always present; [`TableVocabulary`] is a data-driven vocabulary an
//! embedder builds for each of its own modules.

use crate::table::SymbolTable;
use crate::ty::{Builtin, GenericKind, TypeExpr};
use crate::value::{GenericCtor, Literal, Value};

/// Module name the baseline vocabulary is registered under.
pub const BASELINE_MODULE: &str = "builtins";

/// Entries contributed by one host module.
pub trait Vocabulary: Send {
    /// Host module this vocabulary belongs to.
    fn module(&self) -> &str;

    /// Add this vocabulary's entries to `table`.
    fn install(&self, table: &mut SymbolTable);
}

const INTEGERS: &[&str] = &[
    "int",
    "char",
    "signed char",
    "unsigned char",
    "short",
    "unsigned short",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "unsigned",
    "unsigned int",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "size_t",
    "ssize_t",
    "intptr_t",
    "uintptr_t",
    "void*",
];

const FLOATS: &[&str] = &["float", "double", "long double"];

const STRINGS: &[&str] = &[
    "str",
    "char*",
    "const char*",
    "std.string",
    "std.wstring",
    "std.string_view",
    "wchar_t*",
];

/// Pointer spellings the callee writes through, by element type.
const RESULT_VARIABLES: &[(&str, Builtin)] = &[
    ("bool*", Builtin::Bool),
    ("int*", Builtin::Int),
    ("unsigned int*", Builtin::Int),
    ("short*", Builtin::Int),
    ("long*", Builtin::Int),
    ("long long*", Builtin::Int),
    ("unsigned long long*", Builtin::Int),
    ("float*", Builtin::Float),
    ("double*", Builtin::Float),
];

const ARRAY_LIKES: &[(&str, Builtin)] = &[
    ("array double*", Builtin::Float),
    ("array float*", Builtin::Float),
    ("array int*", Builtin::Int),
    ("array unsigned int*", Builtin::Int),
    ("array short*", Builtin::Int),
];

const CONTAINERS: &[(&str, GenericKind)] = &[
    ("List", GenericKind::List),
    ("Sequence", GenericKind::Sequence),
    ("Dict", GenericKind::Dict),
    ("Tuple", GenericKind::Tuple),
    ("Set", GenericKind::Set),
    ("Iterable", GenericKind::Iterable),
    ("Callable", GenericKind::Callable),
    ("std.map", GenericKind::Dict),
    ("std.unordered_map", GenericKind::Dict),
    ("std.multimap", GenericKind::Dict),
    ("std.set", GenericKind::Set),
    ("std.unordered_set", GenericKind::Set),
    ("std.pair", GenericKind::Tuple),
    ("std.tuple", GenericKind::Tuple),
    ("std.function", GenericKind::Callable),
];

/// Native primitives, standard-library types and common default spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Baseline;

impl Vocabulary for Baseline {
    fn module(&self) -> &str {
        BASELINE_MODULE
    }

    fn install(&self, table: &mut SymbolTable) {
        let builtins = [
            ("int", Builtin::Int),
            ("float", Builtin::Float),
            ("bool", Builtin::Bool),
            ("str", Builtin::Str),
            ("bytes", Builtin::Bytes),
            ("bytearray", Builtin::ByteArray),
            ("object", Builtin::Object),
            ("type", Builtin::Type),
        ];
        for (name, builtin) in builtins {
            table.register(name, Value::builtin(builtin));
            table.define(name, Value::builtin(builtin));
        }
        table.define("None", Value::Literal(Literal::None));
        table.define("True", Value::Literal(Literal::Bool(true)));
        table.define("False", Value::Literal(Literal::Bool(false)));

        for name in INTEGERS {
            table.register(*name, Value::builtin(Builtin::Int));
        }
        for name in FLOATS {
            table.register(*name, Value::builtin(Builtin::Float));
        }
        for name in STRINGS {
            table.register(*name, Value::builtin(Builtin::Str));
        }
        table.register("void", Value::builtin(Builtin::NoneType));
        table.register("Any", Value::builtin(Builtin::Any));
        table.register("PyObject", Value::builtin(Builtin::Object));
        table.register("PyBytes", Value::builtin(Builtin::Bytes));
        table.register("PyByteArray", Value::builtin(Builtin::ByteArray));
        table.register("PyTypeObject", Value::builtin(Builtin::Type));
        table.register("PyUnicode", Value::builtin(Builtin::Str));

        for (name, element) in RESULT_VARIABLES {
            table.register(*name, Value::ResultVariable(TypeExpr::Builtin(*element)));
        }
        for (name, element) in ARRAY_LIKES {
            table.register(*name, Value::ArrayLike(TypeExpr::Builtin(*element)));
        }
        for (name, kind) in CONTAINERS {
            table.register(*name, Value::Generic(GenericCtor::Container(*kind)));
        }
        for name in ["std.vector", "std.list", "std.deque"] {
            table.register(name, Value::Generic(GenericCtor::ArrayLike));
        }

        for name in ["nullptr", "NULL", "None"] {
            table.register(name, Value::Literal(Literal::None));
        }
        for (name, flag) in [("true", true), ("True", true), ("false", false), ("False", false)] {
            table.register(name, Value::Literal(Literal::Bool(flag)));
        }
        table.register("...", Value::Literal(Literal::Ellipsis));
        table.register("{}", Value::Literal(Literal::EmptyDict));
        table.register("[]", Value::Literal(Literal::EmptyList));
        table.register("\"\"", Value::Literal(Literal::Str(String::new())));

        let zeros = [
            ("int", Literal::Int(0)),
            ("float", Literal::Float(0.0)),
            ("bool", Literal::Bool(false)),
            ("str", Literal::Str(String::new())),
            ("bytes", Literal::Bytes(String::new())),
            ("object", Literal::None),
            ("Any", Literal::None),
        ];
        for (name, zero) in zeros {
            table.register(format!("zero({})", name), Value::Literal(zero));
        }
    }
}

/// Vocabulary assembled from explicit entries.
///
/// ```ignore
/// let core = TableVocabulary::new("core")
///     .class("core.Object")
///     .constant("core.Align.Left")
///     .token("ObjectList", Value::Type(TypeExpr::list(TypeExpr::class("core.Object"))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableVocabulary {
    module: String,
    tokens: Vec<(String, Value)>,
    definitions: Vec<(String, Value)>,
    aliases: Vec<(String, String)>,
}

impl TableVocabulary {
    /// Empty vocabulary for `module`.
    pub fn new(module: impl Into<String>) -> Self {
        TableVocabulary {
            module: module.into(),
            ..Default::default()
        }
    }

    /// Host class at `path`.
    pub fn class(self, path: impl Into<String>) -> Self {
        let path = path.into();
        let value = Value::Type(TypeExpr::class(path.clone()));
        self.define(path, value)
    }

    /// Named constant at `path`.
    pub fn constant(self, path: impl Into<String>) -> Self {
        let path = path.into();
        let value = Value::Constant(path.clone());
        self.define(path, value)
    }

    /// Arbitrary namespace object.
    pub fn define(mut self, path: impl Into<String>, value: Value) -> Self {
        self.definitions.push((path.into(), value));
        self
    }

    /// Native token entry.
    pub fn token(mut self, token: impl Into<String>, value: Value) -> Self {
        self.tokens.push((token.into(), value));
        self
    }

    /// Fixed-size matrix family: `token<N, M, float>` resolves `{prefix}{N}x{M}`.
    pub fn matrix(self, token: impl Into<String>, prefix: impl Into<String>) -> Self {
        let value = Value::Generic(GenericCtor::Matrix {
            prefix: prefix.into(),
        });
        self.token(token, value)
    }

    /// Native spelling resolved like `target`.
    pub fn alias(mut self, token: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push((token.into(), target.into()));
        self
    }
}

impl Vocabulary for TableVocabulary {
    fn module(&self) -> &str {
        &self.module
    }

    fn install(&self, table: &mut SymbolTable) {
        for (path, value) in &self.definitions {
            table.define(path.clone(), value.clone());
        }
        for (token, value) in &self.tokens {
            table.register(token.clone(), value.clone());
        }
        for (token, target) in &self.aliases {
            table.alias(token.clone(), target.clone());
        }
    }
}
