//! Host type expressions
//!
//! The annotation side of a signature: what a native type token turns into
//! once it is mapped to the host language.

use std::fmt;

/// Host builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `str`
    Str,
    /// `bytes`
    Bytes,
    /// `bytearray`
    ByteArray,
    /// `object`
    Object,
    /// `type`
    Type,
    /// `None` used as a type
    NoneType,
    /// `Any`
    Any,
}

impl Builtin {
    /// Host spelling of the type.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Bool => "bool",
            Builtin::Str => "str",
            Builtin::Bytes => "bytes",
            Builtin::ByteArray => "bytearray",
            Builtin::Object => "object",
            Builtin::Type => "type",
            Builtin::NoneType => "None",
            Builtin::Any => "Any",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host generic type constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericKind {
    /// Concrete, owned list
    List,
    /// Read-only sequence
    Sequence,
    /// Mapping
    Dict,
    /// Fixed-arity tuple
    Tuple,
    /// Set
    Set,
    /// Iterable
    Iterable,
    /// Callable
    Callable,
}

impl GenericKind {
    /// Host spelling of the constructor.
    pub fn name(&self) -> &'static str {
        match self {
            GenericKind::List => "List",
            GenericKind::Sequence => "Sequence",
            GenericKind::Dict => "Dict",
            GenericKind::Tuple => "Tuple",
            GenericKind::Set => "Set",
            GenericKind::Iterable => "Iterable",
            GenericKind::Callable => "Callable",
        }
    }
}

/// Which side of a call a type appears on.
///
/// Array-like containers widen differently: an argument accepts any
/// sequence-shaped value, a result is always a freshly built list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Parameter annotation
    Argument,
    /// Return annotation
    Return,
}

/// A host type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// Builtin type
    Builtin(Builtin),
    /// Class of a host module, by qualified path, optionally parameterized
    Class {
        /// Qualified path (`core.Object`)
        path: String,
        /// Type arguments
        args: Vec<TypeExpr>,
    },
    /// Generic container
    Generic {
        /// Constructor
        kind: GenericKind,
        /// Type arguments (empty for the bare constructor)
        args: Vec<TypeExpr>,
    },
    /// `Optional[T]`
    Optional(Box<TypeExpr>),
    /// A native token that could not be mapped, kept verbatim
    Opaque(String),
}

impl TypeExpr {
    /// Class type without arguments.
    pub fn class(path: impl Into<String>) -> Self {
        TypeExpr::Class {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Generic type.
    pub fn generic(kind: GenericKind, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic { kind, args }
    }

    /// `List[T]`
    pub fn list(element: TypeExpr) -> Self {
        Self::generic(GenericKind::List, vec![element])
    }

    /// `Sequence[T]`
    pub fn sequence(element: TypeExpr) -> Self {
        Self::generic(GenericKind::Sequence, vec![element])
    }

    /// `Tuple[T1, T2, ...]`
    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        Self::generic(GenericKind::Tuple, elements)
    }

    /// Wrap in `Optional`, unless the type already admits `None`.
    pub fn optional(self) -> Self {
        match self {
            TypeExpr::Optional(_)
            | TypeExpr::Builtin(Builtin::NoneType)
            | TypeExpr::Builtin(Builtin::Any) => self,
            other => TypeExpr::Optional(Box::new(other)),
        }
    }

    /// Whether `None` is a valid value of this type.
    pub fn admits_none(&self) -> bool {
        matches!(
            self,
            TypeExpr::Optional(_)
                | TypeExpr::Builtin(Builtin::NoneType)
                | TypeExpr::Builtin(Builtin::Any)
        )
    }

    /// Apply the container variance rule for `position`.
    ///
    /// Only the outermost container is affected.
    pub fn widen(self, position: Position) -> Self {
        match (position, self) {
            (Position::Argument, TypeExpr::Generic { kind: GenericKind::List, args }) => {
                TypeExpr::Generic {
                    kind: GenericKind::Sequence,
                    args,
                }
            }
            (_, other) => other,
        }
    }

    /// Whether this is an unmapped native token.
    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeExpr::Opaque(_))
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeExpr]) -> fmt::Result {
    f.write_str("[")?;
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str("]")
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Builtin(builtin) => write!(f, "{}", builtin),
            TypeExpr::Class { path, args } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    write_args(f, args)?;
                }
                Ok(())
            }
            TypeExpr::Generic { kind, args } => {
                f.write_str(kind.name())?;
                if *kind == GenericKind::Tuple && args.is_empty() {
                    return f.write_str("[()]");
                }
                if !args.is_empty() {
                    write_args(f, args)?;
                }
                Ok(())
            }
            TypeExpr::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeExpr::Opaque(token) => write!(f, "'{}'", token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ty = TypeExpr::generic(
            GenericKind::Dict,
            vec![
                TypeExpr::Builtin(Builtin::Str),
                TypeExpr::list(TypeExpr::class("core.Object")),
            ],
        );
        assert_eq!(ty.to_string(), "Dict[str, List[core.Object]]");
        assert_eq!(TypeExpr::tuple(vec![]).to_string(), "Tuple[()]");
        assert_eq!(TypeExpr::Opaque("Foo::Bar".into()).to_string(), "'Foo::Bar'");
    }

    #[test]
    fn test_optional_does_not_nest() {
        let ty = TypeExpr::class("core.Object").optional().optional();
        assert_eq!(ty.to_string(), "Optional[core.Object]");
        assert_eq!(
            TypeExpr::Builtin(Builtin::Any).optional(),
            TypeExpr::Builtin(Builtin::Any)
        );
    }

    #[test]
    fn test_widen_only_touches_arguments() {
        let list = TypeExpr::list(TypeExpr::Builtin(Builtin::Int));
        assert_eq!(list.clone().widen(Position::Argument).to_string(), "Sequence[int]");
        assert_eq!(list.widen(Position::Return).to_string(), "List[int]");
    }

    #[test]
    fn test_widen_is_shallow() {
        let nested = TypeExpr::generic(
            GenericKind::Dict,
            vec![
                TypeExpr::Builtin(Builtin::Str),
                TypeExpr::list(TypeExpr::Builtin(Builtin::Int)),
            ],
        );
        assert_eq!(
            nested.widen(Position::Argument).to_string(),
            "Dict[str, List[int]]"
        );
    }
}
