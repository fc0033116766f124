//! Resolved values
//!
//! Everything a symbol-table entry can map a native token to. Type tokens
//! usually land on [`Value::Type`] or one of the variable markers; default
//! tokens usually land on [`Value::Literal`], [`Value::Constant`] or a
//! [`Sentinel`].

use std::fmt;

use crate::ty::{Builtin, GenericKind, Position, TypeExpr};

/// Host literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Text string
    Str(String),
    /// Byte string
    Bytes(String),
    /// `[]`
    EmptyList,
    /// `{}`
    EmptyDict,
    /// `...`
    Ellipsis,
}

impl Literal {
    /// Type of the literal, when it has a useful one.
    pub fn type_expr(&self) -> TypeExpr {
        match self {
            Literal::None => TypeExpr::Builtin(Builtin::NoneType),
            Literal::Bool(_) => TypeExpr::Builtin(Builtin::Bool),
            Literal::Int(_) => TypeExpr::Builtin(Builtin::Int),
            Literal::Float(_) => TypeExpr::Builtin(Builtin::Float),
            Literal::Str(_) => TypeExpr::Builtin(Builtin::Str),
            Literal::Bytes(_) => TypeExpr::Builtin(Builtin::Bytes),
            Literal::EmptyList => TypeExpr::generic(GenericKind::List, Vec::new()),
            Literal::EmptyDict => TypeExpr::generic(GenericKind::Dict, Vec::new()),
            Literal::Ellipsis => TypeExpr::Builtin(Builtin::Any),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("'")?;
    for ch in text.chars() {
        match ch {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write_quoted(f, s),
            Literal::Bytes(s) => {
                f.write_str("b")?;
                write_quoted(f, s)
            }
            Literal::EmptyList => f.write_str("[]"),
            Literal::EmptyDict => f.write_str("{}"),
            Literal::Ellipsis => f.write_str("..."),
        }
    }
}

/// What a [`Sentinel`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentinelKind {
    /// Explicit "absent" marker
    Missing,
    /// Explicit "invalid" marker
    Invalid,
    /// Default-constructed value (`Foo()`)
    Default,
    /// Constructed instance or flag combination (`Foo(1, 2)`, `A | B`)
    Instance,
}

/// Placeholder for a default value that has no literal host form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentinel {
    /// Placeholder kind
    pub kind: SentinelKind,
    /// Native text the placeholder stands for
    pub token: String,
}

impl Sentinel {
    /// Create a sentinel.
    pub fn new(kind: SentinelKind, token: impl Into<String>) -> Self {
        Sentinel {
            kind,
            token: token.into(),
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            SentinelKind::Missing => "Missing",
            SentinelKind::Invalid => "Invalid",
            SentinelKind::Default => "Default",
            SentinelKind::Instance => "Instance",
        };
        write!(f, "{}(", label)?;
        write_quoted(f, &self.token)?;
        f.write_str(")")
    }
}

/// Generic constructor that still needs its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericCtor {
    /// Host container constructor
    Container(GenericKind),
    /// Array-like container: widens by position once applied
    ArrayLike,
    /// Fixed-size matrix family: `prefix<N, M, float>` names `{prefix}{N}x{M}`
    Matrix {
        /// Host class prefix (`gfx.Matrix`)
        prefix: String,
    },
}

impl fmt::Display for GenericCtor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericCtor::Container(kind) => f.write_str(kind.name()),
            GenericCtor::ArrayLike => f.write_str("ArrayLike"),
            GenericCtor::Matrix { prefix } => write!(f, "{}NxM", prefix),
        }
    }
}

/// Result of resolving a native token.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A host type
    Type(TypeExpr),
    /// A generic constructor awaiting arguments
    Generic(GenericCtor),
    /// Output parameter: the callee writes a `T` through it
    ResultVariable(TypeExpr),
    /// Array-like container of `T`
    ArrayLike(TypeExpr),
    /// Literal default
    Literal(Literal),
    /// Named constant of a host module, by qualified path
    Constant(String),
    /// Default without a literal form
    Sentinel(Sentinel),
    /// Unmapped native token, kept verbatim
    Opaque(String),
}

impl Value {
    /// Shorthand for `Value::Type(TypeExpr::Builtin(..))`.
    pub fn builtin(builtin: Builtin) -> Self {
        Value::Type(TypeExpr::Builtin(builtin))
    }

    /// Whether this is the `None` literal.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::Literal(Literal::None))
    }

    /// Whether this is an output parameter marker.
    pub fn is_result_variable(&self) -> bool {
        matches!(self, Value::ResultVariable(_))
    }

    /// Whether resolution gave up on this token.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque(_))
    }

    /// Annotation for this value at `position`.
    ///
    /// Array-like values widen to `Sequence[T]` as arguments and become
    /// `List[T]` as results; a result variable in return position is always
    /// an array. Anything that is not a type keeps its native text as an
    /// opaque annotation.
    pub fn annotation(&self, position: Position) -> TypeExpr {
        match self {
            Value::Type(ty) => ty.clone().widen(position),
            Value::Generic(GenericCtor::Container(kind)) => {
                TypeExpr::generic(*kind, Vec::new()).widen(position)
            }
            Value::Generic(ctor) => TypeExpr::Opaque(ctor.to_string()),
            Value::ArrayLike(element) => match position {
                Position::Argument => TypeExpr::sequence(element.clone()),
                Position::Return => TypeExpr::list(element.clone()),
            },
            Value::ResultVariable(element) => match position {
                Position::Argument => element.clone(),
                Position::Return => TypeExpr::list(element.clone()),
            },
            Value::Literal(Literal::None) => TypeExpr::Builtin(Builtin::NoneType),
            Value::Literal(literal) => TypeExpr::Opaque(literal.to_string()),
            Value::Constant(path) => TypeExpr::Opaque(path.clone()),
            Value::Sentinel(sentinel) => TypeExpr::Opaque(sentinel.to_string()),
            Value::Opaque(token) => TypeExpr::Opaque(token.clone()),
        }
    }

    /// Type used inside a generic argument list.
    ///
    /// Nested containers are not widened; array-likes become plain lists.
    pub fn element_type(&self) -> TypeExpr {
        match self {
            Value::ArrayLike(element) => TypeExpr::list(element.clone()),
            Value::ResultVariable(element) => element.clone(),
            other => other.annotation(Position::Return),
        }
    }

    /// Host name used to look up the zero value of this type, if it has one.
    pub fn zero_key(&self) -> Option<&'static str> {
        match self {
            Value::Type(TypeExpr::Builtin(builtin)) => Some(builtin.name()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Type(ty) => write!(f, "{}", ty),
            Value::Generic(ctor) => write!(f, "{}", ctor),
            Value::ResultVariable(ty) => write!(f, "ResultVariable({})", ty),
            Value::ArrayLike(ty) => write!(f, "ArrayLikeVariable({})", ty),
            Value::Literal(literal) => write!(f, "{}", literal),
            Value::Constant(path) => f.write_str(path),
            Value::Sentinel(sentinel) => write!(f, "{}", sentinel),
            Value::Opaque(token) => write_quoted(f, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_repr() {
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::Float(0.0).to_string(), "0.0");
        assert_eq!(Literal::Float(1.5).to_string(), "1.5");
        assert_eq!(Literal::Str("it's".into()).to_string(), "'it\\'s'");
        assert_eq!(Literal::Bytes(String::new()).to_string(), "b''");
    }

    #[test]
    fn test_sentinel_repr() {
        let sentinel = Sentinel::new(SentinelKind::Default, "core.Size");
        assert_eq!(sentinel.to_string(), "Default('core.Size')");
    }

    #[test]
    fn test_array_like_annotation_by_position() {
        let value = Value::ArrayLike(TypeExpr::Builtin(Builtin::Float));
        assert_eq!(value.annotation(Position::Argument).to_string(), "Sequence[float]");
        assert_eq!(value.annotation(Position::Return).to_string(), "List[float]");
        assert_eq!(value.element_type().to_string(), "List[float]");
    }

    #[test]
    fn test_non_type_annotation_is_opaque() {
        let value = Value::Sentinel(Sentinel::new(SentinelKind::Instance, "A | B"));
        assert!(value.annotation(Position::Argument).is_opaque());
        assert_eq!(
            Value::Literal(Literal::None).annotation(Position::Return),
            TypeExpr::Builtin(Builtin::NoneType)
        );
    }

    #[test]
    fn test_zero_key() {
        assert_eq!(Value::builtin(Builtin::Int).zero_key(), Some("int"));
        assert_eq!(Value::Type(TypeExpr::class("core.Object")).zero_key(), None);
    }
}
