//! Assembled signatures

use sigforge_parser::ParamKind;
use sigforge_types::{TypeExpr, Value};

/// One parameter of an assembled signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Host name (reserved words already escaped)
    pub name: String,
    /// Parameter kind
    pub kind: ParamKind,
    /// Host annotation; variadic parameters carry none
    pub annotation: Option<TypeExpr>,
}

/// Everything known about one overload variant after assembly.
///
/// Positional defaults right-align to the positional parameters (the
/// positional-only and positional-or-keyword ones); keyword-only defaults
/// are stored by name.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBag {
    /// Last dotted segment of `full_name`
    pub short_name: String,
    /// Dotted function name
    pub full_name: String,
    /// Overload index the line carried after merging
    pub multi_index: Option<usize>,
    /// Parameters in declaration order, output parameters removed
    pub params: Vec<Parameter>,
    /// Positional defaults, aligned to the tail of the positional parameters
    pub defaults: Vec<Value>,
    /// Keyword-only defaults
    pub kwdefaults: Vec<(String, Value)>,
    /// Return annotation, `None` when the line has none
    pub return_annotation: Option<TypeExpr>,
    /// Names of the output parameters promoted into the return annotation
    pub promoted: Vec<String>,
}

impl PropertyBag {
    /// Parameter names in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Parameter by name.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Kind of the parameter called `name`.
    pub fn kind_of(&self, name: &str) -> Option<ParamKind> {
        self.param(name).map(|p| p.kind)
    }

    /// Annotation of the parameter called `name`.
    pub fn annotation_of(&self, name: &str) -> Option<&TypeExpr> {
        self.param(name).and_then(|p| p.annotation.as_ref())
    }

    /// Number of positional parameters.
    pub fn positional_count(&self) -> usize {
        self.params.iter().filter(|p| p.kind.is_positional()).count()
    }

    /// Default of the parameter at `idx`, if it has one.
    pub fn default_at(&self, idx: usize) -> Option<&Value> {
        let param = self.params.get(idx)?;
        if param.kind.is_positional() {
            let first_defaulted = self.positional_count().checked_sub(self.defaults.len())?;
            idx.checked_sub(first_defaulted)
                .and_then(|offset| self.defaults.get(offset))
        } else {
            self.kwdefaults
                .iter()
                .find(|(name, _)| *name == param.name)
                .map(|(_, value)| value)
        }
    }

    /// Number of arguments a call must pass at least.
    pub fn required_arity(&self) -> usize {
        self.positional_count().saturating_sub(self.defaults.len())
    }
}
