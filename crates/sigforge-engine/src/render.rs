//! Signature rendering
//!
//! A rendering is a fresh value computed from a borrowed [`PropertyBag`];
//! the bag itself is never modified, so one bag can be rendered under every
//! layout side by side.

use std::fmt;

use sigforge_parser::ParamKind;
use sigforge_types::{TypeExpr, Value};

use crate::bag::PropertyBag;
use crate::layout::LayoutConfig;

/// How a callable is bound to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionKind {
    /// Module-level function
    #[default]
    Function,
    /// Instance method, receives `self`
    Method,
    /// Static method
    StaticMethod,
    /// Class method, receives `cls`
    ClassMethod,
}

impl FunctionKind {
    /// Implicit first parameter, if any.
    pub fn implicit_parameter(&self) -> Option<&'static str> {
        match self {
            FunctionKind::Method => Some("self"),
            FunctionKind::ClassMethod => Some("cls"),
            FunctionKind::Function | FunctionKind::StaticMethod => None,
        }
    }
}

/// Default as shown in a rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedDefault {
    /// The real default value
    Value(Value),
    /// `...` placeholder
    Ellipsis,
}

impl fmt::Display for RenderedDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedDefault::Value(value) => write!(f, "{}", value),
            RenderedDefault::Ellipsis => f.write_str("..."),
        }
    }
}

/// One rendered parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedParam {
    /// Name, absent in nameless layouts
    pub name: Option<String>,
    /// Parameter kind
    pub kind: ParamKind,
    /// Annotation
    pub annotation: Option<TypeExpr>,
    /// Shown default
    pub default: Option<RenderedDefault>,
    /// Whether the source parameter has a default, shown or not
    pub optional: bool,
}

impl fmt::Display for RenderedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::VarPositional => f.write_str("*")?,
            ParamKind::VarKeyword => f.write_str("**")?,
            _ => {}
        }
        match (&self.name, &self.annotation) {
            (Some(name), Some(annotation)) => write!(f, "{}: {}", name, annotation)?,
            (Some(name), None) => f.write_str(name)?,
            (None, Some(annotation)) => write!(f, "{}", annotation)?,
            (None, None) => f.write_str("...")?,
        }
        match (&self.default, &self.annotation) {
            (Some(default), Some(_)) => write!(f, " = {}", default),
            (Some(default), None) => write!(f, "={}", default),
            (None, _) => Ok(()),
        }
    }
}

/// Signature shaped by one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSignature {
    /// Parameters in order
    pub params: Vec<RenderedParam>,
    /// Return annotation, if shown
    pub return_annotation: Option<TypeExpr>,
}

impl RenderedSignature {
    /// Minimum number of positional arguments.
    pub fn required_arity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| p.kind.is_positional() && !p.optional)
            .count()
    }

    /// Maximum number of positional arguments, `None` when unbounded.
    pub fn max_arity(&self) -> Option<usize> {
        if self.params.iter().any(|p| p.kind == ParamKind::VarPositional) {
            return None;
        }
        Some(self.params.iter().filter(|p| p.kind.is_positional()).count())
    }

    /// Parameter names, skipping nameless ones.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(|p| p.name.as_deref())
    }

    /// Descriptor-line spelling of this rendering under `name`.
    ///
    /// Only meaningful for named layouts. Variadics are spelled the way the
    /// descriptor grammar expects them and markers are reinserted, so the
    /// result parses back to the same names and kinds.
    pub fn to_descriptor(&self, name: &str) -> String {
        let mut items = Vec::with_capacity(self.params.len() + 2);
        let mut star_written = false;

        for (idx, param) in self.params.iter().enumerate() {
            let param_name = param.name.as_deref().unwrap_or("_");
            match param.kind {
                ParamKind::VarPositional => {
                    items.push("arg__1:...".to_string());
                    star_written = true;
                }
                ParamKind::VarKeyword => items.push(format!("{}:...", param_name)),
                kind => {
                    if kind == ParamKind::KeywordOnly && !star_written {
                        items.push("*".to_string());
                        star_written = true;
                    }
                    let annotation = param
                        .annotation
                        .as_ref()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "object".to_string());
                    let mut item = format!("{}:{}", param_name, annotation);
                    if let Some(default) = &param.default {
                        item.push('=');
                        item.push_str(&default.to_string());
                    }
                    items.push(item);
                }
            }
            if param.kind == ParamKind::PositionalOnly
                && self.params.get(idx + 1).map(|p| p.kind) != Some(ParamKind::PositionalOnly)
            {
                items.push("/".to_string());
            }
        }

        let mut line = format!("{}({})", name, items.join(","));
        if let Some(ret) = &self.return_annotation {
            line.push_str("->");
            line.push_str(&ret.to_string());
        }
        line
    }
}

impl fmt::Display for RenderedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_var_positional = self.params.iter().any(|p| p.kind == ParamKind::VarPositional);
        let mut star_written = false;

        f.write_str("(")?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if param.kind == ParamKind::KeywordOnly && !has_var_positional && !star_written {
                f.write_str("*, ")?;
                star_written = true;
            }
            write!(f, "{}", param)?;
            if param.kind == ParamKind::PositionalOnly
                && self.params.get(idx + 1).map(|p| p.kind) != Some(ParamKind::PositionalOnly)
            {
                f.write_str(", /")?;
            }
        }
        f.write_str(")")?;

        if let Some(ret) = &self.return_annotation {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// Render `bag` bound as `kind` under `layout`.
pub fn render(bag: &PropertyBag, kind: FunctionKind, layout: &LayoutConfig) -> RenderedSignature {
    let mut params = Vec::with_capacity(bag.params.len() + 1);

    if layout.definition {
        if let Some(implicit) = kind.implicit_parameter() {
            let implicit_kind = match bag.params.first() {
                Some(first) if first.kind == ParamKind::PositionalOnly => ParamKind::PositionalOnly,
                _ => ParamKind::PositionalOrKeyword,
            };
            params.push(RenderedParam {
                name: layout.parameter_names.then(|| implicit.to_string()),
                kind: implicit_kind,
                annotation: None,
                default: None,
                optional: false,
            });
        }
    }

    for (idx, param) in bag.params.iter().enumerate() {
        let source_default = bag.default_at(idx);
        let default = match source_default {
            Some(_) if !layout.shows_defaults() => None,
            Some(_) if layout.ellipsis => Some(RenderedDefault::Ellipsis),
            Some(value) => Some(RenderedDefault::Value(value.clone())),
            None => None,
        };
        params.push(RenderedParam {
            name: layout.parameter_names.then(|| param.name.clone()),
            kind: param.kind,
            annotation: param.annotation.clone(),
            default,
            optional: source_default.is_some(),
        });
    }

    RenderedSignature {
        params,
        return_annotation: if layout.return_annotation {
            bag.return_annotation.clone()
        } else {
            None
        },
    }
}
