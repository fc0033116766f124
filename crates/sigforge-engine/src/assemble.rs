//! Signature assembly
//!
//! Turns a parsed descriptor line into a [`PropertyBag`]. Types resolve with
//! the declaring type as scope, defaults with the parameter's own type token
//! as scope. Output parameters leave the parameter list and move into the
//! return annotation, ahead of the natural return value.

use rustc_hash::FxHashSet;
use sigforge_parser::{Argument, ParamKind, ParsedCallDescriptor, DEFAULT_BRACKET_DEPTH};
use sigforge_types::{Builtin, Position, Resolver, SymbolTable, TypeExpr, Value};

use crate::bag::{Parameter, PropertyBag};
use crate::error::AssembleError;

/// Builds property bags against a symbol table.
pub struct Assembler<'t> {
    resolver: Resolver<'t>,
    optional_returns: &'t [String],
}

impl<'t> Assembler<'t> {
    /// Assembler resolving through `table`.
    pub fn new(table: &'t mut SymbolTable) -> Self {
        Assembler {
            resolver: Resolver::new(table).with_bracket_depth(DEFAULT_BRACKET_DEPTH),
            optional_returns: &[],
        }
    }

    /// Bracket depth used for generic type arguments.
    pub fn with_bracket_depth(mut self, bracket_depth: usize) -> Self {
        self.resolver = self.resolver.with_bracket_depth(bracket_depth);
        self
    }

    /// Functions (by full name) whose result may be `None`.
    pub fn with_optional_returns(mut self, names: &'t [String]) -> Self {
        self.optional_returns = names;
        self
    }

    /// Assemble one descriptor. `scope` is used when the descriptor's name
    /// carries no owner of its own.
    pub fn assemble(
        &mut self,
        descriptor: &ParsedCallDescriptor,
        scope: Option<&str>,
    ) -> Result<PropertyBag, AssembleError> {
        check_structure(&descriptor.arguments)?;
        let declaring = descriptor.owner().or(scope);

        let mut params = Vec::with_capacity(descriptor.arguments.len());
        let mut defaults = Vec::new();
        let mut kwdefaults = Vec::new();
        let mut promoted = Vec::new();
        let mut results = Vec::new();
        let mut seen_default = false;

        for arg in &descriptor.arguments {
            if arg.kind.is_variadic() {
                params.push(Parameter {
                    name: arg.name.clone(),
                    kind: arg.kind,
                    annotation: None,
                });
                continue;
            }

            let value = self.resolver.resolve_type(&arg.type_token, declaring);
            if let Value::ResultVariable(element) = value {
                results.push(element);
                promoted.push(arg.name.clone());
                continue;
            }

            let default = arg
                .default
                .as_deref()
                .map(|token| self.resolver.resolve_value(token, Some(&arg.type_token)));

            let mut annotation = value.annotation(Position::Argument);
            if default.as_ref().is_some_and(Value::is_none) {
                annotation = annotation.optional();
            }

            match (arg.kind.is_positional(), default) {
                (true, Some(default)) => {
                    seen_default = true;
                    defaults.push(default);
                }
                (true, None) => {
                    if seen_default {
                        return Err(AssembleError::RequiredAfterDefault {
                            name: arg.name.clone(),
                            span: arg.span,
                        });
                    }
                }
                (false, Some(default)) => kwdefaults.push((arg.name.clone(), default)),
                (false, None) => {}
            }

            params.push(Parameter {
                name: arg.name.clone(),
                kind: arg.kind,
                annotation: Some(annotation),
            });
        }

        let natural = descriptor
            .return_token
            .as_deref()
            .map(|token| self.resolver.resolve_type(token, declaring).annotation(Position::Return));
        let full_name = match (descriptor.owner(), scope) {
            (None, Some(scope)) => format!("{}.{}", scope, descriptor.full_name),
            _ => descriptor.full_name.clone(),
        };
        let return_annotation = self.return_annotation(&full_name, results, natural);

        Ok(PropertyBag {
            short_name: descriptor.short_name().to_string(),
            full_name,
            multi_index: descriptor.multi_index,
            params,
            defaults,
            kwdefaults,
            return_annotation,
            promoted,
        })
    }

    /// Output parameters first, the natural return value last.
    fn return_annotation(
        &self,
        full_name: &str,
        mut results: Vec<TypeExpr>,
        natural: Option<TypeExpr>,
    ) -> Option<TypeExpr> {
        let annotation = match natural {
            Some(TypeExpr::Builtin(Builtin::NoneType)) if !results.is_empty() => {
                Some(collapse(results))
            }
            Some(natural) if !results.is_empty() => {
                results.push(natural);
                Some(collapse(results))
            }
            Some(natural) => Some(natural),
            None if !results.is_empty() => Some(collapse(results)),
            None => None,
        };

        if self.optional_returns.iter().any(|name| name == full_name) {
            annotation.map(TypeExpr::optional)
        } else {
            annotation
        }
    }
}

fn collapse(mut results: Vec<TypeExpr>) -> TypeExpr {
    if results.len() == 1 {
        results.remove(0)
    } else {
        TypeExpr::tuple(results)
    }
}

/// Kinds must not decrease and names must be unique.
fn check_structure(arguments: &[Argument]) -> Result<(), AssembleError> {
    let mut names = FxHashSet::default();
    let mut previous: Option<ParamKind> = None;

    for arg in arguments {
        if !names.insert(arg.name.as_str()) {
            return Err(AssembleError::DuplicateParameter {
                name: arg.name.clone(),
                span: arg.span,
            });
        }
        if let Some(previous) = previous {
            let repeated_variadic = arg.kind.is_variadic() && arg.kind == previous;
            if arg.kind < previous || repeated_variadic {
                return Err(AssembleError::KindRegression {
                    name: arg.name.clone(),
                    kind: arg.kind,
                    previous,
                    span: arg.span,
                });
            }
        }
        previous = Some(arg.kind);
    }
    Ok(())
}
