//! Rendering layouts
//!
//! A closed set of boolean switches deciding which parts of a signature a
//! rendering shows. Four layouts are predefined:
//!
//! | name          | definition | defaults | ellipsis | return | names |
//! |---------------|------------|----------|----------|--------|-------|
//! | `signature`   | yes        | yes      | no       | yes    | yes   |
//! | `existence`   | no         | no       | no       | no     | no    |
//! | `hintingstub` | yes        | yes      | yes      | yes    | yes   |
//! | `typeerror`   | no         | yes      | no       | no     | no    |

use crate::error::LayoutError;

/// Switches controlling one rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutConfig {
    /// Add the implicit `self`/`cls` parameter for methods
    pub definition: bool,
    /// Show default values
    pub defaults: bool,
    /// Show `...` instead of each default value
    pub ellipsis: bool,
    /// Show the return annotation
    pub return_annotation: bool,
    /// Show parameter names; when off only types are rendered
    pub parameter_names: bool,
}

impl LayoutConfig {
    /// Switch names accepted by [`LayoutConfig::set`].
    pub const SWITCHES: [&'static str; 5] = [
        "definition",
        "defaults",
        "ellipsis",
        "return_annotation",
        "parameter_names",
    ];

    /// Names accepted by [`LayoutConfig::by_name`].
    pub const NAMES: [&'static str; 4] = ["signature", "existence", "hintingstub", "typeerror"];

    /// Everything shown.
    pub const fn full() -> Self {
        LayoutConfig {
            definition: true,
            defaults: true,
            ellipsis: false,
            return_annotation: true,
            parameter_names: true,
        }
    }

    /// Arity and types only, for overload existence checks.
    pub const fn existence() -> Self {
        LayoutConfig {
            definition: false,
            defaults: false,
            ellipsis: false,
            return_annotation: false,
            parameter_names: false,
        }
    }

    /// Full layout with `...` standing in for every default.
    pub const fn hinting_stub() -> Self {
        LayoutConfig {
            ellipsis: true,
            ..Self::full()
        }
    }

    /// Shape used in "no matching overload" messages.
    pub const fn error_message() -> Self {
        LayoutConfig {
            definition: false,
            defaults: true,
            ellipsis: false,
            return_annotation: false,
            parameter_names: false,
        }
    }

    /// Predefined layout by name.
    pub fn by_name(name: &str) -> Result<Self, LayoutError> {
        match name {
            "signature" => Ok(Self::full()),
            "existence" => Ok(Self::existence()),
            "hintingstub" => Ok(Self::hinting_stub()),
            "typeerror" => Ok(Self::error_message()),
            other => Err(LayoutError::UnknownLayout(other.to_string())),
        }
    }

    /// Set one switch. Only booleans are accepted.
    pub fn set(&mut self, switch: &str, value: &serde_json::Value) -> Result<(), LayoutError> {
        let slot = match switch {
            "definition" => &mut self.definition,
            "defaults" => &mut self.defaults,
            "ellipsis" => &mut self.ellipsis,
            "return_annotation" => &mut self.return_annotation,
            "parameter_names" => &mut self.parameter_names,
            other => return Err(LayoutError::UnknownSwitch(other.to_string())),
        };
        let serde_json::Value::Bool(flag) = value else {
            return Err(LayoutError::NotBoolean {
                switch: switch.to_string(),
                value: value.to_string(),
            });
        };
        *slot = *flag;
        Ok(())
    }

    /// Builder form of [`LayoutConfig::set`].
    pub fn with(mut self, switch: &str, value: bool) -> Result<Self, LayoutError> {
        self.set(switch, &serde_json::Value::Bool(value))?;
        Ok(self)
    }

    /// Whether default values end up in the rendering.
    ///
    /// Nameless renderings never show defaults: they describe a shape.
    pub fn shows_defaults(&self) -> bool {
        self.defaults && self.parameter_names
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::full()
    }
}
