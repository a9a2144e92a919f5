//! A parameter's declaration: its name, kind, and constraints, independent
//! of any particular value.

use flux_core::Key;

use crate::kind::ParameterKind;
use crate::value::ParameterValue;

/// `(name, kind, description?, required?, repeated?, hidden?, defaultValue?)`.
///
/// `repeated = true` means an input accepts multiple upstream connections,
/// yielding an ordered sequence at runtime rather than a single value.
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub name: Key,
    pub kind: ParameterKind,
    pub description: Option<String>,
    pub required: bool,
    pub repeated: bool,
    pub hidden: bool,
    pub default_value: Option<ParameterValue>,
}

impl ParameterDecl {
    #[must_use]
    pub fn new(name: Key, kind: ParameterKind) -> Self {
        Self {
            name,
            kind,
            description: None,
            required: false,
            repeated: false,
            hidden: false,
            default_value: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: ParameterValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Whether this declaration, absent any incoming edge, is still
    /// satisfiable: required inputs need either a default or an edge: the
    /// edge side of that check belongs to the validator, not here.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}
