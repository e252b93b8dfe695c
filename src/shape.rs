//! The Result-wrapping grammar
//!
//! One definition of "is this return type Result-shaped" shared by the
//! checker (over type syntax) and the resolver (over bound types):
//!
//! ```text
//! shape   := result | wrapper '<' result '>'
//! result  := Result | Result '<' T '>'
//! wrapper := Task | UniTask | ValueTask | ...   (configurable)
//! ```

use crate::config::GrammarConfig;
use crate::semantic::TypeRef;
use crate::syntax::TypeSyntax;
use serde::Serialize;

/// Structural view of a type used by the grammar
pub trait TypeShape {
    /// Simple name of a plain named type: no suffix, not a tuple
    fn head(&self) -> Option<&str>;

    /// Type arguments of the head
    fn arguments(&self) -> Vec<&Self>;

    fn is_void(&self) -> bool {
        self.head() == Some("void")
    }
}

impl TypeShape for TypeSyntax {
    fn head(&self) -> Option<&str> {
        match self {
            TypeSyntax::Predefined { keyword, .. } => Some(keyword.as_str()),
            TypeSyntax::Named { segments, .. } => segments.last().map(|s| s.name.as_str()),
            _ => None,
        }
    }

    fn arguments(&self) -> Vec<&Self> {
        match self {
            TypeSyntax::Named { segments, .. } => segments
                .last()
                .map(|s| s.type_arguments.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl TypeShape for TypeRef {
    fn head(&self) -> Option<&str> {
        if self.suffix.is_empty() && !self.is_tuple() && !self.name.is_empty() {
            Some(self.name.as_str())
        } else {
            None
        }
    }

    fn arguments(&self) -> Vec<&Self> {
        if self.head().is_some() {
            self.type_arguments.iter().collect()
        } else {
            Vec::new()
        }
    }
}

/// What a method's errors carry, as written in generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    /// Non-generic `Result`
    Void,
    /// `Result<T>` with the rendered `T`
    Value(String),
    /// `Result<T>` under an async wrapper
    AsyncValue(String),
}

/// Return shape of a candidate method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnShape {
    pub kind: ShapeKind,
    /// The method's own generic parameters, verbatim
    pub generic_parameters: Vec<String>,
}

impl ReturnShape {
    pub fn is_generic_method(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Rendered payload type, if any
    pub fn payload(&self) -> Option<&str> {
        match &self.kind {
            ShapeKind::Void => None,
            ShapeKind::Value(t) | ShapeKind::AsyncValue(t) => Some(t.as_str()),
        }
    }
}

/// Payload found by [`ResultGrammar::infer`], still unrendered
#[derive(Debug, PartialEq)]
pub enum Inferred<'t, T> {
    Void,
    Value(&'t T),
    AsyncValue(&'t T),
}

/// Result grammar parameterized by the configured names
#[derive(Debug, Clone)]
pub struct ResultGrammar {
    result_type: String,
    async_wrappers: Vec<String>,
}

impl Default for ResultGrammar {
    fn default() -> Self {
        Self::new(&GrammarConfig::default())
    }
}

impl ResultGrammar {
    pub fn new(config: &GrammarConfig) -> Self {
        Self {
            result_type: config.result_type.clone(),
            async_wrappers: config.async_wrappers.clone(),
        }
    }

    pub fn result_type(&self) -> &str {
        &self.result_type
    }

    /// Name of the default async wrapper used when a fix has to invent one
    pub fn default_wrapper(&self) -> &str {
        self.async_wrappers
            .first()
            .map(String::as_str)
            .unwrap_or("Task")
    }

    pub fn is_wrapper_name(&self, name: &str) -> bool {
        self.async_wrappers.iter().any(|w| w == name)
    }

    /// `Task<X>` -> `X`
    pub fn unwrap_async<'t, T: TypeShape>(&self, ty: &'t T) -> Option<&'t T> {
        let head = ty.head()?;
        let args = ty.arguments();
        if self.is_wrapper_name(head) && args.len() == 1 {
            Some(args[0])
        } else {
            None
        }
    }

    /// Non-generic `Task`
    pub fn is_unit_wrapper<T: TypeShape>(&self, ty: &T) -> bool {
        ty.head().is_some_and(|h| self.is_wrapper_name(h)) && ty.arguments().is_empty()
    }

    /// `Result` or `Result<T>`
    pub fn is_result<T: TypeShape>(&self, ty: &T) -> bool {
        ty.head() == Some(self.result_type.as_str()) && ty.arguments().len() <= 1
    }

    /// Whether a declared return type satisfies the contract for a method
    /// with or without the `async` modifier
    pub fn conforms<T: TypeShape>(&self, ty: &T, is_async: bool) -> bool {
        match self.unwrap_async(ty) {
            Some(inner) => self.is_result(inner),
            None => !is_async && self.is_result(ty),
        }
    }

    /// Peel one async wrapper layer, then take the single type argument of
    /// what remains as the payload
    pub fn infer<'t, T: TypeShape>(&self, ty: &'t T) -> Inferred<'t, T> {
        let (inner, wrapped) = match self.unwrap_async(ty) {
            Some(inner) => (inner, true),
            None => (ty, false),
        };
        match inner.arguments().as_slice() {
            [payload] if wrapped => Inferred::AsyncValue(*payload),
            [payload] => Inferred::Value(*payload),
            _ => Inferred::Void,
        }
    }
}

#[cfg(test)]
#[path = "shape_tests.rs"]
mod tests;
