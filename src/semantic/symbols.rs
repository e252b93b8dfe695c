//! Symbols produced by the semantic model

use crate::diagnostics::Span;
use crate::syntax::{Attribute, AttributeValue, TypeKind, TypeSyntax, UsingDirective};
use serde::Serialize;

/// A declared type, merged across partial declarations
#[derive(Debug, Clone, Serialize)]
pub struct TypeSymbol {
    pub name: String,
    /// Full dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Enclosing types, outermost first
    pub containing_types: Vec<String>,
    pub metadata_name: String,
    pub kind: TypeKind,
    pub type_parameters: Vec<String>,
    /// Methods in declaration order, across all partial declarations
    pub methods: Vec<MethodSymbol>,
}

impl TypeSymbol {
    /// Methods with the given name, compared ordinally
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSymbol> {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

/// A method member
#[derive(Debug, Clone, Serialize)]
pub struct MethodSymbol {
    pub name: String,
    pub is_async: bool,
    pub type_parameters: Vec<String>,
    pub return_type: TypeRef,
    pub return_syntax: TypeSyntax,
    pub attributes: Vec<AttributeData>,
    /// Using directives visible at the declaration
    pub imports: Vec<UsingDirective>,
    pub span: Span,
    pub name_span: Span,
}

/// An applied attribute with its constant arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeData {
    /// Last segment of the attribute name as written
    pub name: String,
    /// Arguments in source order; named ones carry their parameter name
    pub arguments: Vec<(Option<String>, AttributeValue)>,
    pub span: Span,
}

impl AttributeData {
    pub fn from_syntax(attribute: &Attribute) -> Self {
        Self {
            name: attribute.simple_name().to_string(),
            arguments: attribute
                .arguments
                .iter()
                .map(|arg| (arg.name.clone(), arg.value.clone()))
                .collect(),
            span: attribute.span.clone(),
        }
    }

    /// The argument bound to a constructor parameter: by name if passed by
    /// name, else by position.
    pub fn argument(&self, position: usize, parameter: &str) -> Option<&AttributeValue> {
        self.arguments
            .iter()
            .find(|(name, _)| name.as_deref() == Some(parameter))
            .or_else(|| {
                self.arguments
                    .get(position)
                    .filter(|(name, _)| name.is_none())
            })
            .map(|(_, value)| value)
    }

    pub fn int_argument(&self, position: usize, parameter: &str) -> Option<i64> {
        match self.argument(position, parameter)? {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn str_argument(&self, position: usize, parameter: &str) -> Option<&str> {
        match self.argument(position, parameter)? {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A bound type reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// Simple name; empty for tuples
    pub name: String,
    /// Namespace of a resolved type, or the written qualifier of an
    /// unresolved one
    pub namespace: Option<String>,
    /// Enclosing types of a nested type, dot-separated
    pub containing_type: Option<String>,
    pub type_arguments: Vec<TypeRef>,
    pub tuple_elements: Vec<TupleElementRef>,
    /// Nullable, array and pointer suffixes, innermost first (`[]?`)
    pub suffix: String,
    /// Refers to a type parameter in scope
    pub is_type_parameter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleElementRef {
    pub ty: TypeRef,
    pub name: Option<String>,
}

impl TypeRef {
    /// An unqualified, non-generic type
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_type_parameter: true,
            ..Self::default()
        }
    }

    pub fn with_type_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.type_arguments = arguments;
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix.push_str(suffix);
        self
    }

    pub fn is_tuple(&self) -> bool {
        !self.tuple_elements.is_empty()
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::resolver::render_type_name(self, &[]))
    }
}
