//! Declaration-level syntax tree
//!
//! Only the structure the generator and checker need is kept: usings,
//! namespaces, type declarations, methods with their attributes, modifiers
//! and return type syntax. Method bodies and other members are not
//! represented.

use crate::diagnostics::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One parsed source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub span: Span,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
}

/// `using` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsingDirective {
    pub span: Span,
    pub global: bool,
    pub kind: UsingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsingKind {
    /// `using System.Linq;`
    Namespace(String),
    /// `using static System.Math;`
    Static(String),
    /// `using Map = System.Collections.Generic.Dictionary<string, int>;`
    Alias { alias: String, target: String },
}

impl fmt::Display for UsingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("global ")?;
        }
        match &self.kind {
            UsingKind::Namespace(name) => write!(f, "using {};", name),
            UsingKind::Static(name) => write!(f, "using static {};", name),
            UsingKind::Alias { alias, target } => write!(f, "using {} = {};", alias, target),
        }
    }
}

/// Members allowed at compilation-unit or namespace level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NamespaceMember {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

/// `namespace A.B { ... }` or file-scoped `namespace A.B;`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub span: Span,
    pub name: String,
    pub file_scoped: bool,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    RecordStruct,
    Enum,
}

/// Class, struct, interface, record or enum declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub span: Span,
    pub kind: TypeKind,
    pub name: String,
    pub name_span: Span,
    pub type_parameters: Vec<String>,
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub members: Vec<TypeMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeMember {
    Type(TypeDecl),
    Method(MethodDecl),
}

/// A method declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Whole declaration, attributes included
    pub span: Span,
    pub attributes: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeSyntax,
    pub name: String,
    pub name_span: Span,
    pub type_parameters: Vec<String>,
    pub body: MethodBody,
}

impl MethodDecl {
    pub fn has_modifier(&self, keyword: &str) -> bool {
        self.modifiers.iter().any(|m| m.keyword == keyword)
    }

    pub fn is_async(&self) -> bool {
        self.has_modifier("async")
    }

    /// All attributes across every attribute list, in source order
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().flat_map(|list| list.attributes.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodBody {
    Block,
    Expression,
    /// Abstract, interface, partial or extern declaration
    None,
}

/// A modifier keyword such as `public` or `async`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub keyword: String,
    pub span: Span,
}

/// `[target: A, B(...)]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeList {
    pub span: Span,
    pub target: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// One attribute application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub span: Span,
    /// Dotted name segments as written (`TDS.Results.ErrorResult`)
    pub name: Vec<String>,
    pub arguments: Vec<AttributeArgument>,
}

impl Attribute {
    /// The name token the attribute is identified by: its last segment
    pub fn simple_name(&self) -> &str {
        self.name.last().map(String::as_str).unwrap_or("")
    }
}

/// A positional, named (`errorCode: 1`) or property (`Name = x`) argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeArgument {
    pub span: Span,
    pub name: Option<String>,
    pub value: AttributeValue,
}

/// Literal attribute argument values; anything else is kept as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Int(i64),
    Str(String),
    Bool(bool),
    Other(String),
}

/// Type syntax as written at a declaration site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeSyntax {
    /// `void`, `int`, `string`, ...
    Predefined { keyword: String, span: Span },
    /// `Result`, `Task<Result<T>>`, `System.Collections.Generic.List<int>`
    Named {
        alias: Option<String>,
        segments: Vec<NameSegment>,
        span: Span,
    },
    Nullable { inner: Box<TypeSyntax>, span: Span },
    Array {
        element: Box<TypeSyntax>,
        rank: usize,
        span: Span,
    },
    Pointer { inner: Box<TypeSyntax>, span: Span },
    Tuple { elements: Vec<TupleElement>, span: Span },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSegment {
    pub name: String,
    pub type_arguments: Vec<TypeSyntax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    pub ty: TypeSyntax,
    pub name: Option<String>,
}

impl TypeSyntax {
    pub fn span(&self) -> &Span {
        match self {
            TypeSyntax::Predefined { span, .. }
            | TypeSyntax::Named { span, .. }
            | TypeSyntax::Nullable { span, .. }
            | TypeSyntax::Array { span, .. }
            | TypeSyntax::Pointer { span, .. }
            | TypeSyntax::Tuple { span, .. } => span,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeSyntax::Predefined { keyword, .. } if keyword == "void")
    }
}

fn write_type_list(f: &mut fmt::Formatter<'_>, types: &[TypeSyntax]) -> fmt::Result {
    f.write_str("<")?;
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    f.write_str(">")
}

/// Canonical text of the type, independent of the original spacing
impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Predefined { keyword, .. } => f.write_str(keyword),
            TypeSyntax::Named {
                alias, segments, ..
            } => {
                if let Some(alias) = alias {
                    write!(f, "{}::", alias)?;
                }
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(&segment.name)?;
                    if !segment.type_arguments.is_empty() {
                        write_type_list(f, &segment.type_arguments)?;
                    }
                }
                Ok(())
            }
            TypeSyntax::Nullable { inner, .. } => write!(f, "{}?", inner),
            TypeSyntax::Array { element, rank, .. } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeSyntax::Pointer { inner, .. } => write!(f, "{}*", inner),
            TypeSyntax::Tuple { elements, .. } => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element.ty)?;
                    if let Some(name) = &element.name {
                        write!(f, " {}", name)?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

impl CompilationUnit {
    /// Every method declaration in the file, in source order
    pub fn methods(&self) -> Vec<&MethodDecl> {
        fn from_type<'a>(decl: &'a TypeDecl, out: &mut Vec<&'a MethodDecl>) {
            for member in &decl.members {
                match member {
                    TypeMember::Method(method) => out.push(method),
                    TypeMember::Type(nested) => from_type(nested, out),
                }
            }
        }
        fn from_members<'a>(members: &'a [NamespaceMember], out: &mut Vec<&'a MethodDecl>) {
            for member in members {
                match member {
                    NamespaceMember::Namespace(ns) => from_members(&ns.members, out),
                    NamespaceMember::Type(decl) => from_type(decl, out),
                }
            }
        }

        let mut out = Vec::new();
        from_members(&self.members, &mut out);
        out
    }

    /// The innermost method declaration whose span contains `offset`
    pub fn method_at(&self, offset: usize) -> Option<&MethodDecl> {
        self.methods()
            .into_iter()
            .filter(|m| m.span.contains(offset))
            .min_by_key(|m| m.span.len())
    }
}
