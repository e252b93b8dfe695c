//! Name binding for type syntax

use super::{merge_usings, Compilation, TupleElementRef, TypeRef};
use crate::syntax::{self, NameSegment, TypeDecl, TypeSyntax, UsingDirective, UsingKind};

/// Where a declaration appears: its namespace, enclosing types, visible
/// usings and type parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub namespace: String,
    pub containing_types: Vec<String>,
    pub usings: Vec<UsingDirective>,
    pub type_parameters: Vec<String>,
}

fn join_dotted<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

impl Scope {
    pub fn root(usings: &[UsingDirective]) -> Self {
        Self {
            usings: usings.to_vec(),
            ..Self::default()
        }
    }

    pub fn enter_namespace(&self, name: &str, usings: &[UsingDirective]) -> Self {
        let mut inner = self.clone();
        inner.namespace = join_dotted([self.namespace.as_str(), name]);
        merge_usings(&mut inner.usings, usings);
        inner
    }

    pub fn enter_type(&self, decl: &TypeDecl) -> Self {
        let mut inner = self.clone();
        inner.containing_types.push(decl.name.clone());
        inner
            .type_parameters
            .extend(decl.type_parameters.iter().cloned());
        inner
    }

    pub fn with_type_parameters(&self, params: &[String]) -> Self {
        let mut inner = self.clone();
        inner.type_parameters.extend(params.iter().cloned());
        inner
    }

    /// Metadata name of `name` declared directly in this scope
    pub fn qualify(&self, name: &str) -> String {
        let mut parts = vec![self.namespace.as_str()];
        parts.extend(self.containing_types.iter().map(String::as_str));
        parts.push(name);
        join_dotted(parts)
    }

    fn alias_target(&self, alias: &str) -> Option<&str> {
        self.usings.iter().find_map(|using| match &using.kind {
            UsingKind::Alias { alias: a, target } if a == alias => Some(target.as_str()),
            _ => None,
        })
    }

    /// Metadata names `dotted` could refer to, in lookup order: enclosing
    /// types innermost first, then enclosing namespaces, then usings.
    fn candidates(&self, dotted: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !out.contains(&name) {
                out.push(name);
            }
        };

        for depth in (1..=self.containing_types.len()).rev() {
            let mut parts = vec![self.namespace.as_str()];
            parts.extend(self.containing_types[..depth].iter().map(String::as_str));
            parts.push(dotted);
            push(join_dotted(parts));
        }

        let namespace_parts: Vec<&str> = self.namespace.split('.').filter(|p| !p.is_empty()).collect();
        for depth in (0..=namespace_parts.len()).rev() {
            let mut parts = namespace_parts[..depth].to_vec();
            parts.push(dotted);
            push(join_dotted(parts));
        }

        for using in &self.usings {
            if let UsingKind::Namespace(ns) = &using.kind {
                push(join_dotted([ns.as_str(), dotted]));
            }
        }
        out
    }
}

pub(super) fn bind(compilation: &Compilation, ty: &TypeSyntax, scope: &Scope) -> TypeRef {
    match ty {
        TypeSyntax::Predefined { keyword, .. } => TypeRef::simple(keyword.clone()),
        TypeSyntax::Nullable { inner, .. } => bind(compilation, inner, scope).with_suffix("?"),
        TypeSyntax::Pointer { inner, .. } => bind(compilation, inner, scope).with_suffix("*"),
        TypeSyntax::Array { element, rank, .. } => bind(compilation, element, scope)
            .with_suffix(&format!("[{}]", ",".repeat(rank.saturating_sub(1)))),
        TypeSyntax::Tuple { elements, .. } => TypeRef {
            tuple_elements: elements
                .iter()
                .map(|e| TupleElementRef {
                    ty: bind(compilation, &e.ty, scope),
                    name: e.name.clone(),
                })
                .collect(),
            ..TypeRef::default()
        },
        TypeSyntax::Named {
            alias, segments, ..
        } => bind_named(compilation, alias.as_deref(), segments, scope),
    }
}

fn bind_named(
    compilation: &Compilation,
    alias: Option<&str>,
    segments: &[NameSegment],
    scope: &Scope,
) -> TypeRef {
    let Some((last, qualifier)) = segments.split_last() else {
        return TypeRef::default();
    };
    let arguments: Vec<TypeRef> = last
        .type_arguments
        .iter()
        .map(|arg| bind(compilation, arg, scope))
        .collect();

    if alias.is_none() && qualifier.is_empty() && arguments.is_empty() {
        if scope.type_parameters.contains(&last.name) {
            return TypeRef::type_parameter(last.name.clone());
        }
        if let Some(target) = scope.alias_target(&last.name) {
            if let Ok(target) = syntax::parse_type_str(target) {
                // Alias targets are bound without aliases in scope
                let mut outer = scope.clone();
                outer
                    .usings
                    .retain(|u| !matches!(u.kind, UsingKind::Alias { .. }));
                outer.type_parameters.clear();
                return bind(compilation, &target, &outer);
            }
        }
    }

    let dotted = join_dotted(segments.iter().map(|s| s.name.as_str()));
    let candidates = match alias {
        Some(_) => vec![dotted],
        None => scope.candidates(&dotted),
    };
    for candidate in &candidates {
        if let Some(symbol) = compilation.type_by_metadata_name(candidate) {
            return TypeRef {
                name: symbol.name.clone(),
                namespace: Some(symbol.namespace.clone()).filter(|ns| !ns.is_empty()),
                containing_type: Some(symbol.containing_types.join("."))
                    .filter(|c| !c.is_empty()),
                type_arguments: arguments,
                ..TypeRef::default()
            };
        }
    }

    // Not declared in this compilation: keep the name as written
    let written_qualifier = qualifier
        .iter()
        .map(|segment| {
            let args: Vec<TypeRef> = segment
                .type_arguments
                .iter()
                .map(|arg| bind(compilation, arg, scope))
                .collect();
            if args.is_empty() {
                segment.name.clone()
            } else {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                format!("{}<{}>", segment.name, rendered.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(".");

    match (alias, written_qualifier.is_empty()) {
        (Some(alias), true) => TypeRef::simple(format!("{}::{}", alias, last.name))
            .with_type_arguments(arguments),
        (Some(alias), false) => TypeRef {
            name: last.name.clone(),
            namespace: Some(format!("{}::{}", alias, written_qualifier)),
            type_arguments: arguments,
            ..TypeRef::default()
        },
        (None, true) => TypeRef::simple(last.name.clone()).with_type_arguments(arguments),
        (None, false) => TypeRef {
            name: last.name.clone(),
            namespace: Some(written_qualifier),
            type_arguments: arguments,
            ..TypeRef::default()
        },
    }
}
