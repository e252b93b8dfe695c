//! Semantic model over parsed compilation units
//!
//! A [`Compilation`] declares every type found in its units (merging
//! partial declarations by metadata name) and binds method return types to
//! [`TypeRef`]s. Lookup is by metadata name: the namespace followed by every
//! enclosing type, dot-separated (`Game.Combat.Arena.Rules`).

mod binder;
pub mod symbols;

pub use binder::Scope;
pub use symbols::*;

use crate::diagnostics::DiagnosticBag;
use crate::syntax::{self, CompilationUnit, NamespaceMember, TypeDecl, TypeMember, UsingDirective};
use std::collections::HashMap;
use std::path::Path;

/// The semantic view of a set of source files
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    units: Vec<CompilationUnit>,
    types: Vec<TypeSymbol>,
    index: HashMap<String, usize>,
}

impl Compilation {
    /// Build the model from parsed units
    pub fn new(units: Vec<CompilationUnit>) -> Self {
        let mut compilation = Self {
            units,
            types: Vec::new(),
            index: HashMap::new(),
        };

        // Declare every type first so that return types can bind to types
        // declared later or in other files.
        let mut declared = Vec::new();
        for unit in &compilation.units {
            visit_types(unit, &mut |decl, scope| declared.push((decl.clone(), scope.clone())));
        }
        for (decl, scope) in &declared {
            compilation.declare(decl, scope);
        }
        for (decl, scope) in &declared {
            compilation.define_methods(decl, scope);
        }

        tracing::debug!(
            units = compilation.units.len(),
            types = compilation.types.len(),
            "built compilation"
        );
        compilation
    }

    /// Parse sources given as `(path, text)` pairs and build the model.
    /// All parse errors across all sources are returned together.
    pub fn from_sources<P: AsRef<Path>>(sources: &[(P, &str)]) -> Result<Self, DiagnosticBag> {
        let mut units = Vec::new();
        let mut errors = DiagnosticBag::new();
        for (path, text) in sources {
            match syntax::parse_source(text, path.as_ref()) {
                Ok(unit) => units.push(unit),
                Err(bag) => errors.merge(bag),
            }
        }
        if errors.has_errors() {
            return Err(errors);
        }
        Ok(Self::new(units))
    }

    pub fn units(&self) -> &[CompilationUnit] {
        &self.units
    }

    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    /// Look a type up by its metadata name
    pub fn type_by_metadata_name(&self, metadata_name: &str) -> Option<&TypeSymbol> {
        self.index.get(metadata_name).map(|&i| &self.types[i])
    }

    /// Bind type syntax in the given scope
    pub fn bind(&self, ty: &syntax::TypeSyntax, scope: &Scope) -> TypeRef {
        binder::bind(self, ty, scope)
    }

    fn declare(&mut self, decl: &TypeDecl, scope: &Scope) {
        let metadata_name = scope.qualify(&decl.name);
        if self.index.contains_key(&metadata_name) {
            return;
        }
        self.index.insert(metadata_name.clone(), self.types.len());
        self.types.push(TypeSymbol {
            name: decl.name.clone(),
            namespace: scope.namespace.clone(),
            containing_types: scope.containing_types.clone(),
            metadata_name,
            kind: decl.kind,
            type_parameters: decl.type_parameters.clone(),
            methods: Vec::new(),
        });
    }

    fn define_methods(&mut self, decl: &TypeDecl, scope: &Scope) {
        let metadata_name = scope.qualify(&decl.name);
        let Some(&index) = self.index.get(&metadata_name) else {
            return;
        };

        let inner = scope.enter_type(decl);
        let methods: Vec<MethodSymbol> = decl
            .members
            .iter()
            .filter_map(|member| match member {
                TypeMember::Method(method) => Some(method),
                TypeMember::Type(_) => None,
            })
            .map(|method| {
                let method_scope = inner.with_type_parameters(&method.type_parameters);
                MethodSymbol {
                    name: method.name.clone(),
                    is_async: method.is_async(),
                    type_parameters: method.type_parameters.clone(),
                    return_type: self.bind(&method.return_type, &method_scope),
                    return_syntax: method.return_type.clone(),
                    attributes: method.attributes().map(AttributeData::from_syntax).collect(),
                    imports: scope.usings.clone(),
                    span: method.span.clone(),
                    name_span: method.name_span.clone(),
                }
            })
            .collect();

        self.types[index].methods.extend(methods);
    }
}

/// Call `f` for every type declaration in `unit`, outer types before nested
/// ones, with the scope the declaration appears in.
pub fn visit_types(unit: &CompilationUnit, f: &mut dyn FnMut(&TypeDecl, &Scope)) {
    fn visit_type(decl: &TypeDecl, scope: &Scope, f: &mut dyn FnMut(&TypeDecl, &Scope)) {
        f(decl, scope);
        let inner = scope.enter_type(decl);
        for member in &decl.members {
            if let TypeMember::Type(nested) = member {
                visit_type(nested, &inner, f);
            }
        }
    }

    fn visit_members(
        members: &[NamespaceMember],
        scope: &Scope,
        f: &mut dyn FnMut(&TypeDecl, &Scope),
    ) {
        for member in members {
            match member {
                NamespaceMember::Namespace(ns) => {
                    let inner = scope.enter_namespace(&ns.name, &ns.usings);
                    visit_members(&ns.members, &inner, f);
                }
                NamespaceMember::Type(decl) => visit_type(decl, scope, f),
            }
        }
    }

    let root = Scope::root(&unit.usings);
    visit_members(&unit.members, &root, f);
}

/// Using directives deduplicated by their text, first occurrence kept
pub(crate) fn merge_usings(into: &mut Vec<UsingDirective>, more: &[UsingDirective]) {
    for using in more {
        let text = using.to_string();
        if !into.iter().any(|u| u.to_string() == text) {
            into.push(using.clone());
        }
    }
}
