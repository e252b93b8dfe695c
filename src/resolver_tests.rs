use super::*;
use crate::scanner::Scanner;
use pretty_assertions::assert_eq;

struct Fixture {
    compilation: Compilation,
    marker: MarkerConfig,
    grammar: ResultGrammar,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let compilation = Compilation::from_sources(&[("Api.cs", source)])
            .unwrap_or_else(|e| panic!("Parse error: {:?}", e.diagnostics()));
        Self {
            compilation,
            marker: MarkerConfig::default(),
            grammar: ResultGrammar::default(),
        }
    }

    fn sites(&self) -> Vec<CandidateSite> {
        Scanner::new(&self.marker).scan_units(self.compilation.units())
    }

    fn resolve_all(&self) -> (Vec<ErrorModel>, DiagnosticBag) {
        let resolver = Resolver::new(&self.compilation, &self.marker, &self.grammar);
        let mut bag = DiagnosticBag::new();
        let models = self
            .sites()
            .iter()
            .filter_map(|site| resolver.resolve(site, &mut bag).unwrap())
            .collect();
        (models, bag)
    }

    fn only_model(&self) -> ErrorModel {
        let (mut models, _) = self.resolve_all();
        assert_eq!(models.len(), 1);
        models.remove(0)
    }
}

#[test]
fn test_entries_in_declaration_order() {
    let model = Fixture::new(
        r#"namespace Game
{
    class DnDApi
    {
        [ErrorResult(1, "No enemy provided")]
        [ErrorResult(errorCode: 2, errorMessage: "Invalid enemy ArmourClass")]
        public Result<AttackResult> AttackTheEnemy(Enemy enemy) => null;
    }
}"#,
    )
    .only_model();

    assert_eq!(
        model.entries,
        vec![
            ErrorEntry::new(1, "No enemy provided"),
            ErrorEntry::new(2, "Invalid enemy ArmourClass"),
        ]
    );
    assert_eq!(model.shape.kind, ShapeKind::Value("AttackResult".to_string()));
    assert_eq!(model.site.qualified_id, "Game.DnDApi.AttackTheEnemy");
}

#[test]
fn test_void_shape() {
    let model = Fixture::new("class A { [ErrorResult(1, \"x\")] Result M() => null; }").only_model();
    assert_eq!(model.shape.kind, ShapeKind::Void);
    assert!(!model.shape.is_generic_method());
}

#[test]
fn test_generic_nesting_renders_fully() {
    let model = Fixture::new(
        "class A { [ErrorResult(1, \"x\")] Result<Outer<Middle<Inner>>> M() => null; }",
    )
    .only_model();
    assert_eq!(
        model.shape.kind,
        ShapeKind::Value("Outer<Middle<Inner>>".to_string())
    );
}

#[test]
fn test_async_unwrap_matches_sync_payload() {
    let sync = Fixture::new("class A { [ErrorResult(1, \"x\")] Result<Loot> M() => null; }").only_model();
    let asynchronous = Fixture::new(
        "class A { [ErrorResult(1, \"x\")] async Task<Result<Loot>> M() { return null; } }",
    )
    .only_model();

    assert_eq!(sync.shape.payload(), asynchronous.shape.payload());
    assert_eq!(asynchronous.shape.kind, ShapeKind::AsyncValue("Loot".to_string()));
}

#[test]
fn test_wrapper_without_async_modifier_is_unwrapped() {
    let model = Fixture::new(
        "class A { [ErrorResult(1, \"x\")] UniTask<Result<int>> M() => default; }",
    )
    .only_model();
    assert_eq!(model.shape.kind, ShapeKind::AsyncValue("int".to_string()));
}

#[test]
fn test_method_generics_stay_bare() {
    let model = Fixture::new(
        "namespace N { class T { } class A { [ErrorResult(1, \"x\")] Result<Dictionary<T, TValue>> M<TValue>() => null; } }",
    )
    .only_model();
    assert_eq!(model.shape.generic_parameters, vec!["TValue".to_string()]);
    assert_eq!(
        model.shape.kind,
        ShapeKind::Value("Dictionary<N.T, TValue>".to_string())
    );
}

#[test]
fn test_declared_types_are_qualified() {
    let model = Fixture::new(
        "namespace Game.Models { class Loot { } }\nnamespace Game.Api { using Game.Models; class Shop { [ErrorResult(1, \"x\")] Result<List<Loot>> Buy() => null; } }",
    )
    .only_model();
    assert_eq!(
        model.shape.kind,
        ShapeKind::Value("List<Game.Models.Loot>".to_string())
    );
    let imports: Vec<String> = model.imports.iter().map(|u| u.to_string()).collect();
    assert_eq!(imports, vec!["using Game.Models;"]);
}

#[test]
fn test_prefers_marked_overload() {
    let model = Fixture::new(
        r#"class A
{
    Result<string> M(int x) => null;
    [ErrorResult(7, "marked")]
    Result M() => null;
}"#,
    )
    .only_model();
    assert_eq!(model.entries, vec![ErrorEntry::new(7, "marked")]);
    assert_eq!(model.shape.kind, ShapeKind::Void);
}

#[test]
fn test_malformed_annotation_is_skipped_with_warning() {
    let (models, bag) = Fixture::new(
        r#"class A
{
    [ErrorResult(Codes.Missing, "constant")]
    [ErrorResult(2)]
    [ErrorResult(3, "ok")]
    Result M() => null;
}"#,
    )
    .resolve_all();

    assert_eq!(models[0].entries, vec![ErrorEntry::new(3, "ok")]);
    assert_eq!(bag.warning_count(), 2);
    assert!(bag.diagnostics().iter().all(|d| d.code == "W0103"));
}

#[test]
fn test_unknown_type_is_dropped() {
    let fixture = Fixture::new("class A { [ErrorResult(1, \"x\")] Result M() => null; }");
    let resolver = Resolver::new(&fixture.compilation, &fixture.marker, &fixture.grammar);
    let mut site = fixture.sites().remove(0);
    site.metadata_name = "Nowhere.A".to_string();

    let mut bag = DiagnosticBag::new();
    assert_eq!(resolver.resolve(&site, &mut bag), Ok(None));
}

#[test]
fn test_missing_method_is_an_error() {
    let fixture = Fixture::new("class A { [ErrorResult(1, \"x\")] Result M() => null; }");
    let resolver = Resolver::new(&fixture.compilation, &fixture.marker, &fixture.grammar);
    let mut site = fixture.sites().remove(0);
    site.method_name = "Gone".to_string();

    let mut bag = DiagnosticBag::new();
    assert_eq!(
        resolver.resolve(&site, &mut bag),
        Err(GeneratorError::MissingMethod {
            type_name: "A".to_string(),
            method: "Gone".to_string(),
        })
    );
}

#[test]
fn test_render_type_name() {
    let ty = TypeRef {
        name: "Inner".to_string(),
        namespace: Some("Game".to_string()),
        containing_type: Some("Outer".to_string()),
        type_arguments: vec![TypeRef::simple("T"), TypeRef::simple("int").with_suffix("?")],
        suffix: "[]".to_string(),
        ..TypeRef::default()
    };
    assert_eq!(render_type_name(&ty, &[]), "Game.Outer.Inner<T, int?>[]");
    assert_eq!(
        render_type_name(&ty, &["T".to_string()]),
        "Game.Outer.Inner<T, int?>[]"
    );

    let tuple = TypeRef {
        tuple_elements: vec![
            crate::semantic::TupleElementRef {
                ty: TypeRef::simple("int"),
                name: Some("count".to_string()),
            },
            crate::semantic::TupleElementRef {
                ty: TypeRef::simple("string"),
                name: None,
            },
        ],
        ..TypeRef::default()
    };
    assert_eq!(render_type_name(&tuple, &[]), "(int count, string)");
}
