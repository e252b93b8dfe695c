//! End-to-end tests through the public API: check, fix, generate.

use std::path::Path;

use pretty_assertions::assert_eq;
use resultgen::diagnostics::error_codes::contract;
use resultgen::prelude::*;
use resultgen::shape::ResultGrammar;
use resultgen::syntax::parse_source;

fn compile(sources: &[(&str, &str)]) -> Compilation {
    Compilation::from_sources(sources).unwrap_or_else(|e| panic!("Parse error: {:?}", e.diagnostics()))
}

fn generate(config: &Config, compilation: &Compilation) -> (GenerationReport, MemorySink) {
    let mut sink = MemorySink::new();
    let report = Generator::new(config)
        .execute(compilation, &mut sink)
        .unwrap_or_else(|e| panic!("{}", e));
    (report, sink)
}

const UNFIXED: &str = r#"namespace Accounts
{
    public class Api
    {
        [ErrorResult(1, "Failed")]
        public void Save() { }

        [ErrorResult(2, "Timed out")]
        public async void Sync() { }

        [ErrorResult(3, "Unknown user")]
        public string Name() => "";

        public int Count() => 0;
    }
}
"#;

#[test]
fn test_check_fix_generate() {
    let config = Config::default();
    let grammar = ResultGrammar::new(&config.grammar);
    let checker = Checker::new(&config.marker, &grammar);
    let path = Path::new("Api.cs");

    let unit = parse_source(UNFIXED, path).unwrap();
    let violations = checker.check_unit(&unit);
    assert_eq!(violations.len(), 3);
    assert!(violations
        .diagnostics()
        .iter()
        .all(|d| d.code == contract::INVALID_RETURN_TYPE));

    let offsets: Vec<usize> = violations.diagnostics().iter().map(|d| d.span.start).collect();
    let fixed = Fixer::new(&grammar)
        .fix_all(UNFIXED, &unit, &offsets, &CancellationToken::new())
        .unwrap();
    assert!(fixed.contains("public Result Save() { }"));
    assert!(fixed.contains("public async Task<Result> Sync() { }"));
    assert!(fixed.contains("public Result<string> Name() => \"\";"));
    assert!(fixed.contains("public int Count() => 0;"));

    let unit = parse_source(&fixed, path).unwrap();
    assert!(checker.check_unit(&unit).is_empty());

    let (report, sink) = generate(&config, &compile(&[("Api.cs", &fixed)]));
    assert_eq!(report.sites, 3);
    assert!(!report.has_faults());

    let save = sink.get("Gen_Accounts_Api_Save_Errors").unwrap();
    assert!(save.contains("public Result Failed => new Result(succeeded: false, errorCode: 1, errorMessage: \"Failed\");"));
    let sync = sink.get("Gen_Accounts_Api_Sync_Errors").unwrap();
    assert!(sync.contains("public Result TimedOut => new Result(succeeded: false, errorCode: 2);"));
    let name = sink.get("Gen_Accounts_Api_Name_Errors").unwrap();
    assert!(name.contains("public Result<string> UnknownUser(string response = default)"));
}

#[test]
fn test_partial_type_across_files_shares_scaffolding() {
    let compilation = compile(&[
        (
            "Arena.Open.cs",
            "namespace Game { public partial class Arena { [ErrorResult(1, \"Closed\")] public Result Open() => null; } }",
        ),
        (
            "Arena.Close.cs",
            "namespace Game { public partial class Arena { [ErrorResult(2, \"Already closed\")] public Result Close() => null; } }",
        ),
    ]);
    let (report, sink) = generate(&Config::default(), &compilation);

    let count = |suffix: &str| report.artifacts.iter().filter(|a| a.name.ends_with(suffix)).count();
    assert_eq!(count("_ResultsFactory"), 1);
    assert_eq!(count("_ErrorRepository"), 1);
    assert_eq!(count("_ClassErrorsProvider"), 1);
    assert_eq!(count("_ErrorsProvider"), 2);
    assert_eq!(count("_Errors"), 2);
    assert_eq!(sink.len(), report.artifacts.len());
}

#[test]
fn test_nested_generic_payload_is_rendered_whole() {
    let compilation = compile(&[(
        "Api.cs",
        "class Api { [ErrorResult(1, \"Bad\")] public Result<Outer<Middle<Inner>>> Load() => null; }",
    )]);
    let (_, sink) = generate(&Config::default(), &compilation);
    let text = sink.get("Gen_Api_Load_Errors").unwrap();
    assert!(text.contains(
        "public Result<Outer<Middle<Inner>>> Bad(Outer<Middle<Inner>> response = default) => new Result<Outer<Middle<Inner>>>(succeeded: false, errorCode: 1, response: response);"
    ));
}

#[test]
fn test_generic_method_accessor_carries_type_parameters() {
    let compilation = compile(&[(
        "Store.cs",
        "class Store { [ErrorResult(4, \"Missing\")] public Result<T> Find<T>(string key) => null; }",
    )]);
    let (_, sink) = generate(&Config::default(), &compilation);
    let text = sink.get("Gen_Store_Find_Errors").unwrap();
    assert!(text.contains("public Result<T> Missing<T>(T response = default)"));
}

#[test]
fn test_unannotated_methods_produce_nothing() {
    let compilation = compile(&[(
        "Api.cs",
        "class Api { public Result Plain() => null; public Result<int> Count() => null; }",
    )]);
    let (report, sink) = generate(&Config::default(), &compilation);
    assert!(sink.is_empty());
    assert!(report.artifacts.is_empty());
    assert!(!report.has_faults());
}

#[test]
fn test_generated_sources_reparse_and_pass_the_checker() {
    let compilation = compile(&[("Cart.cs", include_str!("golden/shop/input/Cart.cs"))]);
    let config = Config::default();
    let (_, sink) = generate(&config, &compilation);
    assert!(!sink.is_empty());

    let grammar = ResultGrammar::new(&config.grammar);
    let checker = Checker::new(&config.marker, &grammar);
    for (name, text) in sink.sources() {
        let unit = parse_source(text, Path::new(name))
            .unwrap_or_else(|e| panic!("{} does not parse: {:?}", name, e.diagnostics()));
        assert!(checker.check_unit(&unit).is_empty(), "{}", name);
    }
}

#[test]
fn test_directory_sink_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("Generated");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("Gen_Old_Gone_Errors.cs"), "// stale").unwrap();
    std::fs::write(out.join("Handwritten.cs"), "class Handwritten { }").unwrap();

    let compilation = compile(&[(
        "Api.cs",
        "class Api { [ErrorResult(1, \"Gone\")] public Result Run() => null; }",
    )]);
    let config = Config::default();

    let mut sink = DirectorySink::create(&out).unwrap();
    let report = Generator::new(&config).execute(&compilation, &mut sink).unwrap();
    assert_eq!(sink.changed(), report.artifacts.len());
    let removed = sink.prune_stale(&config.emit.file_prefix).unwrap();
    assert_eq!(removed, vec![out.join("Gen_Old_Gone_Errors.cs")]);
    assert!(out.join("Handwritten.cs").exists());

    let mut again = DirectorySink::create(&out).unwrap();
    Generator::new(&config).execute(&compilation, &mut again).unwrap();
    assert_eq!(again.changed(), 0);
    assert!(again.prune_stale(&config.emit.file_prefix).unwrap().is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let compilation = compile(&[(
        "Api.cs",
        "class Api { [ErrorResult(1, \"a\")] [ErrorResult(1, \"b\")] public Result Run() => null; }",
    )]);
    let (report, _) = generate(&Config::default(), &compilation);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sites"], 1);
    assert_eq!(json["faults"].as_array().unwrap().len(), 0);
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 1);
    assert_eq!(json["diagnostics"][0]["code"], "W0101");
}
