use super::*;
use crate::config::DuplicateCodePolicy;
use crate::sink::MemorySink;
use pretty_assertions::assert_eq;

fn compile(sources: &[(&str, &str)]) -> Compilation {
    Compilation::from_sources(sources).unwrap_or_else(|e| panic!("Parse error: {:?}", e.diagnostics()))
}

fn run(config: &Config, compilation: &Compilation) -> (GenerationReport, MemorySink) {
    let mut sink = MemorySink::new();
    let report = Generator::new(config)
        .execute(compilation, &mut sink)
        .unwrap_or_else(|e| panic!("{}", e));
    (report, sink)
}

const API: &str = r#"
namespace Game
{
    public class DnDApi
    {
        [ErrorResult(1, "No enemy provided")]
        [ErrorResult(2, "Invalid enemy ArmourClass")]
        public Result<AttackResult> AttackTheEnemy(Enemy enemy) => null;

        [ErrorResult(10, "Out of spell slots")]
        public async Task<Result> CastSpell() { return null; }

        public Result Rest() => null;
    }
}
"#;

#[test]
fn test_two_runs_are_byte_identical() {
    let compilation = compile(&[("DnDApi.cs", API)]);
    let config = Config::default();
    let (_, first) = run(&config, &compilation);
    let (_, second) = run(&config, &compilation);
    assert_eq!(first.sources(), second.sources());
}

#[test]
fn test_scaffolding_is_emitted_once_per_type() {
    let compilation = compile(&[("DnDApi.cs", API)]);
    let (report, sink) = run(&Config::default(), &compilation);

    assert_eq!(report.sites, 2);
    assert!(!report.has_faults());
    assert_eq!(
        sink.names().collect::<Vec<_>>(),
        vec![
            "Gen_Game_DnDApi_AttackTheEnemy_ErrorCodes",
            "Gen_Game_DnDApi_AttackTheEnemy_Errors",
            "Gen_Game_DnDApi_AttackTheEnemy_ErrorsProvider",
            "Gen_Game_DnDApi_CastSpell_ErrorCodes",
            "Gen_Game_DnDApi_CastSpell_Errors",
            "Gen_Game_DnDApi_CastSpell_ErrorsProvider",
            "Gen_Game_DnDApi_ClassErrorsProvider",
            "Gen_Game_DnDApi_ErrorRepository",
            "Gen_Game_DnDApi_ResultsFactory",
        ]
    );
    assert_eq!(report.artifacts.len(), sink.len());
}

#[test]
fn test_site_order_does_not_change_the_artifact_set() {
    let first = "namespace Game { class Api { [ErrorResult(1, \"a\")] Result One() => null; } }";
    let second = "namespace Game { class Shop { [ErrorResult(2, \"b\")] Result<int> Buy() => default; } }";
    let config = Config::default();

    let (_, forward) = run(&config, &compile(&[("A.cs", first), ("B.cs", second)]));
    let (_, backward) = run(&config, &compile(&[("B.cs", second), ("A.cs", first)]));
    assert_eq!(forward.sources(), backward.sources());
}

#[test]
fn test_async_unwrap_yields_same_accessors() {
    let config = Config::default();
    let sync = compile(&[("A.cs", "class Api { [ErrorResult(1, \"lost\")] Result<Loot> Find() => null; }")]);
    let asynchronous = compile(&[(
        "A.cs",
        "class Api { [ErrorResult(1, \"lost\")] async Task<Result<Loot>> Find() { return null; } }",
    )]);

    let (_, sync) = run(&config, &sync);
    let (_, asynchronous) = run(&config, &asynchronous);
    assert_eq!(sync.get("Gen_Api_Find_Errors"), asynchronous.get("Gen_Api_Find_Errors"));
    assert!(sync
        .get("Gen_Api_Find_Errors")
        .is_some_and(|text| text.contains("public Result<Loot> Lost(Loot response = default)")));
}

#[test]
fn test_faulted_site_does_not_stop_the_run() {
    let source = r#"
class Api
{
    [ErrorResult(1, "first")]
    [ErrorResult(1, "again")]
    Result Broken() => null;

    [ErrorResult(2, "fine")]
    Result Working() => null;
}
"#;
    let mut config = Config::default();
    config.emit.duplicate_codes = DuplicateCodePolicy::Error;
    let (report, sink) = run(&config, &compile(&[("Api.cs", source)]));

    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].site, "Api.Broken");
    assert_eq!(
        report.faults[0].error,
        GeneratorError::DuplicateCode {
            method: "Api.Broken".to_string(),
            code: 1,
        }
    );
    assert_eq!(report.diagnostics.error_count(), 1);
    assert_eq!(report.diagnostics.diagnostics()[0].code, generation::SITE_FAULT);

    assert!(sink.get("Gen_Api_Working_Errors").is_some());
    assert!(sink.get("Gen_Api_Broken_Errors").is_none());
    assert!(sink.get("Gen_Api_Broken_ErrorsProvider").is_none());
    assert!(sink.get("Gen_Api_ResultsFactory").is_some());

    let trace = sink.get("Gen_ResultsGenerator_Trace").unwrap();
    assert_eq!(
        trace,
        "// resultgen trace\n// E2001 Api.Broken: error code 1 appears more than once on `Api.Broken`\n"
    );
}

#[test]
fn test_no_trace_without_faults() {
    let (_, sink) = run(&Config::default(), &compile(&[("DnDApi.cs", API)]));
    assert!(sink.get("Gen_ResultsGenerator_Trace").is_none());
}

#[test]
fn test_warnings_are_reported() {
    let source = "class Api { [ErrorResult(1, \"x\")] [ErrorResult(\"no code\")] Result Run() => null; }";
    let (report, sink) = run(&Config::default(), &compile(&[("Api.cs", source)]));
    assert!(!report.has_faults());
    assert_eq!(report.diagnostics.warning_count(), 1);
    assert!(sink.get("Gen_Api_Run_Errors").is_some());
}

#[test]
fn test_generated_sources_parse() {
    let (_, sink) = run(&Config::default(), &compile(&[("DnDApi.cs", API)]));
    for (name, text) in sink.sources() {
        if let Err(errors) = crate::syntax::parse_source(text, std::path::Path::new(name)) {
            panic!("{} does not parse: {:?}\n{}", name, errors.diagnostics(), text);
        }
    }
}

#[test]
fn test_empty_compilation() {
    let (report, sink) = run(&Config::default(), &compile(&[("Empty.cs", "namespace Nothing { }")]));
    assert_eq!(report.sites, 0);
    assert!(sink.is_empty());
}
