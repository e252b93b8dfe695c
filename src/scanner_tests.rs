use super::*;
use crate::syntax::parse_source;
use std::path::PathBuf;

fn unit(path: &str, source: &str) -> CompilationUnit {
    parse_source(source, &PathBuf::from(path))
        .unwrap_or_else(|e| panic!("Parse error: {:?}", e.diagnostics()))
}

const API: &str = r#"namespace Game.Combat
{
    public class DnDApi
    {
        [ErrorResult(1, "No enemy provided")]
        public Result Attack() => null;

        [ErrorResultAttribute(2, "Too far")]
        public Result Move() => null;

        [Obsolete]
        public Result Rest() => null;

        [errorresult(3, "case")]
        public Result Lower() => null;

        public class Rules
        {
            [TDS.Results.ErrorResult(4, "Bad roll")]
            public Result Roll() => null;
        }
    }
}
"#;

#[test]
fn test_scan_finds_marked_methods() {
    let marker = MarkerConfig::default();
    let sites = Scanner::new(&marker).scan(&unit("Api.cs", API));

    let ids: Vec<&str> = sites.iter().map(|s| s.qualified_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Game.Combat.DnDApi.Attack",
            "Game.Combat.DnDApi.Move",
            "Game.Combat.Rules.Roll",
        ]
    );

    let roll = &sites[2];
    assert_eq!(roll.namespace, "Game.Combat");
    assert_eq!(roll.enclosing_type, "Rules");
    assert_eq!(roll.metadata_name, "Game.Combat.DnDApi.Rules");
    assert_eq!(roll.method_name, "Roll");
    assert_eq!(&API[roll.span.start..roll.span.end], "Roll");
}

#[test]
fn test_scan_global_namespace() {
    let marker = MarkerConfig::default();
    let sites = Scanner::new(&marker).scan(&unit(
        "A.cs",
        "class Shop { [ErrorResult(1, \"x\")] Result Buy() => null; }",
    ));
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].qualified_id, "Shop.Buy");
    assert_eq!(sites[0].namespace, "");
    assert_eq!(sites[0].metadata_name, "Shop");
}

#[test]
fn test_scan_is_repeatable() {
    let marker = MarkerConfig::default();
    let scanner = Scanner::new(&marker);
    let parsed = unit("Api.cs", API);
    assert_eq!(scanner.scan(&parsed), scanner.scan(&parsed));
}

#[test]
fn test_scan_units_first_wins() {
    let marker = MarkerConfig::default();
    let first = unit(
        "A.cs",
        "namespace N { partial class T { [ErrorResult(1, \"a\")] Result M() => null; } }",
    );
    let second = unit(
        "B.cs",
        "namespace N { partial class T { [ErrorResult(2, \"b\")] Result M(int x) => null; } }",
    );

    let sites = Scanner::new(&marker).scan_units(&[first, second]);
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].span.file, PathBuf::from("A.cs"));
}

#[test]
fn test_custom_marker() {
    let marker = MarkerConfig {
        full_name: "FailsWithAttribute".to_string(),
        short_name: "FailsWith".to_string(),
        ..MarkerConfig::default()
    };
    let sites = Scanner::new(&marker).scan(&unit(
        "A.cs",
        "class T { [FailsWith(1, \"a\")] Result A() => null; [ErrorResult(2, \"b\")] Result B() => null; }",
    ));
    let names: Vec<&str> = sites.iter().map(|s| s.method_name.as_str()).collect();
    assert_eq!(names, vec!["A"]);
}

#[test]
fn test_block_comments_do_not_hide_methods() {
    let source = r#"/*
 * Copyright (c) Game Studio
 */
namespace Game
{
    public class Api
    {
        /* [ErrorResult(1, "Old")]
        public Result Old() => null; */

        [ErrorResult(2, "Gone")] /* inline */
        public Result Run() => null;
    }
}
"#;
    let marker = MarkerConfig::default();
    let sites = Scanner::new(&marker).scan(&unit("Api.cs", source));
    let ids: Vec<&str> = sites.iter().map(|s| s.qualified_id.as_str()).collect();
    assert_eq!(ids, vec!["Game.Api.Run"]);
}
