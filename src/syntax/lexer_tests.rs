use super::*;
use std::path::PathBuf;

fn lex(source: &str) -> Vec<TokenKind> {
    let source_file = SourceFile::new(PathBuf::from("Test.cs"), source.to_string());
    Lexer::new(&source_file)
        .tokenize()
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::Eof)
        .collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        lex("public async Task @class _x1"),
        vec![
            ident("public"),
            ident("async"),
            ident("Task"),
            ident("class"),
            ident("_x1"),
        ]
    );
}

#[test]
fn test_integer_literals() {
    assert_eq!(
        lex("42 0x1F 0b101 1_000 7u 9L"),
        vec![
            TokenKind::IntLit(42),
            TokenKind::IntLit(31),
            TokenKind::IntLit(5),
            TokenKind::IntLit(1000),
            TokenKind::IntLit(7),
            TokenKind::IntLit(9),
        ]
    );
}

#[test]
fn test_real_literals() {
    assert_eq!(
        lex("1.5 2f 3e10"),
        vec![
            TokenKind::RealLit("1.5".to_string()),
            TokenKind::RealLit("2f".to_string()),
            TokenKind::RealLit("3e10".to_string()),
        ]
    );
}

#[test]
fn test_string_literals() {
    assert_eq!(
        lex(r#""No enemy provided" "tab\there" @"C:\dir ""q""" $"x{y}""#),
        vec![
            TokenKind::StringLit("No enemy provided".to_string()),
            TokenKind::StringLit("tab\there".to_string()),
            TokenKind::StringLit("C:\\dir \"q\"".to_string()),
            TokenKind::StringLit("x{y}".to_string()),
        ]
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        lex("\"oops\nx"),
        vec![TokenKind::UnterminatedString, ident("x")]
    );
}

#[test]
fn test_generic_closers_are_split() {
    assert_eq!(
        lex("Task<Result<int>>"),
        vec![
            ident("Task"),
            TokenKind::Lt,
            ident("Result"),
            TokenKind::Lt,
            ident("int"),
            TokenKind::Gt,
            TokenKind::Gt,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        lex("{ } ( ) [ ] , ; : :: . = => ? ~"),
        vec![
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Semi,
            TokenKind::Colon,
            TokenKind::ColonColon,
            TokenKind::Dot,
            TokenKind::Eq,
            TokenKind::FatArrow,
            TokenKind::Question,
            TokenKind::Tilde,
        ]
    );
}

#[test]
fn test_trivia_is_skipped() {
    let source = "// line\n#if DEBUG\n/* block\n comment */ int\n#endif\n";
    assert_eq!(lex(source), vec![ident("int")]);
}

#[test]
fn test_unknown_character_becomes_error_token() {
    assert_eq!(
        lex("a ` b"),
        vec![ident("a"), TokenKind::Error("`".to_string()), ident("b")]
    );
}

#[test]
fn test_token_spans() {
    let source_file = SourceFile::new(PathBuf::from("Test.cs"), "void\n  Run".to_string());
    let tokens = Lexer::new(&source_file).tokenize();
    assert_eq!(tokens[1].span.start, 7);
    assert_eq!(tokens[1].span.start_line, 2);
    assert_eq!(tokens[1].span.start_col, 3);
    assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"a\nb"), "a\nb");
    assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
    assert_eq!(unescape(r"\u0041"), "A");
}

#[test]
fn test_block_comments_with_stars() {
    assert_eq!(lex("/* x */ int"), vec![ident("int")]);
    assert_eq!(lex("/** doc **/ a /***/ b /* * / */ c"), vec![ident("a"), ident("b"), ident("c")]);
    assert_eq!(
        lex("/*\n * Copyright\n */\nclass"),
        vec![ident("class")]
    );
}
