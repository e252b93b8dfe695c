//! Lexer for the C# declaration subset
//!
//! Keywords are not distinguished from identifiers at this level; most C#
//! keywords are contextual and the parser checks identifier text where it
//! needs to. Comments, whitespace and preprocessor directive lines are
//! trivia.

use crate::diagnostics::Span;
use crate::syntax::span::SourceFile;
use logos::Logos;

/// Token types
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f\u{FEFF}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // Identifiers (a leading `@` marks a verbatim identifier and is dropped)
    #[regex(r"@?[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().trim_start_matches('@').to_string())]
    Ident(String),

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+[uUlL]*", |lex| parse_radix(lex.slice(), 16))]
    #[regex(r"0[bB][01_]+[uUlL]*", |lex| parse_radix(lex.slice(), 2))]
    #[regex(r"[0-9][0-9_]*[uUlL]*", |lex| parse_radix(lex.slice(), 10))]
    IntLit(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdDmM]?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[fFdDmM]", |lex| lex.slice().to_string())]
    RealLit(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(&lex.slice()[1..lex.slice().len() - 1]))]
    #[regex(r#"\$"([^"\\\n]|\\.)*""#, |lex| unescape(&lex.slice()[2..lex.slice().len() - 1]))]
    #[regex(r#"@"([^"]|"")*""#, |lex| lex.slice()[2..lex.slice().len() - 1].replace("\"\"", "\""))]
    #[regex(r#"(\$@|@\$)"([^"]|"")*""#, |lex| lex.slice()[3..lex.slice().len() - 1].replace("\"\"", "\""))]
    StringLit(String),

    /// A regular string literal missing its closing quote on the same line
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"'([^'\\\n]|\\[^\n][^'\n]*)'", |lex| lex.slice().to_string())]
    CharLit(String),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,
    #[token("-")]
    Minus,

    /// Any other operator character; only ever skipped over
    #[regex(r"[!+/%&|^@$\\]")]
    Punct,

    /// A character the lexer does not recognize
    Error(String),

    // End of file
    Eof,
}

impl TokenKind {
    /// Identifier text, if this is an identifier token
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.ident() == Some(text)
    }
}

fn parse_radix(slice: &str, radix: u32) -> Option<i64> {
    let digits = slice.trim_end_matches(['u', 'U', 'l', 'L']);
    let digits = if radix == 10 { digits } else { &digits[2..] };
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    i64::from_str_radix(&cleaned, radix)
        .ok()
        .or_else(|| u64::from_str_radix(&cleaned, radix).ok().map(|v| v as i64))
}

/// Resolve the escape sequences of a regular string literal body
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A token with its span
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer over one source file
pub struct Lexer<'a> {
    source: &'a SourceFile,
    logos_lexer: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            logos_lexer: TokenKind::lexer(source.content()),
            at_eof: false,
        }
    }

    /// Get the next token. Unrecognized input becomes an `Error` token so
    /// the parser decides how to report it.
    pub fn next_token(&mut self) -> Token {
        let end = self.source.content().len();
        if self.at_eof {
            return Token::new(TokenKind::Eof, self.source.span(end, end));
        }

        match self.logos_lexer.next() {
            Some(Ok(kind)) => {
                let range = self.logos_lexer.span();
                Token::new(kind, self.source.span(range.start, range.end))
            }
            Some(Err(())) => {
                let range = self.logos_lexer.span();
                Token::new(
                    TokenKind::Error(self.logos_lexer.slice().to_string()),
                    self.source.span(range.start, range.end),
                )
            }
            None => {
                self.at_eof = true;
                Token::new(TokenKind::Eof, self.source.span(end, end))
            }
        }
    }

    /// Lex the whole file; the last token is always `Eof`
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
