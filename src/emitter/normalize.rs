//! Whitespace normalization of generated source
//!
//! Templates are written for readability, not layout. Every artifact passes
//! through [`normalize`] once before it reaches a sink: blank lines are
//! dropped, runs of whitespace outside literals collapse to one space,
//! lines are re-indented by brace depth and preprocessor directives sit at
//! column 0.

const INDENT: &str = "    ";

/// Lexical state while walking one line
#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Str,
    Verbatim,
    Char,
}

/// Re-layout C# source text
pub fn normalize(text: &str) -> String {
    let mut out = String::new();
    let mut depth: usize = 0;

    for raw in text.lines() {
        let line = collapse(raw.trim());
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            out.push_str(&line);
            out.push('\n');
            continue;
        }

        let (opens, closes) = braces(&line);
        let indent = if line.starts_with('}') {
            depth.saturating_sub(1)
        } else {
            depth
        };
        for _ in 0..indent {
            out.push_str(INDENT);
        }
        out.push_str(&line);
        out.push('\n');
        depth = (depth + opens).saturating_sub(closes);
    }
    out
}

/// Collapse whitespace runs outside string and char literals
fn collapse(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    walk(line, |c, state| {
        if state == State::Code && c.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    });
    out
}

/// Count `{` and `}` outside literals and line comments
fn braces(line: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    walk(line, |c, state| {
        if state == State::Code {
            match c {
                '{' => opens += 1,
                '}' => closes += 1,
                _ => {}
            }
        }
    });
    (opens, closes)
}

/// Feed each character of a line to `f` with the state it was read in.
/// Characters of a trailing `//` comment are reported as literal text.
fn walk(line: &str, mut f: impl FnMut(char, State)) {
    let mut state = State::Code;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => {
                if c == '/' && chars.peek() == Some(&'/') {
                    f(c, State::Str);
                    for rest in chars.by_ref() {
                        f(rest, State::Str);
                    }
                    return;
                }
                f(c, State::Code);
                match c {
                    '"' => state = State::Str,
                    '\'' => state = State::Char,
                    '@' if chars.peek() == Some(&'"') => {
                        if let Some(quote) = chars.next() {
                            f(quote, State::Code);
                        }
                        state = State::Verbatim;
                    }
                    _ => {}
                }
            }
            State::Str | State::Char => {
                f(c, state);
                let close = if state == State::Str { '"' } else { '\'' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        f(escaped, state);
                    }
                } else if c == close {
                    state = State::Code;
                }
            }
            State::Verbatim => {
                f(c, state);
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        if let Some(quote) = chars.next() {
                            f(quote, state);
                        }
                    } else {
                        state = State::Code;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reindents_by_brace_depth() {
        let raw = "
            namespace Game
            {
                    public class A
              {
                 public int X => 1;
                }
            }
        ";
        assert_eq!(
            normalize(raw),
            "namespace Game\n{\n    public class A\n    {\n        public int X => 1;\n    }\n}\n"
        );
    }

    #[test]
    fn test_directives_at_column_zero() {
        let raw = "class A\n{\n   #if DEBUG\n   int X;\n   #else\n   int Y;\n   #endif\n}";
        assert_eq!(
            normalize(raw),
            "class A\n{\n#if DEBUG\n    int X;\n#else\n    int Y;\n#endif\n}\n"
        );
    }

    #[test]
    fn test_whitespace_in_literals_is_kept() {
        assert_eq!(
            normalize("var  x  =  \"a  {  b\"  +  'c';"),
            "var x = \"a  {  b\" + 'c';\n"
        );
        assert_eq!(normalize("var x = @\"say \"\"{hi}\"\"  \";"), "var x = @\"say \"\"{hi}\"\"  \";\n");
        assert_eq!(normalize("s = \"a\\\"  {\";\nt;"), "s = \"a\\\"  {\";\nt;\n");
    }

    #[test]
    fn test_empty_braces_and_comments() {
        assert_eq!(
            normalize("class A\n{\n  class B\n  {}\n  // not a { brace\n  int X;\n}"),
            "class A\n{\n    class B\n    {}\n    // not a { brace\n    int X;\n}\n"
        );
    }

    #[test]
    fn test_unbalanced_input_does_not_underflow() {
        assert_eq!(normalize("}\n}\nx;"), "}\n}\nx;\n");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[ a-z{};\"'#/@\\\\\n\t]{0,80}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_only_touches_whitespace(text in "[ a-z{};\"#\n\t]{0,80}") {
            let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            prop_assert_eq!(strip(&normalize(&text)), strip(&text));
        }
    }
}
