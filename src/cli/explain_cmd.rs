//! Handler for the `resultgen explain` subcommand.

use crate::diagnostics::error_codes;

use super::Exit;

pub(crate) fn run_explain(code: &str) -> Result<Exit, Box<dyn std::error::Error>> {
    let code = code.trim().to_ascii_uppercase();
    match get_error_explanation(&code) {
        Some(text) => {
            println!("{}", text);
            Ok(Exit::Success)
        }
        None => {
            eprintln!("Unknown diagnostic code: {}", code);
            eprintln!();
            eprintln!("Valid codes:");
            for (known, summary) in error_codes::ALL {
                eprintln!("  {}  {}", known, summary);
            }
            Ok(Exit::Failure)
        }
    }
}

/// Get a detailed explanation for a diagnostic code.
pub(super) fn get_error_explanation(code: &str) -> Option<&'static str> {
    let explanation = match code {
        // Syntax errors
        "E0001" => {
            r#"E0001: Unexpected token

The parser met a token that does not fit a declaration.

Example:
  public class Api
  {
      public Result Run() => null;
  }}

Fix: Remove the stray token or add what is missing before it.
"#
        }
        "E0002" => {
            r#"E0002: Unterminated string or character literal

A literal was opened but not closed on the same line.

Example:
  [ErrorResult(1, "No enemy provided)]

Fix: Close the literal with a matching quote.
"#
        }
        "E0003" => {
            r#"E0003: Invalid numeric literal

A number contains characters that are not valid for its base.

Example:
  [ErrorResult(0x1G, "Bad")]

Fix: Use only digits valid for the literal's base.
"#
        }
        "E0004" => {
            r#"E0004: Missing closing delimiter

A `{`, `(` or `[` is never closed before the end of the file.

Example:
  public class Api
  {
      public Result Run() { return null;

Fix: Add the matching closing delimiter.
"#
        }
        "E0008" => {
            r#"E0008: Unexpected end of file

The file ended in the middle of a declaration.

Example:
  namespace Game
  {
      public class

Fix: Complete the declaration.
"#
        }
        "E0100" => {
            r#"E0100: Source file could not be read

The file exists in the input set but reading it failed, for example
because of permissions or invalid UTF-8.

Fix: Check the file's permissions and encoding.
"#
        }

        // Contract errors
        "E1001" => {
            r#"E1001: Invalid return type for an error-result method

A method carrying [ErrorResult] must return `Result` or `Result<T>`.
Async methods must return `Task<Result>` or `Task<Result<T>>` (or the same
inside another configured async wrapper such as `UniTask`).

Example:
  [ErrorResult(1, "No enemy provided")]
  public AttackResult AttackTheEnemy(Enemy enemy) { ... }

Fix: Return `Result<AttackResult>` instead. `resultgen fix` rewrites the
return type for you:
  void          -> Result
  async void    -> Task<Result>
  T             -> Result<T>
  async Task<T> -> Task<Result<T>>
"#
        }

        // Generation errors
        "E2001" => {
            r#"E2001: Generation failed for one method

Accessors for one annotated method could not be generated. Other methods
are unaffected and still generated. The reason is part of the message and
is also listed in the `Gen_ResultsGenerator_Trace` artifact.

Common causes:
  - two annotations share an error code while `emit.duplicate_codes = "error"`
  - two messages derive the same accessor name while
    `emit.name_collisions = "error"`

Fix: Make the codes or messages distinct, or relax the policy in
resultgen.toml.
"#
        }

        // Warnings
        "W0101" => {
            r#"W0101: Duplicate error code on one method

Two annotations on the same method use the same error code. Both
accessors are generated, but callers cannot tell the failures apart by
code.

Example:
  [ErrorResult(1, "No enemy provided")]
  [ErrorResult(1, "Enemy already defeated")]

Fix: Give each failure its own code. Set `emit.duplicate_codes = "allow"`
to silence this warning or `"error"` to reject the method.
"#
        }
        "W0102" => {
            r#"W0102: Two error messages derive the same accessor name

Accessor names come from the message: lower-cased, split on spaces and
underscores, title-cased and joined. Two messages that differ only in case
or separators produce the same name, and a message may also produce the
name of the enclosing accessor class.

Example:
  [ErrorResult(3, "Not found")]
  [ErrorResult(4, "not_found")]     // NotFound4

The later entry gets its error code appended.

Fix: Reword one of the messages. Set `emit.name_collisions = "error"` to
reject the method instead.
"#
        }
        "W0103" => {
            r#"W0103: Error-result annotation with unusable arguments

An [ErrorResult] annotation must carry an integer code and a string
message, positionally or by name (`errorCode:`, `errorMessage:`). The
annotation is skipped.

Example:
  [ErrorResult("No enemy provided")]

Fix:
  [ErrorResult(1, "No enemy provided")]
"#
        }
        _ => return None,
    };
    Some(explanation)
}
