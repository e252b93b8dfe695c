//! Source templates
//!
//! Pure string functions; layout is left to [`super::normalize`].

use crate::config::Variant;
use crate::resolver::ErrorEntry;
use crate::shape::ReturnShape;

/// Where an artifact lives and what it imports
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub namespace: &'a str,
    /// Runtime namespace of the Result types, imported at file level
    pub runtime_namespace: &'a str,
    /// Extra `using` directives, placed inside the namespace block so they
    /// bind the way they did at the method declaration
    pub imports: &'a [String],
}

impl Frame<'_> {
    fn wrap(&self, body: &str) -> String {
        let imports = self.imports.join("\n");
        if self.namespace.is_empty() {
            format!(
                "using {runtime};\n{imports}\n{body}\n",
                runtime = self.runtime_namespace
            )
        } else {
            format!(
                "using {runtime};\nnamespace {ns}\n{{\n{imports}\n{body}\n}}\n",
                runtime = self.runtime_namespace,
                ns = self.namespace
            )
        }
    }
}

/// An error entry with its derived accessor name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
    pub entry: ErrorEntry,
}

/// `ResultsFactory.{Type}` property
pub fn results_factory(frame: &Frame<'_>, type_name: &str) -> String {
    frame.wrap(&format!(
        "public static partial class ResultsFactory\n{{\n\
         public static {type_name}ResultsProvider {type_name} => new();\n\
         }}"
    ))
}

/// `{Type}ResultsProvider.{Method}` property
pub fn errors_provider(frame: &Frame<'_>, type_name: &str, method: &str) -> String {
    frame.wrap(&format!(
        "public partial class {type_name}ResultsProvider\n{{\n\
         public {method}Errors {method} => new();\n\
         }}"
    ))
}

/// Empty `ErrorCodeRepository.{Type}Errors` shell
pub fn error_repository(frame: &Frame<'_>, type_name: &str) -> String {
    frame.wrap(&format!(
        "public static partial class ErrorCodeRepository\n{{\n\
         public static partial class {type_name}Errors\n{{}}\n\
         }}"
    ))
}

/// Empty top-level `{Type}Errors` shell
pub fn class_errors_provider(frame: &Frame<'_>, type_name: &str) -> String {
    frame.wrap(&format!("public static partial class {type_name}Errors\n{{}}"))
}

/// Error-code constants of one method
pub fn error_codes(frame: &Frame<'_>, type_name: &str, method: &str, entries: &[NamedEntry]) -> String {
    let constants: Vec<String> = entries
        .iter()
        .map(|named| {
            let ty = if i32::try_from(named.entry.code).is_ok() { "int" } else { "long" };
            format!("public const {} {} = {};", ty, named.name, named.entry.code)
        })
        .collect();

    frame.wrap(&format!(
        "public static partial class ErrorCodeRepository\n{{\n\
         public static partial class {type_name}Errors\n{{\n\
         public static class {method}\n{{\n\
         {constants}\n\
         }}\n}}\n}}",
        constants = constants.join("\n")
    ))
}

/// Accessor class of one method, in the configured build variants
#[allow(clippy::too_many_arguments)]
pub fn method_errors(
    frame: &Frame<'_>,
    type_name: &str,
    method: &str,
    result_type: &str,
    shape: &ReturnShape,
    entries: &[NamedEntry],
    variant: Variant,
    debug_symbol: &str,
) -> String {
    let class = |with_message: bool| {
        let accessors: Vec<String> = entries
            .iter()
            .map(|named| accessor(result_type, shape, named, with_message))
            .collect();
        format!(
            "public class {method}Errors\n{{\n{}\n}}",
            accessors.join("\n")
        )
    };

    let body = match variant {
        Variant::Debug => class(true),
        Variant::Release => class(false),
        Variant::Both => format!(
            "#if {debug_symbol}\n{}\n#else\n{}\n#endif",
            class(true),
            class(false)
        ),
    };

    frame.wrap(&format!(
        "public partial class {type_name}ResultsProvider\n{{\n{body}\n}}"
    ))
}

/// One failure accessor. Void shapes get a property, value shapes a
/// method taking an optional response.
pub fn accessor(result_type: &str, shape: &ReturnShape, named: &NamedEntry, with_message: bool) -> String {
    let message = if with_message {
        format!(", errorMessage: {}", string_literal(&named.entry.message))
    } else {
        String::new()
    };

    match shape.payload() {
        None => format!(
            "public {r} {name} => new {r}(succeeded: false, errorCode: {code}{message});",
            r = result_type,
            name = named.name,
            code = named.entry.code
        ),
        Some(payload) => {
            let generics = if shape.is_generic_method() {
                format!("<{}>", shape.generic_parameters.join(", "))
            } else {
                String::new()
            };
            format!(
                "public {r}<{t}> {name}{generics}({t} response = default) => \
                 new {r}<{t}>(succeeded: false, errorCode: {code}, response: response{message});",
                r = result_type,
                t = payload,
                name = named.name,
                code = named.entry.code
            )
        }
    }
}

/// Trace artifact listing site faults as line comments
pub fn trace(lines: &[String]) -> String {
    let mut out = String::from("// resultgen trace\n");
    for line in lines {
        out.push_str("// ");
        out.push_str(&line.replace(['\r', '\n'], " "));
        out.push('\n');
    }
    out
}

/// A regular C# string literal
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
