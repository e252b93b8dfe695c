//! Identifier derivation for generated members

use unicode_xid::UnicodeXID;

/// Derive an accessor identifier from an error message.
///
/// The message is lower-cased and split into words on whitespace and
/// underscores. Characters that cannot continue an identifier are dropped,
/// then each word is title-cased and the words are concatenated:
/// `"no enemy provided"` becomes `NoEnemyProvided`. A message with nothing
/// usable falls back to `Error{code}`; a leading digit gets a `_` prefix.
pub fn accessor_name(message: &str, code: i64) -> String {
    let lowered = message.to_lowercase();
    let mut name = String::new();

    for word in lowered.split(|c: char| c.is_whitespace() || c == '_') {
        let kept: String = word.chars().filter(|c| c.is_xid_continue()).collect();
        let mut chars = kept.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase().filter(|c| c.is_xid_continue()));
            name.push_str(chars.as_str());
        }
    }

    if name.is_empty() {
        return format!("Error{}", code.unsigned_abs());
    }
    match name.chars().next() {
        Some(first) if first.is_xid_start() => name,
        _ => format!("_{}", name),
    }
}

/// Whether `name` is usable as a C# identifier without escaping
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_xid_start() => chars.all(|c| c.is_xid_continue()),
        _ => false,
    }
}

/// Name of the per-run trace artifact
pub fn trace_artifact_name(prefix: &str) -> String {
    if prefix.is_empty() {
        "ResultsGenerator_Trace".to_string()
    } else {
        format!("{}_ResultsGenerator_Trace", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_words_are_title_cased() {
        assert_eq!(accessor_name("no enemy provided", 1), "NoEnemyProvided");
        assert_eq!(accessor_name("what_the hell", 2), "WhatTheHell");
        assert_eq!(accessor_name("Invalid enemy ArmourClass", 3), "InvalidEnemyArmourclass");
        assert_eq!(accessor_name("  spaced\tout\n", 4), "SpacedOut");
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(accessor_name("can't attack!", 1), "CantAttack");
        assert_eq!(accessor_name("'quoted' word", 1), "QuotedWord");
        assert_eq!(accessor_name("out-of-range", 1), "Outofrange");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(accessor_name("", 7), "Error7");
        assert_eq!(accessor_name("!!! ???", 12), "Error12");
        assert_eq!(accessor_name("404 not found", 404), "_404NotFound");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(accessor_name("ошибка сети", 1), "ОшибкаСети");
        assert_eq!(accessor_name("élan vital", 1), "ÉlanVital");
    }

    #[test]
    fn test_trace_artifact_name() {
        assert_eq!(trace_artifact_name("Gen"), "Gen_ResultsGenerator_Trace");
        assert_eq!(trace_artifact_name(""), "ResultsGenerator_Trace");
    }

    proptest! {
        #[test]
        fn accessor_name_is_always_an_identifier(message in "\\PC{0,40}", code in any::<i64>()) {
            let name = accessor_name(&message, code);
            prop_assert!(is_identifier(&name), "{:?} -> {:?}", message, name);
        }

        #[test]
        fn accessor_name_ignores_case_and_separators(words in prop::collection::vec("[a-z]{1,8}", 1..5)) {
            let spaced = words.join(" ");
            let snake = words.join("_").to_uppercase();
            prop_assert_eq!(accessor_name(&spaced, 0), accessor_name(&snake, 0));
        }
    }
}
