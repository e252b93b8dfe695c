//! Stable diagnostic codes

/// Syntax/parsing errors (E0xxx)
pub mod syntax {
    pub const UNEXPECTED_TOKEN: &str = "E0001";
    pub const UNTERMINATED_LITERAL: &str = "E0002";
    pub const INVALID_NUMBER: &str = "E0003";
    pub const MISSING_DELIMITER: &str = "E0004";
    pub const UNEXPECTED_EOF: &str = "E0008";
    pub const UNREADABLE_FILE: &str = "E0100";
}

/// Return-type contract errors (E1xxx)
pub mod contract {
    /// A method carrying the error-result marker does not return a Result shape
    pub const INVALID_RETURN_TYPE: &str = "E1001";
}

/// Generation errors (E2xxx)
pub mod generation {
    /// One site could not be resolved or rendered; other sites are unaffected
    pub const SITE_FAULT: &str = "E2001";
}

/// Warnings (W0xxx)
pub mod warnings {
    /// Two annotations on one method share an error code
    pub const DUPLICATE_ERROR_CODE: &str = "W0101";
    /// Two messages on one method derive the same accessor name
    pub const IDENTIFIER_COLLISION: &str = "W0102";
    /// An annotation's arguments are not an integer code and a string message
    pub const MALFORMED_ANNOTATION: &str = "W0103";
}

/// Every code with a one-line summary, in display order
pub const ALL: &[(&str, &str)] = &[
    (syntax::UNEXPECTED_TOKEN, "Unexpected token"),
    (syntax::UNTERMINATED_LITERAL, "Unterminated string or character literal"),
    (syntax::INVALID_NUMBER, "Invalid numeric literal"),
    (syntax::MISSING_DELIMITER, "Missing closing delimiter"),
    (syntax::UNEXPECTED_EOF, "Unexpected end of file"),
    (syntax::UNREADABLE_FILE, "Source file could not be read"),
    (contract::INVALID_RETURN_TYPE, "Invalid return type for an error-result method"),
    (generation::SITE_FAULT, "Generation failed for one method"),
    (warnings::DUPLICATE_ERROR_CODE, "Duplicate error code on one method"),
    (warnings::IDENTIFIER_COLLISION, "Two error messages derive the same accessor name"),
    (warnings::MALFORMED_ANNOTATION, "Error-result annotation with unusable arguments"),
];
