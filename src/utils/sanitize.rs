//! Sanitization of untrusted values before they reach the logs.
//!
//! Account ids and names come from the organization inventory; a name with
//! embedded line breaks could forge log lines.

/// Removes control characters, including CR and LF.
///
/// Non-ASCII text is kept as is.
pub fn sanitize_for_log(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

/// Sanitizes an error message for logging, keeping tabs and newlines.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n'))
        .collect()
}
