//! Normalization rules for user-supplied text fields.
//!
//! Every text field passes through [`normalize_text`] before it reaches the
//! repository: leading and trailing whitespace is trimmed, an empty result
//! is rejected, and the trimmed length is checked against the field's limit.
//! Nothing else is normalized — no case folding, no Unicode normalization.

use crate::error::ApiError;

/// Maximum length of a question's text, in characters after trimming.
pub const QUESTION_TEXT_MAX: usize = 1000;
/// Maximum length of an answer's text, in characters after trimming.
pub const ANSWER_TEXT_MAX: usize = 500;
/// Maximum length of an answer's user id, in characters after trimming.
pub const USER_ID_MAX: usize = 36;

/// Trim `raw` and validate the result against `max_len`.
///
/// Returns the trimmed value, or a validation error naming `field` when the
/// result is empty or longer than `max_len` characters. Lengths are counted
/// in Unicode scalar values, not bytes.
pub fn normalize_text(raw: &str, field: &'static str, max_len: usize) -> Result<String, ApiError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ApiError::EmptyField { field });
    }
    if trimmed.chars().count() > max_len {
        return Err(ApiError::FieldTooLong {
            field,
            max: max_len,
        });
    }

    Ok(trimmed.to_string())
}
