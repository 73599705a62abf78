use crate::error::AgentError;

/// Normalize an agent's raw text into the report body.
///
/// Handles common Claude response formats:
/// - Plain markdown: returned trimmed
/// - Fenced: ```markdown\n# Report\n``` (also ```md and bare ```)
pub fn clean_response(text: &str) -> Result<String, AgentError> {
    let trimmed = text.trim();
    let body = strip_fence(trimmed).unwrap_or(trimmed).trim();

    if body.is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(body.to_string())
}

/// Return the inside of a code fence that wraps the whole text.
fn strip_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let inner = rest.strip_suffix("```")?;

    // Drop the info string (`markdown`, `md`, ...) on the opening line
    match inner.find('\n') {
        Some(newline) => {
            let info = inner[..newline].trim();
            if info.chars().all(|c| c.is_ascii_alphanumeric()) {
                Some(&inner[newline + 1..])
            } else {
                None
            }
        }
        None => Some(inner),
    }
}
