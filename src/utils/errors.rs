use std::fmt::Display;

/// Shown when a load error carries no message of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to load";

/// Collapse any load error into the one line the page shows
pub fn page_error_message(error: &impl Display) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
