//! Attachment guard rejecting executable and script documents posted to chats.

/// File extensions that are never allowed in the support chats
pub const BLOCKED_EXTENSIONS: [&str; 6] = [".apk", ".exe", ".msi", ".bat", ".cmd", ".sh"];

/// The blocked extension `file_name` ends with, if any (case-insensitive)
pub fn blocked_extension(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    BLOCKED_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.ends_with(ext))
}

/// Security notice posted after a blocked document was removed
pub fn security_notice(extension: &str) -> String {
    let kind = extension.trim_start_matches('.').to_uppercase();
    format!(
        "🚫 SECURITY ALERT\n\nSending {kind} files is not allowed in this group for security reasons."
    )
}
