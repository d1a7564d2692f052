//! Content type probing for served files.
//!
//! The server only distinguishes four kinds of content. Whatever
//! `mime_guess` reports for a file extension is folded into one of them.

use std::path::Path;

pub const IMAGE: &str = "image";
pub const ICON: &str = "icon";
pub const HTML: &str = "text/html";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses the served content type of `path` from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match mime_guess::from_path(path).first_raw() {
        Some(essence) => normalize(essence),
        None => OCTET_STREAM,
    }
}

/// Folds a MIME essence string into one of the served content types.
pub fn normalize(essence: &str) -> &'static str {
    match essence {
        "image/jpeg" | "image/png" | "image/gif" | "image/bmp" => IMAGE,
        "image/x-icon" | "image/vnd.microsoft.icon" => ICON,
        "text/html" => HTML,
        _ => OCTET_STREAM,
    }
}
