//! File name validation for stored documents.
//!
//! Document bodies are stored as `{documents_dir}/{fileName}`, so the name
//! arrives straight from the client and must never escape the directory.
//! Rules:
//! 1. Single path component (no separators, no `.` / `..`)
//! 2. No hidden files and no characters that break on common filesystems
//! 3. Extension blocklist (executables, and `.tmp` which the atomic writer reserves)

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::defaults::MAX_FILE_NAME_LEN;
use crate::{Error, Result};

/// Blocked file extensions (case-insensitive)
static BLOCKED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Reserved by the atomic temp-file writer
        "tmp",
        // Executables and installers
        "exe", "dll", "scr", "com", "msi", "so", "dylib", "jar", "class", "deb", "rpm", "apk",
        "dmg", "pkg", "lnk", "hta",
    ]
    .into_iter()
    .collect()
});

/// Validate a client-supplied document file name.
///
/// Returns `Error::InvalidInput` describing the first rule that failed.
pub fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.trim().is_empty() {
        return Err(Error::InvalidInput("fileName is required".to_string()));
    }

    if file_name.len() > MAX_FILE_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "fileName exceeds {} bytes",
            MAX_FILE_NAME_LEN
        )));
    }

    if file_name == "." || file_name == ".." || file_name.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!(
            "fileName '{}' must be a single path component",
            file_name
        )));
    }

    if file_name.starts_with('.') {
        return Err(Error::InvalidInput(format!(
            "fileName '{}' must not be hidden",
            file_name
        )));
    }

    if let Some(bad) = file_name
        .chars()
        .find(|c| matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*') || c.is_control())
    {
        return Err(Error::InvalidInput(format!(
            "fileName contains forbidden character {:?}",
            bad
        )));
    }

    if let Some((_, ext)) = file_name.rsplit_once('.') {
        if BLOCKED_EXTENSIONS.contains(ext.to_lowercase().as_str()) {
            return Err(Error::InvalidInput(format!(
                "File extension .{} is not allowed",
                ext
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_allowed() {
        for name in ["a.md", "notes-2024.txt", "README", "chapter 1.md", "ünïcode.md"] {
            assert!(validate_file_name(name).is_ok(), "{} should be allowed", name);
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
    }

    #[test]
    fn test_path_components_rejected() {
        for name in ["..", ".", "../a.md", "dir/a.md", "dir\\a.md", "/etc/passwd"] {
            assert!(validate_file_name(name).is_err(), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_hidden_names_rejected() {
        assert!(validate_file_name(".env").is_err());
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        assert!(validate_file_name("a?.md").is_err());
        assert!(validate_file_name("a\nb.md").is_err());
        assert!(validate_file_name("a\0.md").is_err());
    }

    #[test]
    fn test_blocked_extensions_rejected() {
        assert!(validate_file_name("draft.tmp").is_err());
        assert!(validate_file_name("setup.EXE").is_err());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = format!("{}.md", "a".repeat(MAX_FILE_NAME_LEN));
        let err = validate_file_name(&name).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
