//! YAML front matter codec for stored document files.
//!
//! A stored document looks like:
//!
//! ```text
//! ---
//! id: d1
//! fileName: a.md
//! ---
//! # Body starts here
//! ```
//!
//! Files without a leading `---` line are treated as body only, so documents
//! dropped into the directory by hand still load. The same goes for front
//! matter written by other tools (`title:`, `layout:`, ...): the block is
//! stripped and no metadata is recovered from it.

use folio_core::defaults::FRONT_MATTER_DELIMITER;
use folio_core::{Document, Metadata, Result};
use tracing::debug;

/// Render a document as front matter followed by its content.
pub fn render(document: &Document) -> Result<String> {
    let yaml = serde_yaml::to_string(&document.metadata)?;
    let mut out = String::with_capacity(yaml.len() + document.content.len() + 8);
    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');
    out.push_str(&document.content);
    Ok(out)
}

/// Split raw file text into `(front matter yaml, body)`.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let rest = match text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, text),
    };

    // A front matter block that is immediately closed.
    if let Some(body) = rest
        .strip_prefix("---\n")
        .or_else(|| rest.strip_prefix("---\r\n"))
    {
        return (Some(""), body);
    }

    let closing = rest
        .find("\n---\n")
        .map(|i| (i + 1, i + 5))
        .or_else(|| rest.find("\n---\r\n").map(|i| (i + 1, i + 6)))
        .or_else(|| {
            rest.ends_with("\n---")
                .then(|| (rest.len() - 3, rest.len()))
        });

    match closing {
        Some((yaml_end, body_start)) => (Some(&rest[..yaml_end]), &rest[body_start..]),
        None => (None, text),
    }
}

/// Parse raw file text into the embedded metadata (if any) and the body.
///
/// A front matter block that does not decode as [`Metadata`] yields `None`;
/// the body is returned either way.
pub fn parse(text: &str) -> (Option<Metadata>, String) {
    let (yaml, body) = split(text);
    let metadata = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => match serde_yaml::from_str(yaml) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!(error = %e, "front matter is not folio metadata, keeping body only");
                None
            }
        },
        _ => None,
    };
    (metadata, body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        let mut m = Metadata::new("d1", "a.md");
        m.title = Some("Title".to_string());
        m.tags.insert("x".to_string());
        Document::new(m, content)
    }

    #[test]
    fn test_render_wraps_metadata_in_delimiters() {
        let text = render(&doc("hello")).unwrap();
        assert!(text.starts_with("---\n"));
        assert!(text.contains("fileName: a.md\n"));
        assert!(text.ends_with("---\nhello"));
    }

    #[test]
    fn test_parse_recovers_metadata_and_body() {
        let original = doc("# Heading\n\nParagraph\n");
        let text = render(&original).unwrap();
        let (meta, body) = parse(&text);
        assert_eq!(meta.unwrap(), original.metadata);
        assert_eq!(body, original.content);
    }

    #[test]
    fn test_body_with_horizontal_rule_is_kept() {
        let original = doc("above\n---\nbelow\n");
        let text = render(&original).unwrap();
        let (_, body) = parse(&text);
        assert_eq!(body, "above\n---\nbelow\n");
    }

    #[test]
    fn test_empty_body() {
        let text = render(&doc("")).unwrap();
        let (meta, body) = parse(&text);
        assert!(meta.is_some());
        assert_eq!(body, "");
    }

    #[test]
    fn test_plain_file_is_all_body() {
        let (meta, body) = parse("just text\n");
        assert!(meta.is_none());
        assert_eq!(body, "just text\n");
    }

    #[test]
    fn test_unterminated_front_matter_is_all_body() {
        let text = "---\nid: d1\nno closing line";
        let (yaml, body) = split(text);
        assert!(yaml.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_crlf_delimiters() {
        let text = "---\r\nid: d1\r\nfileName: a.md\r\n---\r\nbody";
        let (meta, body) = parse(text);
        assert_eq!(meta.unwrap().file_name, "a.md");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_foreign_front_matter_is_stripped() {
        let (meta, body) = parse("---\ntitle: Hello\nlayout: post\n---\nbody");
        assert!(meta.is_none());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_malformed_front_matter_is_stripped() {
        let (meta, body) = parse("---\nid: [unclosed\n---\nbody");
        assert!(meta.is_none());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_closing_delimiter_at_eof() {
        let (yaml, body) = split("---\nid: d1\n---");
        assert_eq!(yaml, Some("id: d1\n"));
        assert_eq!(body, "");
    }
}
