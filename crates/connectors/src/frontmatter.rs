//! Flat `key: value` frontmatter parsing for skill and command files.
//!
//! This is deliberately not a YAML parser. Definition files carry a flat
//! string-to-string header; nested structures, lists, quoting, and type
//! coercion are all out of contract. A value containing further colons keeps
//! everything after the first colon verbatim.

use std::collections::BTreeMap;

/// Result of splitting a definition file into header fields and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontmatterDocument {
    /// Header fields. Duplicated keys resolve to the last occurrence.
    pub fields: BTreeMap<String, String>,
    /// Everything after the closing delimiter line, unparsed and untrimmed.
    pub body: String,
}

/// Parse `content` into a [`FrontmatterDocument`].
///
/// The header block is delimited by `---` lines (each on its own line,
/// `\n` or `\r\n` endings), anchored at the very start of the input. If the
/// input does not begin with an opening delimiter, or no closing delimiter
/// line follows, the whole input is returned verbatim as `body` with empty
/// `fields`.
///
/// The body is exactly the text after the first newline following the
/// closing delimiter, with no further trimming; a closing delimiter at
/// end-of-input yields an empty body.
pub fn parse(content: &str) -> FrontmatterDocument {
    let Some(after_open) = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))
    else {
        return passthrough(content);
    };

    let mut pos = 0;
    loop {
        let line_end = after_open[pos..].find('\n').map(|i| pos + i);
        let line = match line_end {
            Some(end) => &after_open[pos..end],
            None => &after_open[pos..],
        };
        if line.trim_end_matches('\r') == "---" {
            let body = match line_end {
                Some(end) => &after_open[end + 1..],
                None => "",
            };
            return FrontmatterDocument {
                fields: parse_fields(&after_open[..pos]),
                body: body.to_string(),
            };
        }
        match line_end {
            Some(end) => pos = end + 1,
            None => return passthrough(content),
        }
    }
}

fn passthrough(content: &str) -> FrontmatterDocument {
    FrontmatterDocument {
        fields: BTreeMap::new(),
        body: content.to_string(),
    }
}

/// Split header lines on the first colon. Lines without a colon, and lines
/// whose key trims to empty, are skipped rather than treated as errors.
fn parse_fields(header: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in header.lines() {
        let Some(colon) = line.find(':') else {
            continue;
        };
        let key = line[..colon].trim();
        if key.is_empty() {
            continue;
        }
        let value = line[colon + 1..].trim();
        fields.insert(key.to_string(), value.to_string());
    }
    fields
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_well_formed_header() {
        let doc = parse("---\nname: commit\ndescription: Create git commits\n---\nBody text.\n");
        assert_eq!(doc.fields.get("name").unwrap(), "commit");
        assert_eq!(doc.fields.get("description").unwrap(), "Create git commits");
        assert_eq!(doc.body, "Body text.\n");
    }

    #[test]
    fn no_header_passes_through_verbatim() {
        let content = "# Just markdown\n\nNo header here.\n";
        let doc = parse(content);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn missing_closing_delimiter_passes_through() {
        let content = "---\nname: incomplete\nno closing line\n";
        let doc = parse(content);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn delimiter_not_at_start_passes_through() {
        let content = "\n---\nname: late\n---\nbody\n";
        let doc = parse(content);
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn colonless_line_is_skipped() {
        let doc = parse("---\nname: ok\nthis line has no colon\nother: yes\n---\nbody");
        assert_eq!(doc.fields.len(), 2);
        assert_eq!(doc.fields.get("name").unwrap(), "ok");
        assert_eq!(doc.fields.get("other").unwrap(), "yes");
    }

    #[test]
    fn empty_key_is_skipped() {
        let doc = parse("---\n: headless value\nname: ok\n---\nbody");
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.fields.get("name").unwrap(), "ok");
    }

    #[test]
    fn value_keeps_extra_colons_verbatim() {
        let doc = parse("---\nurl: https://example.com:8080/path\n---\n");
        assert_eq!(doc.fields.get("url").unwrap(), "https://example.com:8080/path");
    }

    #[test]
    fn duplicate_key_last_occurrence_wins() {
        let doc = parse("---\nname: first\nname: second\n---\n");
        assert_eq!(doc.fields.get("name").unwrap(), "second");
    }

    #[test]
    fn values_stay_strings() {
        let doc = parse("---\ncount: 42\nenabled: true\n---\n");
        assert_eq!(doc.fields.get("count").unwrap(), "42");
        assert_eq!(doc.fields.get("enabled").unwrap(), "true");
    }

    #[test]
    fn crlf_line_endings() {
        let doc = parse("---\r\nname: windows\r\ndescription: CRLF file\r\n---\r\nbody line\r\n");
        assert_eq!(doc.fields.get("name").unwrap(), "windows");
        assert_eq!(doc.fields.get("description").unwrap(), "CRLF file");
        assert_eq!(doc.body, "body line\r\n");
    }

    #[test]
    fn body_keeps_trailing_newline() {
        let doc = parse("---\ndescription: Summarizes text\n---\nDo the thing.\n");
        assert_eq!(doc.body, "Do the thing.\n");
    }

    #[test]
    fn closing_delimiter_at_end_of_input_yields_empty_body() {
        let doc = parse("---\nname: terse\n---");
        assert_eq!(doc.fields.get("name").unwrap(), "terse");
        assert_eq!(doc.body, "");
    }

    #[test]
    fn empty_header_block() {
        let doc = parse("---\n---\nonly body\n");
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, "only body\n");
    }

    #[test]
    fn header_round_trip_property() {
        // Reconstructing a document from parsed fields and body parses back
        // to the same fields and body.
        let fields = [("alpha", "one"), ("beta", "two words"), ("gamma", "3")];
        let body = "Line one.\n\nLine two.\n";
        let mut content = String::from("---\n");
        for (k, v) in fields {
            content.push_str(&format!("{k}: {v}\n"));
        }
        content.push_str("---\n");
        content.push_str(body);

        let doc = parse(&content);
        assert_eq!(doc.fields.len(), fields.len());
        for (k, v) in fields {
            assert_eq!(doc.fields.get(k).map(String::as_str), Some(v));
        }
        assert_eq!(doc.body, body);
    }
}
