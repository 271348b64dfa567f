//! Command discovery for tools with a flat commands directory.
//!
//! Unlike skills, commands are one Markdown file per command sitting
//! directly in the directory, with no subdirectory-with-SKILL.md convention.

use std::path::Path;

use tracing::warn;

use crate::{frontmatter, types::CommandDescriptor};

/// Longest description derived from a command body.
const DESCRIPTION_MAX_CHARS: usize = 100;

/// List every `*.md` file in `commands_dir` as a command, sorted by name.
/// A missing directory yields an empty list; unreadable files are logged
/// and skipped.
pub(crate) async fn list_commands_in(commands_dir: &Path) -> Vec<CommandDescriptor> {
    let mut entries = match tokio::fs::read_dir(commands_dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut out = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %commands_dir.display(), error = %e, "failed to read commands directory entry");
                break;
            },
        };

        let is_file = match entry.file_type().await {
            Ok(ft) => ft.is_file(),
            Err(_) => false,
        };
        let path = entry.path();
        if !is_file || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to read command file, skipping");
                continue;
            },
        };

        let mut doc = frontmatter::parse(&content);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = match doc.fields.remove("name") {
            Some(n) if !n.is_empty() => n,
            _ => stem,
        };
        let description = match doc.fields.remove("description") {
            Some(d) if !d.is_empty() => d,
            _ => description_from_body(&doc.body),
        };

        out.push(CommandDescriptor {
            name,
            description,
            allowed_tools: doc.fields.remove("allowed-tools"),
            argument_hint: doc.fields.remove("argument-hint"),
            file_path: path,
        });
    }

    out.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

/// Derive a description from the first non-empty body line. A heading line
/// contributes the text after its `# ` marker; anything else contributes
/// itself. Truncated to [`DESCRIPTION_MAX_CHARS`].
fn description_from_body(body: &str) -> String {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let text = line.strip_prefix("# ").unwrap_or(line).trim();
        if text.is_empty() {
            continue;
        }
        return text.chars().take(DESCRIPTION_MAX_CHARS).collect();
    }
    String::new()
}
