//! Directory scanner for skill definition directories.
//!
//! A skills directory contains one subdirectory per skill, each with a
//! `SKILL.md` definition file. Subdirectories without the definition file
//! are not skills and are skipped without comment.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{frontmatter, util::exists};

/// Fixed name of the per-skill definition file.
pub const SKILL_FILE: &str = "SKILL.md";

/// Scan the immediate subdirectories of `skills_dir` for skill definitions
/// and map each qualifying entry through `map_fn(dir_name, fields,
/// file_path, body)`.
///
/// A missing `skills_dir` is the normal "tool not installed" case and
/// returns an empty list. An unreadable or malformed entry is logged and
/// skipped; one bad entry never hides the others. No ordering is
/// guaranteed; callers sort.
pub async fn scan_skill_dir<T, F>(skills_dir: &Path, map_fn: F) -> Vec<T>
where
    F: Fn(&str, BTreeMap<String, String>, PathBuf, String) -> T,
{
    let mut entries = match tokio::fs::read_dir(skills_dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut skills = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %skills_dir.display(), error = %e, "failed to read skills directory entry");
                break;
            },
        };

        let is_dir = match entry.file_type().await {
            Ok(ft) => ft.is_dir(),
            Err(_) => false,
        };
        if !is_dir {
            continue;
        }

        let skill_md = entry.path().join(SKILL_FILE);
        if !exists(&skill_md).await {
            continue;
        }

        let content = match tokio::fs::read_to_string(&skill_md).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %skill_md.display(), error = %e, "failed to read SKILL.md, skipping entry");
                continue;
            },
        };

        let doc = frontmatter::parse(&content);
        let dir_name = entry.file_name().to_string_lossy().to_string();
        skills.push(map_fn(&dir_name, doc.fields, skill_md, doc.body));
    }

    skills
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(skills_dir: &Path, name: &str, content: &str) {
        let dir = skills_dir.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SKILL_FILE), content).unwrap();
    }

    #[tokio::test]
    async fn missing_directory_returns_empty() {
        let result = scan_skill_dir(Path::new("/nonexistent/skills"), |n, _, _, _| n.to_string()).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn maps_qualifying_entries() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "greet", "---\ndescription: Says hello\n---\nWave.\n");

        let result = scan_skill_dir(tmp.path(), |name, fields, path, body| {
            (
                name.to_string(),
                fields.get("description").cloned(),
                path,
                body,
            )
        })
        .await;

        assert_eq!(result.len(), 1);
        let (name, description, path, body) = &result[0];
        assert_eq!(name, "greet");
        assert_eq!(description.as_deref(), Some("Says hello"));
        assert!(path.ends_with("greet/SKILL.md"));
        assert_eq!(body, "Wave.\n");
    }

    #[tokio::test]
    async fn skips_subdirectories_without_definition_file() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "real", "---\nname: real\n---\nbody\n");
        let other = tmp.path().join("not-a-skill");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("README.md"), "hello").unwrap();

        let result = scan_skill_dir(tmp.path(), |n, _, _, _| n.to_string()).await;
        assert_eq!(result, vec!["real".to_string()]);
    }

    #[tokio::test]
    async fn skips_plain_files_at_top_level() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("stray.md"), "not a skill dir").unwrap();
        write_skill(tmp.path(), "kept", "---\nname: kept\n---\n");

        let result = scan_skill_dir(tmp.path(), |n, _, _, _| n.to_string()).await;
        assert_eq!(result, vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn headerless_definition_still_maps() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "bare", "Just instructions, no header.\n");

        let result =
            scan_skill_dir(tmp.path(), |n, fields, _, body| (n.to_string(), fields, body)).await;
        assert_eq!(result.len(), 1);
        let (name, fields, body) = &result[0];
        assert_eq!(name, "bare");
        assert!(fields.is_empty());
        assert_eq!(body, "Just instructions, no header.\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_entry_does_not_hide_others() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "good", "---\nname: good\n---\n");
        write_skill(tmp.path(), "bad", "---\nname: bad\n---\n");
        let bad_md = tmp.path().join("bad").join(SKILL_FILE);
        std::fs::set_permissions(&bad_md, std::fs::Permissions::from_mode(0o000)).unwrap();

        let mut result = scan_skill_dir(tmp.path(), |n, _, _, _| n.to_string()).await;
        result.sort();
        // Root runs can still read 0o000 files; either way the good entry survives.
        assert!(result.contains(&"good".to_string()));
    }
}
