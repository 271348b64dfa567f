use std::{collections::BTreeMap, fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// The fixed set of supported tools, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolName {
    ClaudeCode,
    Cursor,
    Codex,
    GeminiCli,
    Opencode,
    Vibe,
}

impl ToolName {
    /// Canonical display order, matching the connector registry.
    pub const ALL: [ToolName; 6] = [
        ToolName::ClaudeCode,
        ToolName::Cursor,
        ToolName::Codex,
        ToolName::GeminiCli,
        ToolName::Opencode,
        ToolName::Vibe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ClaudeCode => "claude-code",
            ToolName::Cursor => "cursor",
            ToolName::Codex => "codex",
            ToolName::GeminiCli => "gemini-cli",
            ToolName::Opencode => "opencode",
            ToolName::Vibe => "vibe",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Error for a tool name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool '{}'", self.0)
    }
}

impl std::error::Error for UnknownTool {}

/// A skill discovered on disk during a scan.
///
/// Produced fresh on every scan and never persisted directly; `file_path` is
/// the natural key correlating a descriptor to a previously saved library
/// skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDescriptor {
    pub source_tool: ToolName,
    pub name: String,
    pub description: String,
    pub file_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Header fields beyond `name`/`description`. Omitted entirely when the
    /// header carried nothing extra.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<BTreeMap<String, String>>,
    /// Vendor-bundled vs. user-authored. Only set for tools that ship
    /// built-in skills alongside user ones (cursor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_built_in: Option<bool>,
}

/// A slash command discovered in a flat commands directory (claude-code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_hint: Option<String>,
    pub file_path: PathBuf,
}

/// Result of a global (home-directory) detection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDetection {
    pub detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_dir: Option<PathBuf>,
}

/// Marker paths found during a per-project detection check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_config: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<PathBuf>,
}

/// Result of a per-project detection check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetection {
    pub detected: bool,
    pub paths: ProjectPaths,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_name_round_trips_through_str() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
        assert!("emacs".parse::<ToolName>().is_err());
    }

    #[test]
    fn tool_name_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ToolName::ClaudeCode).unwrap(),
            "\"claude-code\""
        );
        assert_eq!(
            serde_json::to_string(&ToolName::GeminiCli).unwrap(),
            "\"gemini-cli\""
        );
        assert_eq!(
            serde_json::to_string(&ToolName::Opencode).unwrap(),
            "\"opencode\""
        );
    }

    #[test]
    fn descriptor_omits_empty_optionals() {
        let descriptor = SkillDescriptor {
            source_tool: ToolName::Codex,
            name: "demo".into(),
            description: "Skill".into(),
            file_path: "/home/u/.agents/skills/demo/SKILL.md".into(),
            body: None,
            frontmatter: None,
            is_built_in: None,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json.get("frontmatter").is_none());
        assert!(json.get("isBuiltIn").is_none());
        assert_eq!(json["filePath"], "/home/u/.agents/skills/demo/SKILL.md");
    }
}
