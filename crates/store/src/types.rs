use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use skillforge_connectors::{SkillDescriptor, ToolName};

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// How a library skill came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    /// Authored by the user inside the app.
    Manual,
    /// Saved from a connector scan.
    Imported,
}

impl SkillSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillSource::Manual => "manual",
            SkillSource::Imported => "imported",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(SkillSource::Manual),
            "imported" => Some(SkillSource::Imported),
            _ => None,
        }
    }
}

/// Coarse provenance of a persisted skill or agent. Distinct from
/// [`ToolName`]: several connectors map onto one family here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTool {
    Cursor,
    Claude,
    Openai,
    Gemini,
    Generic,
}

impl SourceTool {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTool::Cursor => "cursor",
            SourceTool::Claude => "claude",
            SourceTool::Openai => "openai",
            SourceTool::Gemini => "gemini",
            SourceTool::Generic => "generic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cursor" => Some(SourceTool::Cursor),
            "claude" => Some(SourceTool::Claude),
            "openai" => Some(SourceTool::Openai),
            "gemini" => Some(SourceTool::Gemini),
            "generic" => Some(SourceTool::Generic),
            _ => None,
        }
    }
}

impl From<ToolName> for SourceTool {
    fn from(tool: ToolName) -> Self {
        match tool {
            ToolName::ClaudeCode => SourceTool::Claude,
            ToolName::Cursor => SourceTool::Cursor,
            ToolName::Codex => SourceTool::Openai,
            ToolName::GeminiCli => SourceTool::Gemini,
            ToolName::Opencode | ToolName::Vibe => SourceTool::Generic,
        }
    }
}

/// Whether a skill is generally applicable or tied to one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillScope {
    #[default]
    #[serde(rename = "general")]
    General,
    #[serde(rename = "project-specific")]
    ProjectSpecific,
}

impl SkillScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillScope::General => "general",
            SkillScope::ProjectSpecific => "project-specific",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(SkillScope::General),
            "project-specific" => Some(SkillScope::ProjectSpecific),
            _ => None,
        }
    }
}

/// A skill in the curated library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_ref: Option<String>,
    pub source: SkillSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_tool: Option<SourceTool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scope: SkillScope,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Creation payload for a library skill (id and timestamps are assigned).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub frontmatter: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub input_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub output_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub implementation_ref: Option<String>,
    pub source: SkillSource,
    #[serde(default)]
    pub original_tool: Option<SourceTool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scope: SkillScope,
}

/// Partial update for a library skill; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub scope: Option<SkillScope>,
}

impl Skill {
    pub fn new(fields: NewSkill) -> Self {
        let now = now_ms();
        Self {
            id: new_id(),
            name: fields.name,
            description: fields.description,
            body: fields.body,
            frontmatter: fields.frontmatter,
            input_schema: fields.input_schema,
            output_schema: fields.output_schema,
            implementation_ref: fields.implementation_ref,
            source: fields.source,
            original_tool: fields.original_tool,
            tags: fields.tags,
            scope: fields.scope,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a library skill from a discovered descriptor ("save to
    /// library"). Provenance is recorded as imported from the descriptor's
    /// tool family.
    pub fn imported(descriptor: &SkillDescriptor) -> Self {
        Self::new(NewSkill {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            body: descriptor.body.clone(),
            frontmatter: descriptor.frontmatter.clone(),
            input_schema: None,
            output_schema: None,
            implementation_ref: None,
            source: SkillSource::Imported,
            original_tool: Some(descriptor.source_tool.into()),
            tags: Vec::new(),
            scope: SkillScope::General,
        })
    }
}

/// Reference from an agent to a library skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRef {
    pub skill_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A configured agent and the skills it may use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub source_tool: SourceTool,
    #[serde(default)]
    pub enabled_skills: Vec<SkillRef>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    pub name: String,
    pub source_tool: SourceTool,
    #[serde(default)]
    pub enabled_skills: Vec<SkillRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPatch {
    pub name: Option<String>,
    pub enabled_skills: Option<Vec<SkillRef>>,
}

impl Agent {
    pub fn new(fields: NewAgent) -> Self {
        let now = now_ms();
        Self {
            id: new_id(),
            name: fields.name,
            source_tool: fields.source_tool,
            enabled_skills: fields.enabled_skills,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-tool detection snapshot stored on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTool {
    pub name: ToolName,
    pub detected: bool,
}

/// A registered project directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: String,
    pub icon_path: Option<String>,
    pub preferred_editor: Option<String>,
    pub is_favorite: bool,
    #[serde(default)]
    pub detected_tools: Vec<DetectedTool>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Partial update for a project; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub icon_path: Option<String>,
    pub preferred_editor: Option<String>,
}

impl Project {
    /// Register a project at `path` with its detection snapshot. The name
    /// defaults to the path's final component.
    pub fn new(path: String, detected_tools: Vec<DetectedTool>) -> Self {
        let now = now_ms();
        let name = std::path::Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        Self {
            id: new_id(),
            name,
            path,
            icon_path: None,
            preferred_editor: None,
            is_favorite: false,
            detected_tools,
            created_at: now,
            updated_at: now,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tool_mapping_covers_all_connectors() {
        assert_eq!(SourceTool::from(ToolName::ClaudeCode), SourceTool::Claude);
        assert_eq!(SourceTool::from(ToolName::Cursor), SourceTool::Cursor);
        assert_eq!(SourceTool::from(ToolName::Codex), SourceTool::Openai);
        assert_eq!(SourceTool::from(ToolName::GeminiCli), SourceTool::Gemini);
        assert_eq!(SourceTool::from(ToolName::Opencode), SourceTool::Generic);
        assert_eq!(SourceTool::from(ToolName::Vibe), SourceTool::Generic);
    }

    #[test]
    fn imported_skill_keeps_descriptor_fields() {
        let descriptor = SkillDescriptor {
            source_tool: ToolName::GeminiCli,
            name: "summarize".into(),
            description: "Summarizes text".into(),
            file_path: "/home/u/.gemini/skills/summarize/SKILL.md".into(),
            body: Some("Do the thing.\n".into()),
            frontmatter: None,
            is_built_in: None,
        };
        let skill = Skill::imported(&descriptor);
        assert_eq!(skill.name, "summarize");
        assert_eq!(skill.source, SkillSource::Imported);
        assert_eq!(skill.original_tool, Some(SourceTool::Gemini));
        assert_eq!(skill.body.as_deref(), Some("Do the thing.\n"));
        assert_eq!(skill.created_at, skill.updated_at);
    }

    #[test]
    fn project_name_defaults_to_final_path_component() {
        let project = Project::new("/home/user/code/my-app".into(), Vec::new());
        assert_eq!(project.name, "my-app");
        assert!(!project.is_favorite);
    }

    #[test]
    fn scope_serializes_hyphenated() {
        assert_eq!(
            serde_json::to_string(&SkillScope::ProjectSpecific).unwrap(),
            "\"project-specific\""
        );
    }

    #[test]
    fn skill_ref_defaults_enabled() {
        let parsed: SkillRef = serde_json::from_str(r#"{"skillId":"abc"}"#).unwrap();
        assert!(parsed.enabled);
    }
}
