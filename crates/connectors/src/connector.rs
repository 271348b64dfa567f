//! The generic connector and the declarative per-tool convention table.
//!
//! Each supported tool is one row in [`SPECS`]: its global marker directory,
//! its per-project markers, and where its skills live. Adding a tool means
//! adding a row, never touching the scanner or the registry.

use std::path::{Path, PathBuf};

use crate::{
    commands,
    scan::scan_skill_dir,
    types::{
        CommandDescriptor, GlobalDetection, ProjectDetection, ProjectPaths, SkillDescriptor,
        ToolName,
    },
    util::exists,
};

/// Description used when a skill header carries none.
pub const FALLBACK_DESCRIPTION: &str = "Skill";

/// A per-project marker and the detection slot it fills when present.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProjectMarker {
    /// Marker file, recorded as `project_config` (e.g. `CLAUDE.md`).
    ConfigFile(&'static str),
    /// Marker directory, recorded as `project_dir` (e.g. `.cursor`).
    ConfigDir(&'static str),
}

/// Filesystem conventions for one tool.
pub(crate) struct ConnectorSpec {
    pub name: ToolName,
    /// Global marker directory, as path segments under the home directory.
    pub global_dir: &'static [&'static str],
    /// Per-project markers; detection ORs over the set, recording whichever
    /// paths were found. A later match overwrites an earlier one's slot.
    pub project_markers: &'static [ProjectMarker],
    /// Skills directory, as segments under the home directory.
    pub skills_dir: &'static [&'static str],
    /// Skills directory, as segments under a project root.
    pub project_skills_dir: &'static [&'static str],
    /// Extra directory of vendor-bundled skills, under the home directory.
    pub builtin_skills_dir: Option<&'static [&'static str]>,
    /// Flat directory of command files, under the home directory.
    pub commands_dir: Option<&'static [&'static str]>,
}

pub(crate) const SPECS: [ConnectorSpec; 6] = [
    ConnectorSpec {
        name: ToolName::ClaudeCode,
        global_dir: &[".claude"],
        project_markers: &[
            ProjectMarker::ConfigFile("CLAUDE.md"),
            ProjectMarker::ConfigDir(".claude"),
        ],
        skills_dir: &[".claude", "skills"],
        project_skills_dir: &[".claude", "skills"],
        builtin_skills_dir: None,
        commands_dir: Some(&[".claude", "commands"]),
    },
    ConnectorSpec {
        name: ToolName::Cursor,
        global_dir: &[".cursor"],
        project_markers: &[ProjectMarker::ConfigDir(".cursor")],
        skills_dir: &[".cursor", "skills"],
        project_skills_dir: &[".cursor", "skills"],
        builtin_skills_dir: Some(&[".cursor", "builtin-skills"]),
        commands_dir: None,
    },
    ConnectorSpec {
        name: ToolName::Codex,
        global_dir: &[".agents"],
        project_markers: &[
            ProjectMarker::ConfigDir(".agents"),
            ProjectMarker::ConfigDir(".codex"),
        ],
        skills_dir: &[".agents", "skills"],
        project_skills_dir: &[".agents", "skills"],
        builtin_skills_dir: None,
        commands_dir: None,
    },
    ConnectorSpec {
        name: ToolName::GeminiCli,
        global_dir: &[".gemini"],
        project_markers: &[ProjectMarker::ConfigDir(".gemini")],
        skills_dir: &[".gemini", "skills"],
        project_skills_dir: &[".gemini", "skills"],
        builtin_skills_dir: None,
        commands_dir: None,
    },
    ConnectorSpec {
        name: ToolName::Opencode,
        global_dir: &[".config", "opencode"],
        project_markers: &[ProjectMarker::ConfigDir(".opencode")],
        skills_dir: &[".config", "opencode", "skills"],
        project_skills_dir: &[".opencode", "skills"],
        builtin_skills_dir: None,
        commands_dir: None,
    },
    ConnectorSpec {
        name: ToolName::Vibe,
        global_dir: &[".vibe"],
        project_markers: &[ProjectMarker::ConfigDir(".vibe")],
        skills_dir: &[".vibe", "skills"],
        project_skills_dir: &[".vibe", "skills"],
        builtin_skills_dir: None,
        commands_dir: None,
    },
];

fn join_segments(base: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(base.to_path_buf(), |p, s| p.join(s))
}

/// Detection and skill listing for one tool. Stateless: paths are resolved
/// once at construction, every operation re-reads the filesystem.
pub struct Connector {
    name: ToolName,
    global_dir: PathBuf,
    project_markers: &'static [ProjectMarker],
    skills_dir: PathBuf,
    project_skills_dir: &'static [&'static str],
    builtin_skills_dir: Option<PathBuf>,
    commands_dir: Option<PathBuf>,
}

impl Connector {
    pub(crate) fn from_spec(spec: &ConnectorSpec, home: &Path) -> Self {
        Self {
            name: spec.name,
            global_dir: join_segments(home, spec.global_dir),
            project_markers: spec.project_markers,
            skills_dir: join_segments(home, spec.skills_dir),
            project_skills_dir: spec.project_skills_dir,
            builtin_skills_dir: spec.builtin_skills_dir.map(|s| join_segments(home, s)),
            commands_dir: spec.commands_dir.map(|s| join_segments(home, s)),
        }
    }

    pub fn name(&self) -> ToolName {
        self.name
    }

    /// Point-in-time existence check of the tool's global directory.
    pub async fn detect_global(&self) -> GlobalDetection {
        if exists(&self.global_dir).await {
            GlobalDetection {
                detected: true,
                global_dir: Some(self.global_dir.clone()),
            }
        } else {
            GlobalDetection {
                detected: false,
                global_dir: None,
            }
        }
    }

    /// OR over the tool's per-project markers, recording found paths.
    pub async fn detect_project(&self, project_path: &Path) -> ProjectDetection {
        let mut paths = ProjectPaths::default();
        let mut detected = false;
        for marker in self.project_markers {
            match marker {
                ProjectMarker::ConfigFile(name) => {
                    let candidate = project_path.join(name);
                    if exists(&candidate).await {
                        paths.project_config = Some(candidate);
                        detected = true;
                    }
                },
                ProjectMarker::ConfigDir(name) => {
                    let candidate = project_path.join(name);
                    if exists(&candidate).await {
                        paths.project_dir = Some(candidate);
                        detected = true;
                    }
                },
            }
        }
        ProjectDetection { detected, paths }
    }

    /// List skills from the tool's global skills directory, including the
    /// vendor-bundled directory for tools that have one, sorted by name.
    pub async fn list_skills(&self) -> Vec<SkillDescriptor> {
        let mut skills = self.scan_dir(&self.skills_dir, self.user_builtin_flag()).await;
        if let Some(ref builtin_dir) = self.builtin_skills_dir {
            skills.extend(self.scan_dir(builtin_dir, Some(true)).await);
        }
        sort_skills(&mut skills);
        skills
    }

    /// List skills from the tool's per-project skills directory.
    pub async fn list_project_skills(&self, project_path: &Path) -> Vec<SkillDescriptor> {
        let dir = join_segments(project_path, self.project_skills_dir);
        let mut skills = self.scan_dir(&dir, self.user_builtin_flag()).await;
        sort_skills(&mut skills);
        skills
    }

    /// List commands from the tool's flat commands directory. Empty for
    /// tools without the command concept.
    pub async fn list_commands(&self) -> Vec<CommandDescriptor> {
        match self.commands_dir {
            Some(ref dir) => commands::list_commands_in(dir).await,
            None => Vec::new(),
        }
    }

    /// `Some(false)` for tools that distinguish built-in skills, so user
    /// results carry the flag explicitly; `None` elsewhere.
    fn user_builtin_flag(&self) -> Option<bool> {
        self.builtin_skills_dir.as_ref().map(|_| false)
    }

    async fn scan_dir(&self, dir: &Path, is_built_in: Option<bool>) -> Vec<SkillDescriptor> {
        let tool = self.name;
        scan_skill_dir(dir, |dir_name, mut fields, file_path, body| {
            let name = match fields.remove("name") {
                Some(n) if !n.is_empty() => n,
                _ => dir_name.to_string(),
            };
            let description = match fields.remove("description") {
                Some(d) if !d.is_empty() => d,
                _ => FALLBACK_DESCRIPTION.to_string(),
            };
            SkillDescriptor {
                source_tool: tool,
                name,
                description,
                file_path,
                body: Some(body),
                frontmatter: if fields.is_empty() { None } else { Some(fields) },
                is_built_in,
            }
        })
        .await
    }
}

/// Name-ascending, case-insensitive with the exact name as tiebreak, so
/// repeated listings of unchanged directories are identical.
pub(crate) fn sort_skills(skills: &mut [SkillDescriptor]) {
    skills.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
