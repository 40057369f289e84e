use crate::classify::{Category, Classifier, default_scope_patterns, default_type_patterns};
use crate::constants::{
    DEFAULT_DESCRIPTION, DEFAULT_MAX_DIFF_LENGTH, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    PROJECT_CONFIG_NAME, USER_CONFIG_DIR, USER_CONFIG_NAME,
};
use crate::warning;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SYSTEM_PROMPT: &str = r"You write commit messages for a Subversion working copy.
Produce a single Conventional Commits line from the diff you are given.

Format: <type>(<scope>): <short description>
- type: feat, fix, docs, style, refactor, perf, test, chore or build
- scope: inferred from paths and content, e.g. ui, battle, player, network, config
- description: concise, imperative, no trailing period

Reply with the commit message only, without explanation.";

pub const DEFAULT_USER_TEMPLATE: &str = r"Write a commit message for these changes:

{diff_summary}

Reply with the message only, for example: feat(battle): add combo skill system";

/// placeholder in the user template replaced by the per-file diff summary
pub const DIFF_SUMMARY_PLACEHOLDER: &str = "{diff_summary}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub ignore_patterns: Vec<String>,
    pub commit_message: CommitMessageConfig,
    pub ai_api: AiApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitMessageConfig {
    pub default_description: String,
    pub type_patterns: Vec<Category>,
    pub scope_patterns: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiApiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_diff_length: usize,
    pub prompts: Prompts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_patterns: [
                ".DS_Store",
                "Thumbs.db",
                "*.tmp",
                "Library/",
                "Temp/",
                ".vs/",
                "obj/",
                "UserSettings/",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            commit_message: CommitMessageConfig::default(),
            ai_api: AiApiConfig::default(),
        }
    }
}

impl Default for CommitMessageConfig {
    fn default() -> Self {
        Self {
            default_description: DEFAULT_DESCRIPTION.to_string(),
            type_patterns: default_type_patterns(),
            scope_patterns: default_scope_patterns(),
        }
    }
}

impl Default for AiApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_diff_length: DEFAULT_MAX_DIFF_LENGTH,
            prompts: Prompts::default(),
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    pub fn classifier(&self) -> Classifier {
        let message = &self.commit_message;
        Classifier::new(
            message.type_patterns.clone(),
            message.scope_patterns.clone(),
            &message.default_description,
        )
    }
}

/// where configuration files are looked up, project file first
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub project: PathBuf,
    pub user: Option<PathBuf>,
}

impl ConfigSources {
    pub fn discover(working_dir: &Path) -> Self {
        Self {
            project: working_dir.join(PROJECT_CONFIG_NAME),
            user: dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_NAME)),
        }
    }

    /// the file `--config init` and `--config edit` operate on
    pub fn write_target(&self) -> PathBuf {
        if self.project.exists() {
            return self.project.clone();
        }
        self.user.clone().unwrap_or_else(|| self.project.clone())
    }

    fn candidates(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.project.as_path()).chain(self.user.as_deref())
    }
}

/// load the first readable config file, falling back to built-in defaults
pub fn load(sources: &ConfigSources) -> Config {
    for path in sources.candidates() {
        if !path.exists() {
            continue;
        }
        match read_file(path) {
            Ok(config) => return config,
            Err(e) => warning!("ignoring config {}: {:#}", path.display(), e),
        }
    }
    Config::default()
}

fn read_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).context("failed to read file")?;
    serde_json::from_str(&text).context("invalid config JSON")
}

pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))
}

/// write the default configuration and return where it went
pub fn init(sources: &ConfigSources) -> Result<PathBuf> {
    let path = sources.write_target();
    save(&Config::default(), &path)?;
    Ok(path)
}

/// read-through cache of the effective configuration
///
/// the file is read once on open and again only on `reload`
#[derive(Debug)]
pub struct ConfigStore {
    sources: ConfigSources,
    config: Config,
}

impl ConfigStore {
    pub fn open(sources: ConfigSources) -> Self {
        let config = load(&sources);
        Self { sources, config }
    }

    pub fn get(&self) -> &Config {
        &self.config
    }

    pub fn reload(&mut self) -> &Config {
        self.config = load(&self.sources);
        &self.config
    }
}

#[cfg(test)]
mod tests;
