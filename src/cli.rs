use crate::config::Config;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// smart-svn-commit: pick changed svn files, get a conventional commit message and commit
#[derive(Parser, Debug)]
#[command(name = "smart-svn-commit", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// comma separated files to commit; plain paths count as modified,
    /// `[status] path` labels keep their status
    #[arg(long, value_name = "LIST")]
    pub files: Option<String>,

    /// read `svn status` output from stdin
    #[arg(long)]
    pub status: bool,

    /// skip the interactive picker and select every listed file
    #[arg(long)]
    pub skip_ui: bool,

    /// with --skip-ui, commit the files instead of only printing the message
    #[arg(long, requires = "skip_ui")]
    pub commit: bool,

    /// commit message to use instead of generating one
    #[arg(long, short)]
    pub message: Option<String>,

    /// comma separated ignore patterns, replacing the configured ones
    #[arg(long, value_name = "LIST", conflicts_with = "no_ignore")]
    pub ignore: Option<String>,

    /// do not apply any ignore patterns
    #[arg(long)]
    pub no_ignore: bool,

    /// working copy to run in
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// open the picker on a single file
    #[arg(long, value_name = "PATH", conflicts_with_all = ["files", "status", "dir"])]
    pub file: Option<PathBuf>,

    /// manage the configuration file
    #[arg(long, value_enum, value_name = "ACTION")]
    pub config: Option<ConfigAction>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// write the default configuration
    Init,
    /// print the effective configuration
    Show,
    /// open the configuration in $EDITOR
    Edit,
}

/// which ignore patterns apply, after command line overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreRules {
    Configured,
    Override(Vec<String>),
    Disabled,
}

impl IgnoreRules {
    pub fn patterns(&self, config: &Config) -> Vec<String> {
        match self {
            Self::Configured => config.ignore_patterns.clone(),
            Self::Override(patterns) => patterns.clone(),
            Self::Disabled => Vec::new(),
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        if self.no_ignore {
            IgnoreRules::Disabled
        } else if let Some(list) = &self.ignore {
            IgnoreRules::Override(split_list(list))
        } else {
            IgnoreRules::Configured
        }
    }

    /// true when neither a file list nor status text was handed in
    pub fn auto_status(&self) -> bool {
        self.files.is_none() && !self.status && self.file.is_none()
    }
}

/// split a comma separated list, dropping blanks
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests;
