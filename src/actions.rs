use crate::svn::Svn;
use anyhow::{Context, Result};
use std::fs;

/// per-file operations offered in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Diff,
    Log,
    Blame,
    Revert,
    Add,
    Delete,
    /// remove an unversioned file from disk
    DeleteFile,
}

const COMMON: &[Action] = &[Action::Diff, Action::Log, Action::Blame];

impl Action {
    pub const ALL: [Self; 7] = [
        Self::Diff,
        Self::Log,
        Self::Blame,
        Self::Revert,
        Self::Add,
        Self::Delete,
        Self::DeleteFile,
    ];

    /// actions that make sense for an entry with this status code
    pub fn for_status(status: &str) -> &'static [Self] {
        match status {
            "M" => &[Self::Diff, Self::Log, Self::Blame, Self::Revert, Self::Delete],
            "A" | "R" | "~" => &[Self::Diff, Self::Log, Self::Blame, Self::Delete],
            "?" => &[Self::Diff, Self::Log, Self::Blame, Self::Add, Self::DeleteFile],
            _ => COMMON,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Diff => "diff",
            Self::Log => "log",
            Self::Blame => "blame",
            Self::Revert => "revert",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::DeleteFile => "rm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// whether the working copy status changes after this action
    pub fn refreshes(self) -> bool {
        matches!(
            self,
            Self::Revert | Self::Add | Self::Delete | Self::DeleteFile
        )
    }

    /// whether to ask before running
    pub fn destructive(self) -> bool {
        matches!(self, Self::Revert | Self::Delete | Self::DeleteFile)
    }

    fn svn_subcommand(self) -> Option<&'static str> {
        match self {
            Self::Diff => Some("diff"),
            Self::Log => Some("log"),
            Self::Blame => Some("blame"),
            Self::Revert => Some("revert"),
            Self::Add => Some("add"),
            Self::Delete => Some("delete"),
            Self::DeleteFile => None,
        }
    }

    /// run the action on `path` and return what it printed
    pub fn run(self, svn: &Svn, path: &str) -> Result<String> {
        let Some(subcommand) = self.svn_subcommand() else {
            let target = svn.working_dir().join(path);
            let removed = if target.is_dir() {
                fs::remove_dir_all(&target)
            } else {
                fs::remove_file(&target)
            };
            removed.with_context(|| format!("failed to delete {}", target.display()))?;
            return Ok(String::new());
        };

        let output = svn.run([subcommand, path])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("svn {subcommand} failed: {}", stderr.trim());
        }
        Ok(stdout.into_owned())
    }
}
