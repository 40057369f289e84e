use crate::constants::{DIFF_TIMEOUT_SECS, REVISION_PATTERN, SVN_BIN};
use crate::warning;
use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;
use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

static REVISION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REVISION_PATTERN).expect("revision pattern is valid"));

/// a file path together with its (possibly empty) `svn diff` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub diff: String,
}

/// result of `svn commit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub success: bool,
    pub revision: Option<String>,
    pub message: String,
    /// combined stdout and stderr of the commit
    pub output: String,
}

impl CommitOutcome {
    fn failed(message: &str, output: String) -> Self {
        Self {
            success: false,
            revision: None,
            message: message.to_string(),
            output,
        }
    }
}

/// runs the svn binary inside a working copy
#[derive(Debug, Clone)]
pub struct Svn {
    program: String,
    working_dir: PathBuf,
}

impl Svn {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_program(SVN_BIN, working_dir)
    }

    pub fn with_program(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args).current_dir(&self.working_dir);
        command
    }

    /// run an svn subcommand to completion, capturing its output
    pub fn run<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {}", self.program))
    }

    /// raw stdout of `svn status`
    pub fn status(&self) -> Result<String> {
        let output = self.run(["status"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("svn status failed: {}", stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// start `svn status` without waiting for it
    pub fn spawn_status(&self) -> Result<Child> {
        self.command(["status"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run {}", self.program))
    }

    /// `svn diff` for one file, empty when svn fails or takes too long
    pub fn diff(&self, path: &str) -> String {
        match self.diff_with_timeout(path, Duration::from_secs(DIFF_TIMEOUT_SECS)) {
            Ok(diff) => diff,
            Err(e) => {
                warning!("no diff for {}: {:#}", path, e);
                String::new()
            }
        }
    }

    fn diff_with_timeout(&self, path: &str, timeout: Duration) -> Result<String> {
        let mut child = self
            .command(["diff", path])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {}", self.program))?;

        // drain stdout on a thread so a large diff can't fill the pipe
        let mut stdout = child.stdout.take().context("svn diff has no stdout")?;
        let reader = thread::spawn(move || {
            let mut data = Vec::new();
            stdout.read_to_end(&mut data).map(|_| data)
        });

        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                bail!("svn diff timed out");
            }
            Err(e) => bail!("failed to wait for svn diff: {e}"),
        };

        let data = reader
            .join()
            .map_err(|_| anyhow::anyhow!("svn diff reader panicked"))?
            .context("failed to read svn diff")?;
        if !status.success() {
            bail!("svn diff exited with {status}");
        }
        Ok(String::from_utf8_lossy(&data).trim().to_string())
    }

    pub fn diffs(&self, paths: &[String]) -> Vec<FileDiff> {
        paths
            .iter()
            .map(|path| FileDiff {
                path: path.clone(),
                diff: self.diff(path),
            })
            .collect()
    }

    /// commit exactly `paths` with `message`
    ///
    /// the path list is handed to svn through a `--targets` file which is
    /// removed afterwards, whatever the outcome
    pub fn commit(&self, paths: &[String], message: &str) -> CommitOutcome {
        if paths.is_empty() {
            return CommitOutcome::failed("no files selected", String::new());
        }

        let targets = match write_targets(paths) {
            Ok(targets) => targets,
            Err(e) => return CommitOutcome::failed("commit failed", format!("{e:#}")),
        };

        let args = [
            OsStr::new("commit"),
            OsStr::new("--targets"),
            targets.as_os_str(),
            OsStr::new("-m"),
            OsStr::new(message),
        ];
        let output = match self.run(args) {
            Ok(output) => output,
            Err(e) => return CommitOutcome::failed("commit failed", format!("{e:#}")),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{stdout}{stderr}");

        if output.status.success() {
            CommitOutcome {
                success: true,
                revision: extract_revision(&stdout),
                message: "commit succeeded".to_string(),
                output: combined,
            }
        } else {
            CommitOutcome::failed("commit failed", combined)
        }
        // `targets` is dropped here; removal errors are ignored
    }
}

/// one path per line, utf-8; the returned path deletes the file on drop
fn write_targets(paths: &[String]) -> Result<tempfile::TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("svn-targets-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create targets file")?;
    for path in paths {
        writeln!(file, "{path}").context("failed to write targets file")?;
    }
    file.flush().context("failed to flush targets file")?;
    Ok(file.into_temp_path())
}

pub fn extract_revision(output: &str) -> Option<String> {
    REVISION
        .captures(output)
        .map(|captures| captures[1].to_string())
}
