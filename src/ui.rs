//! terminal output and input helpers
//!
//! stdout is reserved for the JSON result, so everything here writes to stderr

use crate::constants::SPINNER_TICK_MS;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[macro_export]
macro_rules! warning {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).yellow());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).yellow());
    }};
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).red());
    }};
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).red());
    }};
}

#[macro_export]
macro_rules! status {
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).green());
    }};
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).green());
    }};
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stderr());
    }};
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), $fmt $(, $($arg)*)?);
    }};
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", $expr);
    }};
}

/// run `work` behind a spinner on stderr
pub fn with_spinner<T>(label: &str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(label.to_string());
    spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));

    let result = work();

    spinner.finish_and_clear();
    result
}

/// single key choice like `[Y]ES/[n]o`; enter picks the first option
///
/// returns the lowercased first letter of the chosen option, or `None` when
/// the user pressed esc or ctrl-c
pub fn prompt(options: &[&str]) -> Result<Option<char>> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode},
    };
    use std::io::{self, Write};

    debug_assert!(!options.is_empty(), "prompt requires at least one option");

    let mut keys = Vec::with_capacity(options.len());
    let mut parts = Vec::with_capacity(options.len());
    for option in options {
        let mut chars = option.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        keys.push(first.to_lowercase().next().unwrap_or(first));
        parts.push(format!("[{first}]{}", chars.as_str()));
    }

    eprint!("{} ? ", parts.join("/"));
    let _ = io::stderr().flush();

    enable_raw_mode().context("this command requires an interactive terminal")?;

    let choice = loop {
        let Ok(Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        })) = event::read()
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Esc => break None,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
            KeyCode::Enter => break Some(0),
            KeyCode::Char(c) => {
                let lower = c.to_lowercase().next().unwrap_or(c);
                if let Some(idx) = keys.iter().position(|&key| key == lower) {
                    break Some(idx);
                }
            }
            _ => {}
        }
    };

    disable_raw_mode().ok();
    match choice {
        Some(idx) => {
            info!(options[idx]);
            Ok(keys.get(idx).copied())
        }
        None => {
            info!("^C");
            Ok(None)
        }
    }
}

/// read one line from the terminal, pre-filled with `initial`
///
/// `None` when the user interrupted with ctrl-c or ctrl-d
pub fn read_line(prompt: &str, initial: &str) -> Result<Option<String>> {
    use rustyline::config::{Behavior, Config};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    // talk to the tty directly so stdin may carry piped status output
    let config = Config::builder().behavior(Behavior::PreferTerm).build();
    let mut editor = DefaultEditor::with_config(config).context("failed to initialise line editor")?;

    match editor.readline_with_initial(prompt, (initial, "")) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e).context("failed to read input"),
    }
}

/// open `path` in `$EDITOR` (falling back to `vi`) and wait for it
pub fn open_in_editor(path: &std::path::Path) -> Result<()> {
    use std::process::Command;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let quoted = shlex::try_quote(&path.to_string_lossy())
        .context("path cannot be quoted for the shell")?
        .into_owned();

    // run via the shell so arguments inside EDITOR work
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{editor} {quoted}"))
        .status()
        .with_context(|| format!("failed to run editor: {editor}"))?;
    if !status.success() {
        anyhow::bail!("editor exited with {status}");
    }
    Ok(())
}

/// edit `text` in `$EDITOR` through a temporary file
pub fn edit_multi_line(text: &str) -> Result<String> {
    use std::fs;
    use std::io::Write;
    use tempfile::Builder;

    let mut temp_file = Builder::new()
        .prefix("svn-commit-message-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create temporary file")?;
    temp_file
        .write_all(text.as_bytes())
        .context("failed to write to temporary file")?;
    temp_file
        .flush()
        .context("failed to flush temporary file")?;

    open_in_editor(temp_file.path())?;

    let edited = fs::read_to_string(temp_file.path()).context("failed to read edited message")?;
    Ok(edited.trim().to_string())
}
