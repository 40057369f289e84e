mod actions;
mod backend;
mod classify;
mod cli;
mod config;
mod constants;
mod filter;
mod loader;
mod message;
mod outcome;
mod picker;
mod status;
mod svn;
mod ui;

use crate::backend::OpenAiBackend;
use crate::cli::{Cli, ConfigAction, split_list};
use crate::config::{ConfigSources, ConfigStore};
use crate::filter::apply_ignore_patterns;
use crate::outcome::Outcome;
use crate::picker::Picker;
use crate::status::StatusRecord;
use crate::svn::Svn;
use anyhow::{Context, Result, bail};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse_args();

    let (working_dir, single_file) = resolve_target(&cli)?;
    let sources = ConfigSources::discover(&working_dir);

    if let Some(action) = cli.config {
        config_command(action, &sources)?;
        return Ok(0);
    }

    let mut store = ConfigStore::open(sources);
    let svn = Svn::new(&working_dir);
    let rules = cli.ignore_rules();

    // explicit input: --file, --files and/or --status
    let items = if let Some(name) = single_file {
        Some(vec![StatusRecord::new("M", name)])
    } else if cli.auto_status() {
        None
    } else {
        let records = apply_ignore_patterns(collect_records(&cli)?, &rules.patterns(store.get()));
        if records.is_empty() {
            print_outcome(&Outcome::cancelled());
            return Ok(0);
        }
        Some(records)
    };

    let outcome = if cli.skip_ui {
        let items = match items {
            Some(items) => items,
            None => {
                let output = ui::with_spinner("loading svn status...", || svn.status())?;
                apply_ignore_patterns(status::parse(&output), &rules.patterns(store.get()))
            }
        };
        if items.is_empty() {
            print_outcome(&Outcome::cancelled());
            return Ok(0);
        }
        non_interactive(&cli, &svn, &store, &items)
    } else {
        if !std::io::stderr().is_terminal() {
            bail!("interactive terminal required (use --skip-ui to run without the picker)");
        }
        Picker::new(&svn, &mut store, rules).run(items, cli.message.clone())?
    };

    print_outcome(&outcome);
    Ok(outcome.exit_code())
}

/// working copy to run in, plus the file name when --file was given
fn resolve_target(cli: &Cli) -> Result<(PathBuf, Option<String>)> {
    if let Some(file) = &cli.file {
        let file = file
            .canonicalize()
            .with_context(|| format!("file not found: {}", file.display()))?;
        let name = file
            .file_name()
            .context("--file needs a file path")?
            .to_string_lossy()
            .into_owned();
        let dir = file.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        return Ok((dir, Some(name)));
    }

    if let Some(dir) = &cli.dir {
        if !dir.is_dir() {
            bail!("directory not found: {}", dir.display());
        }
        return Ok((dir.canonicalize()?, None));
    }

    Ok((std::env::current_dir()?, None))
}

fn collect_records(cli: &Cli) -> Result<Vec<StatusRecord>> {
    let mut records = Vec::new();

    if let Some(list) = &cli.files {
        records.extend(split_list(list).iter().map(|entry| status::from_label(entry)));
    }

    let stdin = std::io::stdin();
    if cli.status && !stdin.is_terminal() {
        let mut text = String::new();
        stdin
            .lock()
            .read_to_string(&mut text)
            .context("failed to read svn status from stdin")?;
        records.extend(status::parse(&text));
    }

    Ok(records)
}

fn non_interactive(cli: &Cli, svn: &Svn, store: &ConfigStore, items: &[StatusRecord]) -> Outcome {
    let selected: Vec<String> = items.iter().map(|record| record.path.clone()).collect();

    let commit_message = match &cli.message {
        Some(message) => message.trim().to_string(),
        None => {
            let config = store.get();
            let backend = OpenAiBackend::new(config.ai_api.clone());
            let classifier = config.classifier();
            ui::with_spinner("generating commit message...", || {
                message::generate_commit_message(&selected, svn, &backend, &classifier)
            })
        }
    };

    let commit_result = cli.commit.then(|| {
        let result = ui::with_spinner("committing...", || svn.commit(&selected, &commit_message));
        if result.success {
            status!(
                "committed revision {}",
                result.revision.as_deref().unwrap_or("unknown")
            );
        } else {
            error!("commit failed:");
            info!(result.output.trim_end());
        }
        result
    });

    Outcome {
        selected,
        commit_message,
        cancelled: false,
        commit_result,
    }
}

fn config_command(action: ConfigAction, sources: &ConfigSources) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config::init(sources)?;
            status!("config written to {}", path.display());
            info!("set aiApi.enabled, baseUrl and apiKey to generate messages from diffs");
        }
        ConfigAction::Show => {
            let config = ConfigStore::open(sources.clone());
            println!("{}", serde_json::to_string_pretty(config.get())?);
        }
        ConfigAction::Edit => {
            let path = sources.write_target();
            if !path.exists() {
                config::init(sources)?;
            }
            ui::open_in_editor(&path)?;
        }
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    println!("{}", outcome.to_json());
}
