//! Interactive terminal picker: choose files, settle on a message, commit.

use crate::actions::Action;
use crate::backend::OpenAiBackend;
use crate::cli::IgnoreRules;
use crate::config::ConfigStore;
use crate::filter::search_filter;
use crate::loader::{LoadEvent, StatusLoader};
use crate::message::generate_commit_message;
use crate::outcome::Outcome;
use crate::status::StatusRecord;
use crate::svn::Svn;
use crate::ui::{self, with_spinner};
use crate::{error, info, status, warning};
use anyhow::Result;
use colored::Colorize;
use num_format::{Locale, ToFormattedString};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::time::Duration;

const STATUS_WAIT: Duration = Duration::from_secs(30);

const HELP: &str = "\
  1 3 5-7     toggle files by number
  a / n       select all / none (of the listed files)
  /text       narrow the list; wildcards * and ? match the whole path; / clears
  g           generate a commit message from the selection
  e / E       edit the message inline / in $EDITOR
  r           reload svn status
  :ACTION N   run diff, log, blame, revert, add, delete or rm on file N
  c           commit the selected files
  q           cancel";

/// files on offer, what is ticked, and the current search
#[derive(Debug, Default)]
pub struct Selection {
    items: Vec<StatusRecord>,
    checked: HashSet<String>,
    query: String,
}

impl Selection {
    pub fn new(items: Vec<StatusRecord>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// swap in a fresh listing, keeping ticks on paths that are still there
    pub fn replace(&mut self, items: Vec<StatusRecord>) {
        let present: HashSet<&str> = items.iter().map(|r| r.path.as_str()).collect();
        self.checked.retain(|path| present.contains(path.as_str()));
        self.items = items;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// the listed records, narrowed by the current query
    pub fn visible(&self) -> Vec<StatusRecord> {
        if self.query.is_empty() {
            self.items.clone()
        } else {
            search_filter(&self.query, &self.items)
        }
    }

    /// 1-based lookup into the visible list
    pub fn record(&self, number: usize) -> Option<StatusRecord> {
        number
            .checked_sub(1)
            .and_then(|idx| self.visible().into_iter().nth(idx))
    }

    pub fn is_checked(&self, path: &str) -> bool {
        self.checked.contains(path)
    }

    /// flip the given 1-based ranges of visible entries; returns how many
    /// numbers were out of range
    pub fn toggle(&mut self, ranges: &[RangeInclusive<usize>]) -> usize {
        let visible = self.visible();
        let mut missed = 0;
        for range in ranges {
            let (start, end) = (*range.start(), *range.end());
            if start > end {
                continue;
            }
            if start == 0 {
                missed += 1;
            }
            missed += end.saturating_sub(visible.len().max(start.saturating_sub(1)));
            for record in visible.iter().take(end).skip(start.max(1) - 1) {
                if !self.checked.remove(&record.path) {
                    self.checked.insert(record.path.clone());
                }
            }
        }
        missed
    }

    pub fn set_all(&mut self, checked: bool) {
        for record in self.visible() {
            if checked {
                self.checked.insert(record.path);
            } else {
                self.checked.remove(&record.path);
            }
        }
    }

    /// ticked paths in listing order, including ones hidden by the query
    pub fn selected(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|record| self.checked.contains(&record.path))
            .map(|record| record.path.clone())
            .collect()
    }
}

/// a parsed picker command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Redraw,
    /// 1-based, unbounded until applied to the visible list
    Toggle(Vec<RangeInclusive<usize>>),
    All,
    None,
    Search(String),
    Generate,
    Edit,
    EditInEditor,
    Refresh,
    Run(Action, usize),
    Commit,
    Cancel,
    Help,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Command::Search(query.trim().to_string()));
    }
    if let Some(rest) = line.strip_prefix(':') {
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let action =
            Action::from_name(name).ok_or_else(|| format!("unknown action: {name}"))?;
        let number = words
            .next()
            .ok_or_else(|| format!(":{name} needs a file number"))?
            .parse()
            .map_err(|_| format!(":{name} needs a file number"))?;
        return Ok(Command::Run(action, number));
    }

    let command = match line {
        "" => Command::Redraw,
        "a" | "all" => Command::All,
        "n" | "none" => Command::None,
        "g" | "generate" => Command::Generate,
        "e" | "edit" => Command::Edit,
        "E" => Command::EditInEditor,
        "r" | "refresh" => Command::Refresh,
        "c" | "commit" => Command::Commit,
        "q" | "quit" => Command::Cancel,
        "h" | "?" | "help" => Command::Help,
        _ => Command::Toggle(parse_numbers(line)?),
    };
    Ok(command)
}

fn parse_numbers(line: &str) -> Result<Vec<RangeInclusive<usize>>, String> {
    let mut ranges = Vec::new();
    for part in line.split([',', ' ']).filter(|p| !p.is_empty()) {
        let bad = || format!("not a command or file number: {part}");
        match part.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.parse().map_err(|_| bad())?;
                let end: usize = end.parse().map_err(|_| bad())?;
                if start == 0 || end < start {
                    return Err(bad());
                }
                ranges.push(start..=end);
            }
            None => {
                let number: usize = part.parse().map_err(|_| bad())?;
                if number == 0 {
                    return Err(bad());
                }
                ranges.push(number..=number);
            }
        }
    }
    Ok(ranges)
}

pub struct Picker<'a> {
    svn: &'a Svn,
    store: &'a mut ConfigStore,
    rules: IgnoreRules,
    loader: StatusLoader,
    selection: Selection,
    message: String,
}

impl<'a> Picker<'a> {
    pub fn new(svn: &'a Svn, store: &'a mut ConfigStore, rules: IgnoreRules) -> Self {
        let loader = StatusLoader::new(svn.clone(), rules.patterns(store.get()));
        Self {
            svn,
            store,
            rules,
            loader,
            selection: Selection::default(),
            message: String::new(),
        }
    }

    /// show the picker; `items` of `None` loads `svn status` in the background
    pub fn run(mut self, items: Option<Vec<StatusRecord>>, message: Option<String>) -> Result<Outcome> {
        self.message = message.unwrap_or_default();
        match items {
            Some(items) => self.selection = Selection::new(items),
            None => self.refresh(),
        }

        loop {
            if let Some(event) = self.loader.try_next() {
                self.apply(event);
            }
            self.draw();

            let Some(line) = ui::read_line("> ", "")? else {
                return Ok(Outcome::cancelled());
            };
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    warning!(e);
                    continue;
                }
            };

            match command {
                Command::Redraw => {}
                Command::Help => info!(HELP),
                Command::Toggle(numbers) => {
                    let missed = self.selection.toggle(&numbers);
                    if missed > 0 {
                        warning!("{} number(s) out of range", missed);
                    }
                }
                Command::All => self.selection.set_all(true),
                Command::None => self.selection.set_all(false),
                Command::Search(query) => self.selection.set_query(&query),
                Command::Generate => self.generate(),
                Command::Edit => {
                    if let Some(edited) = ui::read_line("message> ", &self.message)? {
                        self.message = edited;
                    }
                }
                Command::EditInEditor => match ui::edit_multi_line(&self.message) {
                    Ok(edited) => self.message = edited,
                    Err(e) => error!("{:#}", e),
                },
                Command::Refresh => self.refresh(),
                Command::Run(action, number) => self.run_action(action, number)?,
                Command::Commit => {
                    if let Some(outcome) = self.commit() {
                        return Ok(outcome);
                    }
                }
                Command::Cancel => return Ok(Outcome::cancelled()),
            }
        }
    }

    fn refresh(&mut self) {
        let config = self.store.reload();
        self.loader.set_ignore_patterns(self.rules.patterns(config));
        self.loader.start();

        let loader = &mut self.loader;
        match with_spinner("loading svn status...", || loader.wait(STATUS_WAIT)) {
            Some(event) => self.apply(event),
            None => warning!("svn status is still running, press enter to check again"),
        }
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded(records) => self.selection.replace(records),
            LoadEvent::Failed(e) => error!("failed to load svn status: {}", e),
        }
    }

    fn generate(&mut self) {
        let config = self.store.get();
        let classifier = config.classifier();
        let selected = self.selection.selected();
        if selected.is_empty() {
            warning!("no files selected");
            self.message = classifier.default_message();
            return;
        }

        let backend = OpenAiBackend::new(config.ai_api.clone());
        let svn = self.svn;
        self.message = with_spinner("generating commit message...", || {
            generate_commit_message(&selected, svn, &backend, &classifier)
        });
    }

    fn run_action(&mut self, action: Action, number: usize) -> Result<()> {
        let Some(record) = self.selection.record(number) else {
            warning!("no file numbered {}", number);
            return Ok(());
        };
        if !Action::for_status(&record.status).contains(&action) {
            warning!("{} is not available for {}", action.name(), record.label());
            return Ok(());
        }
        if action.destructive() {
            info!("{} {}", action.name(), record.path);
            if ui::prompt(&["no", "yes"])? != Some('y') {
                return Ok(());
            }
        }

        match action.run(self.svn, &record.path) {
            Ok(output) => {
                if !output.trim().is_empty() {
                    info!(output.trim_end());
                }
                if action.refreshes() {
                    self.refresh();
                }
            }
            Err(e) => error!("{:#}", e),
        }
        Ok(())
    }

    /// `Some` once the commit went through
    fn commit(&mut self) -> Option<Outcome> {
        let selected = self.selection.selected();
        if selected.is_empty() {
            warning!("select at least one file to commit");
            return None;
        }
        let message = self.message.trim().to_string();
        if message.is_empty() {
            warning!("enter a commit message first (g to generate, e to edit)");
            return None;
        }
        // blocks the command loop, so no second commit can start meanwhile
        let svn = self.svn;
        let result = with_spinner("committing...", || svn.commit(&selected, &message));

        if result.success {
            status!(
                "committed revision {}",
                result.revision.as_deref().unwrap_or("unknown")
            );
            return Some(Outcome {
                selected,
                commit_message: message,
                cancelled: false,
                commit_result: Some(result),
            });
        }

        error!("commit failed:");
        info!(result.output.trim_end());
        None
    }

    fn draw(&self) {
        let visible = self.selection.visible();
        info!();
        for (idx, record) in visible.iter().enumerate() {
            let mark = if self.selection.is_checked(&record.path) {
                "[x]".green()
            } else {
                "[ ]".normal()
            };
            let label = record.label();
            let label = match record.status.as_str() {
                _ if record.is_property_only() => label.cyan(),
                "M" => label.blue(),
                "D" | "!" | "C" => label.red(),
                "A" => label.green(),
                _ => label.normal(),
            };
            info!("{:>3} {} {}", idx + 1, mark, label);
        }

        let total = self.selection.total();
        let selected = self.selection.selected().len();
        if self.loader.is_running() {
            status!("loading svn status...");
        } else if total == 0 {
            status!("no changed files");
        } else if self.selection.query().is_empty() {
            status!(
                "{} files, {} selected",
                total.to_formatted_string(&Locale::en),
                selected.to_formatted_string(&Locale::en)
            );
        } else {
            status!(
                "filter '{}': {} of {} files, {} selected",
                self.selection.query(),
                visible.len().to_formatted_string(&Locale::en),
                total.to_formatted_string(&Locale::en),
                selected.to_formatted_string(&Locale::en)
            );
        }
        if self.message.is_empty() {
            info!("message: {}", "(none, g to generate)".dimmed());
        } else {
            info!("message: {}", self.message);
        }
        info!("{}", "h for help".dimmed());
    }
}
