use crate::status::StatusRecord;
use globset::{GlobBuilder, GlobMatcher};
use regex::RegexBuilder;

/// a single ignore rule, classified by its textual form
#[derive(Debug, Clone)]
pub enum IgnorePattern {
    /// `Temp/`: paths starting with the prefix
    Directory(String),
    /// `*.tmp`: paths ending with `.tmp`
    Extension(String),
    /// anything else containing `*` or `?`, matched against the whole path;
    /// `None` when the glob failed to compile and matches nothing
    Glob(Option<GlobMatcher>),
    /// plain text found anywhere in the path
    Substring(String),
}

impl IgnorePattern {
    pub fn new(pattern: &str) -> Self {
        if pattern.ends_with('/') {
            Self::Directory(pattern.to_string())
        } else if let Some(suffix) = pattern.strip_prefix('*')
            && suffix.starts_with('.')
        {
            Self::Extension(suffix.to_string())
        } else if pattern.contains(['*', '?']) {
            let matcher = GlobBuilder::new(pattern)
                .case_insensitive(cfg!(windows))
                .build()
                .ok()
                .map(|glob| glob.compile_matcher());
            Self::Glob(matcher)
        } else {
            Self::Substring(pattern.to_string())
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Directory(prefix) => path.starts_with(prefix.as_str()),
            Self::Extension(suffix) => path.ends_with(suffix.as_str()),
            Self::Glob(Some(matcher)) => matcher.is_match(path),
            Self::Glob(None) => false,
            Self::Substring(text) => path.contains(text.as_str()),
        }
    }
}

/// compile a list of configured ignore rules
pub fn compile(patterns: &[String]) -> Vec<IgnorePattern> {
    patterns.iter().map(|p| IgnorePattern::new(p)).collect()
}

/// drop every record whose path matches any ignore rule, preserving order
pub fn apply_ignore_patterns(records: Vec<StatusRecord>, patterns: &[String]) -> Vec<StatusRecord> {
    if patterns.is_empty() {
        return records;
    }
    let compiled = compile(patterns);
    records
        .into_iter()
        .filter(|record| !compiled.iter().any(|p| p.matches(&record.path)))
        .collect()
}

/// narrow a displayed list interactively
///
/// queries containing `*` or `?` are anchored, case-insensitive wildcards;
/// anything else is a case-insensitive substring search
pub fn search_filter(query: &str, records: &[StatusRecord]) -> Vec<StatusRecord> {
    if query.contains(['*', '?']) {
        wildcard_filter(query, records)
    } else {
        let needle = query.to_lowercase();
        records
            .iter()
            .filter(|record| record.path.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

fn wildcard_filter(query: &str, records: &[StatusRecord]) -> Vec<StatusRecord> {
    let mut pattern = String::from("^");
    for c in query.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');

    let Ok(regex) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|record| regex.is_match(&record.path))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests;
