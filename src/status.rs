use crate::constants::LABEL_SEPARATOR;

/// status codes `svn status` writes in its first column
pub const STATUS_CODES: [char; 9] = ['M', 'A', 'D', '?', '!', 'C', 'R', '~', 'S'];

/// property column codes that count as a change
const PROP_STATUS_CODES: [char; 2] = ['M', 'C'];

/// `svn status` lines that are diagnostics rather than file entries
const NOISE_PREFIXES: [&str; 2] = ["svn: warning:", "svn: E"];
const NOISE_MARKER: &str = "ng status";

/// width of the status columns before the path starts
const PATH_COLUMN: usize = 8;

/// a single working copy entry reported by `svn status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    /// one of `STATUS_CODES`, or `_M`/`_C` for property-only changes
    pub status: String,
    pub path: String,
}

impl StatusRecord {
    pub fn new(status: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            path: path.into(),
        }
    }

    /// true when only svn properties changed, not file content
    pub fn is_property_only(&self) -> bool {
        self.status.starts_with('_')
    }

    pub fn label(&self) -> String {
        format_label(&self.status, &self.path)
    }
}

/// parse the captured stdout of `svn status` into records, in input order
///
/// malformed lines and svn diagnostics are skipped silently
pub fn parse(output: &str) -> Vec<StatusRecord> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<StatusRecord> {
    // leading spaces are significant: they mean "no change in this column"
    let line = line.trim_end();
    if line.is_empty()
        || NOISE_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
        || line.contains(NOISE_MARKER)
    {
        return None;
    }

    if line.len() <= PATH_COLUMN {
        return None;
    }

    let mut columns = line.chars();
    let content_status = match columns.next() {
        Some(' ') | None => None,
        Some(c) if STATUS_CODES.contains(&c) => Some(c),
        Some(_) => return None,
    };
    let prop_status = columns.next().filter(|c| PROP_STATUS_CODES.contains(c));

    let status = match (content_status, prop_status) {
        (Some(content), _) => content.to_string(),
        (None, Some(prop)) => format!("_{prop}"),
        (None, None) => return None,
    };

    let path = line.get(PATH_COLUMN..)?.trim();
    if path.is_empty() {
        return None;
    }

    Some(StatusRecord::new(status, path))
}

/// render the display label `[<status>] <path>`
pub fn format_label(status: &str, path: &str) -> String {
    format!("[{status}{LABEL_SEPARATOR}{path}")
}

/// recover the path from a display label, splitting on the first `separator`
pub fn extract_path<'a>(label: &'a str, separator: &str) -> Option<&'a str> {
    label.split_once(separator).map(|(_, path)| path)
}

/// recover the status code from a display label
pub fn extract_status(label: &str) -> Option<&str> {
    let (head, _) = label.split_once(LABEL_SEPARATOR)?;
    head.strip_prefix('[')
}

/// a record from either a display label or a bare path, which counts as modified
pub fn from_label(entry: &str) -> StatusRecord {
    match (extract_status(entry), extract_path(entry, LABEL_SEPARATOR)) {
        (Some(status), Some(path)) if !status.is_empty() && !path.is_empty() => {
            StatusRecord::new(status, path)
        }
        _ => StatusRecord::new("M", entry),
    }
}
