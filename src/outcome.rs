use crate::svn::CommitOutcome;
use serde::Serialize;

/// the JSON object printed on stdout when the tool finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub selected: Vec<String>,
    pub commit_message: String,
    pub cancelled: bool,
    pub commit_result: Option<CommitOutcome>,
}

impl Outcome {
    pub fn cancelled() -> Self {
        Self {
            selected: Vec::new(),
            commit_message: String::new(),
            cancelled: true,
            commit_result: None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        let commit_failed = self
            .commit_result
            .as_ref()
            .is_some_and(|result| !result.success);
        if self.cancelled || commit_failed { 1 } else { 0 }
    }

    pub fn to_json(&self) -> String {
        // a struct of strings, bools and options always serialises
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests;
