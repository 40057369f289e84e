use crate::constants::{DEFAULT_DESCRIPTION, DEFAULT_TYPE};
use serde::{Deserialize, Serialize};

/// a label and the path keywords that vote for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, path_lower: &str) -> bool {
        self.keywords.iter().any(|k| path_lower.contains(k.as_str()))
    }
}

/// conventional commit types, in tie-break order
pub fn default_type_patterns() -> Vec<Category> {
    vec![
        Category::new("fix", &["fix", "bug", "hotfix"]),
        Category::new("feat", &["feature", "new", "add"]),
        Category::new("docs", &["doc", "readme", "changelog"]),
        Category::new("style", &["style", "format"]),
        Category::new("refactor", &["refactor", "rewrite"]),
        Category::new("perf", &["perf", "optimize", "performance"]),
        Category::new("test", &["test", "spec"]),
        Category::new("chore", &["chore", "build", "ci", "deps"]),
        Category::new("build", &["build", "package", "release"]),
    ]
}

/// scopes, in tie-break order
pub fn default_scope_patterns() -> Vec<Category> {
    vec![
        Category::new("guild", &["guild", "clan"]),
        Category::new("battle", &["battle", "fight", "combat"]),
        Category::new("chat", &["chat", "message", "mail"]),
        Category::new("player", &["player", "hero", "character", "role"]),
        Category::new("ui", &["ui", "view", "panel", "window", "dialog", "popup"]),
        Category::new("network", &["network", "net", "protocol", "rpc"]),
        Category::new("config", &["config", "setting", "option"]),
        Category::new("art", &["art", "asset", "sprite", "texture", "model", "animation"]),
        Category::new("audio", &["audio", "sound", "music", "voice"]),
    ]
}

/// keyword based commit message synthesis, used when no generative backend
/// produced a message
///
/// only paths are inspected. every category whose keywords hit a path gets one
/// vote from that path; the highest total wins and ties go to the category
/// declared first.
#[derive(Debug, Clone)]
pub struct Classifier {
    types: Vec<Category>,
    scopes: Vec<Category>,
    description: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            default_type_patterns(),
            default_scope_patterns(),
            DEFAULT_DESCRIPTION,
        )
    }
}

impl Classifier {
    pub fn new(types: Vec<Category>, scopes: Vec<Category>, description: &str) -> Self {
        let normalise = |categories: Vec<Category>| {
            categories
                .into_iter()
                .map(|c| Category {
                    keywords: c.keywords.iter().map(|k| k.to_lowercase()).collect(),
                    name: c.name,
                })
                .collect()
        };
        Self {
            types: normalise(types),
            scopes: normalise(scopes),
            description: description.to_string(),
        }
    }

    /// the message used when there is nothing to classify
    pub fn default_message(&self) -> String {
        format!("{DEFAULT_TYPE}: {}", self.description)
    }

    pub fn classify<S: AsRef<str>>(&self, paths: &[S]) -> String {
        if paths.is_empty() {
            return self.default_message();
        }

        let lowered: Vec<String> = paths.iter().map(|p| p.as_ref().to_lowercase()).collect();
        let commit_type = best_category(&self.types, &lowered).unwrap_or(DEFAULT_TYPE);

        match best_category(&self.scopes, &lowered) {
            Some(scope) => format!("{commit_type}({scope}): {}", self.description),
            None => format!("{commit_type}: {}", self.description),
        }
    }
}

fn best_category<'a>(categories: &'a [Category], paths: &[String]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for category in categories {
        let votes = paths.iter().filter(|p| category.matches(p)).count();
        // strictly greater keeps the earlier category on a tie
        if votes > 0 && best.is_none_or(|(_, top)| votes > top) {
            best = Some((category.name.as_str(), votes));
        }
    }
    best.map(|(name, _)| name)
}
