use super::*;
use tempfile::TempDir;

fn sources(dir: &TempDir) -> ConfigSources {
    ConfigSources {
        project: dir.path().join("project").join(PROJECT_CONFIG_NAME),
        user: Some(dir.path().join("user").join(USER_CONFIG_NAME)),
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_defaults_when_no_files() {
    let dir = TempDir::new().unwrap();
    let config = load(&sources(&dir));
    assert_eq!(config, Config::default());
    assert!(config.ignore_patterns.contains(&"Temp/".to_string()));
    assert!(!config.ai_api.enabled);
    assert_eq!(config.ai_api.max_diff_length, DEFAULT_MAX_DIFF_LENGTH);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(
        &sources.project,
        r#"{"ignorePatterns": ["*.log"], "aiApi": {"enabled": true, "baseUrl": "http://localhost:1"}}"#,
    );

    let config = load(&sources);
    assert_eq!(config.ignore_patterns, ["*.log"]);
    assert!(config.ai_api.enabled);
    assert_eq!(config.ai_api.base_url, "http://localhost:1");
    assert_eq!(config.ai_api.model, DEFAULT_MODEL);
    assert_eq!(config.ai_api.prompts, Prompts::default());
    assert_eq!(config.commit_message, CommitMessageConfig::default());
}

#[test]
fn test_project_file_wins_over_user_file() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(&sources.project, r#"{"ignorePatterns": ["project"]}"#);
    write(sources.user.as_ref().unwrap(), r#"{"ignorePatterns": ["user"]}"#);

    assert_eq!(load(&sources).ignore_patterns, ["project"]);
}

#[test]
fn test_malformed_file_falls_through() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(&sources.project, "{ not json");
    write(sources.user.as_ref().unwrap(), r#"{"ignorePatterns": ["user"]}"#);

    assert_eq!(load(&sources).ignore_patterns, ["user"]);
}

#[test]
fn test_malformed_file_without_fallback_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(&sources.project, r#"{"ignorePatterns": 42}"#);

    assert_eq!(load(&sources), Config::default());
}

#[test]
fn test_custom_tables_drive_classifier() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(
        &sources.project,
        r#"{"commitMessage": {
            "defaultDescription": "sync",
            "typePatterns": [{"name": "feat", "keywords": ["Shop"]}],
            "scopePatterns": [{"name": "store", "keywords": ["shop"]}]
        }}"#,
    );

    let classifier = load(&sources).classifier();
    assert_eq!(classifier.classify(&["game/shop/a.cs"]), "feat(store): sync");
    assert_eq!(classifier.classify(&["other.cs"]), "chore: sync");
}

#[test]
fn test_init_writes_defaults_to_user_path() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);

    let path = init(&sources).unwrap();
    assert_eq!(Some(&path), sources.user.as_ref());
    assert_eq!(load(&sources), Config::default());
}

#[test]
fn test_init_prefers_existing_project_file() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(&sources.project, "{}");

    assert_eq!(init(&sources).unwrap(), sources.project);
}

#[test]
fn test_saved_config_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    save(&Config::default(), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"ignorePatterns\""));
    assert!(text.contains("\"aiApi\""));
    assert!(text.contains("\"baseUrl\""));
}

#[test]
fn test_store_reads_once_until_reload() {
    let dir = TempDir::new().unwrap();
    let sources = sources(&dir);
    write(&sources.project, r#"{"ignorePatterns": ["first"]}"#);

    let mut store = ConfigStore::open(sources.clone());
    write(&sources.project, r#"{"ignorePatterns": ["second"]}"#);
    assert_eq!(store.get().ignore_patterns, ["first"]);

    assert_eq!(store.reload().ignore_patterns, ["second"]);
    assert_eq!(store.get().ignore_patterns, ["second"]);
}
