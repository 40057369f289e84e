use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("smart-svn-commit").chain(args.iter().copied()))
}

#[test]
fn test_split_list() {
    assert_eq!(split_list(" a.cs, ,b.cs ,"), ["a.cs", "b.cs"]);
    assert!(split_list("").is_empty());
}

#[test]
fn test_ignore_rules() {
    let config = Config::default();

    let cli = parse(&[]).unwrap();
    assert_eq!(cli.ignore_rules(), IgnoreRules::Configured);
    assert_eq!(cli.ignore_rules().patterns(&config), config.ignore_patterns);

    let cli = parse(&["--ignore", "*.log, build/"]).unwrap();
    assert_eq!(cli.ignore_rules().patterns(&config), ["*.log", "build/"]);

    let cli = parse(&["--no-ignore"]).unwrap();
    assert!(cli.ignore_rules().patterns(&config).is_empty());

    assert!(parse(&["--no-ignore", "--ignore", "x"]).is_err());
}

#[test]
fn test_auto_status() {
    assert!(parse(&[]).unwrap().auto_status());
    assert!(parse(&["--dir", "."]).unwrap().auto_status());
    assert!(!parse(&["--status"]).unwrap().auto_status());
    assert!(!parse(&["--files", "a.cs"]).unwrap().auto_status());
    assert!(!parse(&["--file", "a.cs"]).unwrap().auto_status());
}

#[test]
fn test_commit_requires_skip_ui() {
    assert!(parse(&["--commit"]).is_err());
    assert!(parse(&["--skip-ui", "--commit", "-m", "fix: x"]).is_ok());
}

#[test]
fn test_config_actions() {
    assert_eq!(parse(&["--config", "show"]).unwrap().config, Some(ConfigAction::Show));
    assert!(parse(&["--config", "delete"]).is_err());
}
