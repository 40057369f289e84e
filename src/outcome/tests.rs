use super::*;

fn committed(success: bool) -> Outcome {
    Outcome {
        selected: vec!["a.cs".to_string()],
        commit_message: "fix: x".to_string(),
        cancelled: false,
        commit_result: Some(CommitOutcome {
            success,
            revision: success.then(|| "7".to_string()),
            message: String::new(),
            output: String::new(),
        }),
    }
}

#[test]
fn test_exit_codes() {
    assert_eq!(Outcome::cancelled().exit_code(), 1);
    assert_eq!(committed(true).exit_code(), 0);
    assert_eq!(committed(false).exit_code(), 1);

    let mut generated = committed(true);
    generated.commit_result = None;
    assert_eq!(generated.exit_code(), 0);
}

#[test]
fn test_json_shape() {
    let value: serde_json::Value = serde_json::from_str(&committed(true).to_json()).unwrap();
    assert_eq!(value["selected"][0], "a.cs");
    assert_eq!(value["commitMessage"], "fix: x");
    assert_eq!(value["cancelled"], false);
    assert_eq!(value["commitResult"]["revision"], "7");

    let value: serde_json::Value = serde_json::from_str(&Outcome::cancelled().to_json()).unwrap();
    assert_eq!(value["cancelled"], true);
    assert!(value["commitResult"].is_null());
}
