use super::*;

fn records(paths: &[&str]) -> Vec<StatusRecord> {
    paths.iter().map(|p| StatusRecord::new("M", *p)).collect()
}

fn paths(records: &[StatusRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

fn patterns(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(ToString::to_string).collect()
}

#[test]
fn test_directory_pattern() {
    let input = records(&["Temp/a.txt", "Assets/Temp/b.txt", "src/c.rs", "Temp/sub/d.txt"]);
    let output = apply_ignore_patterns(input, &patterns(&["Temp/"]));
    assert_eq!(paths(&output), ["Assets/Temp/b.txt", "src/c.rs"]);
}

#[test]
fn test_extension_pattern() {
    let input = records(&["a.tmp", "dir/b.tmp", "c.tmpl", "d.txt"]);
    let output = apply_ignore_patterns(input, &patterns(&["*.tmp"]));
    assert_eq!(paths(&output), ["c.tmpl", "d.txt"]);
}

#[test]
fn test_substring_pattern() {
    let input = records(&[".DS_Store", "Assets/.DS_Store", "store.cs"]);
    let output = apply_ignore_patterns(input, &patterns(&[".DS_Store"]));
    assert_eq!(paths(&output), ["store.cs"]);
}

#[test]
fn test_substring_is_case_sensitive() {
    let input = records(&["Thumbs.db", "thumbs.db"]);
    let output = apply_ignore_patterns(input, &patterns(&["Thumbs.db"]));
    assert_eq!(paths(&output), ["thumbs.db"]);
}

#[test]
fn test_glob_pattern() {
    let input = records(&["Assets/A.meta", "Assets/A.cs", "Other/B.meta"]);
    let output = apply_ignore_patterns(input, &patterns(&["Assets/*.meta"]));
    assert_eq!(paths(&output), ["Assets/A.cs", "Other/B.meta"]);
}

#[test]
fn test_glob_question_mark() {
    let input = records(&["log1.txt", "log22.txt"]);
    let output = apply_ignore_patterns(input, &patterns(&["log?.txt"]));
    assert_eq!(paths(&output), ["log22.txt"]);
}

#[test]
fn test_invalid_glob_matches_nothing() {
    let input = records(&["a[.txt", "b.txt"]);
    let output = apply_ignore_patterns(input, &patterns(&["a[*"]));
    assert_eq!(paths(&output), ["a[.txt", "b.txt"]);
}

#[test]
fn test_directory_mode_wins_over_glob() {
    // trailing slash is a literal prefix even when it contains wildcards
    let input = records(&["*/x.txt", "a/x.txt"]);
    let output = apply_ignore_patterns(input, &patterns(&["*/"]));
    assert_eq!(paths(&output), ["a/x.txt"]);
}

#[test]
fn test_no_patterns_is_identity() {
    let input = records(&["b", "a", "c"]);
    let output = apply_ignore_patterns(input.clone(), &[]);
    assert_eq!(output, input);
}

#[test]
fn test_any_pattern_drops() {
    let input = records(&["Library/x", "y.tmp", "obj/z", "keep.cs"]);
    let output = apply_ignore_patterns(input, &patterns(&["Library/", "*.tmp", "obj/"]));
    assert_eq!(paths(&output), ["keep.cs"]);
}

#[test]
fn test_pattern_classification() {
    assert!(matches!(IgnorePattern::new("Temp/"), IgnorePattern::Directory(_)));
    assert!(matches!(IgnorePattern::new("*.tmp"), IgnorePattern::Extension(ref s) if s == ".tmp"));
    assert!(matches!(IgnorePattern::new("*foo"), IgnorePattern::Glob(Some(_))));
    assert!(matches!(IgnorePattern::new("foo"), IgnorePattern::Substring(_)));
}

#[test]
fn test_search_substring_case_insensitive() {
    let input = records(&["Assets/Player.cs", "Assets/ui/Panel.cs", "README.md"]);
    assert_eq!(paths(&search_filter("player", &input)), ["Assets/Player.cs"]);
    assert_eq!(paths(&search_filter("ASSETS", &input)), ["Assets/Player.cs", "Assets/ui/Panel.cs"]);
}

#[test]
fn test_search_empty_query_keeps_all() {
    let input = records(&["a", "b"]);
    assert_eq!(search_filter("", &input), input);
}

#[test]
fn test_search_wildcard_is_anchored() {
    let input = records(&["Test.cs", "Assets/Test.cs", "Test.cs.meta", "test.CS"]);
    assert_eq!(paths(&search_filter("*.cs", &input)), ["Test.cs", "Assets/Test.cs", "test.CS"]);
    assert_eq!(paths(&search_filter("Test*", &input)), ["Test.cs", "Test.cs.meta", "test.CS"]);
    assert_eq!(paths(&search_filter("*.cs*", &input)), ["Test.cs", "Assets/Test.cs", "Test.cs.meta", "test.CS"]);
}

#[test]
fn test_search_wildcard_escapes_regex_syntax() {
    let input = records(&["a+b(1).txt", "aab1.txt"]);
    assert_eq!(paths(&search_filter("a+b(?).txt", &input)), ["a+b(1).txt"]);
}
