use super::*;
use crate::svn::FileDiff;
use std::cell::RefCell;

struct StubBackend {
    available: bool,
    reply: Option<String>,
    seen: RefCell<Vec<String>>,
}

impl StubBackend {
    fn new(available: bool, reply: Option<&str>) -> Self {
        Self {
            available,
            reply: reply.map(ToString::to_string),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl MessageBackend for StubBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn generate(&self, files: &[FileDiff]) -> Option<String> {
        self.seen
            .borrow_mut()
            .extend(files.iter().map(|f| f.path.clone()));
        self.reply.clone()
    }
}

fn paths(paths: &[&str]) -> Vec<String> {
    paths.iter().map(ToString::to_string).collect()
}

fn svn() -> Svn {
    Svn::with_program("/nonexistent/svn", ".")
}

#[test]
fn test_backend_message_wins() {
    let backend = StubBackend::new(true, Some("feat(ui): add login panel"));
    let message = generate_commit_message(
        &paths(&["ui/Login.cs"]),
        &svn(),
        &backend,
        &Classifier::default(),
    );
    assert_eq!(message, "feat(ui): add login panel");
    assert_eq!(*backend.seen.borrow(), ["ui/Login.cs"]);
}

#[test]
fn test_backend_reply_equal_to_default_is_kept() {
    let classifier = Classifier::default();
    let backend = StubBackend::new(true, Some(classifier.default_message().as_str()));
    let message =
        generate_commit_message(&paths(&["battle/Fix.cs"]), &svn(), &backend, &classifier);
    assert_eq!(message, classifier.default_message());
}

#[test]
fn test_unavailable_backend_falls_back() {
    let classifier = Classifier::default();
    let backend = StubBackend::new(true, None);
    let message =
        generate_commit_message(&paths(&["battle/Fix.cs"]), &svn(), &backend, &classifier);
    assert_eq!(message, classifier.classify(&["battle/Fix.cs"]));
}

#[test]
fn test_unconfigured_backend_is_not_called() {
    let classifier = Classifier::default();
    let backend = StubBackend::new(false, Some("never"));
    let message =
        generate_commit_message(&paths(&["ui/Panel.cs"]), &svn(), &backend, &classifier);
    assert_eq!(message, classifier.classify(&["ui/Panel.cs"]));
    assert!(backend.seen.borrow().is_empty());
}

#[test]
fn test_no_paths() {
    let classifier = Classifier::default();
    let backend = StubBackend::new(true, Some("never"));
    let message = generate_commit_message(&[], &svn(), &backend, &classifier);
    assert_eq!(message, classifier.default_message());
    assert!(backend.seen.borrow().is_empty());
}
