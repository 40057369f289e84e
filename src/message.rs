use crate::backend::MessageBackend;
use crate::classify::Classifier;
use crate::svn::Svn;

/// commit message for `paths`: the generative backend when it answers,
/// otherwise the keyword classifier
pub fn generate_commit_message(
    paths: &[String],
    svn: &Svn,
    backend: &dyn MessageBackend,
    classifier: &Classifier,
) -> String {
    if paths.is_empty() {
        return classifier.default_message();
    }

    if backend.is_available() {
        let diffs = svn.diffs(paths);
        if let Some(message) = backend.generate(&diffs) {
            return message;
        }
    }

    classifier.classify(paths)
}

#[cfg(test)]
mod tests;
