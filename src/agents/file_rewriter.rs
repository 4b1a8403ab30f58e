use crate::requirements::Requirement;
use std::path::PathBuf;

/// Final text of a declaration file, ready to be written and committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    pub path: PathBuf,
    pub content: String,
}

impl RewrittenFile {
    pub fn has_changed(&self, original: &str) -> bool {
        self.content != original
    }
}

/// Rebuilds a declaration file from its parsed lines and their resolved versions.
///
/// Lines keep their order and each one ends with a newline. A line whose
/// resolution is empty is written as the bare name.
pub fn rewrite(
    path: impl Into<PathBuf>,
    requirements: &[Requirement],
    resolved: &[Option<String>],
) -> RewrittenFile {
    debug_assert_eq!(requirements.len(), resolved.len());

    let mut content = String::new();
    for (requirement, version) in requirements.iter().zip(resolved) {
        content.push_str(&requirement.render(version.as_deref()));
        content.push('\n');
    }

    RewrittenFile {
        path: path.into(),
        content,
    }
}
