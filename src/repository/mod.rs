use crate::error::Result;
use jiff::Timestamp;
use std::path::Path;

pub mod factory;
pub mod git_cli;

pub use factory::RepositoryFactory;
pub use git_cli::GitCli;

/// Result of pulling from a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    Updated,
    AlreadyUpToDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Version-control operations on one working copy.
pub trait RepositoryClient {
    fn hard_reset(&self) -> Result<()>;

    fn checkout(&self, branch: &str) -> Result<()>;

    fn pull(&self, remote: &str) -> Result<PullOutcome>;

    /// Writes the file inside the working copy and stages it.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn commit(&self, message: &str, author: &CommitAuthor, when: Timestamp) -> Result<()>;

    fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()>;
}

/// Opens the working copy rooted at a directory.
pub trait RepositoryOpener {
    fn open(&self, root: &Path) -> Result<Box<dyn RepositoryClient>>;
}
