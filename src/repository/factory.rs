use crate::error::Result;
use crate::repository::{GitCli, RepositoryClient, RepositoryOpener};
use std::path::Path;

/// Opens working copies through the `git` binary.
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn create_git(root: &Path) -> Result<Box<dyn RepositoryClient>> {
        Ok(Box::new(GitCli::open(root)?))
    }
}

impl RepositoryOpener for RepositoryFactory {
    fn open(&self, root: &Path) -> Result<Box<dyn RepositoryClient>> {
        Self::create_git(root)
    }
}
