use crate::agents::file_rewriter::RewrittenFile;
use crate::agents::interaction::{Interaction, PromptSource};
use crate::error::{ReqSyncError, Result};
use crate::repository::git_cli::reports_up_to_date;
use crate::repository::{CommitAuthor, PullOutcome, RepositoryClient, RepositoryOpener};
use colored::Colorize;
use jiff::Timestamp;
use std::path::{Path, PathBuf};

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore(deps): sync pinned requirement versions";
pub const DEFAULT_AUTHOR_NAME: &str = "reqsync";
pub const DEFAULT_AUTHOR_EMAIL: &str = "reqsync@users.noreply.localhost";
/// Mirrors every local branch onto the remote.
pub const DEFAULT_PUSH_REFSPEC: &str = "refs/heads/*:refs/heads/*";

/// Where a rewritten file has to be propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub repository_root: PathBuf,
    pub project_name: String,
    pub branches: Vec<String>,
}

impl SyncTarget {
    /// The repository is the directory holding the declaration file, and is named after it.
    pub fn for_file(path: &Path, branches: &[String]) -> Result<Self> {
        let repository_root = path.parent().ok_or_else(|| {
            ReqSyncError::GitOperation(format!(
                "Cannot locate repository for {}",
                path.display()
            ))
        })?;
        let project_name = repository_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| repository_root.display().to_string());

        Ok(Self {
            repository_root: repository_root.to_path_buf(),
            project_name,
            branches: branches.to_vec(),
        })
    }
}

/// Outcome of one `(file, branch)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    Pushed,
    Skipped,
}

/// Pushes rewritten declaration files into every configured branch of their repository
///
/// Branches are handled one after the other. The first failing step aborts
/// the whole run; branches pushed before that stay pushed.
pub struct RepositorySynchronizer<'a> {
    opener: &'a dyn RepositoryOpener,
    author: CommitAuthor,
    message: String,
    remote: String,
    refspecs: Vec<String>,
}

impl<'a> RepositorySynchronizer<'a> {
    pub fn new(opener: &'a dyn RepositoryOpener) -> Self {
        Self {
            opener,
            author: CommitAuthor::new(DEFAULT_AUTHOR_NAME, DEFAULT_AUTHOR_EMAIL),
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            refspecs: vec![DEFAULT_PUSH_REFSPEC.to_string()],
        }
    }

    pub fn sync_file<P: PromptSource>(
        &self,
        interaction: &mut Interaction<P>,
        file: &RewrittenFile,
        target: &SyncTarget,
    ) -> Result<Vec<(String, BranchOutcome)>> {
        let client = self.opener.open(&target.repository_root)?;
        let mut outcomes = Vec::with_capacity(target.branches.len());

        for branch in &target.branches {
            let question = format!(
                "\nDo you want to update the branch: {} of {}?",
                branch.bright_cyan(),
                target.project_name.white().bold()
            );
            if !interaction.ask(&question)? {
                interaction.say(&"Skipping this branch.".dimmed().to_string());
                outcomes.push((branch.clone(), BranchOutcome::Skipped));
                continue;
            }

            self.sync_branch(client.as_ref(), file, branch)?;
            interaction.say(
                &format!("✓ {} pushed to {}", target.project_name, branch)
                    .green()
                    .to_string(),
            );
            outcomes.push((branch.clone(), BranchOutcome::Pushed));
        }

        Ok(outcomes)
    }

    fn sync_branch(
        &self,
        client: &dyn RepositoryClient,
        file: &RewrittenFile,
        branch: &str,
    ) -> Result<()> {
        client.hard_reset()?;
        client.checkout(branch)?;

        match client.pull(&self.remote) {
            Ok(PullOutcome::Updated) | Ok(PullOutcome::AlreadyUpToDate) => {}
            Err(ReqSyncError::GitOperation(message)) if reports_up_to_date(&message) => {}
            Err(e) => return Err(e),
        }

        client.write_file(&file.path, file.content.as_bytes())?;
        client.commit(&self.message, &self.author, Timestamp::now())?;

        let refspecs: Vec<&str> = self.refspecs.iter().map(String::as_str).collect();
        client.push(&self.remote, &refspecs)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agents::interaction::ScriptedPrompt;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call; the operation named in `fail_on` returns an error.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingOpener {
        pub calls: Rc<RefCell<Vec<String>>>,
        pub fail_on: Option<&'static str>,
        pub pull_error: Option<&'static str>,
    }

    impl RecordingOpener {
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    struct RecordingClient {
        root: PathBuf,
        calls: Rc<RefCell<Vec<String>>>,
        fail_on: Option<&'static str>,
        pull_error: Option<&'static str>,
    }

    impl RecordingClient {
        fn record(&self, call: String) -> Result<()> {
            let op = call.split(' ').next().unwrap_or_default().to_string();
            self.calls.borrow_mut().push(call);
            if self.fail_on == Some(op.as_str()) {
                return Err(ReqSyncError::GitOperation(format!("{op} failed")));
            }
            Ok(())
        }
    }

    impl RepositoryClient for RecordingClient {
        fn hard_reset(&self) -> Result<()> {
            self.record("reset".to_string())
        }

        fn checkout(&self, branch: &str) -> Result<()> {
            self.record(format!("checkout {branch}"))
        }

        fn pull(&self, remote: &str) -> Result<PullOutcome> {
            self.record(format!("pull {remote}"))?;
            match self.pull_error {
                Some(message) => Err(ReqSyncError::GitOperation(message.to_string())),
                None => Ok(PullOutcome::Updated),
            }
        }

        fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            self.record(format!(
                "write {} {}",
                relative.display(),
                String::from_utf8_lossy(contents).escape_debug()
            ))
        }

        fn commit(&self, message: &str, author: &CommitAuthor, _when: Timestamp) -> Result<()> {
            self.record(format!("commit {message} by {}", author.name))
        }

        fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()> {
            self.record(format!("push {remote} {}", refspecs.join(" ")))
        }
    }

    impl RepositoryOpener for RecordingOpener {
        fn open(&self, root: &Path) -> Result<Box<dyn RepositoryClient>> {
            self.calls
                .borrow_mut()
                .push(format!("open {}", root.display()));
            Ok(Box::new(RecordingClient {
                root: root.to_path_buf(),
                calls: Rc::clone(&self.calls),
                fail_on: self.fail_on,
                pull_error: self.pull_error,
            }))
        }
    }

    fn interaction(answers: &[&str]) -> Interaction<ScriptedPrompt> {
        Interaction::new(ScriptedPrompt::new(answers)).unwrap()
    }

    fn fixture() -> (RewrittenFile, SyncTarget) {
        let path = PathBuf::from("/work/projA/requirements.txt");
        let file = RewrittenFile {
            path: path.clone(),
            content: "flask==1.0\n".to_string(),
        };
        let branches = vec!["develop".to_string(), "release".to_string()];
        let target = SyncTarget::for_file(&path, &branches).unwrap();
        (file, target)
    }

    #[test]
    fn target_is_derived_from_enclosing_directory() {
        let (_, target) = fixture();
        assert_eq!(target.repository_root, PathBuf::from("/work/projA"));
        assert_eq!(target.project_name, "projA");
    }

    #[test]
    fn declining_every_branch_touches_nothing() {
        let opener = RecordingOpener::default();
        let (file, target) = fixture();
        let mut ui = interaction(&["n", "n"]);

        let outcomes = RepositorySynchronizer::new(&opener)
            .sync_file(&mut ui, &file, &target)
            .unwrap();

        assert_eq!(
            outcomes,
            vec![
                ("develop".to_string(), BranchOutcome::Skipped),
                ("release".to_string(), BranchOutcome::Skipped),
            ]
        );
        assert_eq!(opener.calls(), vec!["open /work/projA"]);
    }

    #[test]
    fn runs_steps_in_order_for_each_confirmed_branch() {
        let opener = RecordingOpener::default();
        let (file, target) = fixture();
        let mut ui = interaction(&["y", "n"]);

        RepositorySynchronizer::new(&opener)
            .sync_file(&mut ui, &file, &target)
            .unwrap();

        assert_eq!(
            opener.calls(),
            vec![
                "open /work/projA",
                "reset",
                "checkout develop",
                "pull origin",
                "write requirements.txt flask==1.0\\n",
                "commit chore(deps): sync pinned requirement versions by reqsync",
                "push origin refs/heads/*:refs/heads/*",
            ]
        );
    }

    #[test]
    fn up_to_date_pull_is_tolerated() {
        let opener = RecordingOpener {
            pull_error: Some("already up-to-date"),
            ..Default::default()
        };
        let (file, target) = fixture();
        let mut ui = interaction(&["y", "y"]);

        let outcomes = RepositorySynchronizer::new(&opener)
            .sync_file(&mut ui, &file, &target)
            .unwrap();
        assert!(outcomes.iter().all(|(_, o)| *o == BranchOutcome::Pushed));
    }

    #[test]
    fn other_pull_errors_abort() {
        let opener = RecordingOpener {
            pull_error: Some("could not resolve host"),
            ..Default::default()
        };
        let (file, target) = fixture();
        let mut ui = interaction(&["y", "y"]);

        assert!(
            RepositorySynchronizer::new(&opener)
                .sync_file(&mut ui, &file, &target)
                .is_err()
        );
        assert!(!opener.calls().iter().any(|c| c.starts_with("write")));
    }

    #[test]
    fn failure_stops_remaining_branches() {
        let opener = RecordingOpener {
            fail_on: Some("push"),
            ..Default::default()
        };
        let (file, target) = fixture();
        let mut ui = interaction(&["y", "y"]);

        let err = RepositorySynchronizer::new(&opener)
            .sync_file(&mut ui, &file, &target)
            .unwrap_err();
        assert!(err.to_string().contains("push failed"));
        assert!(!opener.calls().contains(&"checkout release".to_string()));
        // the second confirmation was never asked
        assert_eq!(ui.prompt().remaining(), 1);
    }

    #[test]
    fn checkout_failure_is_fatal() {
        let opener = RecordingOpener {
            fail_on: Some("checkout"),
            ..Default::default()
        };
        let (file, target) = fixture();
        let mut ui = interaction(&["y"]);

        assert!(
            RepositorySynchronizer::new(&opener)
                .sync_file(&mut ui, &file, &target)
                .is_err()
        );
        assert_eq!(
            opener.calls(),
            vec!["open /work/projA", "reset", "checkout develop"]
        );
    }
}
