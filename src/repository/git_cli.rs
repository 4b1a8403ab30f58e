use crate::error::{ReqSyncError, Result};
use crate::repository::{CommitAuthor, PullOutcome, RepositoryClient};
use crate::utils::is_verbose;
use crate::utils::paths;
use jiff::Timestamp;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// GitCli drives a local working copy through the `git` binary with hardened input validation.
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Opens the working copy at `root`; fails when there is no `.git` metadata there.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let repo_path = Self::validate_git_path(root.as_ref())?;
        if !repo_path.join(".git").exists() {
            return Err(ReqSyncError::GitOperation(format!(
                "No git repository found at {}",
                repo_path.display()
            )));
        }
        Ok(Self { repo_path })
    }

    fn run_git(&self, args: &[&str]) -> Result<Output> {
        if is_verbose() {
            eprintln!(
                "[VERBOSE] {}: git {}",
                self.repo_path.display(),
                args.join(" ")
            );
        }

        Command::new("git")
            .current_dir(&self.repo_path)
            .env("LC_ALL", "C")
            .args(args)
            .output()
            .map_err(|e| {
                ReqSyncError::GitOperation(format!(
                    "Failed to execute git command '{}': {e}",
                    args.join(" ")
                ))
            })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(ReqSyncError::GitOperation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }

    fn validate_git_path(path: &Path) -> Result<PathBuf> {
        let dangerous = [';', '|', '&', '$', '`', '\n', '\r'];
        let path_str = path.to_string_lossy();
        if let Some(ch) = dangerous.iter().find(|c| path_str.contains(**c)) {
            return Err(ReqSyncError::GitOperation(format!(
                "Path contains dangerous character: '{}'",
                ch
            )));
        }

        if !path.is_absolute() {
            return Err(ReqSyncError::GitOperation(
                "Only absolute paths are allowed for Git operations".to_string(),
            ));
        }

        paths::scan_root(path)
            .map_err(|err| ReqSyncError::GitOperation(format!("Invalid Git path: {}", err)))
    }

    fn validate_ref_name(name: &str) -> Result<()> {
        let safe = !name.is_empty()
            && !name.starts_with('-')
            && name.chars().all(|c| {
                matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '/' | '.' | '*' | ':')
            });
        if safe {
            Ok(())
        } else {
            Err(ReqSyncError::GitOperation(format!(
                "Refusing unsafe ref name '{}'",
                name
            )))
        }
    }
}

/// True when git reports that there was nothing to pull.
pub(crate) fn reports_up_to_date(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("already up to date") || lower.contains("already up-to-date")
}

impl RepositoryClient for GitCli {
    fn hard_reset(&self) -> Result<()> {
        let output = self.run_git(&["reset", "--hard"])?;
        Self::ensure_success(&output, "git reset --hard")
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        Self::validate_ref_name(branch)?;
        let output = self.run_git(&["checkout", branch])?;
        Self::ensure_success(&output, "git checkout")
    }

    fn pull(&self, remote: &str) -> Result<PullOutcome> {
        Self::validate_ref_name(remote)?;
        let output = self.run_git(&["pull", remote])?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if output.status.success() {
            return Ok(if reports_up_to_date(&stdout) {
                PullOutcome::AlreadyUpToDate
            } else {
                PullOutcome::Updated
            });
        }

        if reports_up_to_date(&String::from_utf8_lossy(&output.stderr)) {
            return Ok(PullOutcome::AlreadyUpToDate);
        }

        Self::ensure_success(&output, "git pull")?;
        Ok(PullOutcome::Updated)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let file_path = paths::file_in_repository(path, &self.repo_path).map_err(|err| {
            ReqSyncError::GitOperation(format!("Refusing to write unsafe path: {err}"))
        })?;
        fs::write(&file_path, contents)?;

        let relative = file_path
            .strip_prefix(&self.repo_path)
            .map_err(|e| ReqSyncError::GitOperation(format!("Path outside repository: {e}")))?;
        let relative = relative.to_string_lossy();
        let output = self.run_git(&["add", "--", relative.as_ref()])?;
        Self::ensure_success(&output, "git add")
    }

    fn commit(&self, message: &str, author: &CommitAuthor, when: Timestamp) -> Result<()> {
        let name_config = format!("user.name={}", author.name);
        let email_config = format!("user.email={}", author.email);
        let author_arg = format!("{} <{}>", author.name, author.email);
        // git raw date format: seconds since the epoch plus offset
        let date_arg = format!("{} +0000", when.as_second());

        let output = self.run_git(&[
            "-c",
            &name_config,
            "-c",
            &email_config,
            "commit",
            "--allow-empty",
            "-m",
            message,
            "--author",
            &author_arg,
            "--date",
            &date_arg,
        ])?;
        Self::ensure_success(&output, "git commit")
    }

    fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()> {
        Self::validate_ref_name(remote)?;
        let mut args = vec!["push", remote];
        for refspec in refspecs.iter().copied() {
            Self::validate_ref_name(refspec)?;
            args.push(refspec);
        }
        let output = self.run_git(&args)?;
        Self::ensure_success(&output, "git push")
    }
}
