use crate::error::{ReqSyncError, Result};
use crate::utils::is_verbose;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

/// How many files the producer may read ahead of the consumer.
const SCAN_BUFFER: usize = 1;

/// A declaration file read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub raw_content: String,
}

/// FileScannerAgent finds every declaration file with a given name under a root
pub struct FileScannerAgent {
    root: PathBuf,
    file_name: String,
}

impl FileScannerAgent {
    pub fn new<P: AsRef<Path>>(root: P, file_name: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file_name: file_name.into(),
        }
    }

    /// Starts a background walk and returns the stream of files it reads.
    ///
    /// Files arrive in traversal order. The walk stops at the first error,
    /// which is delivered as the last item of the stream.
    pub fn scan(&self) -> Result<ScanStream> {
        if !self.root.is_dir() {
            return Err(ReqSyncError::PathValidation(format!(
                "The argument {} is not a valid folder",
                self.root.display()
            )));
        }
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(ReqSyncError::Configuration(format!(
                "Invalid declaration file name '{}'",
                self.file_name
            )));
        }

        let (sender, receiver) = mpsc::sync_channel(SCAN_BUFFER);
        let root = self.root.clone();
        let file_name = self.file_name.clone();

        let producer = thread::Builder::new()
            .name("reqsync-scanner".to_string())
            .spawn(move || produce(&root, &file_name, &sender))
            .map_err(|e| ReqSyncError::Scan(format!("Failed to start scanner thread: {e}")))?;

        Ok(ScanStream {
            receiver,
            producer: Some(producer),
        })
    }
}

fn walk(root: &Path, file_name: &str) -> impl Iterator<Item = Result<PathBuf>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(move |entry| match entry {
            Ok(entry) => (entry.file_type().is_file() && entry.file_name() == file_name)
                .then(|| Ok(entry.into_path())),
            Err(e) => Some(Err(ReqSyncError::Scan(format!(
                "Failed to traverse directory: {e}"
            )))),
        })
}

fn produce(root: &Path, file_name: &str, sender: &SyncSender<Result<ScannedFile>>) {
    for found in walk(root, file_name) {
        let item = found.and_then(|path| {
            if is_verbose() {
                eprintln!("[VERBOSE] Found: {}", path.display());
            }
            let raw_content = fs::read_to_string(&path).map_err(|e| {
                ReqSyncError::Scan(format!("Failed to read {}: {e}", path.display()))
            })?;
            Ok(ScannedFile { path, raw_content })
        });

        let failed = item.is_err();
        // Stop on the first error or once the consumer hangs up.
        if sender.send(item).is_err() || failed {
            return;
        }
    }
}

/// Consumer side of the scan; blocks until the next file or the end of the walk.
pub struct ScanStream {
    receiver: Receiver<Result<ScannedFile>>,
    producer: Option<JoinHandle<()>>,
}

impl Iterator for ScanStream {
    type Item = Result<ScannedFile>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.receiver.recv() {
            Ok(item) => Some(item),
            Err(_) => {
                let producer = self.producer.take()?;
                producer
                    .join()
                    .err()
                    .map(|_| Err(ReqSyncError::Scan("Scanner thread panicked".to_string())))
            }
        }
    }
}
