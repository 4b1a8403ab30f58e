use crate::agents::file_scanner::ScannedFile;
use crate::error::Result;
use crate::requirements::{parse_declaration, Catalog};

/// CatalogBuilder folds scanned declaration files into a single catalog
pub struct CatalogBuilder {
    catalog: Catalog,
    files_seen: usize,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            files_seen: 0,
        }
    }

    /// Records every package declared in the file; names already known are left untouched.
    pub fn add_file(&mut self, file: &ScannedFile) {
        for requirement in parse_declaration(&file.raw_content) {
            self.catalog.insert(&requirement.name, requirement.version);
        }
        self.files_seen += 1;
    }

    /// Drains the stream, aborting on the first scan error.
    pub fn consume<I>(mut self, files: I) -> Result<(Catalog, usize)>
    where
        I: IntoIterator<Item = Result<ScannedFile>>,
    {
        for file in files {
            self.add_file(&file?);
        }
        Ok(self.finish())
    }

    pub fn finish(self) -> (Catalog, usize) {
        (self.catalog, self.files_seen)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReqSyncError;
    use std::path::PathBuf;

    fn scanned(path: &str, content: &str) -> Result<ScannedFile> {
        Ok(ScannedFile {
            path: PathBuf::from(path),
            raw_content: content.to_string(),
        })
    }

    #[test]
    fn deduplicates_across_files_first_wins() {
        let files = vec![
            scanned("/root/a/requirements.txt", "foo==1.0\nbar\n"),
            scanned("/root/b/requirements.txt", "foo==2.0\n\nbaz==0.1\n"),
        ];

        let (catalog, count) = CatalogBuilder::new().consume(files).unwrap();
        assert_eq!(count, 2);
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.get("foo").unwrap().current_version.as_deref(),
            Some("1.0")
        );
        assert_eq!(catalog.get("bar").unwrap().current_version, None);
        assert!(catalog.iter().all(|entry| entry.new_version.is_none()));
    }

    #[test]
    fn floating_first_sighting_stays_floating() {
        let files = vec![
            scanned("/root/a/requirements.txt", "foo\n"),
            scanned("/root/b/requirements.txt", "foo==2.0\n"),
        ];

        let (catalog, _) = CatalogBuilder::new().consume(files).unwrap();
        assert_eq!(catalog.get("foo").unwrap().current_version, None);
    }

    #[test]
    fn scan_error_aborts() {
        let files = vec![
            scanned("/root/a/requirements.txt", "foo==1.0\n"),
            Err(ReqSyncError::Scan("boom".to_string())),
        ];

        assert!(CatalogBuilder::new().consume(files).is_err());
    }
}
