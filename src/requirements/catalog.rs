use serde::Serialize;

/// A package seen somewhere under the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageEntry {
    pub name: String,
    /// Version from the first declaration that named this package, `None` when floating.
    pub current_version: Option<String>,
    /// Remembered default chosen by the operator.
    pub new_version: Option<String>,
}

impl PackageEntry {
    pub fn new(name: impl Into<String>, current_version: Option<String>) -> Self {
        Self {
            name: name.into(),
            current_version,
            new_version: None,
        }
    }
}

/// Insertion-ordered, name-unique set of packages for a single run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<PackageEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the package unless the name is already known; the first sighting wins.
    pub fn insert(&mut self, name: &str, current_version: Option<String>) -> bool {
        if self.get(name).is_some() {
            return false;
        }
        self.entries.push(PackageEntry::new(name, current_version));
        true
    }

    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackageEntry> {
        self.entries.iter_mut().find(|entry| entry.name == name)
    }

    /// Remembered default version for a package, if the operator set one.
    pub fn default_version(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|entry| entry.new_version.as_deref())
    }

    /// Overwrites the remembered default, adding the package when it was never scanned.
    pub fn set_default_version(&mut self, name: &str, version: String) {
        match self.get_mut(name) {
            Some(entry) => entry.new_version = Some(version),
            None => {
                let mut entry = PackageEntry::new(name, None);
                entry.new_version = Some(version);
                self.entries.push(entry);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PackageEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_wins() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert("foo", Some("1.0".to_string())));
        assert!(!catalog.insert("foo", Some("2.0".to_string())));
        assert!(!catalog.insert("foo", None));

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("foo").unwrap().current_version.as_deref(),
            Some("1.0")
        );
    }

    #[test]
    fn keeps_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.insert("zeta", None);
        catalog.insert("alpha", Some("1.0".to_string()));
        catalog.insert("mid", None);

        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn default_version_overwrites() {
        let mut catalog = Catalog::new();
        catalog.insert("foo", Some("1.0".to_string()));
        assert_eq!(catalog.default_version("foo"), None);

        catalog.set_default_version("foo", "9.9".to_string());
        catalog.set_default_version("foo", "9.10".to_string());
        assert_eq!(catalog.default_version("foo"), Some("9.10"));
        assert_eq!(
            catalog.get("foo").unwrap().current_version.as_deref(),
            Some("1.0")
        );
    }

    #[test]
    fn serializes_as_array() {
        let mut catalog = Catalog::new();
        catalog.insert("flask", Some("1.0".to_string()));
        catalog.insert("requests", None);

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json[0]["name"], "flask");
        assert_eq!(json[0]["current_version"], "1.0");
        assert!(json[1]["current_version"].is_null());
    }
}
