pub mod catalog;

pub use catalog::Catalog;

/// Separator between a package name and its pinned version.
pub const VERSION_SEPARATOR: &str = "==";

/// One non-blank line of a declaration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: Option<String>,
}

impl Requirement {
    /// Parses `name==version` (pinned) or a bare `name` (floating).
    ///
    /// The line is split at the first separator; anything left of it is taken
    /// verbatim as the package name.
    pub fn parse(line: &str) -> Self {
        match line.split_once(VERSION_SEPARATOR) {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: line.to_string(),
                version: None,
            },
        }
    }

    /// Renders the line with the given resolved version (no trailing newline).
    pub fn render(&self, resolved: Option<&str>) -> String {
        match resolved {
            Some(version) if !version.is_empty() => {
                format!("{}{}{}", self.name, VERSION_SEPARATOR, version)
            }
            _ => self.name.clone(),
        }
    }
}

/// Parses every non-blank line of a declaration file, in order.
pub fn parse_declaration(content: &str) -> Vec<Requirement> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Requirement::parse)
        .collect()
}
