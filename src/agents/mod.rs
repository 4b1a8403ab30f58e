pub mod catalog_builder;
pub mod file_rewriter;
pub mod file_scanner;
pub mod interaction;
pub mod repository_sync;
pub mod version_resolver;

pub use catalog_builder::CatalogBuilder;
pub use file_scanner::FileScannerAgent;
pub use interaction::{Interaction, PromptSource, TerminalPrompt};
pub use repository_sync::{BranchOutcome, RepositorySynchronizer, SyncTarget};
pub use version_resolver::VersionResolver;
