use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;

pub const DEFAULT_FILE_NAME: &str = "requirements.txt";
pub const DEFAULT_LANG: &str = "python";

#[derive(Parser, Debug)]
#[command(
    name = "reqsync",
    about = "Requirements Sync - pin dependency versions across many git checkouts",
    version,
    author
)]
pub struct Cli {
    /// Root directory holding the project checkouts (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve versions, rewrite every declaration file and push it to the selected branches
    Sync {
        /// Name of the declaration file to look for
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        file: String,

        /// Branches to update, split with commas
        #[arg(
            short,
            long = "branch",
            value_enum,
            value_delimiter = ',',
            default_values_t = [Branch::Develop, Branch::Release]
        )]
        branches: Vec<Branch>,

        /// Ecosystem label shown in the run banner; files are always read as `name==version`
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,

        /// Ask once per package (global) or once per line occurrence (line)
        #[arg(long, value_enum, default_value_t = ResolutionMode::Line)]
        mode: ResolutionMode,

        /// Skip Git operations (only rewrite the files in place)
        #[arg(long)]
        no_git: bool,
    },

    /// List every package found in the declaration files
    List {
        /// Name of the declaration file to look for
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        file: String,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Branches the tool is allowed to push to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Branch {
    Develop,
    Release,
    Master,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Develop => "develop",
            Branch::Release => "release",
            Branch::Master => "master",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResolutionMode {
    /// Prompt for every line occurrence, remembering a default per package
    Line,
    /// Prompt once per package before any file is rewritten
    Global,
}
