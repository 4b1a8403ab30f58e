use crate::agents::file_rewriter;
use crate::agents::{
    BranchOutcome, CatalogBuilder, FileScannerAgent, Interaction, PromptSource,
    RepositorySynchronizer, SyncTarget, TerminalPrompt, VersionResolver,
};
use crate::cli::{Branch, ResolutionMode};
use crate::error::Result;
use crate::repository::{RepositoryFactory, RepositoryOpener};
use crate::requirements::{parse_declaration, Catalog};
use crate::utils::paths;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Settings for one sync run, folded from the command line.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub file_name: String,
    pub branches: Vec<String>,
    /// Recorded for the run banner only.
    pub ecosystem: String,
    pub mode: ResolutionMode,
    pub no_git: bool,
}

impl SyncOptions {
    pub fn new(
        file_name: String,
        branches: &[Branch],
        ecosystem: String,
        mode: ResolutionMode,
        no_git: bool,
    ) -> Self {
        Self {
            file_name,
            branches: branches.iter().map(|b| b.as_str().to_string()).collect(),
            ecosystem,
            mode,
            no_git,
        }
    }
}

/// What a sync run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub files_scanned: usize,
    pub packages: usize,
    pub files_rewritten: usize,
    pub files_changed: usize,
    /// `(project, branch)` pairs that were committed and pushed
    pub pushed: Vec<(String, String)>,
    pub skipped: Vec<(String, String)>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.files_rewritten == 0
    }
}

/// Execute the sync workflow
pub fn execute_sync<P: AsRef<Path>>(project_path: P, options: SyncOptions) -> Result<()> {
    println!("{}", "Starting to update packages...".cyan().bold());

    let root = paths::scan_root(project_path)?;
    println!(
        "   Root: {}  File: {}  Ecosystem: {}  Mode: {}",
        root.display().to_string().bright_cyan(),
        options.file_name.bright_cyan(),
        options.ecosystem.dimmed(),
        mode_label(options.mode).dimmed()
    );
    if !options.no_git {
        println!("   Branches: {}", options.branches.join(", ").bright_cyan());
    }

    let mut interaction = Interaction::new(TerminalPrompt)?;
    let report = run_sync(&root, &options, &mut interaction, &RepositoryFactory)?;

    print_sync_report(&report, options.no_git);
    println!("\n{}", "✨ Ending process".green().bold());
    Ok(())
}

/// Scan, build the catalog, then resolve, rewrite and sync file by file.
pub(crate) fn run_sync<P: PromptSource>(
    root: &Path,
    options: &SyncOptions,
    interaction: &mut Interaction<P>,
    opener: &dyn RepositoryOpener,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    println!("\n{}", "1. Scanning declaration files...".yellow());
    let scanner = FileScannerAgent::new(root, options.file_name.as_str());
    let (mut catalog, files_scanned) = build_catalog(&scanner)?;
    report.files_scanned = files_scanned;
    report.packages = catalog.len();
    println!(
        "{}",
        format!(
            "✓ Found {} package(s) in {} file(s)",
            catalog.len(),
            files_scanned
        )
        .green()
    );

    if files_scanned == 0 {
        println!(
            "\n{}",
            format!("No {} files found under {}", options.file_name, root.display()).yellow()
        );
        return Ok(report);
    }

    let resolver = VersionResolver::new(options.mode);
    if resolver.mode() == ResolutionMode::Global {
        println!("\n{}", "2. Resolving package versions...".yellow());
        resolver.pre_resolve(interaction, &mut catalog)?;
    }

    println!("\n{}", "3. Updating declaration files...".yellow());
    let synchronizer = RepositorySynchronizer::new(opener);

    for scanned in scanner.scan()? {
        let scanned = scanned?;
        let target = SyncTarget::for_file(&scanned.path, &options.branches)?;
        let requirements = parse_declaration(&scanned.raw_content);

        let resolved = resolver.resolve_file(
            interaction,
            &mut catalog,
            &target.project_name,
            &requirements,
        )?;
        let rewritten = file_rewriter::rewrite(&scanned.path, &requirements, &resolved);
        report.files_rewritten += 1;
        if rewritten.has_changed(&scanned.raw_content) {
            report.files_changed += 1;
        }

        if options.no_git {
            fs::write(&rewritten.path, rewritten.content.as_bytes())?;
            interaction.say(
                &format!("✓ {} written", rewritten.path.display())
                    .green()
                    .to_string(),
            );
            continue;
        }

        for (branch, outcome) in synchronizer.sync_file(interaction, &rewritten, &target)? {
            let entry = (target.project_name.clone(), branch);
            match outcome {
                BranchOutcome::Pushed => report.pushed.push(entry),
                BranchOutcome::Skipped => report.skipped.push(entry),
            }
        }
    }

    Ok(report)
}

fn build_catalog(scanner: &FileScannerAgent) -> Result<(Catalog, usize)> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Reading declaration files");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = CatalogBuilder::new().consume(scanner.scan()?);
    spinner.finish_and_clear();
    result
}

fn mode_label(mode: ResolutionMode) -> &'static str {
    match mode {
        ResolutionMode::Line => "line",
        ResolutionMode::Global => "global",
    }
}

fn print_sync_report(report: &SyncReport, no_git: bool) {
    if report.is_empty() {
        println!("\n{}", "No files were updated".yellow());
        return;
    }

    println!("\n{}", "Sync Summary:".cyan().bold());
    println!(
        "  {} package(s) across {} file(s)",
        report.packages.to_string().yellow(),
        report.files_scanned.to_string().yellow()
    );
    println!(
        "  {} file(s) rewritten, {} with changes",
        report.files_rewritten.to_string().yellow(),
        report.files_changed.to_string().yellow()
    );

    if no_git {
        println!("  {}", "Git operations skipped (--no-git)".dimmed());
        return;
    }

    if !report.pushed.is_empty() {
        println!("\n{}:", "Pushed".cyan());
        for (project, branch) in &report.pushed {
            println!("  • {} → {}", project.white().bold(), branch.green());
        }
    }

    if !report.skipped.is_empty() {
        println!("\n{}:", "Skipped".cyan());
        for (project, branch) in &report.skipped {
            println!("  • {} → {}", project.white().bold(), branch.dimmed());
        }
    }
}

/// Execute the list workflow - display every package and its first-seen pin
pub fn execute_list<P: AsRef<Path>>(project_path: P, file_name: &str, json: bool) -> Result<()> {
    let root = paths::scan_root(project_path)?;
    let scanner = FileScannerAgent::new(&root, file_name);

    if json {
        let (catalog, _) = CatalogBuilder::new().consume(scanner.scan()?)?;
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("{}", "Listing packages in declaration files...".cyan().bold());
    println!("\n{}", "1. Scanning declaration files...".yellow());
    let (catalog, files_scanned) = build_catalog(&scanner)?;
    println!("{}", "✓ Catalog built".green());

    print_catalog(&catalog, files_scanned);
    Ok(())
}

fn print_catalog(catalog: &Catalog, files_scanned: usize) {
    println!("\n{}", "📦 Packages:".cyan().bold());
    for entry in catalog.iter() {
        match &entry.current_version {
            Some(version) => println!("  {}", format!("{}=={}", entry.name, version).cyan()),
            None => println!("  {} {}", entry.name.cyan(), "(floating)".dimmed()),
        }
    }

    let pinned = catalog
        .iter()
        .filter(|entry| entry.current_version.is_some())
        .count();

    println!("\n{}", "Summary:".cyan().bold());
    println!("  {} files", files_scanned.to_string().yellow());
    println!("  {} packages", catalog.len().to_string().yellow());
    println!("  {} pinned", pinned.to_string().yellow());
    println!(
        "  {} floating",
        (catalog.len() - pinned).to_string().yellow()
    );
}
