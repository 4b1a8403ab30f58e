use crate::agents::interaction::{Interaction, PromptSource};
use crate::cli::ResolutionMode;
use crate::error::Result;
use crate::requirements::{Catalog, Requirement};
use colored::Colorize;

/// Decides which version each declaration line ends up with
///
/// In line mode every occurrence is asked about on its own, falling back to
/// the default remembered in the catalog. In global mode the catalog is
/// resolved once up front and every line simply reads from it.
pub struct VersionResolver {
    mode: ResolutionMode,
}

impl VersionResolver {
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Asks once per package whether to change it. Only used in global mode.
    pub fn pre_resolve<P: PromptSource>(
        &self,
        interaction: &mut Interaction<P>,
        catalog: &mut Catalog,
    ) -> Result<()> {
        if self.mode != ResolutionMode::Global {
            return Ok(());
        }

        for entry in catalog.iter_mut() {
            let head = format!("[{}]", entry.name);
            interaction.say(&format!(
                "\n{} {}",
                head.cyan().bold(),
                describe_version(entry.current_version.as_deref())
            ));

            if interaction.ask(&format!("{head} Would you like to change it?"))? {
                let version = interaction.ask_text(&format!("{head} New version: "))?;
                entry.new_version = Some(version);
            }
        }

        Ok(())
    }

    /// Resolves every requirement of one file, in order.
    pub fn resolve_file<P: PromptSource>(
        &self,
        interaction: &mut Interaction<P>,
        catalog: &mut Catalog,
        project: &str,
        requirements: &[Requirement],
    ) -> Result<Vec<Option<String>>> {
        requirements
            .iter()
            .map(|requirement| match self.mode {
                ResolutionMode::Line => {
                    Self::resolve_line(interaction, catalog, project, requirement)
                }
                ResolutionMode::Global => Ok(catalog
                    .default_version(&requirement.name)
                    .map(str::to_string)
                    .or_else(|| requirement.version.clone())),
            })
            .collect()
    }

    /// Keep the line's own version, else take the remembered default, else type a new one.
    fn resolve_line<P: PromptSource>(
        interaction: &mut Interaction<P>,
        catalog: &mut Catalog,
        project: &str,
        requirement: &Requirement,
    ) -> Result<Option<String>> {
        let head = format!("[{}.{}]", project, requirement.name);
        interaction.say(&format!(
            "\n{} {}",
            head.cyan().bold(),
            describe_version(requirement.version.as_deref())
        ));

        if interaction.ask(&format!("{head}... Would you like to keep it?"))? {
            return Ok(requirement.version.clone());
        }

        let default = catalog.default_version(&requirement.name).map(str::to_string);
        match default {
            Some(default) => {
                if interaction.ask(&format!(
                    "{head} Default version is {default}, would you like to use it here?"
                ))? {
                    return Ok(Some(default));
                }
            }
            None => {
                if interaction.ask(&format!(
                    "{head} No default version is set, would you like to leave it unpinned?"
                ))? {
                    return Ok(None);
                }
            }
        }

        let version = interaction.ask_version(&format!("{head} New version (0.00.000): "))?;
        if interaction.ask(&format!("{head} Do you want to keep this version as default?"))? {
            catalog.set_default_version(&requirement.name, version.clone());
        }

        Ok(Some(version))
    }
}

fn describe_version(version: Option<&str>) -> String {
    match version {
        Some(version) => format!("version is {}", version.green()),
        None => "version is floating (it will get every new release)"
            .yellow()
            .to_string(),
    }
}
