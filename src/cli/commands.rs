//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{
    parse_page_id, transform_tree, Assembly, ExclusionReason, Skipped, TreeDisplay,
};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Download {
            page,
            format,
            fixture,
        }) => _download(cli.config.as_deref(), page, *format, fixture.as_deref()),
        Some(Commands::Config { command }) => _config(cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| CliError::Output(e.to_string())),
    }
}

#[instrument]
fn _download(
    config: Option<&Path>,
    page: &str,
    format: OutputFormat,
    fixture: Option<&Path>,
) -> CliResult<()> {
    let settings = Settings::load(config)?;
    let page_id = parse_page_id(page).map_err(ApplicationError::from)?;
    debug!("page_id: {}", page_id);

    let container = match fixture {
        Some(path) => ServiceContainer::with_fixture(settings, path)?,
        None => ServiceContainer::new(settings),
    };
    let assembly = container.download_service().download(&page_id)?;

    report_flagged(&assembly);
    output::info(&render(&assembly, format)?);
    Ok(())
}

fn report_flagged(assembly: &Assembly) {
    for message in flagged_messages(assembly) {
        output::warning(&message);
    }
}

/// One warning line per condition flagged while assembling.
pub fn flagged_messages(assembly: &Assembly) -> Vec<String> {
    let reparented = assembly.reparented.iter().map(|r| {
        format!(
            "block {} is declared by {} and {}, shown under {}",
            r.child, r.previous_parent, r.parent, r.parent
        )
    });
    let shadowed = assembly
        .shadowed
        .iter()
        .map(|id| format!("block {} was returned more than once", id));
    let skipped = assembly.skipped.iter().map(skip_message);

    reparented.chain(shadowed).chain(skipped).collect()
}

fn skip_message(skipped: &Skipped) -> String {
    match skipped.reason {
        ExclusionReason::Page => format!(
            "page {} under {} is not part of this document, skipped",
            skipped.child, skipped.parent
        ),
        ExclusionReason::NoAccess => format!(
            "block {} under {} is missing or inaccessible, skipped",
            skipped.child, skipped.parent
        ),
    }
}

/// Render the downloaded tree in the requested format.
pub fn render(assembly: &Assembly, format: OutputFormat) -> CliResult<String> {
    let rendered = match format {
        OutputFormat::Tree => assembly.root.to_tree_string().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&assembly.root)
            .map_err(|e| CliError::Output(e.to_string()))?,
        OutputFormat::Nast => serde_json::to_string_pretty(&transform_tree(&assembly.root))
            .map_err(|e| CliError::Output(e.to_string()))?,
    };
    Ok(rendered)
}

#[instrument]
fn _config(config: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::header("# effective settings");
            output::info(&settings.redacted().to_toml()?);
        }
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            output::info(&path.display());
        }
    }
    Ok(())
}
