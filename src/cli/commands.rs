//! Command dispatch for the `manview` binary

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::Catalog;
use crate::cli::args::{Cli, Commands, ConfigCommands, PageArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings, MIN_WIDTH};
use crate::domain::Index;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        _ => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings);
            let mut catalog = container.catalog();
            run_catalog_command(&container, &mut catalog, command)
        }
    }
}

/// Commands answered by a catalog; the catalog drops its pages when the caller drops it.
pub fn run_catalog_command(
    container: &ServiceContainer,
    catalog: &mut Catalog,
    command: &Commands,
) -> CliResult<()> {
    match command {
        Commands::Tree { location } => cmd_tree(catalog, location),
        Commands::Render {
            page,
            width,
            output,
        } => cmd_render(container, catalog, page, *width, output.as_deref()),
        Commands::Brief { page } => {
            let node = find_page(catalog, page)?;
            print_or_warn(&catalog.summary(node), "no description found");
            Ok(())
        }
        Commands::Details { page } => {
            let node = find_page(catalog, page)?;
            print_or_warn(&catalog.details(node), "page has no DESCRIPTION section");
            Ok(())
        }
        Commands::Section { page, section } => {
            let node = find_page(catalog, page)?;
            print_or_warn(
                &catalog.section(node, section),
                &format!("page has no {section} section"),
            );
            Ok(())
        }
        Commands::Sections { page } => {
            let node = find_page(catalog, page)?;
            for heading in catalog.sections(node) {
                output::info(&heading);
            }
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::Usage(
            "command does not operate on a catalog".to_string(),
        )),
    }
}

#[instrument(skip(catalog))]
fn cmd_tree(catalog: &mut Catalog, location: &Path) -> CliResult<()> {
    let root = catalog
        .get_tree(location)
        .ok_or_else(|| CliError::NotFound(format!("no man pages in {}", location.display())))?;
    output::info(&catalog.arena().to_tree_string(root));
    Ok(())
}

#[instrument(skip(container, catalog))]
fn cmd_render(
    container: &ServiceContainer,
    catalog: &mut Catalog,
    page: &PageArgs,
    width: Option<u16>,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let mut options = container.settings.page_options();
    if let Some(width) = width {
        if width < MIN_WIDTH {
            return Err(CliError::InvalidArgs(format!(
                "width must be at least {MIN_WIDTH}"
            )));
        }
        options.width = width;
    }

    let node = find_page(catalog, page)?;
    let rendered = catalog.render_with(node, &options);
    let path = rendered
        .path()
        .ok_or_else(|| CliError::NotFound(format!("cannot render {}", page_label(page))))?;
    debug!("cmd_render: page at {}", rendered.content());

    let html = container
        .fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;

    match output_path {
        Some(target) => {
            container
                .fs
                .write(target, &html)
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!("wrote {}", target.display()));
        }
        None => print!("{html}"),
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) if path.exists() => output::action("global", &path.display()),
                Some(path) => {
                    output::action("global", &format!("{} (not present)", path.display()))
                }
                None => output::warning("cannot determine config directory"),
            }
            if let Some(path) = &cli.config {
                output::action("file", &path.display());
            }
        }
    }
    Ok(())
}

fn find_page(catalog: &mut Catalog, page: &PageArgs) -> CliResult<Index> {
    let root = catalog.get_tree(&page.location).ok_or_else(|| {
        CliError::NotFound(format!("no man pages in {}", page.location.display()))
    })?;
    catalog
        .find_document(root, &page.category, &page.name)
        .ok_or_else(|| CliError::NotFound(page_label(page)))
}

fn page_label(page: &PageArgs) -> String {
    format!(
        "{}({}) in {}",
        page.name,
        page.category,
        page.location.display()
    )
}

fn print_or_warn(text: &str, empty_message: &str) {
    if text.is_empty() {
        output::warning(empty_message);
    } else {
        print!("{text}");
    }
}
