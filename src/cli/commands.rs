//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::{AppliedState, DeclarationService, HeadService, LogNotifier};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{
    global_config_path, local_config_path, InsertionOrder, RenderFormat, Settings,
};
use crate::domain::ResolvedState;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InMemoryDocument, InfraError, InfraResult};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build { files }) => _build(&container(cli)?, files),
        Some(Commands::Title { files }) => _title(&container(cli)?, files),
        Some(Commands::Render {
            files,
            format,
            wrap_title,
        }) => _render(&container(cli)?, files, *format, *wrap_title),
        Some(Commands::Apply { files, order }) => _apply(&container(cli)?, files, *order),
        Some(Commands::Files { file }) => _files(&container(cli)?, file),
        Some(Commands::Tree { file }) => _tree(&container(cli)?, file),
        Some(Commands::Config { command }) => _config(&project_dir(cli)?, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(&project_dir(cli)?))?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn resolve(container: &ServiceContainer, files: &[PathBuf]) -> CliResult<ResolvedState> {
    if files.is_empty() {
        return Err(CliError::InvalidArgs(
            "at least one declaration file is required".to_string(),
        ));
    }
    Ok(container
        .declarations
        .resolve(files, &container.settings.title_placeholder)?)
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        InfraError::Output {
            message: e.to_string(),
        }
        .into()
    })
}

#[instrument(skip(container))]
fn _build(container: &ServiceContainer, files: &[PathBuf]) -> CliResult<()> {
    let state = resolve(container, files)?;
    output::info(&to_json(&state)?);
    Ok(())
}

#[instrument(skip(container))]
fn _title(container: &ServiceContainer, files: &[PathBuf]) -> CliResult<()> {
    let state = resolve(container, files)?;
    output::info(&state.title);
    Ok(())
}

#[instrument(skip(container))]
fn _render(
    container: &ServiceContainer,
    files: &[PathBuf],
    format: Option<RenderFormat>,
    wrap_title: Option<bool>,
) -> CliResult<()> {
    let format = format.unwrap_or(container.settings.render.format);
    let wrap_title = wrap_title.unwrap_or(container.settings.render.wrap_title);
    let head = container.renderer.render(&resolve(container, files)?);
    match format {
        RenderFormat::Markup => output::info(&head.to_markup(wrap_title)),
        RenderFormat::Structured => output::info(&to_json(&head)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _apply(
    container: &ServiceContainer,
    files: &[PathBuf],
    order: Option<InsertionOrder>,
) -> CliResult<()> {
    let custom;
    let head = match order {
        Some(order) if order != container.head.order() => {
            custom = HeadService::new(container.settings.marker_attribute.clone(), order)
                .with_notifier(LogNotifier);
            &custom
        }
        _ => &container.head,
    };

    let state = resolve(container, files)?;
    let mut document = InMemoryDocument::new();
    let outcome = head.apply(&mut AppliedState::new(), &mut document, state)?;
    debug!("apply: outcome={:?}", outcome);
    output::info(&document.to_html());
    Ok(())
}

#[instrument(skip(container))]
fn _files(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    for f in container.declarations.collect(file)? {
        output::info(&f.path.display());
    }
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let chain = container.declarations.collect(file)?;
    if let Some(tree) = DeclarationService::chain_tree(&chain) {
        output::info(&tree);
    }
    Ok(())
}

fn _config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&describe_path("global", &path)),
                None => output::detail("global: <no config directory>"),
            }
            output::detail(&describe_path("local", &local_config_path(project_dir)));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            init_config(&RealFileSystem, &path)?;
        }
    }
    Ok(())
}

fn describe_path(label: &str, path: &Path) -> String {
    let state = if path.exists() { "" } else { " (missing)" };
    format!("{label}: {}{state}", path.display())
}

fn init_config(fs: &dyn FileSystem, path: &Path) -> InfraResult<()> {
    if fs.exists(path) {
        output::warning(&format!("config already exists: {}", path.display()));
        return Ok(());
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
