//! Command line front end: loads a project, applies one edit and saves it.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;

use i18n_keytree::config::{
    ConfigError,
    ConfigManager,
};
use i18n_keytree::indexer::{
    IndexerError,
    ProjectIndexer,
};
use i18n_keytree::project::{
    Project,
    ProjectError,
};
use i18n_keytree::tree::{
    Conflict,
    NodeId,
    TranslationTree,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: i18n-keytree <project-dir> <command> [args]

Commands:
  tree                         Print the key tree
  keys                         Print every stored key with its translations
  add <key>                    Add a key without translations
  set <locale> <key> <value>   Store one translation (empty value removes it)
  remove <key>                 Remove a key and everything below it
  rename <key> <new-key>       Move a key and everything below it
  duplicate <key> <new-key>    Copy a key and everything below it";

#[derive(Error, Debug)]
enum CliError {
    #[error("{}", USAGE)]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Indexer(#[from] IndexerError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0} translation file(s) could not be saved")]
    Save(usize),
}

#[derive(Debug)]
enum Command {
    Tree,
    Keys,
    Add { key: String },
    Set { locale: String, key: String, value: String },
    Remove { key: String },
    Rename { key: String, new_key: String },
    Duplicate { key: String, new_key: String },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["tree"] => Self::Tree,
            ["keys"] => Self::Keys,
            ["add", key] => Self::Add { key: (*key).to_string() },
            ["set", locale, key, value] => Self::Set {
                locale: (*locale).to_string(),
                key: (*key).to_string(),
                value: (*value).to_string(),
            },
            ["remove", key] => Self::Remove { key: (*key).to_string() },
            ["rename", key, new_key] => {
                Self::Rename { key: (*key).to_string(), new_key: (*new_key).to_string() }
            }
            ["duplicate", key, new_key] => {
                Self::Duplicate { key: (*key).to_string(), new_key: (*new_key).to_string() }
            }
            _ => return Err(CliError::Usage),
        };
        Ok(command)
    }

    const fn is_edit(&self) -> bool {
        !matches!(self, Self::Tree | Self::Keys)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(io::stderr(), "{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), CliError> {
    let Some((root, rest)) = args.split_first() else {
        return Err(CliError::Usage);
    };
    let command = Command::parse(rest)?;
    let root = PathBuf::from(root);

    let mut config = ConfigManager::new();
    config.load_settings(Some(root.clone()))?;
    let indexer = ProjectIndexer::new(root, config.get_settings().clone())?;
    let mut project = indexer.load().await?.project;

    if command.is_edit() && apply(&mut project, &command)? == Applied::Changed {
        let failures = indexer.save(&mut project).await;
        if !failures.is_empty() {
            return Err(CliError::Save(failures.len()));
        }
    }

    let mut out = io::stdout().lock();
    match command {
        Command::Keys => write_keys(&mut out, &project)?,
        _ => write_tree(&mut out, project.tree(), project.tree().root(), 0)?,
    }
    Ok(())
}

/// What an edit left to be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Unchanged,
    Changed,
    /// Keys without any translation exist only in memory
    Unsaved,
}

fn apply(project: &mut Project, command: &Command) -> Result<Applied, CliError> {
    let changed = match command {
        Command::Tree | Command::Keys => false,
        Command::Add { key } => {
            if project.add_key(key)? {
                tracing::warn!(
                    key = %key,
                    "Key has no translation yet and is not written to any file; \
                     use `set` to give it a value"
                );
                // Evicted ancestor values still have to reach the files
                return Ok(if project.is_dirty() { Applied::Changed } else { Applied::Unsaved });
            }
            false
        }
        Command::Set { locale, key, value } => project.store_translation(locale, key, value)?,
        Command::Remove { key } => project.remove_key(key)?,
        Command::Rename { key, new_key } => {
            log_conflict(key, new_key, project.rename_conflict(key, new_key)?);
            project.rename_key(key, new_key)?
        }
        Command::Duplicate { key, new_key } => {
            log_conflict(key, new_key, project.duplicate_conflict(key, new_key)?);
            project.duplicate_key(key, new_key)?
        }
    };
    if changed {
        Ok(Applied::Changed)
    } else {
        tracing::info!(?command, "Nothing to change");
        Ok(Applied::Unchanged)
    }
}

fn log_conflict(key: &str, new_key: &str, conflict: Option<Conflict>) {
    if let Some(conflict) = conflict {
        tracing::info!(
            key,
            new_key,
            resolution = ?conflict.resolution(),
            "Target key already exists"
        );
    }
}

fn write_tree(
    out: &mut impl Write,
    tree: &TranslationTree,
    node: NodeId,
    depth: usize,
) -> io::Result<()> {
    for child in tree.children(node) {
        let name = tree.name(*child).unwrap_or_default();
        let marker = if tree.is_leaf(*child) { "" } else { "/" };
        writeln!(out, "{:indent$}{name}{marker}", "", indent = depth * 2)?;
        write_tree(out, tree, *child, depth + 1)?;
    }
    Ok(())
}

fn write_keys(out: &mut impl Write, project: &Project) -> io::Result<()> {
    for key in project.keys() {
        write!(out, "{key}")?;
        for resource in project.resources() {
            if let Some(value) = resource.translation(key) {
                write!(out, "\t{}={value}", resource.locale())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
