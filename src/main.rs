use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use todolist::snapshot::{self, DEFAULT_FILE_NAME};
use todolist::{Config, SortCriterion, Status, Task, TaskId, TaskList, validate_text};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "todolist - Manage a task list stored as a JSON snapshot")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Snapshot file holding the task list (default: from config, else todos.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new pending task
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Change the status of a task
    Status { id: String, status: StatusArg },

    /// Remove a task
    Remove { id: String },

    /// Sort the list (destructive: the previous order is lost)
    Sort {
        #[arg(short, long)]
        by: Option<SortArg>,
    },

    /// Keep only tasks containing SUBSTRING, ignoring case (destructive)
    Filter { substring: String },

    /// Print the task list
    List,

    /// Write the task list to a file
    Export {
        #[arg(default_value = DEFAULT_FILE_NAME)]
        path: PathBuf,
    },

    /// Replace the task list with the contents of a snapshot file
    Import { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Completed,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::Completed => Status::Completed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Text,
    Status,
}

impl From<SortArg> for SortCriterion {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Text => SortCriterion::Text,
            SortArg::Status => SortCriterion::Status,
        }
    }
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let path = cli.file.unwrap_or_else(|| config.file.clone());

    run(&path, cli.command, &config)
}

/// Load the state file, apply one command, and write the file back if needed
///
/// `import` replaces the list wholesale, so it skips loading the current
/// state file and always writes. That lets it recover a corrupt file.
fn run(path: &Path, command: Commands, config: &Config) -> Result<()> {
    let (mut list, before) = match command {
        Commands::Import { .. } => (TaskList::new(), None),
        _ => {
            let text = snapshot::read_text(path)?;
            let list = TaskList::from_snapshot(&text)
                .wrap_err_with(|| format!("Failed to load tasks from {}", path.display()))?;
            let before = list.clone();
            (list, Some(before))
        }
    };

    execute(&mut list, command, config)?;

    if before.as_ref() != Some(&list) {
        snapshot::write_text(path, &list.export_snapshot()?)?;
    } else {
        debug!(file = ?path, "List unchanged, not writing");
    }

    Ok(())
}

fn execute(list: &mut TaskList, command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Add { text } => {
            let joined = text.join(" ");
            let text = validate_text(&joined)?;
            let tasks = list.create(text);
            if let Some(task) = tasks.last() {
                println!("Added task {}", task.id());
            }
        }
        Commands::Status { id, status } => {
            let id = resolve_id(list, &id);
            list.update_status(&id, status.into());
        }
        Commands::Remove { id } => {
            let id = resolve_id(list, &id);
            list.remove(&id);
        }
        Commands::Sort { by } => {
            let criterion = by.map(SortCriterion::from).unwrap_or(config.sort);
            list.sort(criterion);
            print_tasks(list.tasks());
        }
        Commands::Filter { substring } => {
            let tasks = list.filter(&substring);
            print_tasks(tasks);
        }
        Commands::List => print_tasks(list.tasks()),
        Commands::Export { path } => {
            snapshot::write_text(&path, &list.export_snapshot()?)?;
            println!("Exported {} tasks to {}", list.len(), path.display());
        }
        Commands::Import { path } => {
            let text = fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
            let tasks = list
                .import_snapshot(&text)
                .wrap_err_with(|| format!("Failed to import {}", path.display()))?;
            println!("Imported {} tasks from {}", tasks.len(), path.display());
        }
    }

    Ok(())
}

/// Match user input against the displayed form of each id
///
/// Falls back to parsing, so an unknown id still reaches the store (where it is a no-op).
fn resolve_id(list: &TaskList, raw: &str) -> TaskId {
    if let Some(task) = list.iter().find(|task| task.id().to_string() == raw) {
        return task.id().clone();
    }

    eprintln!("No task with id {}", raw);
    raw.parse().unwrap_or_else(|never| match never {})
}

fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Pending => "Pending".yellow(),
        Status::Completed => "Completed".green(),
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }

    for task in tasks {
        println!("{}  [{}]  {}", task.id().to_string().dimmed(), status_label(task.status()), task.text());
    }
}
