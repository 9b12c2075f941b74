mod handlers;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use handlers::add::AddOptions;
use std::path::PathBuf;
use taskboard::config::BoardConfig;
use taskboard::logging::{init_logging, DEFAULT_LOG_LEVEL};

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Pending tasks, ordered by urgency")]
struct Cli {
    /// Path to the task store
    #[arg(long, global = true, env = "TASKBOARD_DB")]
    db: Option<PathBuf>,
    /// Log level written to stderr (trace|debug|info|warn|error|off)
    #[arg(long, global = true, env = "TASKBOARD_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Create the task store
    Init,
    /// Add a new pending task
    Add {
        description: String,
        #[arg(long, short = 'u')]
        urgency: Option<f64>,
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// H, M or L
        #[arg(long)]
        priority: Option<String>,
        /// Due date, e.g. 20240501T090000Z
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },
    /// Import a Taskwarrior JSON export (matched by uuid)
    Import { file: PathBuf },
    /// Show pending tasks
    Pending {
        #[arg(long)]
        json: bool,
        /// Sort keys, e.g. "-urgency,due"
        #[arg(long)]
        order_by: Option<String>,
    },
    /// List all tasks
    List {
        /// Only completed tasks
        #[arg(long)]
        completed: bool,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        order_by: Option<String>,
    },
    /// Show one task in full
    Show {
        /// Working id, uuid or uuid prefix
        task: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark a task completed
    Done {
        /// Working id, uuid or uuid prefix
        task: String,
    },
    /// Mark a task deleted
    Delete { task: String },
    /// Show counts and the top pending tasks
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level).map_err(|e| anyhow!(e))?;
    let config = BoardConfig::from_options(cli.db, Some(cli.log_level), None)?;

    match cli.command {
        Commands::Init
        | Commands::Add { .. }
        | Commands::Import { .. }
        | Commands::Done { .. }
        | Commands::Delete { .. } => dispatch_write_ops(&config, cli.command),
        Commands::Pending { .. }
        | Commands::List { .. }
        | Commands::Show { .. }
        | Commands::Status { .. } => dispatch_read_ops(&config, cli.command),
    }
}

fn dispatch_write_ops(config: &BoardConfig, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => handlers::init::handle(config),
        Commands::Add {
            description,
            urgency,
            project,
            priority,
            due,
            tags,
        } => handlers::add::handle(
            config,
            &description,
            AddOptions {
                urgency,
                project,
                priority,
                due,
                tags,
            },
        ),
        Commands::Import { file } => handlers::import::handle(config, &file),
        Commands::Done { task } => handlers::done::handle(config, &task),
        Commands::Delete { task } => handlers::delete::handle(config, &task),
        _ => unreachable!("Invalid write command dispatch"),
    }
}

fn dispatch_read_ops(config: &BoardConfig, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Pending { json, order_by } => {
            handlers::pending::handle(config, json, order_by.as_deref())
        }
        Commands::List {
            completed,
            json,
            order_by,
        } => handlers::list::handle(config, completed, json, order_by.as_deref()),
        Commands::Show { task, json } => handlers::show::handle(config, &task, json),
        Commands::Status { json } => handlers::status::handle(config, json),
        _ => unreachable!("Invalid read command dispatch"),
    }
}
