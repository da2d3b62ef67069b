use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use taskd::api::{self, DEFAULT_BIND, DEFAULT_PORT};
use taskd::commands::{cmd_list, cmd_reset};
use taskd::repository::TaskRepository;
use taskd::storage::FileStore;

#[derive(Parser)]
#[command(name = "taskd", about = "Task management API server", version)]
struct Cli {
    /// HTTP port to listen on
    #[arg(short, long, env = "TASKD_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Bind address (use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Path to the tasks database file
    #[arg(long, env = "TASKD_DB")]
    db: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default when no subcommand is given)
    Serve,
    /// List tasks from the local database
    List {
        /// Only show tasks with this status (pending, in_progress, completed)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Delete the tasks database
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::List { status }) => cmd_list(status, file_store(&cli.db)),
        Some(Commands::Reset { force }) => cmd_reset(force, file_store(&cli.db)),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => anyhow::bail!("Unsupported shell: {shell}"),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskd", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Serve) | None => run_server(&cli),
    }
}

fn run_server(cli: &Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .init();

    let store = file_store(&cli.db);
    store
        .init()
        .with_context(|| format!("cannot initialize task database at {}", store.path().display()))?;
    let repo = Arc::new(TaskRepository::new(store));
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.bind, cli.port))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(api::serve(addr, repo))
}

fn file_store(db: &Option<PathBuf>) -> FileStore {
    match db {
        Some(path) => FileStore::new(path.clone()),
        None => FileStore::default(),
    }
}
