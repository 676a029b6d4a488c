use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inventory data service for product categories and stock",
    long_about = "Keeps categories and products in a single SQLite file. Runs a JSON REST API by default, or executes a one-shot command when one is given.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "INVENTORY_DATA_DIR",
        default_value = ".inventory/",
        value_name = "DIR",
        help = "Directory holding the SQLite database"
    )]
    pub data_dir: String,

    #[arg(
        long = "busy-timeout-ms",
        default_value_t = 30_000u64,
        value_name = "MS",
        help = "How long a connection waits on a locked database before failing"
    )]
    pub busy_timeout_ms: u64,

    #[arg(
        long,
        default_value_t = false,
        help = "Delete the SQLite database before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "INVENTORY_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "INVENTORY_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8084",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();
    Cli::parse()
}
