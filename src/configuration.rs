use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "inventory.sqlite";

#[derive(Clone, Debug)]
pub struct Configuration {
    pub data_dir: PathBuf,
    pub busy_timeout: Duration,
    pub reset: bool,
    pub log_file: Option<PathBuf>,
    pub api_listen: SocketAddr,
}

impl Configuration {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            data_dir: PathBuf::from(&cli.data_dir),
            busy_timeout: Duration::from_millis(cli.busy_timeout_ms),
            reset: cli.reset,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            api_listen: cli.api_listen,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
