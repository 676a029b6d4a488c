use crate::{cli, configuration::Configuration, context::Context, rest};
use anyhow::{Context as AnyhowContext, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;

/// The main application state, decoupled from CLI parsing to allow for easier testing.
pub struct App {
    ctx: Context,
    shutdown: CancellationToken,
}

impl App {
    /// Parses the command line, sets up logging and opens the database.
    /// The returned guard must outlive the app so the log file gets flushed.
    pub fn from_cli() -> Result<(App, cli::Cli, Option<WorkerGuard>)> {
        let cli = crate::cli::parse();
        let config = Configuration::from_cli(&cli);

        let guard = crate::tracing::init(config.log_file.as_deref());
        log_startup_info(&config);

        let ctx = Context::open(config).context("opening inventory database")?;
        Ok((App::new(ctx), cli, guard))
    }

    fn new(ctx: Context) -> Self {
        Self {
            ctx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Serves the REST API until Ctrl-C or until the server task exits.
    pub async fn run_daemon(&self) -> Result<()> {
        if let Some(path) = self.ctx.config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        let mut rest_handle = self.spawn_rest_server();
        self.wait_for_shutdown(&mut rest_handle).await
    }

    fn spawn_rest_server(&self) -> JoinHandle<()> {
        let addr = self.ctx.config.api_listen;
        let services = self.ctx.services.clone();
        let token = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = rest::serve(addr, services, token).await {
                log::error!("REST server failed: {:#}", e);
            }
        })
    }

    async fn wait_for_shutdown(&self, rest_task: &mut JoinHandle<()>) -> Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down..."),
            _ = &mut *rest_task => log::error!("REST task exited unexpectedly"),
        }

        self.shutdown.cancel();

        // polling a finished JoinHandle again panics
        if !rest_task.is_finished() {
            let _ = rest_task.await;
        }

        self.ctx
            .db
            .close_all()
            .context("closing database connections")?;
        log::info!("✅ Shutdown complete");
        Ok(())
    }
}

fn log_startup_info(config: &Configuration) {
    log::info!("🚀 Starting inventory");
    log::info!("📂 Data dir: {}", config.data_dir.display());
    log::info!("🗄️ Database: {}", config.db_path().display());
    log::info!("🌐 REST API: http://{}", config.api_listen);
}

pub async fn run() -> Result<()> {
    let (app, cli, _log_guard) = App::from_cli()?;

    // one-shot command mode
    if let Some(cmd) = &cli.cmd {
        let result = cmd.run(&app.ctx.services);
        app.ctx.db.close_all()?;
        return result;
    }

    app.run_daemon().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DEFAULT_BUSY_TIMEOUT;

    fn make_app(dir: &std::path::Path, api_listen: &str) -> App {
        let config = Configuration {
            data_dir: dir.to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            reset: false,
            log_file: None,
            api_listen: api_listen.parse().unwrap(),
        };
        App::new(Context::open(config).unwrap())
    }

    #[tokio::test]
    async fn wait_for_shutdown_exits_when_rest_task_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_app(dir.path(), "127.0.0.1:0");

        let mut rest_task = tokio::spawn(async {});

        let res = app.wait_for_shutdown(&mut rest_task).await;
        assert!(res.is_ok());
        assert!(app.shutdown.is_cancelled());
        assert_eq!(app.ctx.db.connection_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn spawn_rest_server_starts_and_serves_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let port = 34581;
        let app = make_app(dir.path(), &format!("127.0.0.1:{}", port));

        let handle = app.spawn_rest_server();

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        assert!(
            !handle.is_finished(),
            "REST server task finished unexpectedly (likely bind failed)"
        );

        let stream = tokio::net::TcpStream::connect(format!("127.0.0.1:{}", port)).await;
        assert!(stream.is_ok(), "Failed to connect to REST server");
        let mut stream = stream.unwrap();

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await.unwrap();
        let response = String::from_utf8_lossy(&buffer);

        assert!(response.contains("200 OK"));
        assert!(response.contains("uptimeSecs"));

        app.shutdown.cancel();
        let _ = handle.await;
    }
}
