mod menu;

use menu::Menu;
use parley::{screen::Terminal, Config, Operator, Screen, Session};
use std::{io, sync::Arc};

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("config: {0}")]
    Config(#[from] parley::Error),
    #[error("invalid `{0}` environment variable {1:?}")]
    LogLevel(&'static str, String),
    #[error("log directory: {0}")]
    LogDir(#[from] xdg::BaseDirectoriesError),
    #[error("log file: {0}")]
    IO(#[from] io::Error),
}

fn init_logging() -> Result<(), Error> {
    const LOG_ENV: &str = "RUST_LOG";
    use std::str::FromStr;
    use tracing::Level;

    let level = match std::env::var(LOG_ENV) {
        Ok(env) => Level::from_str(env.to_uppercase().as_str())
            .map_err(|_| Error::LogLevel(LOG_ENV, env))?,
        Err(_) => Level::INFO,
    };

    // stdout belongs to the operator
    let log_file_path =
        xdg::BaseDirectories::with_prefix("parley")?.place_cache_file("parley.log")?;
    tracing_subscriber::fmt()
        .with_writer(move || -> Box<dyn io::Write> {
            match std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&log_file_path)
            {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        })
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

async fn run(screen: Arc<dyn Screen>) -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let config = Config::from_env().map_err(Error::from)?;
    tracing::info!(?config, "Starting");

    let menu = Menu::new(Session::new(config), Operator::stdin(), screen);
    menu.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let screen: Arc<dyn Screen> = Arc::new(Terminal::stdout());
    let code = match run(screen.clone()).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(%err, "Exiting");
            screen.error(&err.to_string());
            1
        }
    };
    // the stdin reader thread and any server tasks go down with the process
    std::process::exit(code);
}
