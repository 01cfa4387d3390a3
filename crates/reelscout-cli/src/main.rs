mod panel;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use reelscout_api::{HttpTransport, OmdbClient};
use reelscout_core::config::AppConfig;
use reelscout_core::error::CoreError;
use reelscout_core::session::{AppContext, Command, Session};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::panel::TerminalPanel;

type CliSession = Session<OmdbClient<HttpTransport>, TerminalPanel>;

#[derive(Debug, Parser)]
#[command(name = "reelscout", version, about = "Look up movies and series on OMDb")]
#[command(group(ArgGroup::new("action").required(true).args(["query", "detail", "write_config"])))]
struct Cli {
    /// Title to search for.
    query: Option<String>,

    /// Show details for an IMDb id instead of searching.
    #[arg(long, value_name = "ID")]
    detail: Option<String>,

    /// After searching, show details for the N-th result.
    #[arg(long, value_name = "N", requires = "query")]
    open: Option<usize>,

    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File to read OMDB_API_KEY from.
    #[arg(long, value_name = "PATH", default_value = ".env")]
    env_file: PathBuf,

    /// Write the effective config to the config path and exit.
    #[arg(long)]
    write_config: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let default = if verbose {
        "reelscout=debug"
    } else {
        "reelscout=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();
    guard
}

async fn run(cli: Cli) -> Result<ExitCode, CoreError> {
    let config = match &cli.config {
        Some(path) if path.exists() || !cli.write_config => AppConfig::load_from(path)?,
        Some(_) => AppConfig::default(),
        None => AppConfig::load()?,
    };

    if cli.write_config {
        let path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
        config.save_to(&path)?;
        eprintln!("Wrote {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let api_key = config.resolve_api_key(&cli.env_file);

    let service = OmdbClient::with_transport(HttpTransport::new(), config.api.base_url.clone())
        .with_plot(config.api.plot);
    let ctx = AppContext {
        service,
        api_key,
        ui: config.ui.clone(),
    };
    let mut session = Session::new(ctx, TerminalPanel::new());
    info!(base_url = %config.api.base_url, "session ready");

    if let Some(query) = cli.query {
        eprintln!("Searching for \"{}\"...", query.trim());
        if !dispatch(&mut session, Command::SubmitQuery(query)).await {
            return Ok(ExitCode::FAILURE);
        }
        let shown = session.results().lock().await.len();
        info!(shown, "results displayed");

        if let Some(position) = cli.open {
            let id = session
                .results()
                .lock()
                .await
                .card(position)
                .map(|card| card.id.clone());
            let Some(id) = id else {
                eprintln!("No result number {position}.");
                return Ok(ExitCode::FAILURE);
            };
            if !show_detail(&mut session, id).await {
                return Ok(ExitCode::FAILURE);
            }
        }
    } else if let Some(id) = cli.detail {
        if !show_detail(&mut session, id).await {
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn show_detail(session: &mut CliSession, id: String) -> bool {
    eprintln!("Loading details for {}...", id.trim());
    if !dispatch(session, Command::RequestDetail(id)).await {
        return false;
    }
    if let Some(view) = session.detail() {
        println!("\n{}", view.to_text());
    }
    session.dispatch(Command::CloseDetail).await.is_ok()
}

/// Run a command and print its banner, if any. Returns whether it succeeded.
async fn dispatch(session: &mut CliSession, command: Command) -> bool {
    let result = session.dispatch(command).await;
    if let Some(banner) = session.banner() {
        eprintln!("{}", banner.message);
    }
    result.is_ok()
}
