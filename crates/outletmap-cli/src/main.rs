mod controller;
mod render;

use std::io::Write;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use outletmap_client::OutletApiClient;
use outletmap_core::app_config::BaseUrl;
use outletmap_core::AppConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::controller::Controller;

#[derive(Debug, Parser)]
#[command(name = "outletmap")]
#[command(about = "Outlet map and chatbot client")]
struct Cli {
    /// Backend origin; overrides `OUTLETMAP_API_BASE_URL`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List outlets and whether each overlaps another outlet's coverage
    Outlets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Only list highlighted outlets
        #[arg(long)]
        highlighted_only: bool,
    },
    /// Print the map view model as JSON
    Map {
        #[arg(long)]
        pretty: bool,
    },
    /// Send one query to the chatbot and print the reply
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Interactive chat over stdin
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(cli.base_url.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let client = OutletApiClient::new(
        config.api_base_url.clone(),
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build HTTP client")?;
    let mut controller = Controller::new(client, &config);

    // Unlocked handles: log lines from other threads also go to stderr.
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    match command {
        Commands::Outlets {
            json,
            highlighted_only,
        } => run_outlets(&mut controller, &mut out, &mut err, json, highlighted_only).await,
        Commands::Map { pretty } => run_map(&mut controller, &mut out, &mut err, pretty).await,
        Commands::Ask { query } => {
            run_ask(&mut controller, &query.join(" "), &mut out, &mut err).await
        }
        Commands::Chat => {
            let input = BufReader::new(tokio::io::stdin());
            run_chat(&mut controller, input, &mut out, &mut err).await
        }
    }
}

/// Loads configuration, letting `--base-url` stand in for the env value.
fn load_config(base_url: Option<&str>) -> anyhow::Result<AppConfig> {
    let Some(raw) = base_url else {
        return Ok(outletmap_core::load_app_config()?);
    };
    let base_url = BaseUrl::parse(raw)
        .map_err(|reason| anyhow::anyhow!("invalid --base-url \"{raw}\": {reason}"))?;
    Ok(outletmap_core::load_app_config_with_base_url(base_url)?)
}

async fn run_outlets(
    controller: &mut Controller,
    out: &mut impl Write,
    err: &mut impl Write,
    json: bool,
    highlighted_only: bool,
) -> anyhow::Result<()> {
    if !controller.load_outlets().await {
        report_session_error(controller, err)?;
    }
    if json {
        render::write_outlets_json(out, controller.session(), highlighted_only)
    } else {
        render::write_outlets(out, controller.session(), highlighted_only)?;
        Ok(())
    }
}

async fn run_map(
    controller: &mut Controller,
    out: &mut impl Write,
    err: &mut impl Write,
    pretty: bool,
) -> anyhow::Result<()> {
    if !controller.load_outlets().await {
        report_session_error(controller, err)?;
    }
    render::write_map_view(out, &controller.session().map_view(), pretty)
}

async fn run_ask(
    controller: &mut Controller,
    query: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(outcome) = controller.ask(query).await else {
        anyhow::bail!("query is empty");
    };
    render::write_reply(out, err, controller.session(), outcome)?;
    Ok(())
}

/// Reads queries line by line until `/quit` or end of input.
async fn run_chat<R>(
    controller: &mut Controller,
    input: R,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        match line.trim() {
            "" => {}
            "/quit" => break,
            "/history" => render::write_transcript(out, controller.session().transcript())?,
            query => {
                let Some(pending) = controller.submit(query) else {
                    continue;
                };
                if let Some(indicator) = controller.session().typing_indicator() {
                    writeln!(err, "{indicator}")?;
                }
                let outcome = controller.resolve(pending).await;
                render::write_reply(out, err, controller.session(), outcome)?;
            }
        }
    }
    Ok(())
}

fn report_session_error(controller: &Controller, err: &mut impl Write) -> std::io::Result<()> {
    match controller.session().error() {
        Some(message) => writeln!(err, "{message}"),
        None => Ok(()),
    }
}
