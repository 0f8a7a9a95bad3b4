//! Phone mockup - render `/mockup <url>` requests into a device frame.

mod adapters;
mod cassette;
mod cli;
mod command;
mod compose;
mod config;
mod context;
mod error;
mod event;
mod fetch;
mod geometry;
mod output;
mod ports;
mod template;

use std::path::Path;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::command::extract_url;
use crate::compose::compose;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::MockupError;
use crate::fetch::fetch_image;
use crate::geometry::ScreenGeometry;
use crate::output::{resolve_output_path, save_png};
use crate::ports::{Delivery, DeliveryReceipt};
use crate::template::{load_template, template_candidates};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => {}
        Err(e) if e.is_no_action() => {
            eprintln!("Nothing to do: {e}");
        }
        Err(e) => {
            error!(error = %e, "mockup failed");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("warn,mockup={level}"))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<(), MockupError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(MockupError::Config)?;
    let geometry = ScreenGeometry::IPHONE;
    geometry.validate()?;

    // Find the command
    let request = cli.resolve_request()?;
    let url = extract_url(request.text.as_deref())
        .ok_or(MockupError::CommandNotFound)?;
    info!(
        url,
        issue = request.target.as_deref().unwrap_or("-"),
        "mockup requested"
    );

    let timeout = cli
        .timeout_secs
        .map_or_else(|| config.fetch.timeout(), Duration::from_secs);

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("MOCKUP_REPLAY").ok();
    let rec_flag = std::env::var("MOCKUP_REC").unwrap_or_default();
    let is_recording = rec_flag == "true" || rec_flag == "1";

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        info!(cassette = %cassette_path, "replaying fetches");
        let ctx =
            ServiceContext::replaying(Path::new(cassette_path), &config, timeout, cli.post)?;
        (ctx, None)
    } else if is_recording {
        info!("recording fetches");
        let (ctx, session) = ServiceContext::recording(&config, timeout, cli.post)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config, timeout, cli.post)?, None)
    };

    let fetched = fetch_image(ctx.fetcher.as_ref(), url).await;

    // Finish recording before anything else can fail
    if let Some(session) = recording_session {
        drop(ctx.fetcher);
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }
    let source = fetched?;

    // Compose
    let configured_template = cli.template.as_deref().or(config.template.path.as_deref());
    let template = load_template(&template_candidates(configured_template), &geometry)?;
    let canvas = compose(&source, &template, &geometry);

    // Save and deliver
    let output_path = resolve_output_path(cli.output.as_deref(), config.output.path.as_deref());
    save_png(&canvas, &output_path)?;
    eprintln!("Saved: {}", output_path.display());

    let delivery = Delivery {
        target: request.target,
        png_path: output_path,
    };
    if let DeliveryReceipt::Posted { url } = ctx.sink.deliver(&delivery).await? {
        eprintln!("Posted: {url}");
    }

    Ok(())
}
