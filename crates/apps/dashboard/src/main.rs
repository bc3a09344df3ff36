mod config;
mod lookup;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use foundation::time::Millis;
use geography::FeatureCollection;
use layers::LayerId;
use serde::Serialize;
use state::{
    Dashboard, GeographyRef, LookupError, LookupRequest, RenderState, ReportEvent, ReportLookup,
    RequestId, ViewportEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Backend, HostConfig, Overrides};
use crate::lookup::{FileLookup, HttpLookup, slug};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for the tax-credit map dashboard")]
struct Args {
    /// JSON dashboard config (all fields optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report service base URL (default: $REPORT_API_URL or http://127.0.0.1:8000)
    #[arg(long)]
    report_url: Option<String>,

    /// Answer lookups from <dir>/<slug>.geojson instead of HTTP
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,

    /// Search box debounce in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one search and print the resulting render state as JSON
    Search {
        query: String,

        /// Make every layer with data visible before printing
        #[arg(long)]
        show_all: bool,
    },

    /// Read search-box text and :commands from stdin
    Interactive,
}

type LookupTask = JoinHandle<Result<FeatureCollection, LookupError>>;

/// What the render side receives: the dashboard snapshot plus the tile
/// access token, which never passes through the dashboard itself.
#[derive(Debug, Serialize)]
struct RenderPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    #[serde(flatten)]
    state: RenderState,
}

fn render_payload<'a>(dashboard: &Dashboard, access_token: Option<&'a str>) -> RenderPayload<'a> {
    RenderPayload {
        access_token,
        state: dashboard.render_state(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file_config = config::load_file(args.config.as_deref()).await?;
    let host = config::resolve(
        file_config,
        config::process_env,
        Overrides {
            report_url: args.report_url,
            fixtures_dir: args.fixtures_dir,
            debounce_ms: args.debounce_ms,
        },
    )?;

    let backend = build_backend(&host);
    let mut dashboard = Dashboard::from_config(&host.dashboard)?;
    let token = host.access_token.as_deref();

    match args.command {
        Command::Search { query, show_all } => {
            run_search(&mut dashboard, backend, token, &query, show_all).await?
        }
        Command::Interactive => run_interactive(&mut dashboard, backend, token).await?,
    }

    dashboard.teardown();
    Ok(())
}

fn build_backend(host: &HostConfig) -> Arc<dyn ReportLookup> {
    match &host.backend {
        Backend::Http(url) => {
            info!("report lookups via {url}");
            Arc::new(HttpLookup::new(reqwest::Client::new(), url.clone()))
        }
        Backend::Files(dir) => {
            info!("report lookups from {}", dir.display());
            Arc::new(FileLookup::new(dir.clone()))
        }
    }
}

fn spawn_lookup(backend: &Arc<dyn ReportLookup>, request: &LookupRequest) -> LookupTask {
    let backend = Arc::clone(backend);
    let query = request.query.clone();
    tokio::spawn(async move { backend.lookup(&query).await })
}

async fn run_search(
    dashboard: &mut Dashboard,
    backend: Arc<dyn ReportLookup>,
    access_token: Option<&str>,
    query: &str,
    show_all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    dashboard.on_text_input(Millis::ZERO, query);
    let due = dashboard.next_deadline().unwrap_or(Millis::ZERO);
    match dashboard.poll(due) {
        Some(request) => {
            let result = backend.lookup(&request.query).await;
            dashboard.on_lookup_result(request.id, result);
        }
        None => warn!("empty query; nothing to look up"),
    }
    if show_all {
        dashboard.show_all_layers();
    }
    print_state(dashboard, access_token)?;
    if let Some(msg) = dashboard.report().error() {
        return Err(msg.to_string().into());
    }
    Ok(())
}

async fn run_interactive(
    dashboard: &mut Dashboard,
    backend: Arc<dyn ReportLookup>,
    access_token: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    dashboard.subscribe_viewport(|event| {
        if let ViewportEvent::FlyTo(v) = event {
            info!(
                longitude = v.longitude,
                latitude = v.latitude,
                zoom = v.zoom,
                "fly to"
            );
        }
    });
    dashboard.subscribe_report(|event| {
        if let ReportEvent::StatusChanged(status) = event {
            info!(?status, "report status");
        }
    });

    let start = Instant::now();
    let now = || Millis(start.elapsed().as_millis() as u64);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut in_flight: Option<(RequestId, LookupTask)> = None;

    loop {
        if !stdin_open && dashboard.next_deadline().is_none() && in_flight.is_none() {
            break;
        }
        let deadline = dashboard
            .next_deadline()
            .map(|d| start + Duration::from_millis(d.0));

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Some(request) = handle_line(dashboard, access_token, now(), &line)? {
                            start_lookup(&backend, &mut in_flight, request);
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = sleep_until(deadline), if deadline.is_some() => {
                if let Some(request) = dashboard.poll(now()) {
                    start_lookup(&backend, &mut in_flight, request);
                }
            }
            (id, result) = lookup_finished(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                dashboard.on_lookup_result(id, result);
            }
        }
    }

    print_state(dashboard, access_token)
}

fn start_lookup(
    backend: &Arc<dyn ReportLookup>,
    in_flight: &mut Option<(RequestId, LookupTask)>,
    request: LookupRequest,
) {
    if let Some((_, task)) = in_flight.take() {
        task.abort();
    }
    *in_flight = Some((request.id, spawn_lookup(backend, &request)));
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn lookup_finished(
    in_flight: &mut Option<(RequestId, LookupTask)>,
) -> (RequestId, Result<FeatureCollection, LookupError>) {
    let Some((id, task)) = in_flight.as_mut() else {
        return std::future::pending().await;
    };
    let result = match task.await {
        Ok(result) => result,
        Err(err) => Err(LookupError::Backend(format!("lookup task failed: {err}"))),
    };
    (*id, result)
}

/// Plain lines are the full search box contents; `:`-prefixed lines are
/// control panel actions.
fn handle_line(
    dashboard: &mut Dashboard,
    access_token: Option<&str>,
    now: Millis,
    line: &str,
) -> Result<Option<LookupRequest>, Box<dyn std::error::Error>> {
    let Some(command) = line.strip_prefix(':') else {
        dashboard.on_text_input(now, line);
        return Ok(None);
    };

    let mut parts = command.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    match verb {
        "toggle" => match rest.first().map(|s| s.parse::<LayerId>()) {
            Some(Ok(id)) => {
                if !dashboard.toggle_layer(id) {
                    println!("{} has no data for this report", id.label());
                }
            }
            Some(Err(err)) => println!("{err}"),
            None => println!("usage: :toggle <layer>"),
        },
        "all" => dashboard.show_all_layers(),
        "none" => dashboard.hide_all_layers(),
        "map" => match rest.first() {
            Some(map_type) if dashboard.set_base_map(map_type) => {}
            Some(map_type) => println!("unknown base map {map_type:?}"),
            None => println!("usage: :map <type>"),
        },
        "select" => {
            let name = rest.join(" ");
            if name.is_empty() {
                println!("usage: :select <geography name>");
            } else {
                let request = dashboard.on_select(GeographyRef {
                    id: slug(&name),
                    name,
                    geography_type: None,
                });
                return Ok(Some(request));
            }
        }
        "resize" => match (
            rest.first().and_then(|w| w.parse::<f64>().ok()),
            rest.get(1).and_then(|h| h.parse::<f64>().ok()),
        ) {
            (Some(w), Some(h)) => dashboard.on_window_resize(w, h),
            _ => println!("usage: :resize <width> <height>"),
        },
        "panel" => dashboard.toggle_panel(),
        "state" => print_state(dashboard, access_token)?,
        "layers" => {
            for id in dashboard.layer_client().toggle_options() {
                let s = dashboard.layers().get(*id);
                println!(
                    "{:<16} visible={:<5} has_data={}",
                    id.as_str(),
                    s.visible,
                    s.has_data
                );
            }
        }
        other => {
            error!("unknown command :{other}");
            println!("commands: :toggle :all :none :map :select :resize :panel :layers :state");
        }
    }
    Ok(None)
}

fn print_state(
    dashboard: &Dashboard,
    access_token: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = render_payload(dashboard, access_token);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
