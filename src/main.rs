use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use readiness_atlas::agent::{self, ChatMessage, ChatSession, GuidedForm, HealthStatus, SearchOutcome};
use readiness_atlas::api::QueryResponse;
use readiness_atlas::dashboard::Event;
use readiness_atlas::facility::FacilityLocator;
use readiness_atlas::logging::init_tracing;
use readiness_atlas::metrics::METRICS;
use readiness_atlas::{
    Backend, BackendClient, Capability, Config, Dashboard, DashboardState, GeoSource, Reconciler,
};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Capability readiness map of Ghana", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "READINESS_CONFIG")]
    config: Option<PathBuf>,
    /// Backend base URL, overriding configuration
    #[arg(long)]
    api_url: Option<String>,
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
    /// Print collected metrics to stderr on exit
    #[arg(long)]
    metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the backend is reachable
    Health,
    /// Readiness per canonical region
    Summary {
        #[arg(long, default_value = "c_section")]
        capability: Capability,
    },
    /// Facility assessments for one region
    Facilities {
        region: String,
        #[arg(long, default_value = "c_section")]
        capability: Capability,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Choropleth view model as JSON
    Map {
        #[arg(long, default_value = "c_section")]
        capability: Capability,
        /// Boundary source: "backend", a URL, or a file path
        #[arg(long)]
        geo: Option<GeoSource>,
        /// Boundary polygon name to click after loading
        #[arg(long)]
        select: Option<String>,
    },
    /// Ask the agent a single question
    Ask { query: String },
    /// Interactive chat; `/retry` resends after a failure, `/quit` exits
    Chat,
    /// Guided query; lists the options when none is given
    Guided {
        option: Option<String>,
        /// Form values as key=value
        #[arg(long = "field", short, value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    init_tracing(&config.logging)?;
    debug!("Backend at {}", config.api.base_url);

    let reconciler = Reconciler::new(config.reconciler.load_aliases()?);
    let client = BackendClient::new(config.api.clone())?;
    let backend: Arc<dyn Backend> = Arc::new(client);

    let result = run(cli.command, &config, reconciler, backend).await;
    if cli.metrics {
        eprint!("{}", METRICS.export_prometheus());
    }
    result
}

async fn run(
    command: Command,
    config: &Config,
    reconciler: Reconciler,
    backend: Arc<dyn Backend>,
) -> Result<()> {
    match command {
        Command::Health => {
            let mut health = HealthStatus::default();
            let status = health.refresh(backend.as_ref()).await;
            println!("{}", status);
        }
        Command::Summary { capability } => {
            let records = backend.region_summary(capability).await?;
            for region in reconciler.aggregate(&records).values() {
                println!(
                    "{:<14} {:<24} {:<10} ready {}/{} (fragile {}, absent {}) from {} record(s)",
                    region.key.as_str(),
                    region.region,
                    region.status.as_str(),
                    region.counts.ready,
                    region.counts.total,
                    region.counts.fragile,
                    region.counts.absent,
                    region.sources
                );
            }
        }
        Command::Facilities {
            region,
            capability,
            limit,
        } => {
            let facilities = backend.facilities(capability, &region, limit).await?;
            let locator = FacilityLocator::new(reconciler);
            let mut rng = rand::thread_rng();
            let rows: Vec<_> = facilities
                .iter()
                .map(|facility| {
                    json!({
                        "facility": facility,
                        "readiness": facility.assessment.readiness.label(),
                        "confidence_percent": facility.assessment.confidence_percent(),
                        "coords": locator.locate(facility, &region, &mut rng),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::Map {
            capability,
            geo,
            select,
        } => {
            let source = geo.unwrap_or_else(|| config.geo.source.clone());
            let mut dashboard = Dashboard::new(DashboardState::new(reconciler, capability), backend)
                .with_facility_limit(config.api.facility_limit);

            dashboard.start();
            dashboard
                .load_boundaries(&source, config.geo.filter_ghana)
                .await;
            dashboard.settle().await;

            if let Some(name) = select {
                let key = dashboard.state().reconciler().polygon_key(&name);
                dashboard.dispatch(Event::PolygonClicked(key));
                dashboard.settle().await;
            }

            let state = dashboard.state();
            if let Some(message) = state.geo_error() {
                bail!("{}", message);
            }
            let layer = state.layer();
            if let Some(layer) = &layer {
                info!(
                    "{} polygons, {} without data",
                    layer.polygons.len(),
                    layer.unmatched_polygons().count()
                );
            }
            let output = json!({
                "capability": state.capability(),
                "selected_region": state.selected_region(),
                "regions_error": state.regions().error,
                "layer": layer,
                "facilities": state.facilities().data,
                "facilities_error": state.facilities().error,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Ask { query } => match agent::search(backend.as_ref(), &query).await {
            Some(outcome) => print_outcome(outcome)?,
            None => bail!("query is empty"),
        },
        Command::Chat => run_chat(backend.as_ref()).await?,
        Command::Guided { option, fields } => {
            let Some(option) = option else {
                for option in agent::load_options(backend.as_ref()).await {
                    println!("{:<14} {}  {}", option.id, option.label, option.short);
                }
                return Ok(());
            };
            let form = GuidedForm::for_option(&option)
                .with_context(|| format!("unknown guided option '{}'", option))?;
            let values: HashMap<String, String> = fields.into_iter().collect();
            if !form.is_complete(&values) {
                let keys: Vec<&str> = form.fields.iter().map(|f| f.key).collect();
                bail!("'{}' needs non-blank fields: {}", option, keys.join(", "));
            }
            if let Some(outcome) = agent::submit(backend.as_ref(), &option, &values).await {
                print_outcome(outcome)?;
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: SearchOutcome) -> Result<()> {
    match outcome {
        SearchOutcome::Answer(QueryResponse {
            answer,
            intent,
            used_medical_reasoning,
            ..
        }) => {
            if let Some(intent) = intent {
                println!("[{}]", intent);
            }
            println!("{}", answer);
            if used_medical_reasoning == Some(true) {
                println!("(medical reasoning was used)");
            }
            Ok(())
        }
        SearchOutcome::Failed { message, timeout } => {
            if timeout {
                bail!("{} Run the command again to retry.", message)
            }
            bail!("{}", message)
        }
    }
}

async fn run_chat(backend: &dyn Backend) -> Result<()> {
    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let reply = match line.trim() {
            "/quit" => break,
            "/retry" if session.can_retry() => session.retry(backend).await,
            "/retry" => {
                println!("Nothing to retry.");
                continue;
            }
            input => session.send(backend, input).await,
        };

        match reply {
            Some(ChatMessage::Assistant { content, sub_agent, .. }) => {
                if let Some(sub_agent) = sub_agent {
                    println!("[{}]", sub_agent);
                }
                println!("{}", content);
            }
            Some(ChatMessage::Error { content, timeout }) => {
                println!("error: {}", content);
                if *timeout {
                    println!("Type /retry to resend.");
                }
            }
            Some(ChatMessage::User { .. }) | None => {}
        }
    }
    Ok(())
}
