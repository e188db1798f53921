//! # vidscope
//!
//! Runs one analyzer workflow against the analysis service and writes the
//! resulting document as a standalone HTML page.
//!
//! ## Usage
//! ```text
//! vidscope trend cooking tips -o trend.html
//! vidscope ideas "10 minute dinners"
//! vidscope performance https://youtu.be/dQw4w9WgXcQ
//! vidscope page dQw4w9WgXcQ --record page.json
//! vidscope open
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueHint};

use lib_vidscope::configs::{load_config, seed_settings, Config};
use lib_vidscope::loggers::setup_logging;
use lib_vidscope::workflow::orchestrator::error_markup;
use lib_vidscope::workflow::validate;
use lib_vidscope::{
    spawn_relay, AnalysisService, HttpAnalysisService, Interface, JsonFileStore, KeyValueStore,
    MemoryStore, Outcome, PageVideoRecord, TargetId, Workflow,
};

/// CLI arguments for vidscope.
#[derive(Parser)]
#[clap(
    name = "vidscope",
    version,
    author = "ckir",
    about = "Analyzes YouTube trends, content ideas and video performance.",
    long_about = "Sends one request to the vidscope analysis service, renders the answer \
                  into the result document and writes it as an HTML page."
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trending videos and SEO scores for a niche keyword.
    Trend {
        /// Niche keyword (several words are joined).
        niche: Vec<String>,
    },
    /// Video, thumbnail and script ideas for a prompt.
    Ideas {
        /// Content prompt (several words are joined).
        prompt: Vec<String>,
    },
    /// Performance metrics for a YouTube video URL.
    Performance {
        /// Watch URL or youtu.be short URL.
        #[clap(default_value = "")]
        url: String,
    },
    /// Relays a page analysis and persists it as the last analysis.
    Page {
        /// Video id of the page.
        video_id: String,
        /// JSON file holding the page's video record.
        #[clap(long, value_hint = ValueHint::FilePath)]
        record: Option<PathBuf>,
    },
    /// Opens the interface: health probe plus last analysis pickup.
    Open,
}

fn read_record(path: Option<&Path>) -> anyhow::Result<PageVideoRecord> {
    let Some(path) = path else {
        return Ok(PageVideoRecord::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse record file {}", path.display()))
}

fn write_page(html: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

async fn submit(interface: &Interface, workflow: Workflow, input: &str) -> Outcome {
    let orchestrator = interface.orchestrator(workflow);
    interface.surface().activate(orchestrator.target());
    orchestrator.submit(input).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config);

    let log_path = setup_logging(&config.log_dir(), config.log_level())?;
    log::debug!("Logging to {}", log_path.display());
    log::debug!("Effective config: {:?}", config);

    let store: Arc<dyn KeyValueStore> = match &config.store_path {
        Some(path) => Arc::new(JsonFileStore::open(path)?),
        None => {
            log::warn!("No store path available, page analyses will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    if let Err(e) = seed_settings(store.as_ref()) {
        log::warn!("Could not seed settings: {}", e);
    }

    let service: Arc<dyn AnalysisService> =
        Arc::new(HttpAnalysisService::connect(config.base_url(), config.max_retries())?);
    let interface = Interface::new(service.clone(), store.clone());

    let outcome = match cli.command {
        Command::Trend { niche } => submit(&interface, Workflow::Trend, &niche.join(" ")).await,
        Command::Ideas { prompt } => {
            submit(&interface, Workflow::ContentIdea, &prompt.join(" ")).await
        }
        Command::Performance { url } => submit(&interface, Workflow::Performance, &url).await,
        Command::Page { video_id, record } => {
            if let Err(e) = validate(Workflow::PageAnalysis, &video_id) {
                anyhow::bail!("{}", e);
            }
            let record = read_record(record.as_deref())?;
            let (relay, worker) = spawn_relay(service, store);
            let ack = relay.analyze_page(&video_id, record).await;
            drop(relay);
            worker.await?;
            match ack {
                Ok(()) => {
                    interface.pick_up_last_analysis();
                    Outcome::Succeeded
                }
                Err(e) => {
                    interface.surface().replace_content(TargetId::Performance, error_markup(&e));
                    interface.surface().activate(TargetId::Performance);
                    Outcome::Failed(e.user_line())
                }
            }
        }
        Command::Open => {
            let report = interface.open().await;
            if report.restored {
                log::info!("Showing the last page analysis");
            }
            Outcome::Succeeded
        }
    };

    match &outcome {
        Outcome::Rejected(prompt) => anyhow::bail!("{}", prompt),
        Outcome::Failed(line) => log::error!("{}", line),
        Outcome::Succeeded => {}
    }

    write_page(&interface.surface().to_html_page(), config.output.as_deref())
}
