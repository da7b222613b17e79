mod interpreter;

use anyhow::Context;
use clap::Parser;
use natal::reply::{self, reply_for};
use natal::{
    FixedZone, Gazetteer, Geocoder, InterpretationError, Message, NatalChart, Outcome, Pipeline,
    SwissEphemeris,
};
use natal_config::NatalSettings;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::interpreter::CommandInterpreter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (default: configs/natal.toml, then ../../configs/natal.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the computed chart as JSON instead of the reply text.
    #[arg(long)]
    json: bool,

    /// Message to process, e.g. "1990-01-01 12:30, 東京都, 港区".
    /// Without it, every non-empty stdin line is processed.
    message: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = natal_config::load_natal_settings(args.config.as_deref())
        .context("Failed to load natal configuration")?;
    let pipeline = build_pipeline(&settings)?;

    if let Some(message) = &args.message {
        return respond(&pipeline, message, args.json).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        respond(&pipeline, &line, args.json).await?;
    }
    Ok(())
}

fn build_pipeline(settings: &NatalSettings) -> anyhow::Result<Pipeline> {
    let ephemeris = SwissEphemeris::new(Some(settings.ephemeris_path.clone()))
        .context("Failed to open Swiss Ephemeris data")?;
    let zone = FixedZone::new(settings.timezone_label.clone(), settings.utc_offset_minutes)
        .context("Invalid [timezone] settings")?;

    let geocoder: Arc<dyn Geocoder> = match &settings.gazetteer_path {
        Some(path) => Arc::new(
            Gazetteer::load(path)
                .with_context(|| format!("Failed to load gazetteer {}", path.display()))?,
        ),
        None => {
            log::warn!("No gazetteer configured; every place lookup will fail");
            Arc::new(Gazetteer::default())
        }
    };

    let mut pipeline = Pipeline::new(Arc::new(ephemeris), geocoder).with_zone(zone);
    match &settings.interpreter {
        Some(cfg) => {
            log::info!("Interpretation via `{}` (timeout {}s)", cfg.command, cfg.timeout_secs);
            pipeline = pipeline.with_interpreter(Arc::new(CommandInterpreter::from_settings(cfg)));
        }
        None => log::info!("No interpreter configured; replies will list positions only"),
    }
    Ok(pipeline)
}

async fn respond(pipeline: &Pipeline, text: &str, json: bool) -> anyhow::Result<()> {
    if !json && matches!(natal::parse_message(text), Ok(Message::Birth(_))) {
        println!("{}", reply::ACKNOWLEDGEMENT);
    }

    let outcome = pipeline.handle_message(text).await;
    match (&outcome, json) {
        (
            Outcome::Reading {
                chart,
                interpretation,
            },
            true,
        ) => {
            let body = reading_json(pipeline.zone(), chart, interpretation);
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        _ => println!("{}", reply_for(&outcome)),
    }
    Ok(())
}

/// JSON body for `--json`: the chart plus the zone its local time was read in.
fn reading_json(
    zone: &FixedZone,
    chart: &NatalChart,
    interpretation: &Result<String, InterpretationError>,
) -> serde_json::Value {
    serde_json::json!({
        "zone": {
            "label": zone.label(),
            "utc_offset_minutes": zone.utc_offset_minutes(),
        },
        "chart": chart,
        "interpretation": interpretation.as_ref().ok(),
        "interpretation_error": interpretation.as_ref().err().map(|e| e.to_string()),
    })
}
