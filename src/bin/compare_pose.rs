use anyhow::{Context, Result};
use std::fs;

use dance_tracker::config::Config;
use dance_tracker::evaluate::{evaluate, EvaluationRequest};
use dance_tracker::logging;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next() else {
        eprintln!("使い方: compare-pose <request.json> [config.toml]");
        eprintln!("  request.json: {{\"user_pose\": [...33点], \"reference_pose\": [...33点]}}");
        std::process::exit(2);
    };
    let config_path = args.next().unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path);
    logging::init(&config.log_level);

    let content = fs::read_to_string(&request_path)
        .with_context(|| format!("Failed to read {}", request_path))?;
    let request: EvaluationRequest =
        serde_json::from_str(&content).context("Failed to parse comparison request")?;

    let report = evaluate(&request, &config.compare)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
