use anyhow::{Context, Result};
use std::fs;

use dance_tracker::angle::JOINT_CATALOGUE;
use dance_tracker::config::Config;
use dance_tracker::logging;
use dance_tracker::session::{parse_session, to_json_pretty};

const CONFIG_PATH: &str = "config.toml";

/// セッションJSONの角度を余弦定理ベースで計算し直して書き出す
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("使い方: recompute-angles <input.json> <output.json>");
        std::process::exit(2);
    }
    let (input, output) = (&args[0], &args[1]);

    let config = Config::load_or_default(CONFIG_PATH);
    logging::init(&config.log_level);

    let content = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?;
    let mut session =
        parse_session(&content).with_context(|| format!("Failed to parse {}", input))?;

    for record in &mut session.records {
        record.recompute_angles(&JOINT_CATALOGUE);
    }

    fs::write(output, to_json_pretty(&session.records)?)
        .with_context(|| format!("Failed to write {}", output))?;

    println!(
        "{} フレームを書き出しました ({} フレーム読み飛ばし)",
        session.summary.accepted(),
        session.summary.skipped_count()
    );
    for skipped in &session.summary.skipped {
        println!("  #{}: {}", skipped.index, skipped.reason);
    }
    Ok(())
}
