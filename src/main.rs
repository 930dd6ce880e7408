use anyhow::Result;

use dance_tracker::batch::{run_batch, FileOutcome};
use dance_tracker::config::Config;
use dance_tracker::logging;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path);
    logging::init(&config.log_level);

    println!("=== Dance Tracker - Ideal Segment Extraction ({}) ===", dance_tracker::VERSION);
    println!("入力: {}", config.batch.input_dir.display());
    println!("出力: {}", config.batch.output_dir.display());
    println!("ウィンドウ長: {} フレーム", config.segment.window_size);
    println!("可視性ペナルティ係数: {}", config.segment.penalty_factor());
    println!();

    let report = run_batch(&config)?;

    for file in &report.files {
        let name = file
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &file.outcome {
            FileOutcome::Extracted { output, window, skipped_frames } => {
                println!("[OK]   {} -> {}", name, output.display());
                // 表示は1始まり
                println!(
                    "       開始フレーム: {}, 合計スコア: {:.2}, 読み飛ばし: {}",
                    window.start_index + 1,
                    window.total_cost,
                    skipped_frames
                );
            }
            FileOutcome::Skipped { reason } => {
                println!("[SKIP] {}: {}", name, reason);
            }
        }
    }

    println!();
    println!(
        "完了: {} 件抽出, {} 件スキップ, 読み飛ばしフレーム {}",
        report.extracted(),
        report.skipped(),
        report.skipped_frames()
    );
    Ok(())
}
