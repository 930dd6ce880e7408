use tracing_subscriber::filter::LevelFilter;

/// 設定の `log_level` で tracing を初期化（不正な値は info）
pub fn init(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    // テストなどで二重初期化されても落とさない
    let _ = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .try_init();
}
