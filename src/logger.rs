//! 日志初始化
//!
//! 使用 `tracing-subscriber` 输出到终端，级别由 `RUST_LOG` 控制。

use tracing_subscriber::EnvFilter;

/// 初始化日志（默认 info 级别）
pub fn init() {
    init_with_verbose(false);
}

/// 初始化日志，`verbose` 为真时默认级别改为 debug
///
/// 可重复调用：已初始化时静默忽略（测试里多次调用很常见）。
pub fn init_with_verbose(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
