//! 日志初始化
//!
//! 使用 `tracing-subscriber` 的 fmt 订阅器，输出到 stderr，
//! stdout 只留给编译结果。

use tracing::level_filters::LevelFilter;

/// 安装全局订阅器
///
/// 重复调用（例如测试中）时保留第一次安装的订阅器。
pub fn init(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
