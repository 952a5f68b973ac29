//! # configlang
//!
//! ```bash
//! # 从 stdin 读取，输出 XML
//! echo '{a=1e+0}' | configlang
//!
//! # 从文件读取，输出 JSON
//! configlang service.cfl --format json
//!
//! # 生成示例输出
//! configlang --generate-examples --output-dir out
//!
//! # 把当前设置保存到 configlang.json
//! configlang --format json --write-config
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;
use configlang::ConfigLangError;
use configlang_cli::{Cli, ConfigFallback, Settings, app, logging, run};
use tracing::{debug, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, fallback) = app::load_config(&cli);
    let (settings, warnings) = Settings::resolve(&cli, config);
    logging::init(settings.log_level);
    match &fallback {
        Some(missing @ ConfigFallback::Missing(_)) => debug!("{missing}"),
        Some(invalid @ ConfigFallback::Invalid(_)) => warn!("{invalid}"),
        None => {}
    }
    for message in &warnings {
        warn!("{message}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&cli, &settings, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 语言层错误只输出一行消息，其余错误带上下文链
            match e.downcast_ref::<ConfigLangError>() {
                Some(err) => eprintln!("{err}"),
                None => eprintln!("configlang: {e:#}"),
            }
            ExitCode::from(1)
        }
    }
}
