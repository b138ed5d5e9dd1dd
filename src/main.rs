//! tabler-lua：从上游 Tabler Icons webfont 重新生成单文件 Lua 图标库。
//!
//! 流程：读取包版本 → 解析 CSS 图标表 → 下载并编码字体 → 渲染 Lua 模板 → 写出文件。

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod encoder;
mod fetch;
mod generate;
mod glyph;
mod icons;
mod render;
mod utils;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    commands::run(cli)
}

/// 初始化日志：RUST_LOG 优先，否则由 --verbose / --quiet 决定级别
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
