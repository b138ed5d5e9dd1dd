//! 命令调度模块：
//! - 接收解析好的 CLI 参数，计算“有效参数”（CLI > 环境变量 > 配置文件 > 默认值）
//! - 构造编码器并执行生成流程

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::{
    cli::Cli,
    config::{self, Config},
    encoder::ProcessEncoder,
    fetch::Source,
    generate::{generate, Settings},
    utils::{env_bool_truthy, env_opt_path, env_opt_string, expand_url},
};

/// 执行一次生成
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(|| env_opt_path("TABLER_LUA_CONFIG"));
    let loaded = config::load_config(config_path.as_deref())?;
    info!("本次使用的配置来源: {}", config::describe_source(&loaded.source));

    let (settings, encoder) = resolve(cli, loaded.config)?;
    let report = generate(&settings, &encoder)?;

    for path in &report.written {
        println!("写入: {}", path.display());
    }
    info!(
        "已生成 {} 个图标（Tabler Icons {}）",
        report.icon_count, report.icons_version
    );
    println!("ok");
    Ok(())
}

/// 合并 CLI / 环境变量 / 配置文件，得到生成参数与编码器
fn resolve(cli: Cli, config: Config) -> Result<(Settings, ProcessEncoder)> {
    // 环境变量覆盖（若 CLI 未指定）
    let env_version = env_opt_string("TABLER_LUA_VERSION");
    let env_ref = env_opt_string("TABLER_LUA_REF");
    let env_encoder = env_opt_path("TABLER_LUA_ENCODER");
    let env_out = env_opt_path("TABLER_LUA_OUT");
    let env_cache = env_opt_path("TABLER_LUA_CACHE_DIR");
    let env_latest = env_opt_path("TABLER_LUA_LATEST");
    let env_no_latest = env_bool_truthy("TABLER_LUA_NO_LATEST").unwrap_or(false);

    let Config {
        lib_version: cfg_version,
        source,
        encoder,
        output,
        placeholder,
    } = config;

    let lib_version = cli
        .lib_version
        .or(env_version)
        .or(cfg_version)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config::DEFAULT_LIB_VERSION.to_string());
    let git_ref = cli
        .git_ref
        .or(env_ref)
        .or(source.git_ref)
        .unwrap_or_else(|| config::DEFAULT_REF.to_string());

    // 本地文件优先于远程 URL
    let remote = |template: Option<String>, default: &str| -> Result<Source> {
        let template = template.unwrap_or_else(|| default.to_string());
        Ok(Source::Url(expand_url(&template, &git_ref)?))
    };
    let package = match cli.package_file {
        Some(p) => Source::Local(p),
        None => remote(source.package_url, config::DEFAULT_PACKAGE_URL)?,
    };
    let css = match cli.css_file {
        Some(p) => Source::Local(p),
        None => remote(source.css_url, config::DEFAULT_CSS_URL)?,
    };
    let font = match cli.font_file {
        Some(p) => Source::Local(p),
        None => remote(source.font_url, config::DEFAULT_FONT_URL)?,
    };

    let out_dir = cli
        .out_dir
        .or(env_out)
        .or(output.dir)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_OUT_DIR));
    let cache_dir = cli
        .cache_dir
        .or(env_cache)
        .or(output.cache_dir)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CACHE_DIR));
    // 显式关闭优先；CLI / 环境变量给出的路径高于配置文件里的 `latest: null`
    let latest = if cli.no_latest || env_no_latest {
        None
    } else if let Some(path) = cli.latest.or(env_latest) {
        Some(path)
    } else if output.write_latest == Some(false) {
        None
    } else {
        match output.latest {
            Some(configured) => configured,
            None => Some(PathBuf::from(config::DEFAULT_LATEST)),
        }
    };

    let encoder = ProcessEncoder {
        program: cli
            .encoder
            .or(env_encoder)
            .or(encoder.program)
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_ENCODER)),
        mode: encoder
            .mode
            .unwrap_or_else(|| config::DEFAULT_ENCODER_MODE.to_string()),
        symbol: encoder
            .symbol
            .unwrap_or_else(|| config::DEFAULT_FONT_SYMBOL.to_string()),
        cache_dir,
    };

    let settings = Settings {
        lib_version,
        package,
        css,
        font,
        out_dir,
        latest,
        template: cli.template,
        placeholder: placeholder.unwrap_or_else(|| config::DEFAULT_PLACEHOLDER.to_string()),
    };
    Ok((settings, encoder))
}
