//! 配置与加载模块：
//! - 定义 `Config`/`SourceConfig`/`EncoderConfig`/`OutputConfig` 数据结构
//! - 提供 `load_config`：显式路径 > 自动发现 > 内置默认
//! - 暴露配置来源信息，便于日志打印

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) const DEFAULT_LIB_VERSION: &str = "1.0.1";
pub(crate) const DEFAULT_REF: &str = "master";
pub(crate) const DEFAULT_PACKAGE_URL: &str =
    "https://raw.githubusercontent.com/tabler/tabler-icons/{ref}/package.json";
pub(crate) const DEFAULT_CSS_URL: &str =
    "https://raw.githubusercontent.com/tabler/tabler-icons/{ref}/packages/icons-webfont/tabler-icons.css";
pub(crate) const DEFAULT_FONT_URL: &str =
    "https://github.com/tabler/tabler-icons/raw/{ref}/packages/icons-webfont/fonts/tabler-icons.ttf";
pub(crate) const DEFAULT_ENCODER: &str = "./tools/b2c_lua.exe";
pub(crate) const DEFAULT_ENCODER_MODE: &str = "-base85";
pub(crate) const DEFAULT_FONT_SYMBOL: &str = "tabler_icons_font";
pub(crate) const DEFAULT_OUT_DIR: &str = "lua";
pub(crate) const DEFAULT_LATEST: &str = "tabler-icons.lua";
pub(crate) const DEFAULT_CACHE_DIR: &str = ".cache";
pub(crate) const DEFAULT_PLACEHOLDER: &str = "?";

const CONFIG_CANDIDATES: [&str; 2] = ["tabler-lua.yaml", "tabler-lua.yml"];

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// 库版本号（写入生成文件头部）
    pub(crate) lib_version: Option<String>,
    pub(crate) source: SourceConfig,
    pub(crate) encoder: EncoderConfig,
    pub(crate) output: OutputConfig,
    /// 未匹配到图标时返回的占位字符
    pub(crate) placeholder: Option<String>,
}

/// 上游资源地址，URL 中的 `{ref}` 会被替换为 git 引用
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SourceConfig {
    #[serde(rename = "ref")]
    pub(crate) git_ref: Option<String>,
    pub(crate) package_url: Option<String>,
    pub(crate) css_url: Option<String>,
    pub(crate) font_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EncoderConfig {
    pub(crate) program: Option<PathBuf>,
    /// 传给编码器的模式参数，例如 `-base85`
    pub(crate) mode: Option<String>,
    /// 生成的 Lua 全局变量前缀
    pub(crate) symbol: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OutputConfig {
    pub(crate) dir: Option<PathBuf>,
    /// 未写：使用默认路径；`null`：不写“最新版”文件；路径：写到该处
    #[serde(deserialize_with = "deserialize_some")]
    pub(crate) latest: Option<Option<PathBuf>>,
    /// 是否额外写出“最新版”文件，缺省为 true
    pub(crate) write_latest: Option<bool>,
    pub(crate) cache_dir: Option<PathBuf>,
}

/// 区分“字段缺省”与“显式 null”：出现即为 `Some`
fn deserialize_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// 配置来源（用于打印和调试）
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConfigSource {
    LocalExplicit(String),
    LocalAuto(String),
    Defaults,
}

/// 加载后的配置及其来源
#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) source: ConfigSource,
}

/// 人类可读的来源描述
pub(crate) fn describe_source(src: &ConfigSource) -> String {
    match src {
        ConfigSource::LocalExplicit(p) => format!("本地文件: {}", p),
        ConfigSource::LocalAuto(p) => format!("本地文件(自动发现): {}", p),
        ConfigSource::Defaults => "内置默认值".to_string(),
    }
}

// 自动发现本地配置：tabler-lua.yaml / tabler-lua.yml
fn resolve_local_config_path(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|cand| dir.join(cand))
        .find(|p| p.is_file())
}

/// 加载配置：显式路径必须存在；否则在当前目录自动查找；都没有时使用默认值
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_config_in(explicit, Path::new("."))
}

fn load_config_in(explicit: Option<&Path>, search_dir: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("配置文件不存在: {}", path.display());
        }
        let config = read_config_file(path)?;
        return Ok(LoadedConfig {
            config,
            source: ConfigSource::LocalExplicit(path.display().to_string()),
        });
    }
    if let Some(path) = resolve_local_config_path(search_dir) {
        let config = read_config_file(&path)?;
        return Ok(LoadedConfig {
            config,
            source: ConfigSource::LocalAuto(path.display().to_string()),
        });
    }
    Ok(LoadedConfig {
        config: Config::default(),
        source: ConfigSource::Defaults,
    })
}

fn read_config_file(path: &Path) -> Result<Config> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("解析 YAML 失败: {}", path.display()))
}

pub(crate) fn parse_config(raw: &str) -> Result<Config> {
    // 空文件视为全部默认
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
