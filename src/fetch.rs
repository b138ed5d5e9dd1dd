//! 上游资源读取模块：
//! - `Source`：本地文件或远程 URL
//! - （启用 remote 特性时）通过 ureq 下载文本/二进制
//! - 解析 package.json 中的版本号

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

#[cfg(feature = "remote")]
use std::io::Read;

#[cfg(feature = "remote")]
const USER_AGENT: &str = concat!("tabler-lua/", env!("CARGO_PKG_VERSION"));

/// 资源来源（用于读取和日志）
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Source {
    Local(PathBuf),
    Url(String),
}

impl Source {
    /// 人类可读的来源描述
    pub(crate) fn describe(&self) -> String {
        match self {
            Source::Local(p) => format!("本地文件: {}", p.display()),
            Source::Url(u) => format!("远程 URL: {}", u),
        }
    }

    pub(crate) fn read_text(&self) -> Result<String> {
        match self {
            Source::Local(p) => read_local_text(p),
            Source::Url(u) => http_get_text(u),
        }
    }

    pub(crate) fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Source::Local(p) => {
                fs::read(p).with_context(|| format!("读取文件失败: {}", p.display()))
            }
            Source::Url(u) => http_get_bytes(u),
        }
    }
}

fn read_local_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("读取文件失败: {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: String,
}

/// 读取上游 package.json 并返回 `version` 字段
pub(crate) fn fetch_icons_version(src: &Source) -> Result<String> {
    let text = src.read_text()?;
    parse_manifest_version(&text).with_context(|| format!("解析包清单失败（{}）", src.describe()))
}

pub(crate) fn parse_manifest_version(text: &str) -> Result<String> {
    let manifest: PackageManifest = serde_json::from_str(text)?;
    Ok(manifest.version)
}

#[cfg(feature = "remote")]
fn http_get(url: &str) -> Result<ureq::Response> {
    debug!("GET {}", url);
    let call = ureq::get(url).set("User-Agent", USER_AGENT).call();
    ensure_success(call, url)
}

#[cfg(feature = "remote")]
fn ensure_success(resp: Result<ureq::Response, ureq::Error>, url: &str) -> Result<ureq::Response> {
    match resp {
        Ok(r) => Ok(r),
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("HTTP 请求失败 {}: 状态码 {}", url, code),
        Err(e) => anyhow::bail!("HTTP 请求失败 {}: {}", url, e),
    }
}

#[cfg(feature = "remote")]
fn http_get_text(url: &str) -> Result<String> {
    http_get(url)?
        .into_string()
        .with_context(|| format!("读取响应文本失败: {}", url))
}

#[cfg(feature = "remote")]
fn http_get_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = http_get(url)?;
    let mut buf: Vec<u8> = Vec::new();
    resp.into_reader()
        .read_to_end(&mut buf)
        .with_context(|| format!("读取响应失败: {}", url))?;
    debug!("已下载 {} 字节: {}", buf.len(), url);
    Ok(buf)
}

#[cfg(not(feature = "remote"))]
fn http_get_text(url: &str) -> Result<String> {
    debug!("remote 特性未启用，拒绝下载 {}", url);
    anyhow::bail!("未启用 feature `remote`，无法下载 {}；请改用本地文件参数", url)
}

#[cfg(not(feature = "remote"))]
fn http_get_bytes(url: &str) -> Result<Vec<u8>> {
    http_get_text(url).map(String::into_bytes)
}
