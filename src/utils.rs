//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 上游 URL 模板展开与校验
//! - Lua 字符串字面量转义

use anyhow::{Context, Result};
use std::{env, path::PathBuf};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// 可选读取 String 环境变量。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_truthy(&v))
}

fn parse_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes" | "y"
    )
}

/// 将 URL 模板中的 `{ref}` 替换为 git 引用，并校验结果是合法的 http(s) URL。
pub(crate) fn expand_url(template: &str, git_ref: &str) -> Result<String> {
    let expanded = template.replace("{ref}", git_ref);
    let parsed = url::Url::parse(&expanded).with_context(|| format!("无效的 URL: {}", expanded))?;
    match parsed.scheme() {
        "http" | "https" => Ok(expanded),
        other => anyhow::bail!("不支持的 URL 协议 {}: {}", other, expanded),
    }
}

/// 转义为可放入 Lua 单引号字符串的文本。
pub(crate) fn lua_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
