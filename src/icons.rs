//! 图标表解析模块：
//! - 从上游 CSS 中按出现顺序提取 (名称, 码点)
//! - 计算码点范围（排序后取首尾）
//! - 生成 Lua 常量名 `ICON_<NAME>`

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

/// 匹配 `.ti-<name>:before { content: "\<hex>"; }`，大小写不敏感、容忍空白；
/// 名称只接受 ASCII 字母、数字、`_` 与 `-`
const ICON_RULE_PATTERN: &str =
    r#"(?i)\.ti-(?P<name>(?-u:[A-Za-z0-9_-])+):before\s*\{\s*content:\s*"\\(?P<unicode>[^"]+)";\s*\}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IconEntry {
    pub(crate) name: String,
    pub(crate) code_point: u32,
}

impl IconEntry {
    /// 由 CSS 中的名称与十六进制转义构造，码点必须是合法的 Unicode 标量值
    pub(crate) fn parse(name: &str, hex: &str) -> Result<Self> {
        let code_point = u32::from_str_radix(hex.trim(), 16)
            .with_context(|| format!("图标 {} 的码点不是十六进制: {:?}", name, hex))?;
        if char::from_u32(code_point).is_none() {
            bail!("图标 {} 的码点不是合法的 Unicode 标量值: U+{:X}", name, code_point);
        }
        Ok(Self {
            name: name.to_string(),
            code_point,
        })
    }

    /// Lua 常量名
    pub(crate) fn const_name(&self) -> String {
        const_name(&self.name)
    }
}

/// 有效码点范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IconRange {
    pub(crate) min: u32,
    pub(crate) max: u32,
}

impl IconRange {
    #[cfg(test)]
    pub(crate) fn contains(&self, code_point: u32) -> bool {
        (self.min..=self.max).contains(&code_point)
    }
}

/// 一次生成所用的完整图标集
#[derive(Debug, Clone)]
pub(crate) struct IconSet {
    pub(crate) version: String,
    pub(crate) entries: Vec<IconEntry>,
    pub(crate) range: IconRange,
}

impl IconSet {
    pub(crate) fn new(version: String, entries: Vec<IconEntry>) -> Result<Self> {
        let range = icon_range(&entries)?;
        Ok(Self {
            version,
            entries,
            range,
        })
    }
}

/// 按出现顺序扫描 CSS，返回原始 (名称, 十六进制) 对
pub(crate) fn scan_stylesheet(css: &str) -> Result<Vec<(String, String)>> {
    let re = Regex::new(ICON_RULE_PATTERN).context("编译图标规则正则失败")?;
    Ok(re
        .captures_iter(css)
        .map(|caps| (caps["name"].to_string(), caps["unicode"].to_string()))
        .collect())
}

/// 提取图标表；重复的名称只给出警告，顺序保持不变
pub(crate) fn extract_icons(css: &str) -> Result<Vec<IconEntry>> {
    let raw = scan_stylesheet(css)?;
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut entries = Vec::with_capacity(raw.len());
    for (name, hex) in raw {
        let entry = IconEntry::parse(&name, &hex)?;
        if !seen.insert(entry.name.clone()) {
            warn!("重复的图标名称: {}（后出现的定义生效）", entry.name);
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// 排序后取首尾两个码点；单个图标时 min == max；空表报错
pub(crate) fn icon_range(entries: &[IconEntry]) -> Result<IconRange> {
    let mut points: Vec<u32> = entries.iter().map(|e| e.code_point).collect();
    points.sort_unstable();
    match (points.first(), points.last()) {
        (Some(&min), Some(&max)) => Ok(IconRange { min, max }),
        _ => bail!("样式表中没有找到任何图标规则"),
    }
}

/// `home-icon` -> `ICON_HOME_ICON`
pub(crate) fn const_name(name: &str) -> String {
    format!("ICON_{}", name.replace('-', "_").to_ascii_uppercase())
}
