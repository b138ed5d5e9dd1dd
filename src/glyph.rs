//! 字形查找模块：
//! - 不依赖标准库编码器的 UTF-8 转换（与生成的 Lua `unicode_to_utf8` 同一算法）
//! - `IconTable`：常量名与字形；测试中按名称或码点解析，未命中时返回占位符

use crate::icons::IconSet;
#[cfg(test)]
use crate::icons::{const_name, IconRange};
#[cfg(test)]
use std::collections::HashMap;

/// 将码点转换为 UTF-8 字节：逐次取低 6 位作为续字节，最后写入首字节
pub(crate) fn unicode_to_utf8(code_point: u32) -> Vec<u8> {
    let mut code = code_point;
    let mut bytes = Vec::with_capacity(4);
    let mut h: u32 = 128;
    while code >= h {
        bytes.push((128 + code % 64) as u8);
        code /= 64;
        h = if h > 32 { 32 } else { h / 2 };
    }
    bytes.push((256 - 2 * h + code) as u8);
    bytes.reverse();
    bytes
}

/// 每个字节写成 `\xHH`，用于 Lua 字符串字面量
pub(crate) fn escape_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("\\x{:02x}", b)).collect()
}

/// 单个可渲染字形
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) code_point: u32,
    pub(crate) utf8: Vec<u8>,
}

impl Glyph {
    pub(crate) fn new(code_point: u32) -> Self {
        Self {
            code_point,
            utf8: unicode_to_utf8(code_point),
        }
    }

    pub(crate) fn escaped(&self) -> String {
        escape_bytes(&self.utf8)
    }

    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        std::str::from_utf8(&self.utf8).unwrap_or_default()
    }
}

/// 查询：名称或数值码点
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IconQuery {
    Name(String),
    CodePoint(u32),
}

#[cfg(test)]
impl From<&str> for IconQuery {
    fn from(name: &str) -> Self {
        IconQuery::Name(name.to_string())
    }
}

/// 常量名到字形的表，保持 CSS 中的顺序
#[derive(Debug)]
pub(crate) struct IconTable {
    /// (常量名, 字形)，保持 CSS 中的顺序
    entries: Vec<(String, Glyph)>,
    #[cfg(test)]
    index: HashMap<String, usize>,
    #[cfg(test)]
    range: IconRange,
    placeholder: String,
}

impl IconTable {
    pub(crate) fn new(set: &IconSet, placeholder: &str) -> Self {
        let entries: Vec<(String, Glyph)> = set
            .entries
            .iter()
            .map(|icon| (icon.const_name(), Glyph::new(icon.code_point)))
            .collect();
        // 重名时后者覆盖前者，与 Lua 表赋值顺序一致
        #[cfg(test)]
        let index: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Self {
            entries,
            #[cfg(test)]
            index,
            #[cfg(test)]
            range: set.range,
            placeholder: placeholder.to_string(),
        }
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Glyph)> {
        self.entries.iter().map(|(n, g)| (n.as_str(), g))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

// 与生成模块中 `mod.lookup` / `mod.get` 同语义，用于对照生成的 Lua
#[cfg(test)]
impl IconTable {
    /// 名称大小写不敏感、`-` 与 `_` 等价；码点须落在 [min, max] 内
    pub(crate) fn lookup(&self, query: &IconQuery) -> Option<Glyph> {
        match query {
            IconQuery::Name(name) => self
                .index
                .get(&const_name(name))
                .map(|&i| self.entries[i].1.clone()),
            IconQuery::CodePoint(cp) if self.range.contains(*cp) => {
                char::from_u32(*cp).map(|_| Glyph::new(*cp))
            }
            IconQuery::CodePoint(_) => None,
        }
    }

    /// 查找失败时返回占位符
    pub(crate) fn resolve(&self, query: &IconQuery) -> String {
        match self.lookup(query) {
            Some(glyph) => glyph.as_str().to_string(),
            None => self.placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::{extract_icons, IconSet};

    fn table() -> IconTable {
        let css = r#"
.ti-home-icon:before { content: "\eac1"; }
.ti-heart:before { content: "\ea1a"; }
.ti-zoom:before { content: "\f000"; }
"#;
        let set = IconSet::new("3.0.0".into(), extract_icons(css).unwrap()).unwrap();
        IconTable::new(&set, "?")
    }

    #[test]
    fn matches_std_encoder_for_all_scalar_values() {
        let mut buf = [0u8; 4];
        for cp in (0..=0x10FFFFu32).filter(|cp| !(0xD800..=0xDFFF).contains(cp)) {
            let expected = char::from_u32(cp).unwrap().encode_utf8(&mut buf).as_bytes();
            assert_eq!(unicode_to_utf8(cp), expected, "U+{cp:04X}");
        }
    }

    #[test]
    fn encodes_boundaries() {
        assert_eq!(unicode_to_utf8(0), [0x00]);
        assert_eq!(unicode_to_utf8(0x7F), [0x7F]);
        assert_eq!(unicode_to_utf8(0x80), [0xC2, 0x80]);
        assert_eq!(unicode_to_utf8(0x7FF), [0xDF, 0xBF]);
        assert_eq!(unicode_to_utf8(0x800), [0xE0, 0xA0, 0x80]);
        assert_eq!(unicode_to_utf8(0xFFFF), [0xEF, 0xBF, 0xBF]);
        assert_eq!(unicode_to_utf8(0x10000), [0xF0, 0x90, 0x80, 0x80]);
        assert_eq!(unicode_to_utf8(0x10FFFF), [0xF4, 0x8F, 0xBF, 0xBF]);
    }

    #[test]
    fn escapes_every_byte() {
        assert_eq!(escape_bytes(&unicode_to_utf8(0xEA1A)), "\\xee\\xa8\\x9a");
        assert_eq!(escape_bytes(&[0x05]), "\\x05");
    }

    #[test]
    fn name_lookup_is_case_and_separator_insensitive() {
        let t = table();
        let a = t.lookup(&"Home-Icon".into());
        let b = t.lookup(&"HOME_ICON".into());
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(a.unwrap().code_point, 0xeac1);
    }

    #[test]
    fn unknown_name_resolves_to_placeholder() {
        let t = table();
        assert_eq!(t.lookup(&"Missing-Icon".into()), None);
        assert_eq!(t.resolve(&"Missing-Icon".into()), "?");
        assert_eq!(t.resolve(&"MISSING_ICON".into()), "?");
    }

    #[test]
    fn numeric_lookup_honours_inclusive_range() {
        let t = table();
        assert_eq!(t.resolve(&IconQuery::CodePoint(0xea1a)), "\u{ea1a}");
        assert_eq!(t.resolve(&IconQuery::CodePoint(0xf000)), "\u{f000}");
        assert_eq!(t.resolve(&IconQuery::CodePoint(0xea19)), "?");
        assert_eq!(t.resolve(&IconQuery::CodePoint(0xf001)), "?");
        // 范围内但不是已知图标时仍按码点编码
        assert_eq!(t.resolve(&IconQuery::CodePoint(0xeb00)), "\u{eb00}");
    }

    #[test]
    fn entries_keep_order_and_const_names() {
        let t = table();
        let names: Vec<&str> = t.entries().map(|(n, _)| n).collect();
        assert_eq!(names, ["ICON_HOME_ICON", "ICON_HEART", "ICON_ZOOM"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.placeholder(), "?");
    }
}
