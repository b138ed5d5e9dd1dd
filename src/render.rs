//! Lua 模块渲染：
//! - 内置模板随二进制打包（include_dir），可用 --template 覆盖主模板
//! - 将图标集、常量表与编码后的字体拼装为单个 Lua 源文件

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use serde::Serialize;
use std::path::Path;
use tera::{Context as TContext, Tera};

use crate::{glyph::IconTable, icons::IconSet, utils::lua_escape};

static BUILTIN_TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// 主模板名
pub(crate) const MODULE_TEMPLATE: &str = "tabler-icons.lua.tera";

/// 渲染所需的全部输入
pub(crate) struct ModuleInput<'a> {
    pub(crate) lib_version: &'a str,
    pub(crate) icons: &'a IconSet,
    pub(crate) table: &'a IconTable,
    pub(crate) font_data: &'a str,
    pub(crate) font_symbol: &'a str,
}

#[derive(Serialize)]
struct RIcon<'a> {
    name: &'a str,
    glyph: String,
    code_point: u32,
}

/// 加载内置模板；若提供自定义模板则替换主模板（内置片段仍可 include）
pub(crate) fn load_templates(custom: Option<&Path>) -> Result<Tera> {
    let mut tera = Tera::default();
    let mut raw: Vec<(&str, &str)> = Vec::new();
    for f in BUILTIN_TEMPLATES.files() {
        let name = f
            .path()
            .to_str()
            .with_context(|| format!("内置模板路径不是 UTF-8: {}", f.path().display()))?;
        let text = f
            .contents_utf8()
            .with_context(|| format!("内置模板不是 UTF-8: {}", name))?;
        raw.push((name, text));
    }
    tera.add_raw_templates(raw).context("加载内置模板失败")?;
    if let Some(path) = custom {
        tera.add_template_file(path, Some(MODULE_TEMPLATE))
            .with_context(|| format!("加载模板失败: {}", path.display()))?;
    }
    Ok(tera)
}

/// 渲染完整的 Lua 模块文本
pub(crate) fn render_module(tera: &Tera, input: &ModuleInput<'_>) -> Result<String> {
    let mut ctx = TContext::new();
    ctx.insert("lib_version", &lua_escape(input.lib_version));
    ctx.insert("icons_version", &lua_escape(&input.icons.version));
    ctx.insert("font_data", input.font_data.trim_end());
    ctx.insert("font_symbol", input.font_symbol);
    ctx.insert("min_range", &input.icons.range.min);
    ctx.insert("max_range", &input.icons.range.max);
    ctx.insert("placeholder", &lua_escape(input.table.placeholder()));

    let icons: Vec<RIcon> = input
        .table
        .entries()
        .map(|(name, glyph)| RIcon {
            name,
            glyph: glyph.escaped(),
            code_point: glyph.code_point,
        })
        .collect();
    ctx.insert("icons", &icons);
    ctx.insert("icon_count", &icons.len());

    tera.render(MODULE_TEMPLATE, &ctx)
        .with_context(|| format!("渲染模板失败: {}", MODULE_TEMPLATE))
}
