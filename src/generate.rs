//! 生成流程模块：
//! - 依次读取包版本、图标表、字体并编码
//! - 渲染 Lua 模块并写出版本文件与可选的“最新版”文件

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    encoder::FontEncoder,
    fetch::{fetch_icons_version, Source},
    glyph::IconTable,
    icons::{extract_icons, IconSet},
    render::{load_templates, render_module, ModuleInput},
};

/// 一次生成所需的全部有效参数（已合并 CLI / 环境变量 / 配置文件）
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) lib_version: String,
    pub(crate) package: Source,
    pub(crate) css: Source,
    pub(crate) font: Source,
    pub(crate) out_dir: PathBuf,
    pub(crate) latest: Option<PathBuf>,
    pub(crate) template: Option<PathBuf>,
    pub(crate) placeholder: String,
}

/// 生成结果摘要
#[derive(Debug)]
pub(crate) struct Report {
    pub(crate) icons_version: String,
    pub(crate) icon_count: usize,
    pub(crate) written: Vec<PathBuf>,
}

/// 渲染好的模块文本及其图标集
#[derive(Debug)]
pub(crate) struct GeneratedModule {
    pub(crate) icons: IconSet,
    pub(crate) text: String,
}

/// 执行完整流程：读取 -> 渲染 -> 写出
pub(crate) fn generate(settings: &Settings, encoder: &dyn FontEncoder) -> Result<Report> {
    let module = build_module(settings, encoder)?;
    let written = write_outputs(
        &module.text,
        &settings.out_dir,
        &module.icons.version,
        settings.latest.as_deref(),
    )?;
    Ok(Report {
        icons_version: module.icons.version,
        icon_count: module.icons.entries.len(),
        written,
    })
}

/// 读取上游资源并渲染模块文本（不写文件）
pub(crate) fn build_module(
    settings: &Settings,
    encoder: &dyn FontEncoder,
) -> Result<GeneratedModule> {
    info!("读取图标包版本（{}）", settings.package.describe());
    let version = fetch_icons_version(&settings.package)?;
    info!("图标包版本: {}", version);

    info!("读取图标样式表（{}）", settings.css.describe());
    let css = settings.css.read_text()?;
    let entries = extract_icons(&css)?;
    let icons = IconSet::new(version, entries)
        .with_context(|| format!("无法计算图标范围（{}）", settings.css.describe()))?;
    info!(
        "解析到 {} 个图标，码点范围 U+{:X}..=U+{:X}",
        icons.entries.len(),
        icons.range.min,
        icons.range.max
    );

    let table = IconTable::new(&icons, &settings.placeholder);
    debug!("常量表 {} 项，占位符 {:?}", table.len(), table.placeholder());

    info!("读取字体（{}）", settings.font.describe());
    let font = settings.font.read_bytes()?;
    let font_data = encoder.encode(&font).context("字体编码失败")?;
    debug!("编码后的字体数据 {} 字节", font_data.len());

    let tera = load_templates(settings.template.as_deref())?;
    let text = render_module(
        &tera,
        &ModuleInput {
            lib_version: &settings.lib_version,
            icons: &icons,
            table: &table,
            font_data: &font_data,
            font_symbol: encoder.symbol(),
        },
    )?;
    Ok(GeneratedModule { icons, text })
}

/// 版本文件名：`tabler-icons-v<version>.lua`
pub(crate) fn output_file_name(icons_version: &str) -> String {
    format!("tabler-icons-v{}.lua", icons_version)
}

/// 写出版本文件，并按需覆盖“最新版”文件
pub(crate) fn write_outputs(
    text: &str,
    out_dir: &Path,
    icons_version: &str,
    latest: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("创建输出目录失败: {}", out_dir.display()))?;
    }
    let mut written = Vec::new();
    let versioned = out_dir.join(output_file_name(icons_version));
    fs::write(&versioned, text).with_context(|| format!("写入失败: {}", versioned.display()))?;
    written.push(versioned);

    if let Some(latest) = latest {
        if let Some(parent) = latest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建目录失败: {}", parent.display()))?;
        }
        fs::write(latest, text).with_context(|| format!("写入失败: {}", latest.display()))?;
        written.push(latest.to_path_buf());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use pretty_assertions::assert_eq;

    /// 不启动外部进程的编码器
    struct FakeEncoder;

    impl FontEncoder for FakeEncoder {
        fn symbol(&self) -> &str {
            "tabler_icons_font"
        }

        fn encode(&self, font: &[u8]) -> Result<String> {
            Ok(format!(
                "tabler_icons_font_compressed_data_base85 = \"{}\"\n",
                font.len()
            ))
        }
    }

    struct FailingEncoder;

    impl FontEncoder for FailingEncoder {
        fn symbol(&self) -> &str {
            "x"
        }

        fn encode(&self, _font: &[u8]) -> Result<String> {
            bail!("encoder exited with status 1")
        }
    }

    fn fixture(dir: &Path, css: &str) -> Settings {
        let pkg = dir.join("package.json");
        let css_path = dir.join("tabler-icons.css");
        let font = dir.join("tabler-icons.ttf");
        fs::write(&pkg, r#"{"name":"tabler-icons","version":"3.2.0"}"#).unwrap();
        fs::write(&css_path, css).unwrap();
        fs::write(&font, [0u8, 1, 0, 0, 0, 10]).unwrap();
        Settings {
            lib_version: "1.0.1".to_string(),
            package: Source::Local(pkg),
            css: Source::Local(css_path),
            font: Source::Local(font),
            out_dir: dir.join("lua"),
            latest: Some(dir.join("tabler-icons.lua")),
            template: None,
            placeholder: "?".to_string(),
        }
    }

    #[test]
    fn single_heart_icon_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let settings = fixture(dir.path(), r#".ti-heart:before { content: "\ea1a"; }"#);
        let report = generate(&settings, &FakeEncoder).unwrap();

        assert_eq!(report.icons_version, "3.2.0");
        assert_eq!(report.icon_count, 1);
        let versioned = dir.path().join("lua").join("tabler-icons-v3.2.0.lua");
        let latest = dir.path().join("tabler-icons.lua");
        assert_eq!(report.written, vec![versioned.clone(), latest.clone()]);

        let text = fs::read_to_string(&versioned).unwrap();
        assert!(text.contains("-- Icons version: 3.2.0"));
        assert!(text.contains("tabler_icons_font_compressed_data_base85 = \"6\""));
        assert!(text.contains("local MIN_ICON, MAX_ICON = 59930, 59930"));
        assert!(text.contains("mod['ICON_HEART'] = '\\xee\\xa8\\x9a'"));
        assert_eq!(fs::read_to_string(&latest).unwrap(), text);
    }

    #[test]
    fn latest_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = fixture(dir.path(), r#".ti-heart:before { content: "\ea1a"; }"#);
        settings.latest = None;
        let report = generate(&settings, &FakeEncoder).unwrap();
        assert_eq!(report.written.len(), 1);
        assert!(!dir.path().join("tabler-icons.lua").exists());
    }

    #[test]
    fn empty_stylesheet_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = fixture(dir.path(), "/* no icons */");
        let err = generate(&settings, &FakeEncoder).unwrap_err();
        assert!(format!("{err:#}").contains("没有找到任何图标"));
        assert!(!dir.path().join("lua").exists());
    }

    #[test]
    fn encoder_failure_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = fixture(dir.path(), r#".ti-heart:before { content: "\ea1a"; }"#);
        let err = generate(&settings, &FailingEncoder).unwrap_err();
        assert!(format!("{err:#}").contains("status 1"));
        assert!(!dir.path().join("lua").exists());
    }

    #[test]
    fn module_keeps_css_order() {
        let dir = tempfile::tempdir().unwrap();
        let css = r#"
.ti-zoom:before { content: "\f000"; }
.ti-alarm:before { content: "\ea35"; }
.ti-bell:before { content: "\ea36"; }
"#;
        let settings = fixture(dir.path(), css);
        let module = build_module(&settings, &FakeEncoder).unwrap();
        let names: Vec<&str> = module.icons.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zoom", "alarm", "bell"]);
        assert_eq!(module.icons.range.min, 0xea35);
        assert_eq!(module.icons.range.max, 0xf000);
        let zoom = module.text.find("ICON_ZOOM").unwrap();
        let bell = module.text.find("ICON_BELL").unwrap();
        assert!(zoom < bell);
    }

    #[test]
    fn output_name_uses_icons_version() {
        assert_eq!(output_file_name("2.47.0"), "tabler-icons-v2.47.0.lua");
    }
}
