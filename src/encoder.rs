//! 字体编码模块：
//! - `FontEncoder`：二进制字体 -> 可嵌入 Lua 源码的文本
//! - `ProcessEncoder`：写出缓存文件并调用外部 b2c_lua 编码器，检查退出码

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, warn};

/// 缓存目录中的字体文件名
pub(crate) const FONT_CACHE_FILE: &str = "tabler-icons.ttf";

pub(crate) trait FontEncoder {
    /// 编码后文本中定义的全局变量前缀（`<symbol>_compressed_data_base85`）
    fn symbol(&self) -> &str;

    fn encode(&self, font: &[u8]) -> Result<String>;
}

/// 调用 `<program> <mode> <font-cache-path> <symbol>` 并捕获标准输出
#[derive(Debug, Clone)]
pub(crate) struct ProcessEncoder {
    pub(crate) program: PathBuf,
    pub(crate) mode: String,
    pub(crate) symbol: String,
    pub(crate) cache_dir: PathBuf,
}

impl ProcessEncoder {
    /// 将字体写入缓存目录，返回缓存文件路径
    fn cache_font(&self, font: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("创建缓存目录失败: {}", self.cache_dir.display()))?;
        let path = self.cache_dir.join(FONT_CACHE_FILE);
        fs::write(&path, font).with_context(|| format!("写入字体缓存失败: {}", path.display()))?;
        debug!("字体已缓存: {} ({} 字节)", path.display(), font.len());
        Ok(path)
    }

    fn run(&self, font_path: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(&self.mode)
            .arg(font_path)
            .arg(&self.symbol)
            .output()
            .with_context(|| format!("无法启动编码器: {}", self.program.display()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            bail!(
                "编码器执行失败 {} ({}): {}",
                self.program.display(),
                output.status,
                stderr.trim()
            );
        }
        if !stderr.trim().is_empty() {
            warn!("编码器输出了诊断信息: {}", stderr.trim());
        }
        String::from_utf8(output.stdout)
            .with_context(|| format!("编码器输出不是 UTF-8: {}", self.program.display()))
    }
}

impl FontEncoder for ProcessEncoder {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn encode(&self, font: &[u8]) -> Result<String> {
        let path = self.cache_font(font)?;
        self.run(&path)
    }
}
