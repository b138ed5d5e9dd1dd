//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与生成逻辑解耦，便于在其它模块中复用参数。

use clap::Parser;
use std::path::PathBuf;

/// 顶层 CLI 入口（无子命令，直接执行一次生成）
#[derive(Parser, Debug)]
#[command(name = "tabler-lua", about = "Tabler Icons Lua 库生成器", version)]
pub(crate) struct Cli {
    /// 库版本号（仅写入生成文件头部），默认 1.0.1
    #[arg(short = 'v', long = "lib-version", value_name = "VER")]
    pub(crate) lib_version: Option<String>,
    /// 配置文件路径，默认自动查找 tabler-lua.yaml / tabler-lua.yml
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// 上游仓库的 git 引用（替换 URL 中的 {ref}），默认 master
    #[arg(long = "ref", value_name = "REF")]
    pub(crate) git_ref: Option<String>,
    /// 使用本地 package.json 代替下载
    #[arg(long, value_name = "FILE")]
    pub(crate) package_file: Option<PathBuf>,
    /// 使用本地 CSS 代替下载
    #[arg(long, value_name = "FILE")]
    pub(crate) css_file: Option<PathBuf>,
    /// 使用本地 TTF 字体代替下载
    #[arg(long, value_name = "FILE")]
    pub(crate) font_file: Option<PathBuf>,
    /// 外部编码器可执行文件，默认 ./tools/b2c_lua.exe
    #[arg(long, value_name = "PROGRAM")]
    pub(crate) encoder: Option<PathBuf>,
    /// 输出目录，默认：lua
    #[arg(short, long, value_name = "DIR")]
    pub(crate) out_dir: Option<PathBuf>,
    /// 字体缓存目录，默认：.cache
    #[arg(long, value_name = "DIR")]
    pub(crate) cache_dir: Option<PathBuf>,
    /// 额外写出的“最新版”文件路径，默认：tabler-icons.lua
    #[arg(long, value_name = "FILE")]
    pub(crate) latest: Option<PathBuf>,
    /// 不写出“最新版”文件
    #[arg(long, conflicts_with = "latest")]
    pub(crate) no_latest: bool,
    /// 自定义 Tera 模板（覆盖内置模板）
    #[arg(long, value_name = "FILE")]
    pub(crate) template: Option<PathBuf>,
    /// 输出调试日志
    #[arg(long, conflicts_with = "quiet")]
    pub(crate) verbose: bool,
    /// 仅输出警告与错误
    #[arg(short, long)]
    pub(crate) quiet: bool,
}
