//! # Framebuffer 图片查看器 — 程序入口
//!
//! 本文件仅负责参数解析、日志初始化、终端与信号设置。
//! 图片处理逻辑位于 `image_pipeline`，详见 `lib.rs` 架构文档。

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fbview::console::{self, ConsoleGuard};
use fbview::error::AppError;
use fbview::framebuffer::{DEFAULT_DEVICE, FramebufferSink};
use fbview::image_pipeline::{Rotation, StretchMode, Viewer, ViewerConfig};
use fbview::settings;

/// 在 Linux framebuffer 上显示 PNG / JPEG / BMP 图片
#[derive(Parser, Debug)]
#[command(name = "fbview", version, about)]
struct Args {
    /// 使用图片的 Alpha 通道（如果有）
    #[arg(short = 'a', long)]
    alpha: bool,

    /// 显示前后不清空屏幕
    #[arg(short = 'c', long = "dontclear", visible_alias = "noclear")]
    dont_clear: bool,

    /// 图片超出屏幕时用最近邻缩放适配
    #[arg(short = 'f', long, overrides_with = "color_stretch")]
    stretch: bool,

    /// 图片超出屏幕时用颜色平均缩放适配
    #[arg(
        short = 'k',
        long = "colorstretch",
        visible_alias = "colorstrech",
        overrides_with = "stretch"
    )]
    color_stretch: bool,

    /// 图片小于屏幕时放大以尽量填满屏幕
    #[arg(short = 'e', long)]
    enlarge: bool,

    /// 幻灯片模式：每张图片停留时间，单位为十分之一秒
    #[arg(short = 's', long, value_name = "TENTHS")]
    delay: Option<u64>,

    /// 显示前顺时针旋转（0 / 90 / 180 / 270）
    #[arg(short = 'r', long, value_name = "DEGREES", value_parser = parse_rotation)]
    rotate: Option<Rotation>,

    /// framebuffer 设备
    #[arg(short = 'd', long, env = "FRAMEBUFFER", default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// JSON 配置文件，命令行参数优先
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 要显示的图片
    #[arg(required = true, value_name = "IMAGE")]
    images: Vec<PathBuf>,
}

fn parse_rotation(value: &str) -> Result<Rotation, String> {
    let degrees: u32 = value
        .trim()
        .parse()
        .map_err(|e| format!("无效的角度 {}: {}", value, e))?;
    Rotation::from_degrees(degrees).map_err(String::from)
}

impl Args {
    /// 合并配置文件与命令行参数。
    fn viewer_config(&self) -> Result<ViewerConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => settings::load_viewer_config(path)?,
            None => ViewerConfig::default(),
        };

        if self.alpha {
            config.alpha = true;
        }
        if self.dont_clear {
            config.clear = false;
        }
        if self.stretch {
            config.stretch = StretchMode::Simple;
        }
        if self.color_stretch {
            config.stretch = StretchMode::ColorAverage;
        }
        if self.enlarge {
            config.enlarge = true;
        }
        if let Some(tenths) = self.delay {
            config.set_delay_tenths(tenths);
        }
        if let Some(rotation) = self.rotate {
            config.rotation = rotation;
        }

        Ok(config)
    }
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    let config = args.viewer_config()?;
    log::info!("生效配置: {:?}", config);

    let sink = FramebufferSink::open(&args.device)?;

    console::install_signal_handlers()?;
    let _console_guard = match ConsoleGuard::setup() {
        Ok(guard) => Some(guard),
        Err(err) => {
            log::warn!("终端模式未切换，继续运行: {err}");
            None
        }
    };

    let mut viewer = Viewer::new(config, sink, io::stdout());
    let summary = viewer.run(args.images.as_slice())?;

    log::info!(
        "运行结束 - 成功: {} 失败: {}",
        summary.shown,
        summary.failed
    );

    if summary.shown == 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err}");
            eprintln!("fbview: {err}");
            ExitCode::FAILURE
        }
    }
}
