//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Viewer` 只负责流程编排，不关心具体格式与显示设备。
//! 单张图片的处理链路固定为：
//! 1. 探测格式并读取尺寸
//! 2. 像素上限检查后完整解码
//! 3. 按配置丢弃 Alpha、查询屏幕分辨率
//! 4. 旋转 → 适配屏幕 → 放大（旋转必须在缩放之前，它会改变宽高比）
//! 5. 计算居中偏移并提交显示
//! 6. 停留、清屏，释放表面
//!
//! ## 实现思路
//!
//! - 解码结果保存在本函数栈上，表面以借用方式引用它；变换后的自有缓冲在表面销毁时释放。
//! - 除显示设备不可用外，所有错误只终止当前图片，`run` 继续处理后续图片。
//! - 记录 `load/transform/display/total` 阶段耗时，便于性能诊断。

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use super::decoder::{DecodedImage, ImageDecoder, default_decoders};
use super::geometry::{Offset, ScreenSize, calculate_offsets};
use super::resize::ResizeStrategy;
use super::rotate::{Rotation, rotate};
use super::scaling::{enlarge, fit_to_screen};
use super::sink::{DisplayRequest, DisplaySink};
use super::surface::Surface;
use super::{ViewError, ViewerConfig};
use crate::console;

/// 单张图片的显示结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShownImage {
    pub decoder: &'static str,
    pub width: u32,
    pub height: u32,
    pub offset: Offset,
    /// 最终缓冲是否由变换分配（`false` 表示直接显示了解码器缓冲）。
    pub transformed: bool,
}

/// 一次运行的统计。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub shown: usize,
    pub failed: usize,
}

/// 图片查看器。
///
/// 持有配置、解码器列表、显示设备与终端输出。
pub struct Viewer<S, W> {
    config: ViewerConfig,
    decoders: Vec<Box<dyn ImageDecoder>>,
    sink: S,
    console: W,
}

/// 按配置依次执行旋转、适配屏幕与放大。
pub fn prepare_surface<'d>(
    decoded: &'d DecodedImage,
    screen: ScreenSize,
    rotation: Rotation,
    stretch: Option<ResizeStrategy>,
    enlarge_enabled: bool,
) -> Result<Surface<'d>, ViewError> {
    let mut surface = decoded.surface()?;

    rotate(&mut surface, rotation)?;

    if let Some(strategy) = stretch {
        fit_to_screen(&mut surface, screen, strategy)?;
    }

    if enlarge_enabled {
        enlarge(&mut surface, screen)?;
    }

    Ok(surface)
}

impl<S: DisplaySink, W: Write> Viewer<S, W> {
    /// 使用内置 PNG / JPEG / BMP 解码器创建查看器。
    pub fn new(config: ViewerConfig, sink: S, console: W) -> Self {
        Self {
            config,
            decoders: default_decoders(),
            sink,
            console,
        }
    }

    /// 替换解码器列表（按顺序探测）。
    pub fn with_decoders(mut self, decoders: Vec<Box<dyn ImageDecoder>>) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// 依次显示所有图片。
    ///
    /// 单张图片失败时输出一行 `文件: 原因` 诊断并继续；显示设备不可用时立即返回错误。
    pub fn run<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<RunSummary, ViewError> {
        let mut summary = RunSummary::default();

        for path in paths {
            let path = path.as_ref();
            match self.show_image(path) {
                Ok(_) => summary.shown += 1,
                Err(err) if err.is_fatal() => {
                    log::error!("❌ 显示设备不可用，终止运行 - 文件: {} 错误: {}", path.display(), err);
                    return Err(err);
                }
                Err(err) => {
                    eprintln!("{}: {}", path.display(), err);
                    log::warn!("⚠️ 图片处理失败 - 文件: {} 错误: {:?}", path.display(), err);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// 显示单张图片。
    pub fn show_image(&mut self, path: &Path) -> Result<ShownImage, ViewError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let (index, width, height) = self.identify(path)?;
        let decoder_name = self.decoders[index].name();
        self.validate_pixel_limits(width, height)?;

        let mut decoded = self.decoders[index].load(path, width, height)?;
        if !self.config.alpha {
            decoded.alpha = None;
        }
        let load_elapsed = load_start.elapsed();

        let screen = self.sink.resolution()?;
        if screen.width == 0 || screen.height == 0 {
            return Err(ViewError::Geometry(format!(
                "屏幕分辨率无效：{}x{}",
                screen.width, screen.height
            )));
        }

        let transform_start = Instant::now();
        let surface = prepare_surface(
            &decoded,
            screen,
            self.config.rotation,
            self.config.stretch.strategy(),
            self.config.enlarge,
        )?;
        let transform_elapsed = transform_start.elapsed();

        if self.config.clear {
            self.clear_console();
        }

        let offset = calculate_offsets(surface.width(), surface.height(), screen);
        let display_start = Instant::now();
        self.sink.display(&DisplayRequest {
            rgb: surface.rgb(),
            alpha: surface.alpha(),
            width: surface.width(),
            height: surface.height(),
            pan: Offset::default(),
            offset,
        })?;
        let display_elapsed = display_start.elapsed();

        let shown = ShownImage {
            decoder: decoder_name,
            width: surface.width(),
            height: surface.height(),
            offset,
            transformed: surface.is_owned(),
        };

        log::info!(
            "✅ 图片显示完成 - 文件: {} 格式: {} 原始尺寸: {}x{} 输出尺寸: {}x{} 偏移: ({}, {}) load={}ms transform={}ms display={}ms total={}ms",
            path.display(),
            decoder_name,
            width,
            height,
            shown.width,
            shown.height,
            offset.x,
            offset.y,
            load_elapsed.as_millis(),
            transform_elapsed.as_millis(),
            display_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        let delay = self.config.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if self.config.clear {
            self.clear_console();
        }

        surface.release();
        Ok(shown)
    }

    /// 选出第一个能识别并读出尺寸的解码器。
    fn identify(&self, path: &Path) -> Result<(usize, u32, u32), ViewError> {
        for (index, decoder) in self.decoders.iter().enumerate() {
            if !decoder.identify(path) {
                continue;
            }
            match decoder.size(path) {
                Ok((width, height)) => {
                    log::debug!(
                        "🔍 识别格式 {} - 文件: {} 尺寸: {}x{}",
                        decoder.name(),
                        path.display(),
                        width,
                        height
                    );
                    return Ok((index, width, height));
                }
                Err(err) => {
                    log::debug!("{} 读取尺寸失败，尝试下一个解码器: {}", decoder.name(), err);
                }
            }
        }

        Err(ViewError::InvalidFormat(
            "无法访问文件或文件格式未知".to_string(),
        ))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(&self, width: u32, height: u32) -> Result<(), ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::Decode(format!("图片尺寸为空：{}x{}", width, height)));
        }

        let pixels = width as u64 * height as u64;
        if pixels > self.config.max_decoded_pixels {
            return Err(ViewError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, self.config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn clear_console(&mut self) {
        if let Err(err) = console::clear_screen(&mut self.console) {
            log::warn!("清屏失败: {}", err);
        }
    }
}
