//! # Framebuffer 显示设备
//!
//! ## 设计思路
//!
//! 通过 `/dev/fbN` 字符设备直接写像素：
//! - 打开设备时读取一次固定参数（行跨度），每次查询分辨率时重新读取可变参数，
//!   以便感知运行期间的显示模式切换
//! - 按行定位写入（`pwrite`），不需要映射整块显存
//! - 启用 Alpha 时先读回屏幕上的原有行，混合后再写回
//!
//! ## 裁剪规则
//!
//! 可见区域为 `min(图片宽 - pan_x, 屏幕宽 - offset_x)` × `min(图片高 - pan_y, 屏幕高 - offset_y)`，
//! 超出屏幕的部分直接丢弃。

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::Path;

use super::pixel::PixelLayout;
use super::screeninfo::{FixScreenInfo, VarScreenInfo, read_fix, read_var};
use crate::image_pipeline::{
    DisplayRequest, DisplaySink, RGB_CHANNELS, ScreenSize, ViewError,
};

/// 默认 framebuffer 设备。
pub const DEFAULT_DEVICE: &str = "/dev/fb0";

/// 可见区域在图片与屏幕上的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    /// 图片中的起始列 / 行。
    pub src_x: u32,
    pub src_y: u32,
    /// 屏幕上的起始列 / 行。
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算请求在屏幕上的可见区域；完全不可见时返回 `None`。
pub fn visible_region(request: &DisplayRequest<'_>, screen: ScreenSize) -> Option<VisibleRegion> {
    let width = request
        .width
        .checked_sub(request.pan.x)?
        .min(screen.width.checked_sub(request.offset.x)?);
    let height = request
        .height
        .checked_sub(request.pan.y)?
        .min(screen.height.checked_sub(request.offset.y)?);

    if width == 0 || height == 0 {
        return None;
    }

    Some(VisibleRegion {
        src_x: request.pan.x,
        src_y: request.pan.y,
        dst_x: request.offset.x,
        dst_y: request.offset.y,
        width,
        height,
    })
}

/// Linux framebuffer 显示设备。
pub struct FramebufferSink {
    file: File,
    fix: FixScreenInfo,
    var: VarScreenInfo,
}

impl FramebufferSink {
    /// 打开并探测设备。失败说明显示设备不可用，属于致命错误。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| ViewError::Display(format!("无法打开 {}：{}", path.display(), e)))?;

        let fix = read_fix(&file)
            .map_err(|e| ViewError::Display(format!("读取固定屏幕参数失败：{}", e)))?;
        let var = read_var(&file)
            .map_err(|e| ViewError::Display(format!("读取屏幕参数失败：{}", e)))?;
        PixelLayout::from_var(&var)?;

        log::info!(
            "🖥️ 已打开 framebuffer - 设备: {} 驱动: {} 分辨率: {}x{} 色深: {} bpp 行跨度: {}",
            path.display(),
            fix.id(),
            var.xres,
            var.yres,
            var.bits_per_pixel,
            fix.line_length
        );

        Ok(Self {
            file,
            fix,
            var,
        })
    }

    /// 屏幕坐标 `(x, y)` 对应的设备字节偏移。
    fn byte_offset(&self, layout: &PixelLayout, x: u32, y: u32) -> u64 {
        let row = (y + self.var.yoffset) as u64 * self.fix.line_length as u64;
        let col = (x + self.var.xoffset) as u64 * layout.bytes_per_pixel as u64;
        row + col
    }
}

impl DisplaySink for FramebufferSink {
    fn resolution(&mut self) -> Result<ScreenSize, ViewError> {
        self.var = read_var(&self.file)
            .map_err(|e| ViewError::Geometry(format!("无法获取屏幕分辨率：{}", e)))?;
        Ok(ScreenSize::new(self.var.xres, self.var.yres))
    }

    fn display(&mut self, request: &DisplayRequest<'_>) -> Result<(), ViewError> {
        let layout = PixelLayout::from_var(&self.var)?;
        let screen = ScreenSize::new(self.var.xres, self.var.yres);

        let Some(region) = visible_region(request, screen) else {
            log::debug!("图片完全位于屏幕之外，跳过绘制");
            return Ok(());
        };

        let row_bytes = region.width as usize * layout.bytes_per_pixel;
        let mut line = vec![0u8; row_bytes];
        let src_stride = request.width as usize;

        for row in 0..region.height {
            let src_row = (region.src_y + row) as usize;
            let first = src_row * src_stride + region.src_x as usize;
            let last = first + region.width as usize;
            let rgb = &request.rgb[first * RGB_CHANNELS..last * RGB_CHANNELS];
            let position = self.byte_offset(&layout, region.dst_x, region.dst_y + row);

            match request.alpha {
                Some(alpha) => {
                    self.file.read_exact_at(&mut line, position).map_err(|e| {
                        ViewError::Display(format!("读取屏幕内容失败：{}", e))
                    })?;
                    layout.blend_row(rgb, &alpha[first..last], &mut line);
                }
                None => layout.encode_row(rgb, &mut line),
            }

            self.file
                .write_all_at(&line, position)
                .map_err(|e| ViewError::Display(format!("写入 framebuffer 失败：{}", e)))?;
        }

        Ok(())
    }
}
