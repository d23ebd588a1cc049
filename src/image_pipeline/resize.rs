//! # 重采样模块
//!
//! ## 设计思路
//!
//! 提供两种可互换的重采样策略：
//! - `Simple`：最近邻取样，每个目标像素取源空间中左上对齐的单个源像素，速度快但可能产生锯齿
//! - `ColorAverage`：盒式滤波，对目标像素在源空间覆盖的全部源像素求平均，质量更好但开销更大
//!
//! Alpha 作为遮罩而非颜色数据，总是使用 `Simple` 策略缩放。
//!
//! ## 实现思路
//!
//! 坐标映射统一使用整数运算 `i * src / dst`，目标尺寸与源尺寸相同时映射退化为恒等，
//! 两种策略都会逐字节复现源数据。盒式滤波的区间终点向上取整，
//! 只与目标像素部分重叠的源像素也计入平均。

use super::surface::{
    PixelFrame, RGB_CHANNELS, Surface, buffer_len, try_alloc, validate_plane,
};
use super::ViewError;

/// 颜色数据的重采样策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStrategy {
    Simple,
    ColorAverage,
}

/// 把目标坐标 `i` 映射回源空间：`i * src / dst`。
#[inline]
fn source_index(i: u32, src: u32, dst: u32) -> u32 {
    (i as u64 * src as u64 / dst as u64) as u32
}

/// 目标坐标 `i` 的右边界在源空间中向上取整：`ceil(i * src / dst)`。
#[inline]
fn source_end(i: u32, src: u32, dst: u32) -> u32 {
    (i as u64 * src as u64).div_ceil(dst as u64) as u32
}

fn validate_target(width: u32, height: u32) -> Result<(), ViewError> {
    if width == 0 || height == 0 {
        return Err(ViewError::Geometry(format!(
            "缩放目标尺寸必须为正：{}x{}",
            width, height
        )));
    }
    Ok(())
}

/// 最近邻重采样，适用于任意通道数的按行平面。
pub fn simple_resize(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    channels: usize,
    dst_width: u32,
    dst_height: u32,
) -> Result<Vec<u8>, ViewError> {
    validate_plane(src, src_width, src_height, channels)?;
    validate_target(dst_width, dst_height)?;
    let mut dst = try_alloc(buffer_len(dst_width, dst_height, channels)?)?;

    // 每列对应的源列在所有行中相同，预先算好
    let columns: Vec<usize> = (0..dst_width)
        .map(|i| source_index(i, src_width, dst_width) as usize * channels)
        .collect();
    let src_stride = src_width as usize * channels;
    let dst_stride = dst_width as usize * channels;

    for (j, dst_row) in dst.chunks_exact_mut(dst_stride).enumerate() {
        let row = source_index(j as u32, src_height, dst_height) as usize;
        let src_row = &src[row * src_stride..(row + 1) * src_stride];
        for (dst_px, &col) in dst_row.chunks_exact_mut(channels).zip(&columns) {
            dst_px.copy_from_slice(&src_row[col..col + channels]);
        }
    }

    Ok(dst)
}

/// 盒式滤波重采样（RGB）。
///
/// 目标像素 `(i, j)` 对全部与其覆盖范围重叠的源像素求平均：
/// 列区间为 `[floor(i*sw/dw), ceil((i+1)*sw/dw))`，行区间同理。
pub fn color_average_resize(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Result<Vec<u8>, ViewError> {
    validate_plane(src, src_width, src_height, RGB_CHANNELS)?;
    validate_target(dst_width, dst_height)?;
    let mut dst = try_alloc(buffer_len(dst_width, dst_height, RGB_CHANNELS)?)?;

    let span = |i: u32, src_len: u32, dst_len: u32| {
        let start = source_index(i, src_len, dst_len);
        let mut end = source_end(i + 1, src_len, dst_len);
        if end == start {
            end += 1;
        }
        (start as usize, end as usize)
    };

    let src_stride = src_width as usize * RGB_CHANNELS;
    let dst_stride = dst_width as usize * RGB_CHANNELS;

    for (j, dst_row) in dst.chunks_exact_mut(dst_stride).enumerate() {
        let (ya, yb) = span(j as u32, src_height, dst_height);
        for (i, dst_px) in dst_row.chunks_exact_mut(RGB_CHANNELS).enumerate() {
            let (xa, xb) = span(i as u32, src_width, dst_width);

            let mut sum = [0u64; RGB_CHANNELS];
            for row in ya..yb {
                let line = &src[row * src_stride + xa * RGB_CHANNELS..row * src_stride + xb * RGB_CHANNELS];
                for px in line.chunks_exact(RGB_CHANNELS) {
                    sum[0] += px[0] as u64;
                    sum[1] += px[1] as u64;
                    sum[2] += px[2] as u64;
                }
            }

            let count = ((xb - xa) * (yb - ya)) as u64;
            for (out, total) in dst_px.iter_mut().zip(sum) {
                *out = (total / count) as u8;
            }
        }
    }

    Ok(dst)
}

/// 将表面重采样到 `width x height`。
///
/// 颜色按 `strategy` 处理，Alpha 总是按 `Simple` 处理。失败时表面保持不变。
pub fn resize(
    surface: &mut Surface<'_>,
    width: u32,
    height: u32,
    strategy: ResizeStrategy,
) -> Result<(), ViewError> {
    validate_target(width, height)?;
    let (src_width, src_height) = surface.dimensions();

    let rgb = match strategy {
        ResizeStrategy::Simple => simple_resize(
            surface.rgb(),
            src_width,
            src_height,
            RGB_CHANNELS,
            width,
            height,
        )?,
        ResizeStrategy::ColorAverage => {
            color_average_resize(surface.rgb(), src_width, src_height, width, height)?
        }
    };
    let alpha = surface
        .alpha()
        .map(|alpha| simple_resize(alpha, src_width, src_height, 1, width, height))
        .transpose()?;

    log::debug!(
        "🧩 重采样：{}x{} -> {}x{}（strategy={:?}, alpha={}）",
        src_width,
        src_height,
        width,
        height,
        strategy,
        alpha.is_some()
    );

    surface.replace(PixelFrame {
        width,
        height,
        rgb,
        alpha,
    });
    Ok(())
}
