//! # 像素表面与缓冲所有权
//!
//! ## 设计思路
//!
//! `Surface` 同时描述像素内容（RGB + 可选 Alpha）和缓冲归属：
//! - 解码器产出的缓冲以借用形式挂入（`Cow::Borrowed`），流水线永远不会释放或原地改写它们
//! - 变换产出的新缓冲以拥有形式挂入（`Cow::Owned`），被替换或表面销毁时自动释放
//!
//! 替换缓冲的唯一入口是 [`Surface::replace`]，旧的自有缓冲在安装新缓冲时由 `Drop` 释放。
//! 变换先在只读视图上生成完整的 [`PixelFrame`]，成功后再一次性替换；
//! 分配失败时表面保持原样，由调用方负责后续清理。

use std::borrow::Cow;

use super::ViewError;

/// RGB 每像素字节数。
pub const RGB_CHANNELS: usize = 3;

/// 计算 `width * height * channels`，溢出视为内存不足。
pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize, ViewError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            ViewError::Allocation(format!("缓冲尺寸溢出：{}x{}x{}", width, height, channels))
        })
}

/// 校验按行存储的平面：尺寸为正且长度恰为 `width * height * channels`。
pub(crate) fn validate_plane(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), ViewError> {
    if width == 0 || height == 0 {
        return Err(ViewError::Geometry(format!(
            "源平面尺寸必须为正：{}x{}",
            width, height
        )));
    }
    let expected = buffer_len(width, height, channels)?;
    if src.len() != expected {
        return Err(ViewError::Decode(format!(
            "源平面长度异常：{}（期望 {}）",
            src.len(),
            expected
        )));
    }
    Ok(())
}

/// 申请一块清零缓冲，分配失败以 `ViewError::Allocation` 返回而不是终止进程。
pub(crate) fn try_alloc(len: usize) -> Result<Vec<u8>, ViewError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| ViewError::Allocation(format!("无法分配 {} 字节：{}", len, e)))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// 变换输出：一组新分配、尚未挂入表面的缓冲。
#[derive(Debug)]
pub struct PixelFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

/// 带所有权状态的像素表面。
#[derive(Debug)]
pub struct Surface<'a> {
    width: u32,
    height: u32,
    rgb: Cow<'a, [u8]>,
    alpha: Option<Cow<'a, [u8]>>,
}

impl<'a> Surface<'a> {
    /// 借用解码器缓冲创建表面。
    pub fn borrowed(
        width: u32,
        height: u32,
        rgb: &'a [u8],
        alpha: Option<&'a [u8]>,
    ) -> Result<Self, ViewError> {
        validate_lengths(width, height, rgb.len(), alpha.map(<[u8]>::len))?;
        Ok(Self {
            width,
            height,
            rgb: Cow::Borrowed(rgb),
            alpha: alpha.map(Cow::Borrowed),
        })
    }

    /// 直接由自有缓冲创建表面。
    pub fn owned(frame: PixelFrame) -> Result<Surface<'static>, ViewError> {
        validate_lengths(
            frame.width,
            frame.height,
            frame.rgb.len(),
            frame.alpha.as_ref().map(Vec::len),
        )?;
        Ok(Surface {
            width: frame.width,
            height: frame.height,
            rgb: Cow::Owned(frame.rgb),
            alpha: frame.alpha.map(Cow::Owned),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// 当前缓冲是否由流水线分配（被替换或销毁时释放）。
    pub fn is_owned(&self) -> bool {
        matches!(self.rgb, Cow::Owned(_))
    }

    /// 安装变换产出的新缓冲。
    ///
    /// 旧缓冲若为自有则在此处释放；若为借用则仅解除借用，原数据保持不变。
    pub fn replace(&mut self, frame: PixelFrame) {
        debug_assert!(
            validate_lengths(
                frame.width,
                frame.height,
                frame.rgb.len(),
                frame.alpha.as_ref().map(Vec::len)
            )
            .is_ok(),
            "变换输出缓冲长度与尺寸不一致"
        );

        self.width = frame.width;
        self.height = frame.height;
        self.rgb = Cow::Owned(frame.rgb);
        self.alpha = frame.alpha.map(Cow::Owned);

        debug_assert!(self.alpha.as_ref().is_none_or(|a| matches!(a, Cow::Owned(_))));
    }

    /// 结束表面生命周期。自有缓冲被释放，借用缓冲原样归还解码器。
    pub fn release(self) {
        log::trace!(
            "释放表面 {}x{}（owned={}）",
            self.width,
            self.height,
            self.is_owned()
        );
    }
}

fn validate_lengths(
    width: u32,
    height: u32,
    rgb_len: usize,
    alpha_len: Option<usize>,
) -> Result<(), ViewError> {
    if width == 0 || height == 0 {
        return Err(ViewError::Geometry(format!(
            "表面尺寸必须为正：{}x{}",
            width, height
        )));
    }

    let expected_rgb = buffer_len(width, height, RGB_CHANNELS)?;
    if rgb_len != expected_rgb {
        return Err(ViewError::Decode(format!(
            "颜色缓冲长度异常：{}（期望 {}）",
            rgb_len, expected_rgb
        )));
    }

    if let Some(alpha_len) = alpha_len {
        let expected_alpha = buffer_len(width, height, 1)?;
        if alpha_len != expected_alpha {
            return Err(ViewError::Decode(format!(
                "Alpha 缓冲长度异常：{}（期望 {}）",
                alpha_len, expected_alpha
            )));
        }
    }

    Ok(())
}
