//! 像素格式转换
//!
//! 把 8 位 RGB 打包成 framebuffer 的原生像素（16 / 24 / 32 bpp），
//! 以及在 Alpha 混合时把屏幕上已有的像素解包回 8 位 RGB。

use super::screeninfo::{FbBitfield, VarScreenInfo};
use crate::image_pipeline::{RGB_CHANNELS, ViewError};

/// 单个颜色分量的位布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub offset: u32,
    pub length: u32,
}

impl Channel {
    fn pack(self, value: u8) -> u32 {
        let value = value as u32;
        let scaled = if self.length >= 8 {
            value << (self.length - 8)
        } else {
            value >> (8 - self.length)
        };
        scaled << self.offset
    }

    fn unpack(self, pixel: u32) -> u8 {
        let mask = if self.length >= 32 {
            u32::MAX
        } else {
            (1u32 << self.length) - 1
        };
        let raw = (pixel >> self.offset) & mask;
        let value = if self.length >= 8 {
            raw >> (self.length - 8)
        } else {
            raw << (8 - self.length)
        };
        value as u8
    }
}

impl From<FbBitfield> for Channel {
    fn from(field: FbBitfield) -> Self {
        Self {
            offset: field.offset,
            length: field.length,
        }
    }
}

/// framebuffer 像素布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    pub bytes_per_pixel: usize,
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl PixelLayout {
    /// 从屏幕参数推导像素布局，只支持真彩色 16 / 24 / 32 bpp。
    pub fn from_var(var: &VarScreenInfo) -> Result<Self, ViewError> {
        let bytes_per_pixel = match var.bits_per_pixel {
            16 => 2,
            24 => 3,
            32 => 4,
            other => {
                return Err(ViewError::Display(format!("不支持的色深：{} bpp", other)));
            }
        };

        let layout = Self {
            bytes_per_pixel,
            red: var.red.into(),
            green: var.green.into(),
            blue: var.blue.into(),
        };

        let bits = var.bits_per_pixel;
        for channel in [layout.red, layout.green, layout.blue] {
            if channel.length == 0 || channel.length > 16 || channel.offset + channel.length > bits {
                return Err(ViewError::Display(format!(
                    "无效的颜色分量布局：offset={} length={}（{} bpp）",
                    channel.offset, channel.length, bits
                )));
            }
        }

        Ok(layout)
    }

    pub fn pack(&self, r: u8, g: u8, b: u8) -> u32 {
        self.red.pack(r) | self.green.pack(g) | self.blue.pack(b)
    }

    pub fn unpack(&self, pixel: u32) -> [u8; 3] {
        [
            self.red.unpack(pixel),
            self.green.unpack(pixel),
            self.blue.unpack(pixel),
        ]
    }

    /// 把一行 RGB 编码为 framebuffer 字节（小端）。
    pub fn encode_row(&self, rgb: &[u8], out: &mut [u8]) {
        for (src, dst) in rgb
            .chunks_exact(RGB_CHANNELS)
            .zip(out.chunks_exact_mut(self.bytes_per_pixel))
        {
            let pixel = self.pack(src[0], src[1], src[2]);
            dst.copy_from_slice(&pixel.to_le_bytes()[..self.bytes_per_pixel]);
        }
    }

    /// 把图片行按 Alpha 混合到屏幕已有的行上，结果原地写回 `screen`。
    pub fn blend_row(&self, rgb: &[u8], alpha: &[u8], screen: &mut [u8]) {
        for ((src, &a), dst) in rgb
            .chunks_exact(RGB_CHANNELS)
            .zip(alpha)
            .zip(screen.chunks_exact_mut(self.bytes_per_pixel))
        {
            let mut raw = [0u8; 4];
            raw[..self.bytes_per_pixel].copy_from_slice(dst);
            let under = self.unpack(u32::from_le_bytes(raw));

            let mix = |s: u8, d: u8| -> u8 {
                ((s as u32 * a as u32 + d as u32 * (255 - a as u32)) / 255) as u8
            };
            let pixel = self.pack(
                mix(src[0], under[0]),
                mix(src[1], under[1]),
                mix(src[2], under[2]),
            );
            dst.copy_from_slice(&pixel.to_le_bytes()[..self.bytes_per_pixel]);
        }
    }
}
