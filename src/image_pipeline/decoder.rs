//! # 解码器接口
//!
//! ## 设计思路
//!
//! 每种格式一个解码器，统一为 `identify → size → load` 三步：
//! - `identify`：按文件签名（magic bytes）嗅探格式，不依赖扩展名
//! - `size`：只读文件头获取尺寸，便于在完整解码前做资源限制检查
//! - `load`：完整解码为 RGB + 可选 Alpha
//!
//! 解码结果 [`DecodedImage`] 由调用方持有，流水线只以借用方式使用它的缓冲。

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};

use super::surface::{RGB_CHANNELS, Surface, buffer_len, try_alloc};
use super::ViewError;

/// 解码器产出的像素数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl DecodedImage {
    /// 以借用方式包装为表面。
    pub fn surface(&self) -> Result<Surface<'_>, ViewError> {
        Surface::borrowed(self.width, self.height, &self.rgb, self.alpha.as_deref())
    }
}

/// 单一格式的解码器。
pub trait ImageDecoder {
    /// 格式名称（用于日志与诊断）。
    fn name(&self) -> &'static str;

    /// 文件内容是否属于该格式。
    fn identify(&self, path: &Path) -> bool;

    /// 读取图片尺寸。
    fn size(&self, path: &Path) -> Result<(u32, u32), ViewError>;

    /// 解码完整图片，尺寸必须与 `size` 返回值一致。
    fn load(&self, path: &Path, width: u32, height: u32) -> Result<DecodedImage, ViewError>;
}

/// 基于 `image` crate 的单格式解码器。
pub struct FormatDecoder {
    name: &'static str,
    format: ImageFormat,
    mime: &'static str,
}

impl FormatDecoder {
    pub fn png() -> Self {
        Self {
            name: "PNG",
            format: ImageFormat::Png,
            mime: "image/png",
        }
    }

    pub fn jpeg() -> Self {
        Self {
            name: "JPEG",
            format: ImageFormat::Jpeg,
            mime: "image/jpeg",
        }
    }

    pub fn bmp() -> Self {
        Self {
            name: "BMP",
            format: ImageFormat::Bmp,
            mime: "image/bmp",
        }
    }

    fn open(&self, path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, ViewError> {
        let mut reader = ImageReader::open(path)
            .map_err(|e| ViewError::FileSystem(format!("无法打开图片文件：{}", e)))?;
        reader.set_format(self.format);
        Ok(reader)
    }
}

/// 内置解码器，按 PNG → JPEG → BMP 顺序探测。
pub fn default_decoders() -> Vec<Box<dyn ImageDecoder>> {
    vec![
        Box::new(FormatDecoder::png()),
        Box::new(FormatDecoder::jpeg()),
        Box::new(FormatDecoder::bmp()),
    ]
}

impl ImageDecoder for FormatDecoder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn identify(&self, path: &Path) -> bool {
        match infer::get_from_path(path) {
            Ok(Some(kind)) => kind.mime_type() == self.mime,
            Ok(None) => false,
            Err(err) => {
                log::debug!("读取文件签名失败 - 路径: {} 错误: {}", path.display(), err);
                false
            }
        }
    }

    fn size(&self, path: &Path) -> Result<(u32, u32), ViewError> {
        self.open(path)?
            .into_dimensions()
            .map_err(|e| ViewError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn load(&self, path: &Path, width: u32, height: u32) -> Result<DecodedImage, ViewError> {
        let decoded = self
            .open(path)?
            .decode()
            .map_err(|e| ViewError::Decode(format!("图片数据损坏？{}", e)))?;

        if (decoded.width(), decoded.height()) != (width, height) {
            return Err(ViewError::Decode(format!(
                "解码尺寸 {}x{} 与文件头 {}x{} 不一致",
                decoded.width(),
                decoded.height(),
                width,
                height
            )));
        }

        split_channels(decoded)
    }
}

/// 把解码结果拆分为紧凑 RGB 与独立 Alpha 平面。
pub(crate) fn split_channels(image: DynamicImage) -> Result<DecodedImage, ViewError> {
    let (width, height) = (image.width(), image.height());

    if !image.color().has_alpha() {
        return Ok(DecodedImage {
            width,
            height,
            rgb: image.to_rgb8().into_raw(),
            alpha: None,
        });
    }

    let rgba = image.to_rgba8();
    let mut rgb = try_alloc(buffer_len(width, height, RGB_CHANNELS)?)?;
    let mut alpha = try_alloc(buffer_len(width, height, 1)?)?;

    for ((src, dst), a) in rgba
        .as_raw()
        .chunks_exact(4)
        .zip(rgb.chunks_exact_mut(RGB_CHANNELS))
        .zip(alpha.iter_mut())
    {
        dst.copy_from_slice(&src[..RGB_CHANNELS]);
        *a = src[3];
    }

    Ok(DecodedImage {
        width,
        height,
        rgb,
        alpha: Some(alpha),
    })
}
