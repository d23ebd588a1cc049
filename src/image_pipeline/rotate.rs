//! # 旋转变换
//!
//! 以 90° 为步长顺时针旋转表面。颜色与 Alpha 使用同一映射，
//! 输出总是新分配的自有缓冲；0° 为空操作。

use serde::{Deserialize, Serialize};

use super::surface::{
    PixelFrame, RGB_CHANNELS, Surface, buffer_len, try_alloc, validate_plane,
};
use super::ViewError;

/// 旋转角度（顺时针）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// 从角度解析，只接受 0 / 90 / 180 / 270（以及其 360 的整数倍偏移）。
    pub fn from_degrees(degrees: u32) -> Result<Self, ViewError> {
        match degrees % 360 {
            0 => Ok(Self::None),
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(ViewError::InvalidFormat(format!(
                "不支持的旋转角度：{}（可选：0 / 90 / 180 / 270）",
                other
            ))),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }

    /// 旋转后宽高是否互换。
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }

    /// 计算源像素 `(x, y)` 在输出中的坐标。
    fn map(self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::None => (x, y),
            Self::Cw90 => (height - 1 - y, x),
            Self::Cw180 => (width - 1 - x, height - 1 - y),
            Self::Cw270 => (y, width - 1 - x),
        }
    }
}

impl TryFrom<u32> for Rotation {
    type Error = ViewError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// 旋转单个按行存储的平面（`channels` 字节每像素）。
pub fn rotate_plane(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    rotation: Rotation,
) -> Result<Vec<u8>, ViewError> {
    validate_plane(src, width, height, channels)?;
    let len = buffer_len(width, height, channels)?;
    let mut dst = try_alloc(len)?;

    let dst_width = if rotation.swaps_axes() { height } else { width };

    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = rotation.map(x, y, width, height);
            let src_idx = (y as usize * width as usize + x as usize) * channels;
            let dst_idx = (dy as usize * dst_width as usize + dx as usize) * channels;
            dst[dst_idx..dst_idx + channels].copy_from_slice(&src[src_idx..src_idx + channels]);
        }
    }

    Ok(dst)
}

/// 旋转表面。失败时表面保持不变。
pub fn rotate(surface: &mut Surface<'_>, rotation: Rotation) -> Result<(), ViewError> {
    if rotation == Rotation::None {
        return Ok(());
    }

    let (width, height) = surface.dimensions();
    let rgb = rotate_plane(surface.rgb(), width, height, RGB_CHANNELS, rotation)?;
    let alpha = surface
        .alpha()
        .map(|alpha| rotate_plane(alpha, width, height, 1, rotation))
        .transpose()?;

    let (new_width, new_height) = if rotation.swaps_axes() {
        (height, width)
    } else {
        (width, height)
    };

    log::debug!(
        "🔄 旋转 {}°：{}x{} -> {}x{}",
        rotation.degrees(),
        width,
        height,
        new_width,
        new_height
    );

    surface.replace(PixelFrame {
        width: new_width,
        height: new_height,
        rgb,
        alpha,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(width: u32, height: u32) -> (Vec<u8>, Vec<u8>) {
        let pixels = (width * height) as usize;
        let rgb = (0..pixels * 3).map(|i| (i % 251) as u8).collect();
        let alpha = (0..pixels).map(|i| (i * 7 % 256) as u8).collect();
        (rgb, alpha)
    }

    #[test]
    fn rotate_plane_rejects_mismatched_source() {
        let result = rotate_plane(&[0u8; 3], 2, 2, 3, Rotation::Cw90);
        assert!(matches!(result, Err(ViewError::Decode(_))));

        let result = rotate_plane(&[], 0, 3, 1, Rotation::Cw180);
        assert!(matches!(result, Err(ViewError::Geometry(_))));
    }

    #[test]
    fn rotate_plane_reports_overflowing_size_as_allocation() {
        let result = rotate_plane(&[], u32::MAX, u32::MAX, 3, Rotation::Cw270);
        assert!(matches!(result, Err(ViewError::Allocation(_))));
    }

    #[test]
    fn rotate_none_is_noop_and_stays_borrowed() {
        let (rgb, _) = patterned(3, 2);
        let mut surface = Surface::borrowed(3, 2, &rgb, None).expect("valid");
        rotate(&mut surface, Rotation::None).expect("rotate");
        assert!(!surface.is_owned());
        assert_eq!(surface.rgb(), &rgb[..]);
    }

    #[test]
    fn rotate_90_swaps_dimensions_and_moves_corner() {
        // 2x1: 左像素 A，右像素 B；顺时针 90° 后为 1x2，A 在上 B 在下
        let rgb = vec![1, 1, 1, 2, 2, 2];
        let mut surface = Surface::borrowed(2, 1, &rgb, None).expect("valid");
        rotate(&mut surface, Rotation::Cw90).expect("rotate");
        assert_eq!(surface.dimensions(), (1, 2));
        assert_eq!(surface.rgb(), &[1, 1, 1, 2, 2, 2]);
        assert!(surface.is_owned());

        // 1x2 再转 90°：上 A 下 B -> 左 B 右 A
        rotate(&mut surface, Rotation::Cw90).expect("rotate");
        assert_eq!(surface.dimensions(), (2, 1));
        assert_eq!(surface.rgb(), &[2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn four_quarter_turns_restore_original() {
        let (rgb, alpha) = patterned(5, 3);
        let mut surface = Surface::borrowed(5, 3, &rgb, Some(&alpha)).expect("valid");
        for _ in 0..4 {
            rotate(&mut surface, Rotation::Cw90).expect("rotate");
        }
        assert_eq!(surface.dimensions(), (5, 3));
        assert_eq!(surface.rgb(), &rgb[..]);
        assert_eq!(surface.alpha(), Some(&alpha[..]));
    }

    #[test]
    fn two_quarter_turns_equal_half_turn() {
        let (rgb, alpha) = patterned(10, 20);

        let mut twice = Surface::borrowed(10, 20, &rgb, Some(&alpha)).expect("valid");
        rotate(&mut twice, Rotation::Cw90).expect("rotate");
        assert_eq!(twice.dimensions(), (20, 10));
        rotate(&mut twice, Rotation::Cw90).expect("rotate");

        let mut once = Surface::borrowed(10, 20, &rgb, Some(&alpha)).expect("valid");
        rotate(&mut once, Rotation::Cw180).expect("rotate");

        assert_eq!(twice.dimensions(), (10, 20));
        assert_eq!(twice.rgb(), once.rgb());
        assert_eq!(twice.alpha(), once.alpha());
    }

    #[test]
    fn cw270_inverts_cw90() {
        let (rgb, _) = patterned(4, 7);
        let mut surface = Surface::borrowed(4, 7, &rgb, None).expect("valid");
        rotate(&mut surface, Rotation::Cw90).expect("rotate");
        rotate(&mut surface, Rotation::Cw270).expect("rotate");
        assert_eq!(surface.rgb(), &rgb[..]);
        assert!(surface.alpha().is_none());
    }

    #[test]
    fn degrees_parse() {
        assert_eq!(Rotation::from_degrees(0).expect("0"), Rotation::None);
        assert_eq!(Rotation::from_degrees(450).expect("450"), Rotation::Cw90);
        assert_eq!(Rotation::from_degrees(270).expect("270").degrees(), 270);
        assert!(matches!(
            Rotation::from_degrees(45),
            Err(ViewError::InvalidFormat(_))
        ));
    }
}
