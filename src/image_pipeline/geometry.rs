//! 屏幕几何计算
//!
//! 纯函数：输入为最终表面尺寸与屏幕尺寸，输出居中偏移，便于测试。
//! 表面在某一维度上大于等于屏幕时该维度不居中，偏移为 0，保证偏移永不为负。

/// 目标显示区域尺寸（像素）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `(width, height)` 是否在任一维度上超出屏幕。
    pub fn is_exceeded_by(&self, width: u32, height: u32) -> bool {
        width > self.width || height > self.height
    }
}

/// 表面左上角相对屏幕左上角的偏移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

fn center_axis(len: u32, screen_len: u32) -> u32 {
    if len < screen_len {
        (screen_len - len) / 2
    } else {
        0
    }
}

/// 计算居中偏移。
///
/// # 后置条件
/// - 表面较小的维度：`offset + len <= screen_len`
/// - 表面较大或相等的维度：`offset == 0`
pub fn calculate_offsets(width: u32, height: u32, screen: ScreenSize) -> Offset {
    Offset {
        x: center_axis(width, screen.width),
        y: center_axis(height, screen.height),
    }
}
