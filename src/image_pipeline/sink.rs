//! 显示输出接口
//!
//! 编排器只通过 [`DisplaySink`] 与显示设备交互：查询分辨率、提交最终画面。
//! 设备被视为串行访问的单一资源，每张图片恰好调用一次 `display`。

use super::geometry::{Offset, ScreenSize};
use super::ViewError;

/// 一次显示请求：最终表面 + 平移与居中偏移。
#[derive(Debug, Clone, Copy)]
pub struct DisplayRequest<'a> {
    pub rgb: &'a [u8],
    pub alpha: Option<&'a [u8]>,
    pub width: u32,
    pub height: u32,
    /// 从图片内部哪个位置开始显示（当前始终为 0）。
    pub pan: Offset,
    /// 图片左上角在屏幕上的位置。
    pub offset: Offset,
}

/// 显示设备。
pub trait DisplaySink {
    /// 当前可见分辨率。
    fn resolution(&mut self) -> Result<ScreenSize, ViewError>;

    /// 输出最终画面。
    fn display(&mut self, request: &DisplayRequest<'_>) -> Result<(), ViewError>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn resolution(&mut self) -> Result<ScreenSize, ViewError> {
        (**self).resolution()
    }

    fn display(&mut self, request: &DisplayRequest<'_>) -> Result<(), ViewError> {
        (**self).display(request)
    }
}
