//! # Framebuffer 输出模块
//!
//! - `screeninfo`：`linux/fb.h` 中的屏幕参数结构与 ioctl
//! - `pixel`：8 位 RGB 与设备像素格式之间的转换、Alpha 混合
//! - `device`：`FramebufferSink`，实现 `DisplaySink`

mod device;
mod pixel;
mod screeninfo;

pub use device::{DEFAULT_DEVICE, FramebufferSink, VisibleRegion, visible_region};
pub use pixel::{Channel, PixelLayout};
pub use screeninfo::{FbBitfield, FixScreenInfo, VarScreenInfo};
