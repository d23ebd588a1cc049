//! # 图片流水线模块（image_pipeline）
//!
//! ## 设计思路
//!
//! 该模块将“格式探测 → 解码 → 旋转 → 缩放 → 居中 → 显示”按职责拆分为多个子模块，
//! 每个变换只接收自身需要的参数，配置由编排器显式持有。
//!
//! - `decoder`：解码器接口与 PNG / JPEG / BMP 实现
//! - `surface`：像素表面与缓冲所有权（借用解码器缓冲 / 持有变换输出）
//! - `rotate`：90° 步长旋转
//! - `resize`：最近邻与盒式平均两种重采样策略
//! - `scaling`：保持宽高比的适配屏幕与放大
//! - `geometry`：居中偏移计算
//! - `sink`：显示设备接口
//! - `handler`：编排整条流水线
//! - `config/error`：配置与错误
//!
//! ## 新同事快速上手
//!
//! ```text
//! main.rs（参数解析、终端与信号）
//!    ↓
//! handler.rs（Viewer：统一编排 + 阶段耗时日志）
//!    ├─ decoder.rs（identify → size → load）
//!    ├─ surface.rs（借用解码器缓冲）
//!    ├─ rotate.rs → scaling.rs → resize.rs（变换，输出自有缓冲）
//!    ├─ geometry.rs（居中偏移）
//!    └─ sink.rs（DisplaySink，生产环境为 framebuffer）
//! ```

mod config;
mod decoder;
mod error;
mod geometry;
mod handler;
mod resize;
mod rotate;
mod scaling;
mod sink;
mod surface;

pub use config::{StretchMode, ViewerConfig};
pub use decoder::{DecodedImage, FormatDecoder, ImageDecoder, default_decoders};
pub use error::ViewError;
pub use geometry::{Offset, ScreenSize, calculate_offsets};
pub use handler::{RunSummary, ShownImage, Viewer, prepare_surface};
pub use resize::{ResizeStrategy, color_average_resize, resize, simple_resize};
pub use rotate::{Rotation, rotate, rotate_plane};
pub use scaling::{ScalePlan, ScaleSkip, enlarge, fit_to_screen, plan_enlarge, plan_fit};
pub use sink::{DisplayRequest, DisplaySink};
pub use surface::{PixelFrame, RGB_CHANNELS, Surface};
