//! # Framebuffer 图片查看器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs  参数解析 · 日志 · 终端守卫 · 信号处理           │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ ViewerConfig（显式传入）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  image_pipeline                                           │
//! │    decoder ─→ surface ─→ rotate ─→ scaling ─→ geometry    │
//! │      (PNG/JPEG/BMP)  (借用/持有)   (fit/enlarge)  (居中)   │
//! │                                   ↓                       │
//! │                              DisplaySink                  │
//! └───────────────────────────────────┼──────────────────────┘
//!                                     ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  framebuffer  FramebufferSink（/dev/fbN，ioctl + pwrite）  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`image_pipeline`] | 解码、旋转、缩放、居中与单张图片编排 |
//! | [`framebuffer`] | Linux framebuffer 显示设备 |
//! | [`console`] | 终端模式守卫、清屏、致命信号处理 |
//! | [`settings`] | JSON 配置文件读写 |

pub mod console;
pub mod error;
pub mod framebuffer;
pub mod image_pipeline;
pub mod settings;
