//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义程序级统一的 `AppError` 枚举，`main` 只需要处理这一种错误。
//! 图片流水线内部使用更细粒度的 `ViewError`，通过 `From` 自动上转。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ViewError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::image_pipeline::ViewError;

/// 程序级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片流水线或显示设备错误
    #[error("{0}")]
    Image(#[from] ViewError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件不可用或内容无效
    #[error("配置错误: {0}")]
    Settings(String),

    /// 终端设置失败
    #[error("终端操作失败: {0}")]
    Console(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_error_message_is_passed_through() {
        let err: AppError = ViewError::Display("无法打开 /dev/fb0".into()).into();
        assert_eq!(err.to_string(), "显示设备错误：无法打开 /dev/fb0");
    }
}
