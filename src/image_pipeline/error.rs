//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载单张图片处理链路中的所有错误来源。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配：
//! 绝大多数错误只终止当前图片，只有显示设备不可用才终止整次运行。

/// 图片流水线统一错误类型。
///
/// 该类型会在 `main` 中被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("内存不足：{0}")]
    Allocation(String),

    #[error("几何错误：{0}")]
    Geometry(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("显示设备错误：{0}")]
    Display(String),
}

impl ViewError {
    /// 是否需要终止整次运行。
    ///
    /// 显示设备本身不可用时后续图片也无法显示，其余错误只影响当前图片。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Display(_))
    }
}

impl From<ViewError> for String {
    fn from(error: ViewError) -> Self {
        error.to_string()
    }
}
