//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有影响单张图片处理的开关集中到 `ViewerConfig`，由编排器显式持有并传递，
//! 各变换只接收自身需要的参数（策略、屏幕尺寸、旋转角度），不读取全局状态。
//!
//! ## 实现思路
//!
//! - `Default` 与命令行默认行为一致：清屏、不使用 Alpha、不缩放、不旋转。
//! - 支持 serde 反序列化，缺省字段回落到默认值，便于从 JSON 配置文件加载。
//! - `StretchMode` 负责字符串解析与反向输出。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::resize::ResizeStrategy;
use super::rotate::Rotation;
use super::ViewError;

/// 超出屏幕时的缩放方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StretchMode {
    #[default]
    Off,
    Simple,
    ColorAverage,
}

impl StretchMode {
    /// 从外部字符串解析缩放方式。
    ///
    /// # 示例
    /// ```rust
    /// use fbview::image_pipeline::StretchMode;
    ///
    /// let mode = StretchMode::from_str("color-average")?;
    /// assert_eq!(mode.as_str(), "color-average");
    /// # Ok::<(), fbview::image_pipeline::ViewError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(mode: &str) -> Result<Self, ViewError> {
        match mode.trim().to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "simple" => Ok(Self::Simple),
            "color-average" | "color_average" => Ok(Self::ColorAverage),
            other => Err(ViewError::InvalidFormat(format!(
                "未知缩放方式：{}（可选：off / simple / color-average）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Simple => "simple",
            Self::ColorAverage => "color-average",
        }
    }

    /// 对应的重采样策略；`Off` 表示不执行适配屏幕。
    pub fn strategy(self) -> Option<ResizeStrategy> {
        match self {
            Self::Off => None,
            Self::Simple => Some(ResizeStrategy::Simple),
            Self::ColorAverage => Some(ResizeStrategy::ColorAverage),
        }
    }
}

/// 单张图片显示流程的配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// 是否使用图片自带的 Alpha 通道与屏幕现有内容混合。
    pub alpha: bool,
    /// 显示前后是否清空终端。
    pub clear: bool,
    /// 每张图片显示后的停留时间（毫秒），用于幻灯片播放。
    pub delay_ms: u64,
    /// 超出屏幕时的缩放方式。
    pub stretch: StretchMode,
    /// 小于屏幕时是否放大。
    pub enlarge: bool,
    /// 显示前的旋转角度（顺时针）。
    pub rotation: Rotation,
    /// 解码前允许的最大像素数（`width * height`）。
    pub max_decoded_pixels: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            alpha: false,
            clear: true,
            delay_ms: 0,
            stretch: StretchMode::Off,
            enlarge: false,
            rotation: Rotation::None,
            max_decoded_pixels: 40_000_000,
        }
    }
}

impl ViewerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// 以十分之一秒为单位设置停留时间（命令行 `--delay` 的单位）。
    pub fn set_delay_tenths(&mut self, tenths: u64) {
        self.delay_ms = tenths.saturating_mul(100);
    }
}
