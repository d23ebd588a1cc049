//! # 适配屏幕与放大
//!
//! ## 设计思路
//!
//! 两个变换都保持宽高比，并且触发条件互斥：
//! - 适配屏幕（fit）：表面在任一维度超出屏幕时缩小
//! - 放大（enlarge）：表面在两个维度都不超出屏幕（且不完全相等）时放大
//!
//! 尺寸决策与像素处理分离：[`plan_fit`] / [`plan_enlarge`] 是纯函数，
//! 返回 [`ScalePlan`]，由 [`fit_to_screen`] / [`enlarge`] 执行。
//!
//! ## 候选尺寸
//!
//! 1. 按宽度：`(screen_w, h * screen_w / w)`
//! 2. 按高度：`(w * screen_h / h, screen_h)`
//!
//! 整数除法向下截断；优先采用按宽度的候选。

use super::geometry::ScreenSize;
use super::resize::{ResizeStrategy, resize};
use super::surface::Surface;
use super::ViewError;

/// 不需要缩放的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleSkip {
    /// 表面已完整落在屏幕内（fit 不触发）。
    WithinScreen,
    /// 表面在某一维度超出屏幕（enlarge 不触发）。
    ExceedsScreen,
    /// 表面与屏幕尺寸完全相同。
    ExactMatch,
    /// 没有不越界的候选尺寸。
    NoCandidateFits,
}

/// 缩放决策。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalePlan {
    Keep(ScaleSkip),
    Resize { width: u32, height: u32 },
}

fn width_driven(width: u32, height: u32, screen: ScreenSize) -> (u32, u32) {
    let ny = height as u64 * screen.width as u64 / width as u64;
    (screen.width, ny.min(u32::MAX as u64) as u32)
}

fn height_driven(width: u32, height: u32, screen: ScreenSize) -> (u32, u32) {
    let nx = width as u64 * screen.height as u64 / height as u64;
    (nx.min(u32::MAX as u64) as u32, screen.height)
}

/// 计算缩小到屏幕内的目标尺寸。
///
/// 极端宽高比下截断可能得到 0，此时钳制为 1 像素，保证仍可重采样且不越界。
pub fn plan_fit(width: u32, height: u32, screen: ScreenSize) -> ScalePlan {
    if !screen.is_exceeded_by(width, height) {
        return ScalePlan::Keep(ScaleSkip::WithinScreen);
    }

    let (nx, ny) = match width_driven(width, height, screen) {
        (nx, ny) if ny <= screen.height => (nx, ny),
        _ => height_driven(width, height, screen),
    };

    ScalePlan::Resize {
        width: nx.max(1),
        height: ny.max(1),
    }
}

/// 计算放大到尽量填满屏幕的目标尺寸。
pub fn plan_enlarge(width: u32, height: u32, screen: ScreenSize) -> ScalePlan {
    if screen.is_exceeded_by(width, height) {
        return ScalePlan::Keep(ScaleSkip::ExceedsScreen);
    }
    if width == screen.width && height == screen.height {
        return ScalePlan::Keep(ScaleSkip::ExactMatch);
    }

    let (nx, ny) = width_driven(width, height, screen);
    if ny <= screen.height {
        return ScalePlan::Resize { width: nx, height: ny };
    }

    let (nx, ny) = height_driven(width, height, screen);
    if nx <= screen.width {
        return ScalePlan::Resize { width: nx, height: ny };
    }

    ScalePlan::Keep(ScaleSkip::NoCandidateFits)
}

fn apply(
    surface: &mut Surface<'_>,
    plan: ScalePlan,
    strategy: ResizeStrategy,
    stage: &str,
) -> Result<ScalePlan, ViewError> {
    match plan {
        ScalePlan::Keep(reason) => {
            log::debug!("{}：保持 {:?}（{:?}）", stage, surface.dimensions(), reason);
        }
        ScalePlan::Resize { width, height } => {
            log::info!(
                "📐 {}：{}x{} -> {}x{}",
                stage,
                surface.width(),
                surface.height(),
                width,
                height
            );
            resize(surface, width, height, strategy)?;
        }
    }
    Ok(plan)
}

/// 表面超出屏幕时按宽高比缩小，颜色使用调用方指定的策略。
pub fn fit_to_screen(
    surface: &mut Surface<'_>,
    screen: ScreenSize,
    strategy: ResizeStrategy,
) -> Result<ScalePlan, ViewError> {
    let plan = plan_fit(surface.width(), surface.height(), screen);
    apply(surface, plan, strategy, "适配屏幕")
}

/// 表面小于屏幕时按宽高比放大，固定使用 `Simple` 策略。
pub fn enlarge(surface: &mut Surface<'_>, screen: ScreenSize) -> Result<ScalePlan, ViewError> {
    let plan = plan_enlarge(surface.width(), surface.height(), screen);
    apply(surface, plan, ResizeStrategy::Simple, "放大")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize {
        width: 200,
        height: 100,
    };

    #[test]
    fn fit_uses_width_candidate_when_height_fits() {
        assert_eq!(
            plan_fit(400, 100, SCREEN),
            ScalePlan::Resize {
                width: 200,
                height: 50
            }
        );
    }

    #[test]
    fn fit_falls_back_to_height_candidate() {
        assert_eq!(
            plan_fit(100, 400, SCREEN),
            ScalePlan::Resize {
                width: 25,
                height: 100
            }
        );
    }

    #[test]
    fn fit_is_noop_when_surface_fits() {
        assert_eq!(
            plan_fit(100, 50, SCREEN),
            ScalePlan::Keep(ScaleSkip::WithinScreen)
        );
        assert_eq!(
            plan_fit(200, 100, SCREEN),
            ScalePlan::Keep(ScaleSkip::WithinScreen)
        );
    }

    #[test]
    fn fit_clamps_degenerate_sliver() {
        assert_eq!(
            plan_fit(100_000, 1, SCREEN),
            ScalePlan::Resize {
                width: 200,
                height: 1
            }
        );
    }

    #[test]
    fn enlarge_square_into_wide_screen() {
        assert_eq!(
            plan_enlarge(50, 50, SCREEN),
            ScalePlan::Resize {
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn enlarge_wide_image_uses_width_candidate() {
        assert_eq!(
            plan_enlarge(100, 50, SCREEN),
            ScalePlan::Resize {
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn enlarge_skips_oversized_and_exact() {
        assert_eq!(
            plan_enlarge(300, 10, SCREEN),
            ScalePlan::Keep(ScaleSkip::ExceedsScreen)
        );
        assert_eq!(
            plan_enlarge(200, 100, SCREEN),
            ScalePlan::Keep(ScaleSkip::ExactMatch)
        );
    }

    #[test]
    fn enlarge_surface_touching_one_edge_is_kept_size() {
        // 宽度已等于屏幕宽度，按宽度候选即原尺寸
        assert_eq!(
            plan_enlarge(200, 40, SCREEN),
            ScalePlan::Resize {
                width: 200,
                height: 40
            }
        );
    }

    #[test]
    fn fit_to_screen_resizes_surface() {
        let rgb = vec![5u8; 400 * 100 * 3];
        let mut surface = Surface::borrowed(400, 100, &rgb, None).expect("valid");
        let plan = fit_to_screen(&mut surface, SCREEN, ResizeStrategy::ColorAverage)
            .expect("fit");
        assert!(matches!(plan, ScalePlan::Resize { .. }));
        assert_eq!(surface.dimensions(), (200, 50));
        assert!(surface.rgb().iter().all(|&b| b == 5));
    }

    #[test]
    fn enlarge_keeps_borrowed_surface_when_no_change() {
        let rgb = vec![5u8; 300 * 10 * 3];
        let mut surface = Surface::borrowed(300, 10, &rgb, None).expect("valid");
        enlarge(&mut surface, SCREEN).expect("enlarge");
        assert!(!surface.is_owned());
        assert_eq!(surface.dimensions(), (300, 10));
    }
}
