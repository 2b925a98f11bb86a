use crate::constants::MAX_DIMENSION;

/// Target size for one compression attempt. Values may be fractional; use
/// [`CompressionPlan::pixel_size`] for pixel-grid work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionPlan {
    pub width: f64,
    pub height: f64,
}

impl CompressionPlan {
    /// Rounded size, never below one pixel per side.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }

    pub fn is_downscale_of(&self, width: u32, height: u32) -> bool {
        self.pixel_size() != (width, height)
    }
}

/// Downscale-to-bound with the default 2000 px limit.
pub fn plan(width: u32, height: u32) -> CompressionPlan {
    plan_with_bound(width, height, MAX_DIMENSION)
}

/// Keeps the size when both sides fit `bound`, otherwise scales so the longer
/// side is exactly `bound`. Ties scale by height.
pub fn plan_with_bound(width: u32, height: u32, bound: u32) -> CompressionPlan {
    let (w, h, b) = (width as f64, height as f64, bound as f64);

    if width <= bound && height <= bound {
        return CompressionPlan { width: w, height: h };
    }

    if width > height {
        CompressionPlan {
            width: b,
            height: h * (b / w),
        }
    } else {
        CompressionPlan {
            width: w * (b / h),
            height: b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(p: CompressionPlan) -> (f64, f64) {
        (p.width, p.height)
    }

    #[test]
    fn test_plan_keeps_small_images() {
        assert_eq!(sizes(plan(1000, 500)), (1000.0, 500.0));
        assert_eq!(sizes(plan(2000, 2000)), (2000.0, 2000.0));
        assert_eq!(sizes(plan(1, 1)), (1.0, 1.0));
    }

    #[test]
    fn test_plan_scales_landscape() {
        assert_eq!(sizes(plan(4000, 2000)), (2000.0, 1000.0));
    }

    #[test]
    fn test_plan_scales_portrait() {
        assert_eq!(sizes(plan(3000, 6000)), (1000.0, 2000.0));
    }

    #[test]
    fn test_plan_scales_square() {
        assert_eq!(sizes(plan(5000, 5000)), (2000.0, 2000.0));
    }

    #[test]
    fn test_plan_fractional_side() {
        let p = plan(3000, 1001);
        assert_eq!(p.width, 2000.0);
        assert!((p.height - 667.333).abs() < 0.001);
        assert_eq!(p.pixel_size(), (2000, 667));
    }

    #[test]
    fn test_pixel_size_never_zero() {
        let p = plan(10_000, 1);
        assert_eq!(p.pixel_size(), (2000, 1));
    }

    #[test]
    fn test_is_downscale_of() {
        assert!(!plan(800, 600).is_downscale_of(800, 600));
        assert!(plan(4000, 3000).is_downscale_of(4000, 3000));
    }

    #[test]
    fn test_plan_with_custom_bound() {
        assert_eq!(sizes(plan_with_bound(400, 200, 100)), (100.0, 50.0));
    }
}
