//! Floor plan coordinate helpers
//!
//! Table positions are stored as percentages of the plan dimensions so the
//! layout survives plan resizes. Table widths/heights are design-space pixels
//! scaled against a 500px base at render time.

/// Design-space base dimension that table sizes are authored against
pub const BASE_DIMENSION: f64 = 500.0;

/// Positions above this percent would push a table off the canvas edge
pub const MAX_POSITION_PERCENT: f64 = 95.0;

/// Clamp a position percentage into [0, 95] and round to a whole percent
pub fn clamp_percent(value: f64) -> i64 {
    value.clamp(0.0, MAX_POSITION_PERCENT).round() as i64
}

/// Round a dimension to a whole pixel
pub fn round_i64(value: f64) -> i64 {
    value.round() as i64
}

/// Scale factor mapping design-space sizes onto a rendered plan,
/// proportional to its smaller dimension
pub fn scale_factor(width: f64, height: f64) -> f64 {
    width.min(height) / BASE_DIMENSION
}

/// A design-space size rendered onto a plan of the given dimensions
pub fn scaled_size(design_size: f64, plan_width: f64, plan_height: f64) -> f64 {
    design_size * scale_factor(plan_width, plan_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negative_positions_to_zero() {
        assert_eq!(clamp_percent(-12.0), 0);
    }

    #[test]
    fn clamps_overflow_to_ninety_five() {
        assert_eq!(clamp_percent(110.0), 95);
        assert_eq!(clamp_percent(95.0001), 95);
    }

    #[test]
    fn rounds_in_range_positions() {
        assert_eq!(clamp_percent(42.4), 42);
        assert_eq!(clamp_percent(42.5), 43);
    }

    #[test]
    fn scale_uses_smaller_dimension() {
        assert_eq!(scale_factor(1000.0, 700.0), 1.4);
        assert_eq!(scale_factor(700.0, 1000.0), 1.4);
    }

    #[test]
    fn design_width_scales_against_min_dimension() {
        // a 120-wide table on a plan whose smaller dimension is 250
        assert_eq!(scaled_size(120.0, 250.0, 900.0), 60.0);
    }
}
