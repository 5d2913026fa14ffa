use super::config::EfficiencyBands;

/// Piecewise efficiency bonus on the multiplied base award.
///
/// Three bands, evaluated top down: flat bonus at or above rated efficiency,
/// linear partial credit from the floor up to rated, flat penalty below the
/// floor. The partial band reaches exactly the flat rate as the ratio
/// approaches 1.0, so the two meet without a jump.
pub(crate) fn efficiency_bonus(
    points_after_multiplier: f64,
    efficiency_ratio: f64,
    bands: &EfficiencyBands,
) -> f64 {
    if efficiency_ratio >= 1.0 {
        points_after_multiplier * bands.full_bonus_rate
    } else if efficiency_ratio >= bands.partial_floor {
        points_after_multiplier * (efficiency_ratio - bands.partial_floor) * bands.partial_slope
    } else {
        -points_after_multiplier * bands.penalty_rate
    }
}

/// Round the combined award to whole points and clamp at zero.
///
/// Rounding is half-away-from-zero (`f64::round`), so 40.5 settles to 41.
/// The clamp means a poor ride can award nothing but never deduct.
pub(crate) fn settle_points(points_after_multiplier: f64, efficiency_bonus: f64) -> u32 {
    let rounded = (points_after_multiplier + efficiency_bonus).round();
    if rounded <= 0.0 {
        0
    } else {
        rounded as u32
    }
}
