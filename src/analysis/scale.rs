//! Axis scale planning for charts.

use crate::models::AxisScale;
use tracing::debug;

/// Most ticks an axis should show.
pub const MAX_TICKS: f64 = 15.0;

/// Candidate tick intervals, smallest first.
pub const TICK_CANDIDATES: [f64; 12] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0,
];

/// Scale used when there is nothing to plot.
pub const EMPTY_SCALE: AxisScale = AxisScale {
    ceiling: 10.0,
    tick_interval: 2.0,
};

/// Headroom multiplier by magnitude band: `(exclusive upper bound, multiplier)`.
const HEADROOM_BANDS: [(f64, f64); 4] = [(5.0, 1.5), (20.0, 1.3), (100.0, 1.2), (500.0, 1.15)];
const LARGE_HEADROOM: f64 = 1.1;

fn headroom(max_value: f64) -> f64 {
    HEADROOM_BANDS
        .iter()
        .find(|(upper, _)| max_value < *upper)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(LARGE_HEADROOM)
}

/// Pick a rounded axis ceiling and tick interval for `max_value`.
///
/// Negative and non-finite input is treated as 0. Once the inflated maximum
/// passes 75 000 the largest interval is used even though it yields more
/// than `MAX_TICKS` ticks.
pub fn plan_scale(max_value: f64) -> AxisScale {
    let max_value = if max_value.is_finite() && max_value > 0.0 {
        max_value
    } else {
        if max_value != 0.0 {
            debug!("Clamping axis maximum {} to 0", max_value);
        }
        0.0
    };

    if max_value == 0.0 {
        return EMPTY_SCALE;
    }

    let inflated = (max_value * headroom(max_value)).ceil();

    let tick_interval = TICK_CANDIDATES
        .iter()
        .copied()
        .find(|c| inflated / c <= MAX_TICKS)
        .unwrap_or(TICK_CANDIDATES[TICK_CANDIDATES.len() - 1]);

    let mut ceiling = (inflated / tick_interval).ceil() * tick_interval;
    if ceiling <= max_value {
        ceiling = max_value + tick_interval;
    }

    AxisScale {
        ceiling,
        tick_interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(ceiling: f64, tick_interval: f64) -> AxisScale {
        AxisScale {
            ceiling,
            tick_interval,
        }
    }

    #[test]
    fn test_zero_uses_fixed_scale() {
        assert_eq!(plan_scale(0.0), scale(10.0, 2.0));
    }

    #[test]
    fn test_small_value() {
        // 4 * 1.5 = 6, six ticks of 1
        assert_eq!(plan_scale(4.0), scale(6.0, 1.0));
    }

    #[test]
    fn test_large_value() {
        // ceil(523 * 1.1) = 576, 576 / 50 = 11.52
        assert_eq!(plan_scale(523.0), scale(600.0, 50.0));
    }

    #[test]
    fn test_band_multipliers() {
        assert_eq!(headroom(4.99), 1.5);
        assert_eq!(headroom(5.0), 1.3);
        assert_eq!(headroom(19.9), 1.3);
        assert_eq!(headroom(20.0), 1.2);
        assert_eq!(headroom(100.0), 1.15);
        assert_eq!(headroom(499.0), 1.15);
        assert_eq!(headroom(500.0), 1.1);
        assert_eq!(headroom(1e6), 1.1);
    }

    #[test]
    fn test_mid_band_values() {
        // ceil(25 * 1.2) = 30, 30 / 2 = 15
        assert_eq!(plan_scale(25.0), scale(30.0, 2.0));
        // ceil(120 * 1.15) = 138, 138 / 10 = 13.8
        assert_eq!(plan_scale(120.0), scale(140.0, 10.0));
        // ceil(0.2 * 1.5) = 1
        assert_eq!(plan_scale(0.2), scale(1.0, 1.0));
    }

    #[test]
    fn test_ceiling_exceeds_max() {
        let mut v = 0.01;
        while v < 200_000.0 {
            let s = plan_scale(v);
            assert!(s.ceiling > v, "ceiling {} not above {}", s.ceiling, v);
            v *= 1.07;
        }
    }

    #[test]
    fn test_tick_cap() {
        let mut v = 0.01;
        while v < 68_000.0 {
            let s = plan_scale(v);
            assert!(
                s.ceiling / s.tick_interval <= MAX_TICKS,
                "{} ticks for {}",
                s.ceiling / s.tick_interval,
                v
            );
            v *= 1.07;
        }
    }

    #[test]
    fn test_oversized_falls_back_to_largest_interval() {
        let s = plan_scale(100_000.0);
        assert_eq!(s.tick_interval, 5000.0);
        assert_eq!(s.ceiling % 5000.0, 0.0);
        assert!(s.ceiling > 110_000.0 - 1.0);
        assert!(s.ceiling / s.tick_interval > MAX_TICKS);
    }

    #[test]
    fn test_monotonic_within_bands() {
        let bands = [
            (0.01, 4.99),
            (5.0, 19.99),
            (20.0, 99.99),
            (100.0, 499.99),
            (500.0, 60_000.0),
        ];

        for (low, high) in bands {
            let mut prev = plan_scale(low).ceiling;
            let mut v = low;
            while v <= high {
                let current = plan_scale(v).ceiling;
                assert!(current >= prev, "ceiling dropped at {}", v);
                prev = current;
                v += (high - low) / 500.0;
            }
        }
    }

    #[test]
    fn test_invalid_input_is_clamped() {
        assert_eq!(plan_scale(-3.0), EMPTY_SCALE);
        assert_eq!(plan_scale(f64::NAN), EMPTY_SCALE);
        assert_eq!(plan_scale(f64::INFINITY), EMPTY_SCALE);
        assert_eq!(plan_scale(f64::NEG_INFINITY), EMPTY_SCALE);
    }
}
