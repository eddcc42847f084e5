/// Degrees per hub hue unit, the hub expresses hue in 0..=100 and LIFX in 0..=360.
pub const HUE_DIVISOR: f64 = 3.6;

/// The hub expresses level and saturation in 0..=100, LIFX in 0..=1.
pub const PERCENT_SCALE: f64 = 100.0;

/// A trait to convert values between LIFX and hub units.
pub trait ScaleConversions {
    /// Returns the hub hue (0..=100) by treating `self` as a LIFX hue in degrees.
    fn degrees_to_hub_hue(self) -> Self;

    /// Returns the LIFX hue in degrees by treating `self` as a hub hue (0..=100).
    fn hub_hue_to_degrees(self) -> Self;

    /// Returns the percentage by treating `self` as a fraction (0..=1).
    fn fraction_to_percent(self) -> Self;

    /// Returns the fraction by treating `self` as a percentage (0..=100).
    fn percent_to_fraction(self) -> Self;
}

macro_rules! impl_scale_conversions {
    ($($t:ty)*) => ($(
        impl ScaleConversions for $t {
            fn degrees_to_hub_hue(self) -> $t {
                self / HUE_DIVISOR as $t
            }
            fn hub_hue_to_degrees(self) -> $t {
                self * HUE_DIVISOR as $t
            }
            fn fraction_to_percent(self) -> $t {
                self * PERCENT_SCALE as $t
            }
            fn percent_to_fraction(self) -> $t {
                self / PERCENT_SCALE as $t
            }
        }
    )*)
}

impl_scale_conversions! { f32 f64 }

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(180.0, 50.0)]
    #[case(360.0, 100.0)]
    fn degrees_to_hub_hue_f64(#[case] input: f64, #[case] expected: f64) {
        assert!((input.degrees_to_hub_hue() - expected).abs() < EPSILON);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(50.0, 180.0)]
    #[case(100.0, 360.0)]
    fn hub_hue_to_degrees_f64(#[case] input: f64, #[case] expected: f64) {
        assert!((input.hub_hue_to_degrees() - expected).abs() < EPSILON);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.42, 42.0)]
    #[case(1.0, 100.0)]
    fn fraction_to_percent_f64(#[case] input: f64, #[case] expected: f64) {
        assert!((input.fraction_to_percent() - expected).abs() < EPSILON);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(42.0, 0.42)]
    #[case(100.0, 1.0)]
    fn percent_to_fraction_f64(#[case] input: f64, #[case] expected: f64) {
        assert!((input.percent_to_fraction() - expected).abs() < EPSILON);
    }

    #[test]
    fn hue_survives_a_round_trip_f32() {
        let hue: f32 = 33.3;
        assert!((hue.hub_hue_to_degrees().degrees_to_hub_hue() - hue).abs() < 1e-4);
    }
}
