/// How `interpolate` treats values outside the input range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolation {
    /// Hold the first/last output value
    Clamp,
    /// Continue the first/last segment's line
    Extend,
}

/// Piecewise-linear map of `value` from `input` breakpoints to `output`
///
/// `input` must be ascending and the same length as `output` (at least two
/// points). NaN input yields NaN.
pub fn interpolate(value: f32, input: &[f32], output: &[f32], extrapolation: Extrapolation) -> f32 {
    debug_assert!(input.len() >= 2 && input.len() == output.len());

    let last = input.len() - 1;
    if extrapolation == Extrapolation::Clamp {
        if value <= input[0] {
            return output[0];
        }
        if value >= input[last] {
            return output[last];
        }
    }

    // Segment containing value; the outer segments extend past the range
    let segment = input[1..last]
        .iter()
        .position(|&edge| value < edge)
        .unwrap_or(last - 1);

    let (in0, in1) = (input[segment], input[segment + 1]);
    let (out0, out1) = (output[segment], output[segment + 1]);
    if in1 == in0 {
        return out0;
    }

    out0 + (value - in0) * ((out1 - out0) / (in1 - in0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_within_range() {
        let v = interpolate(-30.0, &[-60.0, 0.0], &[5.0, 50.0], Extrapolation::Clamp);
        assert!((v - 27.5).abs() < 1e-5);
    }

    #[test]
    fn test_interpolate_clamps() {
        assert_eq!(interpolate(-100.0, &[-60.0, 0.0], &[5.0, 50.0], Extrapolation::Clamp), 5.0);
        assert_eq!(interpolate(10.0, &[-60.0, 0.0], &[5.0, 50.0], Extrapolation::Clamp), 50.0);
    }

    #[test]
    fn test_interpolate_extends() {
        let v = interpolate(-120.0, &[-60.0, 0.0], &[5.0, 50.0], Extrapolation::Extend);
        assert!((v + 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_interpolate_picks_segment() {
        let input = [0.0, 10.0, 20.0];
        let output = [0.0, 100.0, 0.0];
        assert_eq!(interpolate(5.0, &input, &output, Extrapolation::Clamp), 50.0);
        assert_eq!(interpolate(15.0, &input, &output, Extrapolation::Clamp), 50.0);
        assert_eq!(interpolate(10.0, &input, &output, Extrapolation::Clamp), 100.0);
    }

    #[test]
    fn test_interpolate_nan_passes_through() {
        assert!(interpolate(f32::NAN, &[0.0, 1.0], &[0.0, 1.0], Extrapolation::Extend).is_nan());
    }
}
