//! Summary statistics over population energies.

use nalgebra::DVector;

/// Mean and population standard deviation (`ddof = 0`).
///
/// Returns `None` for an empty slice.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let v = DVector::from_column_slice(values);
    Some((v.mean(), v.variance().sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_std_matches_hand_computation() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mean_std_empty_is_none() {
        assert!(mean_std(&[]).is_none());
    }
}
