// ============================================================
// Layer 4 — Standard Scaler
// ============================================================
// Standardises each feature column to zero mean and unit
// variance: z = (x − mean) / scale.
//
//   mean  = column mean
//   scale = population standard deviation (divide by n, not n−1)
//
// A constant column has std 0; its scale is set to 1 so the
// transform leaves it centred instead of dividing by zero.
//
// The fitted scaler is persisted next to the model: scoring must
// use exactly the statistics the model was trained on.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean:  Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-column statistics. All rows must share one width.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        ensure!(!rows.is_empty(), "cannot fit a scaler on zero rows");
        let width = rows[0].as_ref().len();
        ensure!(width > 0, "cannot fit a scaler on zero-width rows");
        ensure!(
            rows.iter().all(|r| r.as_ref().len() == width),
            "all rows must have {width} columns"
        );

        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row.as_ref()) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; width];
        for row in rows {
            for ((v, x), m) in var.iter_mut().zip(row.as_ref()).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Check a deserialized scaler before trusting it: `width` columns
    /// in both vectors, finite means, finite positive scales.
    pub fn validate(&self, width: usize) -> Result<()> {
        ensure!(
            self.mean.len() == width && self.scale.len() == width,
            "scaler has {} means and {} scales, expected {width} of each",
            self.mean.len(),
            self.scale.len()
        );
        ensure!(self.mean.iter().all(|m| m.is_finite()), "scaler mean is not finite");
        ensure!(
            self.scale.iter().all(|s| s.is_finite() && *s > 0.0),
            "scaler scale must be finite and positive"
        );
        Ok(())
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        ensure!(
            row.len() == self.width(),
            "scaler expects {} features, got {}",
            self.width(),
            row.len()
        );
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    pub fn transform_all<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_statistics() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let s = StandardScaler::fit(&rows).unwrap();
        assert_eq!(s.mean, vec![2.0, 10.0]);
        // population std of {1, 3} is 1, not sqrt(2)
        assert_eq!(s.scale, vec![1.0, 1.0]);
    }

    #[test]
    fn test_transformed_columns_standardised() {
        let rows: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let s = StandardScaler::fit(&rows).unwrap();
        let z = s.transform_all(&rows).unwrap();
        for col in 0..2 {
            let mean: f64 = z.iter().map(|r| r[col]).sum::<f64>() / 50.0;
            let var:  f64 = z.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / 50.0;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_column_uses_unit_scale() {
        let rows = vec![vec![4.0], vec![4.0], vec![4.0]];
        let s = StandardScaler::fit(&rows).unwrap();
        assert_eq!(s.scale, vec![1.0]);
        assert_eq!(s.transform(&[6.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_width_mismatch_is_error() {
        let s = StandardScaler::fit(&[vec![1.0, 2.0], vec![2.0, 3.0]]).unwrap();
        assert!(s.transform(&[1.0]).is_err());
        assert!(StandardScaler::fit(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(StandardScaler::fit::<Vec<f64>>(&[]).is_err());
    }

    #[test]
    fn test_validate_rejects_corrupt_statistics() {
        let good = StandardScaler::fit(&[vec![1.0, 2.0, 3.0], vec![3.0, 5.0, 4.0]]).unwrap();
        assert!(good.validate(3).is_ok());
        assert!(good.validate(5).is_err());

        let ragged = StandardScaler { mean: vec![0.0; 3], scale: vec![1.0; 2] };
        assert!(ragged.validate(3).is_err());

        let zero = StandardScaler { mean: vec![0.0; 2], scale: vec![1.0, 0.0] };
        assert!(zero.validate(2).is_err());

        let nan = StandardScaler { mean: vec![f64::NAN, 0.0], scale: vec![1.0; 2] };
        assert!(nan.validate(2).is_err());

        let inf = StandardScaler { mean: vec![0.0; 2], scale: vec![f64::INFINITY, 1.0] };
        assert!(inf.validate(2).is_err());
    }
}
