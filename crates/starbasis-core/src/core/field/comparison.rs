use super::dft::DftField;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("Fields have different shapes: {left} vs {right}")]
    ShapeMismatch { left: String, right: String },
}

/// Maximum and root-mean-square differences between two sets of fields.
///
/// Every monomer field contributes all of its entries to a single pooled
/// statistic. Complex entries are compared by modulus of the difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldComparison {
    pub max_diff: f64,
    pub rms_diff: f64,
    pub count: usize,
}

impl FieldComparison {
    pub fn compare_components(
        left: &[Vec<f64>],
        right: &[Vec<f64>],
    ) -> Result<Self, ComparisonError> {
        let shape = |fields: &[Vec<f64>]| {
            format!("{:?}", fields.iter().map(Vec::len).collect::<Vec<_>>())
        };
        if shape(left) != shape(right) {
            return Err(ComparisonError::ShapeMismatch {
                left: shape(left),
                right: shape(right),
            });
        }
        Ok(Self::accumulate(
            left.iter()
                .zip(right.iter())
                .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs())),
        ))
    }

    pub fn compare_dft<const D: usize>(
        left: &[DftField<D>],
        right: &[DftField<D>],
    ) -> Result<Self, ComparisonError> {
        let shape = |fields: &[DftField<D>]| {
            format!(
                "{} x {:?}",
                fields.len(),
                fields.first().map(|f| *f.mesh_dimensions())
            )
        };
        let same_meshes = left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|(a, b)| a.mesh() == b.mesh());
        if !same_meshes {
            return Err(ComparisonError::ShapeMismatch {
                left: shape(left),
                right: shape(right),
            });
        }
        Ok(Self::accumulate(
            left.iter()
                .zip(right.iter())
                .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).norm())),
        ))
    }

    fn accumulate(differences: impl Iterator<Item = f64>) -> Self {
        let (max_diff, sum_sq, count) = differences.fold((0.0_f64, 0.0, 0), |(max, sum, n), d| {
            (max.max(d), sum + d * d, n + 1)
        });
        let rms_diff = if count > 0 {
            (sum_sq / count as f64).sqrt()
        } else {
            0.0
        };
        Self {
            max_diff,
            rms_diff,
            count,
        }
    }
}
