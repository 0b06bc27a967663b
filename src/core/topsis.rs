//! TOPSIS scoring: vector normalization, weighting, ideal points,
//! separation measures, closeness and competition ranking.

use crate::domain::model::{DecisionTable, Impact, ImpactVector, Outcome, ScoredTable, WeightVector};
use crate::utils::error::{Result, TopsisError};

pub struct TopsisEngine;

impl TopsisEngine {
    /// Scores every alternative of `table`.
    ///
    /// Row order is preserved. Shape mismatches are reported before any
    /// arithmetic. An all-zero criterion column normalizes to zeros and a
    /// row with zero total separation gets a closeness of 0.
    pub fn score(
        table: DecisionTable,
        weights: &WeightVector,
        impacts: &ImpactVector,
    ) -> Result<ScoredTable> {
        Self::check_shape(&table, weights, impacts)?;

        tracing::debug!(
            "Scoring {} alternatives over {} criteria",
            table.len(),
            table.criteria_count()
        );

        let weighted = Self::weighted_matrix(&table, weights);
        let (ideal_best, ideal_worst) = Self::ideal_points(&weighted, impacts);

        let separations: Vec<(f64, f64, f64)> = weighted
            .iter()
            .map(|row| separation(row, &ideal_best, &ideal_worst))
            .collect();
        let closeness: Vec<f64> = separations.iter().map(|s| s.2).collect();

        let ranks = competition_ranks(&closeness);

        let outcomes = separations
            .into_iter()
            .zip(ranks)
            .map(|((dist_best, dist_worst, closeness), rank)| Outcome {
                dist_best,
                dist_worst,
                closeness,
                rank,
            })
            .collect();

        Ok(ScoredTable::new(
            table,
            weights,
            impacts,
            ideal_best,
            ideal_worst,
            outcomes,
        ))
    }

    fn check_shape(
        table: &DecisionTable,
        weights: &WeightVector,
        impacts: &ImpactVector,
    ) -> Result<()> {
        let expected = table.criteria_count();
        if weights.len() != expected {
            return Err(TopsisError::ShapeMismatch {
                field: "weights".to_string(),
                expected,
                actual: weights.len(),
            });
        }
        if impacts.len() != expected {
            return Err(TopsisError::ShapeMismatch {
                field: "impacts".to_string(),
                expected,
                actual: impacts.len(),
            });
        }
        Ok(())
    }

    /// Row-major `value / rss_j * weight_j`, with an all-zero column left at zero.
    fn weighted_matrix(table: &DecisionTable, weights: &WeightVector) -> Vec<Vec<f64>> {
        let columns: Vec<Vec<f64>> = weights
            .as_slice()
            .iter()
            .enumerate()
            .map(|(j, weight)| {
                normalize(&table.column(j))
                    .into_iter()
                    .map(|value| value * weight)
                    .collect()
            })
            .collect();

        (0..table.len())
            .map(|i| columns.iter().map(|column| column[i]).collect())
            .collect()
    }

    fn ideal_points(weighted: &[Vec<f64>], impacts: &ImpactVector) -> (Vec<f64>, Vec<f64>) {
        impacts
            .as_slice()
            .iter()
            .enumerate()
            .map(|(j, impact)| {
                let (min, max) = weighted.iter().map(|row| row[j]).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(min, max), v| (min.min(v), max.max(v)),
                );
                match impact {
                    Impact::Benefit => (max, min),
                    Impact::Cost => (min, max),
                }
            })
            .unzip()
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |max, v| max.max(v.abs()))
}

/// Euclidean norm of `values / scale`. With `scale` the largest magnitude the
/// squares stay within `[0, 1]`.
fn scaled_norm(values: &[f64], scale: f64) -> f64 {
    values
        .iter()
        .map(|v| (v / scale) * (v / scale))
        .sum::<f64>()
        .sqrt()
}

/// Divides `values` by their Euclidean norm; an all-zero vector stays zero.
fn normalize(values: &[f64]) -> Vec<f64> {
    let scale = max_abs(values);
    if scale == 0.0 {
        return vec![0.0; values.len()];
    }
    let norm = scaled_norm(values, scale);
    values.iter().map(|v| v / scale / norm).collect()
}

/// Returns `(dist_best, dist_worst, closeness)` for one weighted row.
///
/// Both distances share one scale, so their ratio stays finite even when the
/// distances themselves overflow.
fn separation(row: &[f64], best: &[f64], worst: &[f64]) -> (f64, f64, f64) {
    // Halves of finite values never overflow when subtracted.
    let to_best: Vec<f64> = row.iter().zip(best).map(|(v, p)| v / 2.0 - p / 2.0).collect();
    let to_worst: Vec<f64> = row.iter().zip(worst).map(|(v, p)| v / 2.0 - p / 2.0).collect();

    let scale = max_abs(&to_best).max(max_abs(&to_worst));
    if scale == 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let near = scaled_norm(&to_best, scale);
    let far = scaled_norm(&to_worst, scale);
    let closeness = far / (near + far);
    let closeness = if closeness.is_finite() { closeness } else { 0.0 };

    (2.0 * scale * near, 2.0 * scale * far, closeness)
}

/// Scores closer than this (relative to the larger magnitude, floored at 1)
/// share a rank.
pub const TIE_TOLERANCE: f64 = 1e-12;

fn ties(leader: f64, score: f64) -> bool {
    (leader - score).abs() <= TIE_TOLERANCE * leader.abs().max(score.abs()).max(1.0)
}

/// Standard competition ranking ("1224") by descending score. A score within
/// [`TIE_TOLERANCE`] of the first score of the current group joins that group.
pub fn competition_ranks(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0; scores.len()];
    let mut leader: Option<f64> = None;
    let mut current = 0;
    for (position, &index) in order.iter().enumerate() {
        let score = scores[index];
        if !leader.is_some_and(|leader| ties(leader, score)) {
            current = position + 1;
            leader = Some(score);
        }
        ranks[index] = current;
    }
    ranks
}
