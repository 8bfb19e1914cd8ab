//! Exhaustive and random candidate search.
//!
//! Both searches score every candidate independently against the shared,
//! read-only dataset (in parallel) and return all candidates ranked by
//! ascending distance. Ranking is a stable sort, so equal distances keep
//! generation order: row-major over `a0` then `a1` for the grid, sampling
//! order for random search.

use std::ops::RangeInclusive;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::domain::{Candidate, Dataset, ModelParams, ParamRange};
use crate::error::AppError;
use crate::fit::fitter::residuals;
use crate::math::{lin_space, root_mean_square};

/// Evaluate the Cartesian grid `a0_range x a1_range` and rank it.
///
/// The result always has `a0_range.steps * a1_range.steps` entries.
pub fn grid_search(
    dataset: &Dataset,
    a0_range: &ParamRange,
    a1_range: &ParamRange,
) -> Result<Vec<Candidate>, AppError> {
    if dataset.is_empty() {
        return Err(AppError::empty_dataset("run grid search"));
    }
    let a0s = lin_space(a0_range)?;
    let a1s = lin_space(a1_range)?;

    let grid: Vec<ModelParams> = a0s
        .iter()
        .flat_map(|&a0| a1s.iter().map(move |&a1| ModelParams::new(a0, a1)))
        .collect();

    debug!("grid search: {} x {} = {} candidates", a0s.len(), a1s.len(), grid.len());
    Ok(rank(score_all(dataset, &grid)))
}

/// Sample `count` candidates uniformly from the two ranges and rank them.
///
/// Sampling is driven by a `StdRng` seeded with `seed`, so the output is
/// reproducible.
pub fn random_search(
    dataset: &Dataset,
    a0_range: RangeInclusive<f64>,
    a1_range: RangeInclusive<f64>,
    count: usize,
    seed: u64,
) -> Result<Vec<Candidate>, AppError> {
    if dataset.is_empty() {
        return Err(AppError::empty_dataset("run random search"));
    }
    validate_range("a0", &a0_range)?;
    validate_range("a1", &a1_range)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let samples: Vec<ModelParams> = (0..count)
        .map(|_| {
            let a0 = rng.gen_range(a0_range.clone());
            let a1 = rng.gen_range(a1_range.clone());
            ModelParams::new(a0, a1)
        })
        .collect();

    debug!("random search: {count} candidates (seed {seed})");
    Ok(rank(score_all(dataset, &samples)))
}

fn validate_range(name: &str, range: &RangeInclusive<f64>) -> Result<(), AppError> {
    let (lo, hi) = (*range.start(), *range.end());
    if !(lo.is_finite() && hi.is_finite() && (hi - lo).is_finite() && hi >= lo) {
        return Err(AppError::invalid_input(format!(
            "Invalid {name} range: {lo}..={hi} (bounds and width must be finite, max>=min)."
        )));
    }
    Ok(())
}

/// Score in parallel; output order matches `params`.
fn score_all(dataset: &Dataset, params: &[ModelParams]) -> Vec<Candidate> {
    params
        .par_iter()
        .map(|p| Candidate {
            params: *p,
            distance: root_mean_square(&residuals(p, dataset)).unwrap_or(f64::NAN),
        })
        .collect()
}

fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fit::fitter::distance;

    fn noisy_line() -> Dataset {
        Dataset::from_pairs(&[(1.0, 4.2), (2.0, 6.1), (3.0, 7.9), (4.0, 10.2)])
    }

    #[test]
    fn grid_is_complete_and_sorted() {
        let data = noisy_line();
        let out = grid_search(&data, &ParamRange::new(-5.0, 20.0, 25), &ParamRange::new(1.0, 3.0, 7)).unwrap();
        assert_eq!(out.len(), 25 * 7);
        for w in out.windows(2) {
            assert!(w[0].distance <= w[1].distance);
        }
    }

    #[test]
    fn grid_scores_match_distance() {
        let data = noisy_line();
        let out = grid_search(&data, &ParamRange::new(0.0, 4.0, 5), &ParamRange::new(1.0, 3.0, 5)).unwrap();
        for c in &out {
            let d = distance(&c.params, &data).unwrap();
            assert!((c.distance - d).abs() < 1e-12);
        }
        // (2, 2) is on the grid and is the closest cell to the OLS fit.
        assert_eq!(out[0].params, ModelParams::new(2.0, 2.0));
    }

    #[test]
    fn ties_keep_row_major_order() {
        // Every x is 0, so distance depends only on a0; a1 cells tie.
        let data = Dataset::from_pairs(&[(0.0, 1.0), (0.0, 1.0)]);
        let out = grid_search(&data, &ParamRange::new(1.0, 2.0, 2), &ParamRange::new(-1.0, 1.0, 3)).unwrap();
        let order: Vec<(f64, f64)> = out.iter().map(|c| (c.params.intercept, c.params.slope)).collect();
        assert_eq!(
            order,
            vec![(1.0, -1.0), (1.0, 0.0), (1.0, 1.0), (2.0, -1.0), (2.0, 0.0), (2.0, 1.0)]
        );
    }

    #[test]
    fn grid_rejects_empty_dataset_and_zero_steps() {
        let r = ParamRange::new(0.0, 1.0, 3);
        let err = grid_search(&Dataset::default(), &r, &r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDataset);

        let err = grid_search(&noisy_line(), &ParamRange::new(0.0, 1.0, 0), &r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn random_search_is_reproducible_and_sorted() {
        let data = noisy_line();
        let a = random_search(&data, -20.0..=40.0, -5.0..=5.0, 250, 7).unwrap();
        let b = random_search(&data, -20.0..=40.0, -5.0..=5.0, 250, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 250);
        for w in a.windows(2) {
            assert!(w[0].distance <= w[1].distance);
        }
        for c in &a {
            assert!((-20.0..=40.0).contains(&c.params.intercept));
            assert!((-5.0..=5.0).contains(&c.params.slope));
        }
    }

    #[test]
    fn random_search_rejects_inverted_range() {
        let err = random_search(&noisy_line(), 1.0..=0.0, 0.0..=1.0, 10, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn searches_reject_ranges_whose_width_overflows() {
        let err = random_search(&noisy_line(), -1e308..=1e308, 0.0..=1.0, 5, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let wide = ParamRange::new(-1e308, 1e308, 3);
        let err = grid_search(&noisy_line(), &wide, &ParamRange::new(0.0, 1.0, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
