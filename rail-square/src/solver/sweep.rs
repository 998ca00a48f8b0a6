use super::Fit;
use crate::{Mechanism, Pose};
use std::f64::consts::TAU;

// (√5 - 1) / 2
const GOLDEN: f64 = 0.618_033_988_749_895;
const REFINE: usize = 60;
const ATOL: f64 = 1e-10;

/// Fix the center at the carriage centroid and search the angle only.
///
/// Uniform sampling over `[0, 2π)`, then a golden-section search between the
/// neighbors of the best sample. Only the search steps are counted as
/// iterations.
pub(super) fn solve(mech: &Mechanism, res: usize) -> Fit {
    let [cx, cy] = mech.centroid();
    let f = |a| mech.cost(&Pose::new(cx, cy, a));
    let res = res.max(1);
    let step = TAU / res as f64;
    let (best, best_f) = (0..res)
        .map(|i| {
            let a = i as f64 * step;
            (a, f(a))
        })
        .min_by(|(_, f1), (_, f2)| f1.total_cmp(f2))
        .unwrap_or((0., f(0.)));
    let [mut lo, mut hi] = [best - step, best + step];
    let mut a1 = hi - GOLDEN * (hi - lo);
    let mut a2 = lo + GOLDEN * (hi - lo);
    let [mut f1, mut f2] = [f(a1), f(a2)];
    let mut iter = 0;
    while iter < REFINE && hi - lo > ATOL {
        iter += 1;
        if f1 < f2 {
            hi = a2;
            [a2, f2] = [a1, f1];
            a1 = hi - GOLDEN * (hi - lo);
            f1 = f(a1);
        } else {
            lo = a1;
            [a1, f1] = [a2, f2];
            a2 = lo + GOLDEN * (hi - lo);
            f2 = f(a2);
        }
    }
    let a = (lo + hi) * 0.5;
    // The bracket may hold more than one valley
    let a = if f(a) <= best_f { a } else { best };
    Fit::new(mech, Pose::new(cx, cy, a), iter, hi - lo <= ATOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn centroid_is_kept() {
        let mech = Mechanism::square(90., 50., 10., [10., -5., -3., 15.]);
        let fit = solve(&mech, 360);
        assert_eq!(fit.pose.center(), mech.centroid());
        assert_abs_diff_eq!(fit.pose.cy, 4.25);
        // No sample is better than the refined angle
        for i in 0..360 {
            let a = i as f64 * TAU / 360.;
            assert!(fit.cost() <= mech.cost(&Pose::new(0., 4.25, a)) + 1e-9);
        }
    }

    #[test]
    fn symmetric_reference() {
        let mech = Mechanism::square(90., 50., 10., [35., -35., -35., 35.]);
        let fit = solve(&mech, 360);
        assert_abs_diff_eq!(fit.pose.a, 0., epsilon = 1e-6);
        assert!(fit.cost() < 1e-8);
    }

    #[test]
    fn refinement_steps() {
        let mech = Mechanism::square(90., 50., 10., [10., -5., -3., 15.]);
        for res in [1, 12, 360] {
            let fit = solve(&mech, res);
            assert!(fit.converged, "{res}");
            assert!(fit.iter > 0 && fit.iter < REFINE, "{res}");
        }
        // Finer sampling starts from a narrower bracket
        assert!(solve(&mech, 360).iter < solve(&mech, 1).iter);
    }
}
