use super::{Fit, PoseSolver};
use crate::{Mechanism, Pose};
use nalgebra as na;

// Lower bound of the damping scale
const MIN_SCALE: f64 = 1e-12;
// Initial damping factor relative to the largest curvature
const TAU: f64 = 1e-3;

type Residual = na::Vector4<f64>;
type Jacobian = na::Matrix4x3<f64>;

/// Levenberg-Marquardt fit of `[cx, cy, a]` with Nielsen's damping update.
pub(super) fn solve(mech: &Mechanism, guess: Pose, opt: &PoseSolver) -> Fit {
    let mut x = guess.to_vector();
    let (mut r, mut jac) = eval(mech, &x);
    let mut cost = 0.5 * r.norm_squared();
    let mut damping = None;
    let mut nu = 2.;
    let mut iter = 0;
    let mut converged = false;
    while iter < opt.max_iter {
        iter += 1;
        let a = jac.tr_mul(&jac);
        let g = jac.tr_mul(&r);
        if g.amax() <= opt.gtol {
            converged = true;
            break;
        }
        let scale = a.diagonal().map(|v| v.max(MIN_SCALE));
        let mu = damping.get_or_insert_with(|| TAU * scale.max());
        let mut damped = a;
        damped.set_diagonal(&(a.diagonal() + scale * *mu));
        let Some(h) = damped.cholesky().map(|c| c.solve(&-g)) else {
            *mu *= nu;
            nu *= 2.;
            continue;
        };
        if h.norm() <= opt.xtol * (x.norm() + opt.xtol) {
            converged = true;
            break;
        }
        let x_new = x + h;
        let (r_new, jac_new) = eval(mech, &x_new);
        let cost_new = 0.5 * r_new.norm_squared();
        // Reduction predicted by the linear model
        let pred = 0.5 * h.dot(&(scale.component_mul(&h) * *mu - g));
        let actual = cost - cost_new;
        if pred > 0. && actual > 0. {
            let rho = actual / pred;
            x = x_new;
            r = r_new;
            jac = jac_new;
            cost = cost_new;
            *mu *= (1. - (2. * rho - 1.).powi(3)).max(1. / 3.);
            nu = 2.;
            if actual <= opt.ftol * (cost + actual) {
                converged = true;
                break;
            }
        } else {
            *mu *= nu;
            nu *= 2.;
        }
    }
    Fit::new(mech, Pose::from_vector(&x), iter, converged)
}

/// Residuals and their Jacobian with respect to `[cx, cy, a]`.
fn eval(mech: &Mechanism, x: &na::Vector3<f64>) -> (Residual, Jacobian) {
    let rot = na::Rotation2::new(x.z);
    let center = na::Point2::new(x.x, x.y);
    let mut r = Residual::zeros();
    let mut jac = Jacobian::zeros();
    for (i, (offset, pos)) in mech.body.iter().zip(mech.positions()).enumerate() {
        let arm = rot * na::Vector2::from(*offset);
        let v = center + arm - na::Point2::from(pos);
        let d = v.norm();
        r[i] = d - mech.link;
        // The direction is undefined when a corner sits on its carriage
        let u = if d > f64::EPSILON {
            v / d
        } else {
            na::Vector2::zeros()
        };
        jac[(i, 0)] = u.x;
        jac[(i, 1)] = u.y;
        jac[(i, 2)] = u.y * arm.x - u.x * arm.y;
    }
    (r, jac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn jacobian_matches_finite_difference() {
        let mech = Mechanism::square(90., 45., 10., [10., -5., -3., 15.]);
        let x = na::Vector3::new(1.5, -2., 0.3);
        let (_, jac) = eval(&mech, &x);
        let h = 1e-6;
        for j in 0..3 {
            let mut dx = na::Vector3::zeros();
            dx[j] = h;
            let (rp, _) = eval(&mech, &(x + dx));
            let (rm, _) = eval(&mech, &(x - dx));
            let fd = (rp - rm) / (2. * h);
            for i in 0..4 {
                assert_abs_diff_eq!(jac[(i, j)], fd[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn exact_fit_stops_at_once() {
        let mech = Mechanism::square(90., 50., 10., [35., -35., -35., 35.]);
        let fit = solve(&mech, Pose::default(), &PoseSolver::new());
        assert!(fit.converged);
        assert_eq!(fit.iter, 1);
        assert_eq!(fit.pose, Pose::default());
    }

    #[test]
    fn iteration_limit() {
        let mech = Mechanism::square(90., 50., 10., [10., -5., -3., 15.]);
        let fit = solve(&mech, Pose::default(), &PoseSolver::new().max_iter(2));
        assert!(fit.iter <= 2);
        assert!(fit.cost().is_finite());
    }
}
