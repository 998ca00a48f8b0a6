//! Pose solvers.
//!
//! The canonical strategy is a Levenberg-Marquardt least-squares fit over the
//! center and the angle. The angle sweep fixes the center at the carriage
//! centroid and only searches the rotation, it is an approximation for cold
//! starts and may land on a different pose.
use crate::{Mechanism, Pose};

mod lm;
mod sweep;

/// Solving strategy.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Strategy {
    /// Levenberg-Marquardt over center and angle
    #[default]
    LeastSquares,
    /// Centroid-fixed angle sampling with golden-section refinement
    AngleSweep,
    /// Angle sweep as the initial guess of the least-squares fit
    Hybrid,
}

impl Strategy {
    /// Name of the strategy.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LeastSquares => "Least Squares",
            Self::AngleSweep => "Angle Sweep",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// A solved pose and its link residuals.
///
/// A large residual means the carriages describe an infeasible
/// configuration, the pose is still the best fit that was found.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Fit {
    /// Solved pose, the angle is in `(-π, π]`
    pub pose: Pose,
    /// Signed residuals of the links
    pub residuals: [f64; 4],
    /// Number of iterations
    ///
    /// The angle sweep counts its golden-section steps only.
    pub iter: usize,
    /// The solver met a tolerance before the iteration limit
    ///
    /// For the angle sweep, the refined bracket is narrower than the angle
    /// tolerance.
    pub converged: bool,
}

impl Fit {
    pub(crate) fn new(mech: &Mechanism, pose: Pose, iter: usize, converged: bool) -> Self {
        let pose = pose.normalized();
        let residuals = mech.residuals(&pose);
        Self { pose, residuals, iter, converged }
    }

    /// Sum of squared residuals.
    pub fn cost(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// The largest residual magnitude.
    pub fn max_residual(&self) -> f64 {
        self.residuals.iter().fold(0., |m, r| r.abs().max(m))
    }

    /// Check if every link is within the tolerance.
    pub fn is_feasible(&self, tol: f64) -> bool {
        self.max_residual() <= tol
    }
}

/// Pose solver options.
///
/// ```
/// use rail_square::*;
///
/// let mech = Mechanism::upright(90., 45., 10.).unwrap();
/// let fit = PoseSolver::new().solve(&mech, Pose::default());
/// assert!(fit.cost() < 1e-8);
/// let fit = PoseSolver::new()
///     .strategy(Strategy::AngleSweep)
///     .solve(&mech, Pose::default());
/// assert!(fit.pose.a.abs() < 1e-6);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct PoseSolver {
    /// Solving strategy
    pub strategy: Strategy,
    /// Iteration limit of the least-squares fit
    pub max_iter: usize,
    /// Relative cost reduction tolerance
    pub ftol: f64,
    /// Relative step tolerance
    pub xtol: f64,
    /// Gradient tolerance
    pub gtol: f64,
    /// Number of angle samples of the sweep
    pub res: usize,
}

impl Default for PoseSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSolver {
    /// Default options.
    pub const fn new() -> Self {
        Self {
            strategy: Strategy::LeastSquares,
            max_iter: 1000,
            ftol: 1e-8,
            xtol: 1e-8,
            gtol: 1e-8,
            res: 360,
        }
    }

    impl_opt! {
        /// Set the strategy.
        fn strategy(Strategy)
        /// Set the iteration limit.
        fn max_iter(usize)
        /// Set the relative cost reduction tolerance.
        fn ftol(f64)
        /// Set the relative step tolerance.
        fn xtol(f64)
        /// Set the gradient tolerance.
        fn gtol(f64)
        /// Set the number of angle samples.
        fn res(usize)
    }

    /// Solve the pose from an initial guess.
    ///
    /// The guess is ignored by the angle sweep. The same input always
    /// returns the same fit.
    pub fn solve(&self, mech: &Mechanism, guess: Pose) -> Fit {
        match self.strategy {
            Strategy::LeastSquares => lm::solve(mech, guess, self),
            Strategy::AngleSweep => sweep::solve(mech, self.res),
            Strategy::Hybrid => {
                let cold = sweep::solve(mech, self.res);
                lm::solve(mech, cold.pose, self)
            }
        }
    }
}
