//! Interactive session over a single mechanism state.
use crate::{displace, Fit, InvalidSlot, Mechanism, Pose, PoseSolver, Slot};

/// Phase of the update cycle.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Phase {
    /// Waiting for a request, the state is safe to read
    #[default]
    Idle,
    /// Carriage heights are being changed
    Updating,
    /// The pose is being solved
    Solving,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Updating => write!(f, "updating"),
            Self::Solving => write!(f, "solving"),
        }
    }
}

/// Mechanism state, the carriages and the current fit of the body.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Carriage state and body shape
    pub mech: Mechanism,
    /// Current fit of the body
    pub fit: Fit,
}

impl State {
    /// Solve the pose of a mechanism from the default guess.
    pub fn solve(mech: Mechanism, solver: &PoseSolver) -> Self {
        let fit = solver.solve(&mech, Pose::default());
        Self { mech, fit }
    }

    /// World positions of the body corners.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        self.mech.corners(&self.fit.pose)
    }

    /// Take a read-only copy for renderers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rails: self.mech.rails,
            link: self.mech.link,
            carriages: self.mech.positions(),
            center: self.fit.pose.center(),
            angle: self.fit.pose.a,
            corners: self.corners(),
            residuals: self.fit.residuals,
            cost: self.fit.cost(),
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// X positions of the rails
    pub rails: [f64; 2],
    /// Link length
    pub link: f64,
    /// Carriage positions in slot order
    pub carriages: [[f64; 2]; 4],
    /// Body center
    pub center: [f64; 2],
    /// Body angle
    pub angle: f64,
    /// Body corners in slot order
    pub corners: [[f64; 2]; 4],
    /// Link residuals in slot order
    pub residuals: [f64; 4],
    /// Sum of squared residuals
    pub cost: f64,
}

/// Owner of the mechanism state.
///
/// Every request runs the whole cycle, updating the carriages then solving
/// the pose, before it returns. The state is read between requests only.
///
/// ```
/// use rail_square::*;
///
/// let mut session = Session::new(Mechanism::default(), PoseSolver::new());
/// assert!(session.displace(4, 1.).is_err());
/// let state = session.displace(3, -1.).unwrap();
/// assert_eq!(state.mech.ys, [35.5, -34.5, -35., 34.]);
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    state: State,
    solver: PoseSolver,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mechanism::default(), PoseSolver::default())
    }
}

impl Session {
    /// Start a session from a seed, the pose is solved once.
    pub fn new(seed: Mechanism, solver: PoseSolver) -> Self {
        let state = State::solve(seed, &solver);
        Self { state, solver, phase: Phase::Idle }
    }

    /// Current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The solver options.
    pub fn solver(&self) -> &PoseSolver {
        &self.solver
    }

    /// Take a read-only copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Move a carriage by its index, apply the update rule and solve again.
    ///
    /// An invalid index leaves the state untouched.
    pub fn displace(&mut self, index: isize, delta: f64) -> Result<&State, InvalidSlot> {
        let slot = Slot::try_from(index)?;
        Ok(self.displace_slot(slot, delta))
    }

    /// Move a carriage, apply the update rule and solve again.
    pub fn displace_slot(&mut self, slot: Slot, delta: f64) -> &State {
        self.phase = Phase::Updating;
        self.state.mech.ys = displace(self.state.mech.ys, slot, delta);
        self.resolve()
    }

    /// Solve the pose again without changing the carriages.
    pub fn resolve(&mut self) -> &State {
        self.phase = Phase::Solving;
        self.state.fit = self.solver.solve(&self.state.mech, Pose::default());
        self.phase = Phase::Idle;
        &self.state
    }

    /// Take the state out of the session.
    pub fn into_state(self) -> State {
        self.state
    }
}
