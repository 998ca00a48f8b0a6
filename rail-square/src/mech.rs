//! Mechanism model: two rails, four carriages and the square body.
pub use self::slot::*;
use nalgebra as na;

mod slot;

/// Rail side of a carriage.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Side {
    /// Left rail
    Left,
    /// Right rail
    Right,
}

impl Side {
    /// Index of the rail in [`Mechanism::rails`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Get the lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pose of the body, the center position and the rotation angle in radians.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pose {
    /// X coordinate of the center
    pub cx: f64,
    /// Y coordinate of the center
    pub cy: f64,
    /// Rotation angle
    pub a: f64,
}

impl Pose {
    /// Create a new pose.
    pub const fn new(cx: f64, cy: f64, a: f64) -> Self {
        Self { cx, cy, a }
    }

    /// Center position.
    pub const fn center(&self) -> [f64; 2] {
        [self.cx, self.cy]
    }

    /// Wrap the angle into `(-π, π]`.
    pub fn normalized(self) -> Self {
        let a = self.a.sin().atan2(self.a.cos());
        Self { a, ..self }
    }

    /// Rigid transformation of this pose.
    pub fn isometry(&self) -> na::Isometry2<f64> {
        na::Isometry2::new(na::Vector2::new(self.cx, self.cy), self.a)
    }

    /// Transform a local offset into the world frame.
    pub fn apply(&self, offset: [f64; 2]) -> [f64; 2] {
        let p = self.isometry() * na::Point2::from(offset);
        [p.x, p.y]
    }

    pub(crate) fn to_vector(self) -> na::Vector3<f64> {
        na::Vector3::new(self.cx, self.cy, self.a)
    }

    pub(crate) fn from_vector(v: &na::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A carriage, bound to a slot and placed on the rail of that slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Carriage {
    /// Slot of the carriage
    pub slot: Slot,
    /// Position, the x coordinate is the rail position
    pub pos: [f64; 2],
}

impl Carriage {
    /// Rail side of the carriage.
    pub const fn side(&self) -> Side {
        self.slot.side()
    }
}

/// Seed configuration and carriage state of the mechanism.
///
/// Corner `i` of the body is linked to the carriage of slot `i`.
///
/// # Parameters
///
/// + Rail positions `rails`
/// + Carriage heights `ys`
/// + Link length `link`
/// + Local corner offsets `body`
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Mechanism {
    /// X positions of the left and right rails
    pub rails: [f64; 2],
    /// Y positions of the carriages, in slot order
    pub ys: [f64; 4],
    /// Length of every link
    pub link: f64,
    /// Corner offsets of the body relative to its center, in slot order
    pub body: [[f64; 2]; 4],
}

impl Default for Mechanism {
    fn default() -> Self {
        Self::example()
    }
}

impl Mechanism {
    /// The reference configuration of the interactive driver.
    ///
    /// Rails at `±45`, links of `45`, a square of side `10`.
    pub fn example() -> Self {
        Self::square(90., 45., 10., [35., -35., -35., 35.])
    }

    /// Create a mechanism with rails at `±frame / 2` and a square body.
    pub fn square(frame: f64, link: f64, side: f64, ys: [f64; 4]) -> Self {
        let half = frame * 0.5;
        Self {
            rails: [-half, half],
            ys,
            link,
            body: square_body(side),
        }
    }

    /// An exactly fitted seed, the square sits upright at the origin.
    ///
    /// Each carriage is placed at the link length from its corner, above the
    /// top corners and below the bottom corners. Return [`None`] if a link
    /// can not reach its rail.
    ///
    /// ```
    /// use rail_square::Mechanism;
    ///
    /// let mech = Mechanism::upright(90., 45., 10.).unwrap();
    /// assert!(mech.cost(&Default::default()) < 1e-12);
    /// assert!(Mechanism::upright(90., 20., 10.).is_none());
    /// ```
    pub fn upright(frame: f64, link: f64, side: f64) -> Option<Self> {
        let mut mech = Self::square(frame, link, side, [0.; 4]);
        for slot in Slot::ALL {
            let [x, y] = mech.body[slot.index()];
            let dx = mech.rails[slot.side().index()] - x;
            let h2 = link * link - dx * dx;
            if h2 < 0. {
                return None;
            }
            let h = h2.sqrt();
            mech.ys[slot.index()] = if slot.is_top() { y + h } else { y - h };
        }
        Some(mech)
    }

    /// Get the carriage of a slot.
    pub fn carriage(&self, slot: Slot) -> Carriage {
        let x = self.rails[slot.side().index()];
        Carriage { slot, pos: [x, self.ys[slot.index()]] }
    }

    /// All carriages in slot order.
    pub fn carriages(&self) -> [Carriage; 4] {
        Slot::ALL.map(|slot| self.carriage(slot))
    }

    /// Carriage positions in slot order.
    pub fn positions(&self) -> [[f64; 2]; 4] {
        Slot::ALL.map(|slot| self.carriage(slot).pos)
    }

    /// Mean position of the carriages.
    pub fn centroid(&self) -> [f64; 2] {
        let [x, y] = self
            .positions()
            .iter()
            .fold([0.; 2], |[x, y], [px, py]| [x + px, y + py]);
        [x * 0.25, y * 0.25]
    }

    /// World positions of the body corners at a pose.
    pub fn corners(&self, pose: &Pose) -> [[f64; 2]; 4] {
        self.body.map(|offset| pose.apply(offset))
    }

    /// Signed link residuals at a pose, the corner distances minus the link
    /// length.
    pub fn residuals(&self, pose: &Pose) -> [f64; 4] {
        let corners = self.corners(pose);
        let pos = self.positions();
        std::array::from_fn(|i| {
            let [x, y] = corners[i];
            let [px, py] = pos[i];
            (x - px).hypot(y - py) - self.link
        })
    }

    /// Sum of squared residuals at a pose.
    pub fn cost(&self, pose: &Pose) -> f64 {
        self.residuals(pose).iter().map(|r| r * r).sum()
    }
}

/// Corner offsets of a centered square, in slot order.
///
/// Top-left, bottom-left, bottom-right, top-right.
pub fn square_body(side: f64) -> [[f64; 2]; 4] {
    let h = side * 0.5;
    [[-h, h], [-h, -h], [h, -h], [h, h]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn carriages_on_rails() {
        let mech = Mechanism::example();
        let pos = mech.positions();
        assert_eq!(pos, [[-45., 35.], [-45., -35.], [45., -35.], [45., 35.]]);
        for c in mech.carriages() {
            assert_eq!(c.pos[0], mech.rails[c.side().index()]);
        }
        assert_eq!(mech.centroid(), [0., 0.]);
    }

    #[test]
    fn corners_follow_pose() {
        let mech = Mechanism::example();
        let corners = mech.corners(&Pose::new(1., 2., FRAC_PI_2));
        // Top-left offset (-5, 5) turns into (-5, -5)
        assert_abs_diff_eq!(corners[0][0], 1. - 5., epsilon = 1e-12);
        assert_abs_diff_eq!(corners[0][1], 2. - 5., epsilon = 1e-12);
        // Shape never changes
        let [a, b] = [corners[0], corners[2]];
        assert_abs_diff_eq!((a[0] - b[0]).hypot(a[1] - b[1]), 200f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn reference_distances() {
        let mech = Mechanism::example();
        for r in mech.residuals(&Pose::default()) {
            assert_abs_diff_eq!(r, 5., epsilon = 1e-12);
        }
    }

    #[test]
    fn upright_seed() {
        let mech = Mechanism::upright(90., 45., 10.).unwrap();
        let y = 5. + 425f64.sqrt();
        assert_abs_diff_eq!(mech.ys[0], y, epsilon = 1e-12);
        assert_abs_diff_eq!(mech.ys[1], -y, epsilon = 1e-12);
        assert_abs_diff_eq!(mech.ys[2], -y, epsilon = 1e-12);
        assert_abs_diff_eq!(mech.ys[3], y, epsilon = 1e-12);
    }

    #[test]
    fn normalize_angle() {
        let pose = Pose::new(0., 0., 3. * std::f64::consts::PI + 0.5).normalized();
        assert_abs_diff_eq!(pose.a, 0.5 - std::f64::consts::PI, epsilon = 1e-12);
    }
}
