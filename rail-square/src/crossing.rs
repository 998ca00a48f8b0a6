//! Rail crossings of a point tied to the frame corners.
//!
//! A point `P` inside a rectangular frame is linked to the four frame corners
//! by links of the same length. The crossing markers are the heights on the
//! side rails derived from the corner distances, which must stay inside the
//! rails and apart from each other.
//!
//! ```
//! use rail_square::crossing::Frame;
//!
//! let frame = Frame::default();
//! let [y1, y2, y3, y4] = frame.crossings([10., 10.]).unwrap();
//! assert!(y1 > y2 && y4 > y3);
//! ```
use crate::Side;

/// The frame holding the rails.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Width, the rails are the vertical sides
    pub width: f64,
    /// Height
    pub height: f64,
    /// Link length
    pub link: f64,
    /// The two crossings of a rail touch below this total height
    pub gap: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self { width: 60., height: 100., link: 100., gap: 10. }
    }
}

/// Reason of an out-of-bounds point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBounds {
    /// A corner is out of reach of the link
    LinkTooShort,
    /// A crossing is beyond the end of its rail
    RailLimit,
    /// The two crossings on a rail are too close
    RollersTouch(Side),
}

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::LinkTooShort => write!(f, "out of bounds, the link is too short"),
            Self::RailLimit => write!(f, "out of bounds, the rail limit is reached"),
            Self::RollersTouch(side) => {
                write!(f, "out of bounds, the rollers touch on the {side} rail")
            }
        }
    }
}

impl std::error::Error for OutOfBounds {}

impl Frame {
    /// X positions of the left and right rails.
    pub fn rails(&self) -> [f64; 2] {
        let half = self.width * 0.5;
        [-half, half]
    }

    /// Distances from the point to the corners.
    ///
    /// Top-left, bottom-left, bottom-right, top-right.
    pub fn distances(&self, [x, y]: [f64; 2]) -> [f64; 4] {
        let [hw, hh] = [self.width * 0.5, self.height * 0.5];
        let [xl, xr] = [hw + x, hw - x];
        let [yt, yb] = [hh - y, hh + y];
        [xl.hypot(yt), xl.hypot(yb), xr.hypot(yb), xr.hypot(yt)]
    }

    /// Crossing heights `[y1, y2, y3, y4]`.
    ///
    /// The first two are on the left rail and the others are on the right
    /// rail.
    pub fn crossings(&self, p: [f64; 2]) -> Result<[f64; 4], OutOfBounds> {
        let [d1, d2, d3, d4] = self.distances(p);
        let l = self.link;
        if [d1, d2, d3, d4].iter().any(|d| *d >= l) {
            return Err(OutOfBounds::LinkTooShort);
        }
        let hh = self.height * 0.5;
        let ys = [hh - (l - d1), (l - d2) - hh, (l - d3) - hh, hh - (l - d4)];
        if ys.iter().any(|y| y.abs() > hh) {
            return Err(OutOfBounds::RailLimit);
        }
        let [y1, y2, y3, y4] = ys;
        if y1.abs() + y2.abs() <= self.gap {
            return Err(OutOfBounds::RollersTouch(Side::Left));
        }
        if y3.abs() + y4.abs() <= self.gap {
            return Err(OutOfBounds::RollersTouch(Side::Right));
        }
        Ok(ys)
    }

    /// Crossing markers as points on the rails.
    pub fn markers(&self, p: [f64; 2]) -> Result<[[f64; 2]; 4], OutOfBounds> {
        let [y1, y2, y3, y4] = self.crossings(p)?;
        let [left, right] = self.rails();
        Ok([[left, y1], [left, y2], [right, y3], [right, y4]])
    }

    /// The default tour, inset from the frame edges.
    ///
    /// Bottom-left, top-right, origin, top-left, bottom-right.
    pub fn tour(&self, inset: f64) -> Vec<[f64; 2]> {
        let [hw, hh] = [self.width * 0.5 - inset, self.height * 0.5 - inset];
        vec![[-hw, -hh], [hw, hh], [0., 0.], [-hw, hh], [hw, -hh]]
    }

    /// Walk a path and stop at the first out-of-bounds frame.
    pub fn trace(&self, path: &Path, frames: usize) -> Trace {
        self.trace_by(path, frames, |_| ())
    }

    /// Walk a path with a callback of the frame index.
    pub fn trace_by<C>(&self, path: &Path, frames: usize, mut callback: C) -> Trace
    where
        C: FnMut(usize),
    {
        let mut samples = Vec::with_capacity(frames);
        for (frame, pos @ [x, y]) in path.sample(frames).enumerate() {
            callback(frame);
            match self.crossings(pos) {
                Ok([y1, y2, y3, y4]) => {
                    samples.push(Sample { frame, x, y, y1, y2, y3, y4 });
                }
                Err(reason) => {
                    let stop = Some(Stop { frame, pos, reason });
                    return Trace { samples, stop };
                }
            }
        }
        Trace { samples, stop: None }
    }
}

/// A polyline path, sampled uniformly by arc length.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pts: Vec<[f64; 2]>,
    // Accumulated length at each point
    acc: Vec<f64>,
}

impl Path {
    /// Create a path from waypoints, return [`None`] if there is no waypoint.
    pub fn new(pts: Vec<[f64; 2]>) -> Option<Self> {
        if pts.is_empty() {
            return None;
        }
        let mut acc = Vec::with_capacity(pts.len());
        acc.push(0.);
        for w in pts.windows(2) {
            let [[x1, y1], [x2, y2]] = [w[0], w[1]];
            let last = acc[acc.len() - 1];
            acc.push(last + (x2 - x1).hypot(y2 - y1));
        }
        Some(Self { pts, acc })
    }

    /// Waypoints of the path.
    pub fn waypoints(&self) -> &[[f64; 2]] {
        &self.pts
    }

    /// Total length.
    pub fn length(&self) -> f64 {
        self.acc[self.acc.len() - 1]
    }

    /// Position at the normalized arc length `t` in `[0, 1]`.
    pub fn at(&self, t: f64) -> [f64; 2] {
        let s = t.clamp(0., 1.) * self.length();
        // First segment whose end is past the arc length
        let i = self.acc.partition_point(|&a| a < s).clamp(1, self.pts.len());
        if i == self.pts.len() {
            return self.pts[i - 1];
        }
        let [x1, y1] = self.pts[i - 1];
        let [x2, y2] = self.pts[i];
        let seg = self.acc[i] - self.acc[i - 1];
        let k = if seg > 0. { (s - self.acc[i - 1]) / seg } else { 0. };
        [x1 + k * (x2 - x1), y1 + k * (y2 - y1)]
    }

    /// Sample `n` positions, including both ends.
    pub fn sample(&self, n: usize) -> impl Iterator<Item = [f64; 2]> + '_ {
        let den = n.saturating_sub(1).max(1) as f64;
        (0..n).map(move |i| self.at(i as f64 / den))
    }
}

/// In-bounds frame of a trace.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Frame index
    pub frame: usize,
    /// X of the point
    pub x: f64,
    /// Y of the point
    pub y: f64,
    /// Top-left crossing
    pub y1: f64,
    /// Bottom-left crossing
    pub y2: f64,
    /// Bottom-right crossing
    pub y3: f64,
    /// Top-right crossing
    pub y4: f64,
}

/// The first out-of-bounds frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    /// Frame index
    pub frame: usize,
    /// Position of the point
    pub pos: [f64; 2],
    /// Reason
    pub reason: OutOfBounds,
}

/// Result of a path traversal.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Trace {
    /// In-bounds frames before the stop
    pub samples: Vec<Sample>,
    /// The stop, if any
    pub stop: Option<Stop>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reference_point() {
        let frame = Frame::default();
        let [y1, y2, y3, y4] = frame.crossings([10., 10.]).unwrap();
        // d1 = |(40, 40)|, d2 = |(40, 60)|, d3 = |(20, 60)|, d4 = |(20, 40)|
        assert_abs_diff_eq!(y1, 50. - (100. - 3200f64.sqrt()), epsilon = 1e-12);
        assert_abs_diff_eq!(y2, (100. - 5200f64.sqrt()) - 50., epsilon = 1e-12);
        assert_abs_diff_eq!(y3, (100. - 4000f64.sqrt()) - 50., epsilon = 1e-12);
        assert_abs_diff_eq!(y4, 50. - (100. - 2000f64.sqrt()), epsilon = 1e-12);
        let markers = frame.markers([10., 10.]).unwrap();
        assert_eq!(markers[0], [-30., y1]);
        assert_eq!(markers[3], [30., y4]);
    }

    #[test]
    fn out_of_bounds() {
        let frame = Frame::default();
        let short = Frame { link: 50., ..frame };
        assert_eq!(short.crossings([0., 0.]), Err(OutOfBounds::LinkTooShort));
        // At the origin every crossing is 108.3 - L from the center
        assert!(frame.crossings([0., 0.]).is_ok());
        let touch = Frame { link: 105., ..frame };
        assert_eq!(touch.crossings([0., 0.]), Err(OutOfBounds::RollersTouch(Side::Left)));
        let apart = Frame { gap: 0., ..touch };
        assert!(apart.crossings([0., 0.]).is_ok());
        let long = Frame { link: 200., ..frame };
        assert_eq!(long.crossings([10., 10.]), Err(OutOfBounds::RailLimit));
    }

    #[test]
    fn path_by_arc_length() {
        let path = Path::new(vec![[0., 0.], [3., 0.], [3., 4.]]).unwrap();
        assert_eq!(path.length(), 7.);
        assert_eq!(path.at(0.), [0., 0.]);
        assert_eq!(path.at(1.), [3., 4.]);
        let [x, y] = path.at(5. / 7.);
        assert_abs_diff_eq!(x, 3.);
        assert_abs_diff_eq!(y, 2., epsilon = 1e-12);
        let pts = path.sample(8).collect::<Vec<_>>();
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[7], [3., 4.]);
        assert!(Path::new(Vec::new()).is_none());
        let dot = Path::new(vec![[1., 2.]]).unwrap();
        assert_eq!(dot.sample(3).collect::<Vec<_>>(), vec![[1., 2.]; 3]);
    }

    #[test]
    fn trace_stops_at_first_violation() {
        let frame = Frame::default();
        let path = Path::new(frame.tour(10.)).unwrap();
        // The first corner of the tour is out of reach
        let trace = frame.trace(&path, 500);
        assert!(trace.samples.is_empty());
        assert_eq!(trace.stop.unwrap().reason, OutOfBounds::LinkTooShort);
        // The rollers on the right rail touch on the way to the origin
        let frame = Frame { link: 110., ..frame };
        let trace = frame.trace(&path, 500);
        let stop = trace.stop.unwrap();
        assert_eq!(stop.frame, 71);
        assert_eq!(stop.reason, OutOfBounds::RollersTouch(Side::Right));
        assert_eq!(trace.samples.len(), stop.frame);
        assert!(frame.crossings(stop.pos).is_err());
        for s in &trace.samples {
            assert!(frame.crossings([s.x, s.y]).is_ok());
        }
        let mut count = 0;
        frame.trace_by(&path, 500, |_| count += 1);
        assert_eq!(count, stop.frame + 1);
    }
}
