use rail_square::{crossing::Frame, Mechanism, PoseSolver};
use std::path::Path;

/// Seed of a session, the mechanism and the solver options.
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)]
pub(crate) struct Seed {
    pub(crate) mech: Mechanism,
    pub(crate) solver: PoseSolver,
}

#[derive(Debug)]
pub(crate) enum LoadErr {
    // Reading file error
    Io(std::io::Error),
    // Deserialization error
    Ron(ron::error::SpannedError),
    // Deserialization error
    Csv(rail_square::csv::Error),
    // No waypoint in the file
    Empty,
}

impl std::fmt::Display for LoadErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "reading file error: {e}"),
            Self::Ron(e) => write!(f, "ron deserialization error: {e}"),
            Self::Csv(e) => write!(f, "csv deserialization error: {e}"),
            Self::Empty => write!(f, "no waypoint"),
        }
    }
}

impl std::error::Error for LoadErr {}

/// Load a seed, default to the reference configuration.
pub(crate) fn load_seed(path: Option<&Path>) -> Result<Seed, LoadErr> {
    let Some(path) = path else {
        return Ok(Seed::default());
    };
    let s = std::fs::read_to_string(path).map_err(LoadErr::Io)?;
    ron::from_str(&s).map_err(LoadErr::Ron)
}

/// Load waypoints from a CSV file, default to the tour of the frame.
pub(crate) fn load_waypoints(path: Option<&Path>, frame: &Frame) -> Result<Vec<[f64; 2]>, LoadErr> {
    let Some(path) = path else {
        return Ok(frame.tour(10.));
    };
    let s = std::fs::read_to_string(path).map_err(LoadErr::Io)?;
    let pts = rail_square::csv::parse_waypoints(&s).map_err(LoadErr::Csv)?;
    if pts.is_empty() {
        Err(LoadErr::Empty)
    } else {
        Ok(pts)
    }
}

pub(crate) fn dump_seed(seed: &Seed) -> Result<String, ron::Error> {
    let config = ron::ser::PrettyConfig::new().struct_names(true);
    ron::ser::to_string_pretty(seed, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_round_trip() {
        let seed = Seed {
            mech: Mechanism::upright(90., 45., 10.).unwrap(),
            solver: PoseSolver::new().max_iter(20),
        };
        let s = dump_seed(&seed).unwrap();
        let back = ron::from_str::<Seed>(&s).unwrap();
        assert_eq!(back.mech, seed.mech);
        assert_eq!(back.solver, seed.solver);
    }

    #[test]
    fn partial_seed() {
        let seed = ron::from_str::<Seed>("(mech: (link: 50.0))").unwrap();
        assert_eq!(seed.mech.link, 50.);
        assert_eq!(seed.mech.ys, Mechanism::default().ys);
        assert_eq!(seed.solver, PoseSolver::default());
    }
}
