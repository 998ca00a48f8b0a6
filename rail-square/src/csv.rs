//! Waypoint lists and crossing traces in CSV format.
//!
//! Rows have no header, lines starting with `#` are comments.
//!
//! ```
//! use rail_square::csv::*;
//!
//! let pts = parse_waypoints("# x, y\n-20, -40\n20, 40\n").unwrap();
//! assert_eq!(pts, [[-20., -40.], [20., 40.]]);
//! ```
pub use csv::Error;
use crate::crossing::Sample;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};

/// Parse headerless CSV rows from string.
pub fn parse_csv<D>(s: &str) -> Result<Vec<D>, Error>
where
    D: DeserializeOwned,
{
    ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(s.as_bytes())
        .deserialize()
        .collect()
}

/// Parse `x, y` waypoints from string.
pub fn parse_waypoints(s: &str) -> Result<Vec<[f64; 2]>, Error> {
    parse_csv(s)
}

/// Dump rows to CSV string, without header.
pub fn dump_csv<'a, I, S>(rows: I) -> Result<String, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = &'a S>,
    S: Serialize + 'a,
{
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    rows.into_iter().try_for_each(|row| w.serialize(row))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}

/// Dump trace samples to CSV string, with a commented header.
pub fn dump_samples(samples: &[Sample]) -> Result<String, Box<dyn std::error::Error>> {
    let mut s = String::from("# frame,x,y,y1,y2,y3,y4\n");
    s += &dump_csv(samples)?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossing::{Frame, Path};

    #[test]
    fn samples_read_back() {
        let frame = Frame { link: 110., ..Frame::default() };
        let path = Path::new(frame.tour(10.)).unwrap();
        let trace = frame.trace(&path, 100);
        let s = dump_samples(&trace.samples).unwrap();
        assert!(s.starts_with('#'));
        let rows = parse_csv::<Sample>(&s).unwrap();
        assert_eq!(rows.len(), trace.samples.len());
        assert_eq!(rows[0].frame, 0);
    }

    #[test]
    fn bad_row() {
        assert!(parse_waypoints("1, 2\n3\n").is_err());
        assert!(parse_waypoints("").unwrap().is_empty());
    }
}
