//! Plot a mechanism snapshot or the rail crossings of a point.
//!
//! ```
//! use rail_square::{plot, Session};
//!
//! let snapshot = Session::default().snapshot();
//! let mut buf = String::new();
//! let svg = plot::SVGBackend::with_string(&mut buf, (800, 800));
//! plot::mechanism(svg, &snapshot, &plot::Opt::default()).unwrap();
//! ```
use self::dashed::Dashed;
use crate::{crossing::Frame, Slot, Snapshot};
#[doc(no_inline)]
pub use plotters::{prelude::*, *};
use plotters::style::full_palette::{GREY, LIGHTBLUE};

mod dashed;

/// Result of the drawing functions.
pub type PResult<T, B> = Result<T, DrawingAreaErrorKind<<B as DrawingBackend>::ErrorType>>;
/// The root drawing area.
pub type Canvas<B> = DrawingArea<B, coord::Shift>;
type Chart2d = coord::cartesian::Cartesian2d<RangedF64, RangedF64>;
type RangedF64 = coord::types::RangedCoordf64;

/// Drawing option.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Opt {
    /// Stroke size
    pub stroke: u32,
    /// Font size
    pub font: f64,
    /// Show grid
    pub grid: bool,
    /// Show axis
    pub axis: bool,
    /// Dash length of the rails and links in pixels
    pub dash: u32,
}

impl Default for Opt {
    fn default() -> Self {
        Self { stroke: 3, font: 24., grid: false, axis: true, dash: 10 }
    }
}

impl Opt {
    impl_opt! {
        /// Set the line stroke.
        fn stroke(u32)
        /// Set font size.
        fn font(f64)
        /// Use grid in the plot.
        fn grid(bool)
        /// Show the axis.
        fn axis(bool)
        /// Set the dash length.
        fn dash(u32)
    }

    fn text_style(&self) -> TextStyle<'static> {
        ("sans-serif", self.font).into_font().color(&BLACK)
    }

    fn axis_style(&self) -> TextStyle<'static> {
        ("sans-serif", self.font * 0.7).into_font().color(&BLACK)
    }

    fn chart<'a, B>(
        &self,
        root: &'a Canvas<B>,
        caption: String,
        [x_min, x_max, y_min, y_max]: [f64; 4],
    ) -> PResult<ChartContext<'a, B, Chart2d>, B>
    where
        B: DrawingBackend,
    {
        let mut chart = ChartBuilder::on(root)
            .caption(caption, self.text_style())
            .set_label_area_size(LabelAreaPosition::Left, (8).percent())
            .set_label_area_size(LabelAreaPosition::Bottom, (6).percent())
            .margin((4).percent())
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        let mut mesh = chart.configure_mesh();
        if !self.grid {
            mesh.disable_mesh();
        }
        if !self.axis {
            mesh.disable_axes();
        }
        mesh.label_style(self.axis_style()).draw()?;
        Ok(chart)
    }
}

/// Plot the rails, the carriages, the links and the body.
pub fn mechanism<B, R>(root: R, snapshot: &Snapshot, opt: &Opt) -> PResult<(), B>
where
    B: DrawingBackend,
    Canvas<B>: From<R>,
{
    let root = Canvas::from(root);
    root.fill(&WHITE)?;
    let Snapshot { rails, link, carriages, center, corners, cost, .. } = snapshot;
    let pts = carriages.iter().chain(corners).chain([center]);
    let bound @ [_, _, y_min, y_max] = bounding_box(pts, link * 0.25);
    let caption = format!("Square on rails (L={link:.2}, cost={cost:.3e})");
    let mut chart = opt.chart(&root, caption, bound)?;
    let stroke = opt.stroke;
    let dash = opt.dash;
    // Rails
    let rails = rails
        .iter()
        .map(|&x| Dashed::new([(x, y_min), (x, y_max)], dash, dash, GREY.stroke_width(stroke)));
    chart.draw_series(rails)?;
    // Links
    let links = carriages.iter().zip(corners).map(|(&[x1, y1], &[x2, y2])| {
        Dashed::new([(x1, y1), (x2, y2)], dash, dash / 2, BLACK.stroke_width(stroke))
    });
    chart.draw_series(links)?;
    // Body
    let body = corners.iter().map(|&[x, y]| (x, y)).collect::<Vec<_>>();
    chart.draw_series([Polygon::new(body.clone(), LIGHTBLUE.mix(0.6).filled())])?;
    let outline = body.iter().chain(&body[..1]).copied().collect::<Vec<_>>();
    chart.draw_series([PathElement::new(outline, BLACK.stroke_width(stroke))])?;
    let center = Cross::new((center[0], center[1]), stroke + 4, BLACK.stroke_width(stroke));
    chart.draw_series([center])?;
    // Carriages
    let font = opt.axis_style();
    let dot_size = stroke + 4;
    let cars = Slot::ALL.iter().zip(carriages).map(|(slot, &[x, y])| {
        EmptyElement::at((x, y))
            + Circle::new((0, 0), dot_size, RED.filled())
            + Text::new(slot.name(), (dot_size as i32 + 2, -(dot_size as i32)), font.clone())
    });
    chart.draw_series(cars)?;
    Ok(())
}

/// Plot the frame, the point and its rail crossings.
///
/// The crossings are shown only when the point is in bounds, otherwise the
/// reason is in the caption.
pub fn crossing<B, R>(root: R, frame: &Frame, p: [f64; 2], opt: &Opt) -> PResult<(), B>
where
    B: DrawingBackend,
    Canvas<B>: From<R>,
{
    let root = Canvas::from(root);
    root.fill(&WHITE)?;
    let [hw, hh] = [frame.width * 0.5, frame.height * 0.5];
    let markers = frame.markers(p);
    let caption = match &markers {
        Ok(_) => format!("P = ({:.2}, {:.2})", p[0], p[1]),
        Err(e) => e.to_string(),
    };
    let bound = bounding_box(&[[-hw, -hh], [hw, hh]], hh * 0.1);
    let mut chart = opt.chart(&root, caption, bound)?;
    let stroke = opt.stroke;
    let dash = opt.dash;
    chart.draw_series([Rectangle::new([(-hw, -hh), (hw, hh)], BLACK.stroke_width(stroke))])?;
    let axes = [[(-hw, 0.), (hw, 0.)], [(0., -hh), (0., hh)]];
    let axes = axes.map(|ends| Dashed::new(ends, dash, dash, GREY.stroke_width(stroke)));
    chart.draw_series(axes)?;
    chart.draw_series([Circle::new((0., 0.), stroke + 1, BLACK.filled())])?;
    chart.draw_series([Circle::new((p[0], p[1]), stroke + 4, BLUE.filled())])?;
    if let Ok(markers) = markers {
        let style = RED.stroke_width(stroke);
        let markers = markers.map(|[x, y]| Cross::new((x, y), stroke + 6, style));
        chart.draw_series(markers)?;
    }
    Ok(())
}

/// Get the 1:1 bounding box of the points with a margin.
pub fn bounding_box<'a, I>(pts: I, margin: f64) -> [f64; 4]
where
    I: IntoIterator<Item = &'a [f64; 2]>,
{
    let mut b = [f64::INFINITY, -f64::INFINITY, f64::INFINITY, -f64::INFINITY];
    for &[x, y] in pts {
        b[0] = b[0].min(x);
        b[1] = b[1].max(x);
        b[2] = b[2].min(y);
        b[3] = b[3].max(y);
    }
    let [cx, cy] = [(b[0] + b[1]) * 0.5, (b[2] + b[3]) * 0.5];
    let r = (b[1] - b[0]).max(b[3] - b[2]) * 0.5 + margin;
    [cx - r, cx + r, cy - r, cy + r]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Session;

    #[test]
    fn square_bound() {
        let b = bounding_box(&[[-1., -3.], [1., 3.]], 1.);
        assert_eq!(b, [-4., 4., -4., 4.]);
    }

    #[test]
    fn svg_output() {
        let snapshot = Session::default().snapshot();
        let mut buf = String::new();
        let svg = SVGBackend::with_string(&mut buf, (400, 400));
        mechanism(svg, &snapshot, &Opt::default()).unwrap();
        assert!(buf.contains("CAR1"));
        let frame = Frame::default();
        for p in [[10., 10.], [0., 0.]] {
            let mut buf = String::new();
            let svg = SVGBackend::with_string(&mut buf, (400, 400));
            crossing(svg, &frame, p, &Opt::default().grid(true)).unwrap();
            assert!(buf.starts_with("<svg"));
        }
    }
}
