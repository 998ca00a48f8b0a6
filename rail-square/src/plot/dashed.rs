use plotters::element::{Drawable, PointCollection};
use plotters::style::ShapeStyle;
use plotters_backend::{BackendCoord, DrawingBackend, DrawingErrorKind};

/// A straight dashed segment, the pattern is measured in pixels.
pub(crate) struct Dashed<C> {
    ends: [C; 2],
    dash: u32,
    gap: u32,
    style: ShapeStyle,
}

impl<C> Dashed<C> {
    pub(crate) fn new<S>(ends: [C; 2], dash: u32, gap: u32, style: S) -> Self
    where
        S: Into<ShapeStyle>,
    {
        Self { ends, dash, gap, style: style.into() }
    }
}

impl<'a, C> PointCollection<'a, C> for &'a Dashed<C> {
    type Point = &'a C;
    type IntoIter = &'a [C; 2];

    fn point_iter(self) -> Self::IntoIter {
        &self.ends
    }
}

impl<C, DB: DrawingBackend> Drawable<DB> for Dashed<C> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        mut pos: I,
        backend: &mut DB,
        _: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let (Some((x0, y0)), Some((x1, y1))) = (pos.next(), pos.next()) else {
            return Ok(());
        };
        let [dx, dy] = [(x1 - x0) as f64, (y1 - y0) as f64];
        let len = dx.hypot(dy);
        if len < 1. {
            return Ok(());
        }
        let at = |s: f64| {
            let k = s.min(len) / len;
            let x = x0 as f64 + dx * k;
            let y = y0 as f64 + dy * k;
            (x.round() as i32, y.round() as i32)
        };
        let dash = self.dash.max(1) as f64;
        let period = dash + self.gap as f64;
        let mut s = 0.;
        while s < len {
            backend.draw_line(at(s), at(s + dash), &self.style)?;
            s += period;
        }
        Ok(())
    }
}
