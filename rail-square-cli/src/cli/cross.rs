use super::{logger::Logger, AnyResult};
use crate::io::load_waypoints;
use indicatif::{ProgressBar, ProgressStyle};
use rail_square::{
    crossing::{Frame, Path},
    csv::dump_samples,
    plot,
};
use std::path::PathBuf;

#[derive(clap::Args)]
struct FrameArgs {
    /// Frame width
    #[clap(long, default_value_t = Frame::default().width)]
    width: f64,
    /// Frame height
    #[clap(long, default_value_t = Frame::default().height)]
    height: f64,
    /// Link length
    #[clap(long, default_value_t = Frame::default().link)]
    link: f64,
    /// Rollers on a rail touch below this total height
    #[clap(long, default_value_t = Frame::default().gap)]
    gap: f64,
}

impl From<FrameArgs> for Frame {
    fn from(FrameArgs { width, height, link, gap }: FrameArgs) -> Self {
        Self { width, height, link, gap }
    }
}

#[derive(clap::Args)]
pub(super) struct Cross {
    /// X of the point
    #[clap(allow_negative_numbers = true)]
    x: f64,
    /// Y of the point
    #[clap(allow_negative_numbers = true)]
    y: f64,
    #[clap(flatten)]
    frame: FrameArgs,
    /// Plot the frame and the crossings to an SVG file
    #[clap(long)]
    svg: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct Trace {
    /// Waypoints in CSV format, default to a tour of the frame
    waypoints: Option<PathBuf>,
    #[clap(flatten)]
    frame: FrameArgs,
    /// Number of frames along the path
    #[clap(long, default_value_t = 500)]
    frames: usize,
    /// Dump the in-bounds frames to a CSV file
    #[clap(long)]
    csv: Option<PathBuf>,
}

pub(super) fn cross(Cross { x, y, frame, svg }: Cross) -> AnyResult {
    let frame = Frame::from(frame);
    let mut stdout = std::io::stdout();
    let mut logger = Logger::new(&mut stdout);
    logger.section("distances")?;
    logger.log(frame.distances([x, y]))?;
    match frame.markers([x, y]) {
        Ok(markers) => {
            logger.section("markers")?;
            logger.log(markers)?;
        }
        Err(e) => println!("\n{e}"),
    }
    if let Some(path) = svg {
        let svg = plot::SVGBackend::new(&path, (800, 800));
        plot::crossing(svg, &frame, [x, y], &plot::Opt::default())?;
        println!("\nplot saved to {}", path.display());
    }
    Ok(())
}

pub(super) fn trace(Trace { waypoints, frame, frames, csv }: Trace) -> AnyResult {
    let frame = Frame::from(frame);
    let pts = load_waypoints(waypoints.as_deref(), &frame)?;
    let path = Path::new(pts).ok_or("no waypoint")?;
    println!("waypoints={}, length={:.4}", path.waypoints().len(), path.length());
    const STYLE: &str = "{elapsed_precise} {wide_bar} {pos}/{len} {msg}";
    let pb = ProgressBar::new(frames as u64);
    pb.set_style(ProgressStyle::with_template(STYLE)?);
    let trace = frame.trace_by(&path, frames, |i| pb.set_position(i as u64 + 1));
    match &trace.stop {
        Some(stop) => pb.abandon_with_message(format!("stopped at frame {}", stop.frame)),
        None => pb.finish_with_message("done"),
    }
    if let Some(stop) = &trace.stop {
        let [x, y] = stop.pos;
        println!("frame={}, pos=[{x:.4}, {y:.4}], {}", stop.frame, stop.reason);
    }
    println!("in-bounds frames={}", trace.samples.len());
    if let Some(path) = csv {
        std::fs::write(&path, dump_samples(&trace.samples)?)?;
        println!("samples saved to {}", path.display());
    }
    Ok(())
}
