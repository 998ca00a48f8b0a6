use super::{logger::Logger, AnyResult, SeedArg};
use crate::io::{dump_seed, Seed};
use rail_square::{plot, Mechanism, PoseSolver, Snapshot, State};
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub(super) struct Solve {
    #[clap(flatten)]
    seed: SeedArg,
    /// Plot the solved mechanism to an SVG file
    #[clap(long)]
    svg: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct Upright {
    /// Distance between the rails
    #[clap(long, default_value_t = 90.)]
    frame: f64,
    /// Link length
    #[clap(long, default_value_t = 45.)]
    link: f64,
    /// Side length of the square
    #[clap(long, default_value_t = 10.)]
    side: f64,
}

pub(super) fn solve(Solve { seed, svg }: Solve) -> AnyResult {
    let Seed { mech, solver } = seed.load()?;
    println!("strategy={}, max_iter={}", solver.strategy.name(), solver.max_iter);
    let state = State::solve(mech, &solver);
    let snapshot = state.snapshot();
    let mut stdout = std::io::stdout();
    let mut logger = Logger::new(&mut stdout).precision(6);
    logger.section("fit")?;
    logger.log(&state.fit)?;
    logger.section("snapshot")?;
    logger.log(&snapshot)?;
    if !state.fit.converged {
        println!("\nwarning: the iteration limit is reached");
    }
    if let Some(path) = svg {
        plot_svg(&path, &snapshot)?;
        println!("\nplot saved to {}", path.display());
    }
    Ok(())
}

pub(super) fn upright(Upright { frame, link, side }: Upright) -> AnyResult {
    let mech = Mechanism::upright(frame, link, side).ok_or("the links can not reach the rails")?;
    println!("{}", dump_seed(&Seed { mech, solver: PoseSolver::new() })?);
    Ok(())
}

pub(super) fn plot_svg(path: &Path, snapshot: &Snapshot) -> AnyResult {
    let svg = plot::SVGBackend::new(path, (800, 800));
    plot::mechanism(svg, snapshot, &plot::Opt::default())?;
    Ok(())
}
