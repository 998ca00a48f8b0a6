use std::path::PathBuf;

mod cross;
mod drive;
mod logger;
mod solve;

pub(crate) type AnyResult<T = ()> = Result<T, Box<dyn std::error::Error>>;
const APP_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, about)]
pub(crate) struct Entry {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Solve the pose of a seed once
    Solve(solve::Solve),
    /// Move the carriages with keys read from stdin
    Drive(drive::Drive),
    /// Rail crossings of a point in the frame
    Cross(cross::Cross),
    /// Rail crossings along a path of waypoints
    Trace(cross::Trace),
    /// Print the upright seed in RON format
    Upright(solve::Upright),
}

/// Seed file argument.
#[derive(clap::Args)]
struct SeedArg {
    /// Seed file in RON format, default to the reference configuration
    seed: Option<PathBuf>,
    /// Override the solving strategy of the seed
    #[clap(long, value_enum)]
    strategy: Option<rail_square::Strategy>,
}

impl SeedArg {
    fn load(self) -> AnyResult<crate::io::Seed> {
        let mut seed = crate::io::load_seed(self.seed.as_deref())?;
        if let Some(strategy) = self.strategy {
            seed.solver.strategy = strategy;
        }
        Ok(seed)
    }
}

impl Entry {
    pub(crate) fn main() {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        register_panic_hook();
        let res = match entry.cmd {
            Cmd::Solve(solve) => solve::solve(solve),
            Cmd::Drive(drive) => drive::drive(drive),
            Cmd::Cross(cross) => cross::cross(cross),
            Cmd::Trace(trace) => cross::trace(trace),
            Cmd::Upright(upright) => solve::upright(upright),
        };
        if let Err(e) = res {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}
