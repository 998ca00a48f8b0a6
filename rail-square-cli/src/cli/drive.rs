use super::{logger::Logger, solve::plot_svg, AnyResult, SeedArg};
use crate::io::Seed;
use rail_square::Session;
use std::{io::BufRead, path::PathBuf};

/// Key, carriage index and direction.
const KEYMAP: [(char, isize, f64); 8] = [
    ('a', 0, 1.),
    ('z', 0, -1.),
    ('w', 1, 1.),
    ('x', 1, -1.),
    ('e', 2, 1.),
    ('c', 2, -1.),
    ('r', 3, 1.),
    ('v', 3, -1.),
];
const QUIT: char = 'q';

#[derive(clap::Args)]
pub(super) struct Drive {
    #[clap(flatten)]
    seed: SeedArg,
    /// Carriage displacement of a key press
    #[clap(long, default_value_t = 1.)]
    step: f64,
    /// Residual tolerance of a feasible pose
    #[clap(long, default_value_t = 1e-3)]
    tol: f64,
    /// Plot every frame into this directory
    #[clap(long)]
    svg_dir: Option<PathBuf>,
}

fn lookup(key: char) -> Option<(isize, f64)> {
    KEYMAP
        .iter()
        .find(|(k, ..)| *k == key)
        .map(|&(_, index, dir)| (index, dir))
}

pub(super) fn drive(Drive { seed, step, tol, svg_dir }: Drive) -> AnyResult {
    let Seed { mech, solver } = seed.load()?;
    if let Some(dir) = &svg_dir {
        std::fs::create_dir_all(dir)?;
    }
    let mut session = Session::new(mech, solver);
    println!("keys: a/z=CAR1, w/x=CAR2, e/c=CAR3, r/v=CAR4, {QUIT}=quit");
    let mut stdout = std::io::stdout();
    let mut frame = 0;
    let mut show = |session: &Session, frame: usize| -> AnyResult {
        let snapshot = session.snapshot();
        let mut logger = Logger::new(&mut stdout);
        logger.section(&format!("frame {frame}"))?;
        logger.log(&snapshot)?;
        let fit = &session.state().fit;
        if !fit.converged {
            println!("warning: the iteration limit is reached");
        }
        if !fit.is_feasible(tol) {
            println!("warning: infeasible pose, max residual {:.4}", fit.max_residual());
        }
        if let Some(dir) = &svg_dir {
            plot_svg(&dir.join(format!("frame_{frame:04}.svg")), &snapshot)?;
        }
        Ok(())
    };
    show(&session, frame)?;
    for line in std::io::stdin().lock().lines() {
        for key in line?.chars().filter(|c| !c.is_whitespace()) {
            if key == QUIT {
                return Ok(());
            }
            let Some((index, dir)) = lookup(key) else {
                println!("unknown key {key:?}");
                continue;
            };
            session.displace(index, dir * step)?;
            frame += 1;
            show(&session, frame)?;
        }
    }
    Ok(())
}
