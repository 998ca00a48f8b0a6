use crate::*;
use approx::assert_abs_diff_eq;

fn reference(link: f64) -> Mechanism {
    Mechanism::square(90., link, 10., [35., -35., -35., 35.])
}

fn distance(a: &Pose, b: &Pose) -> f64 {
    let [dx, dy, da] = [a.cx - b.cx, a.cy - b.cy, a.a - b.a];
    (dx * dx + dy * dy + da * da).sqrt()
}

#[test]
fn repeated_solves_are_identical() {
    let mech = Mechanism::square(90., 50., 10., [10., -5., -3., 15.]);
    for strategy in [Strategy::LeastSquares, Strategy::AngleSweep, Strategy::Hybrid] {
        let solver = PoseSolver::new().strategy(strategy);
        let fit1 = solver.solve(&mech, Pose::default());
        let fit2 = solver.solve(&mech, Pose::default());
        assert_eq!(fit1, fit2, "{}", strategy.name());
    }
}

#[test]
fn mirrors_compensate_the_move() {
    for (index, slot) in Slot::ALL.into_iter().enumerate() {
        let mut session = Session::default();
        let before = session.state().mech.ys;
        let after = session.displace(index as isize, 2.).unwrap().mech.ys;
        let Pairing { partner, mirrors: [m1, m2] } = slot.pairing();
        assert_eq!(after[slot.index()], before[slot.index()] + 2.);
        assert_eq!(after[partner.index()], before[partner.index()]);
        let sum = (after[m1.index()] - before[m1.index()]) + (after[m2.index()] - before[m2.index()]);
        assert_abs_diff_eq!(sum, -2., epsilon = 1e-9);
    }
}

#[test]
fn invalid_slot_keeps_state() {
    let mut session = Session::default();
    session.displace(1, 0.5).unwrap();
    let state = session.state().clone();
    for index in [4, -1, 100] {
        let err = session.displace(index, 1.).unwrap_err();
        assert_eq!(err, InvalidSlot(index));
        assert_eq!(session.state(), &state);
        assert_eq!(session.phase(), Phase::Idle);
    }
}

#[test]
fn exact_fit() {
    // The reference corners are exactly 50 away from the carriages
    let fit = PoseSolver::new().solve(&reference(50.), Pose::default());
    assert!(fit.converged);
    assert!(fit.cost() < 1e-4);
    assert_abs_diff_eq!(fit.pose.cx, 0., epsilon = 1e-6);
    assert_abs_diff_eq!(fit.pose.cy, 0., epsilon = 1e-6);
    assert_abs_diff_eq!(fit.pose.a, 0., epsilon = 1e-6);
    // Upright seed with short links
    let mech = Mechanism::upright(90., 45., 10.).unwrap();
    let fit = PoseSolver::new().solve(&mech, Pose::default());
    assert!(fit.cost() < 1e-4);
    assert!(fit.is_feasible(1e-3));
}

#[test]
fn best_fit_with_short_links() {
    let fit = PoseSolver::new().solve(&reference(45.), Pose::default());
    assert_abs_diff_eq!(fit.pose.cx, 0., epsilon = 1e-6);
    assert_abs_diff_eq!(fit.pose.cy, 0., epsilon = 1e-6);
    assert_abs_diff_eq!(fit.pose.a, 0., epsilon = 1e-6);
    for r in fit.residuals {
        assert_abs_diff_eq!(r, 5., epsilon = 1e-6);
    }
    assert!(!fit.is_feasible(1.));
}

#[test]
fn degenerate_link() {
    let mech = reference(1.);
    for strategy in [Strategy::LeastSquares, Strategy::AngleSweep, Strategy::Hybrid] {
        let fit = PoseSolver::new().strategy(strategy).solve(&mech, Pose::default());
        let Pose { cx, cy, a } = fit.pose;
        assert!(cx.is_finite() && cy.is_finite() && a.is_finite());
        assert!(fit.cost().is_finite());
        assert!(fit.cost() > 1e3);
    }
}

#[test]
fn resolve_is_idempotent() {
    let mut session = Session::new(reference(50.), PoseSolver::new());
    session.displace(0, 3.).unwrap();
    let fit = session.state().fit.clone();
    assert_eq!(session.resolve().fit, fit);
    assert_eq!(session.resolve().fit, fit);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn small_moves_make_small_changes() {
    const STEP: f64 = 0.25;
    let Some(seed) = Mechanism::upright(90., 45., 10.) else {
        panic!("links can not reach the rails");
    };
    for slot in Slot::ALL {
        let mut session = Session::new(seed.clone(), PoseSolver::new());
        let start = session.state().fit.pose;
        let mut prev = start;
        for _ in 0..20 {
            let pose = session.displace_slot(slot, STEP).fit.pose;
            assert!(distance(&pose, &prev) <= 0.5 * STEP, "{slot}");
            prev = pose;
        }
        assert!(distance(&prev, &start) <= 20. * STEP, "{slot}");
        assert!(session.state().fit.converged);
    }
}

#[test]
fn long_drive_converges() {
    let mut session = Session::default();
    for _ in 0..5 {
        session.displace(0, 1.).unwrap();
    }
    let fit = &session.state().fit;
    assert!(fit.converged);
    assert!(fit.iter < PoseSolver::new().max_iter);
    // A short budget stops before it settles
    let fit = PoseSolver::new().max_iter(100).solve(&session.state().mech, Pose::default());
    assert!(!fit.converged);
}

#[test]
fn snapshot_matches_state() {
    let mut session = Session::default();
    session.displace(2, -1.5).unwrap();
    let state = session.state();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.carriages, state.mech.positions());
    assert_eq!(snapshot.corners, state.mech.corners(&state.fit.pose));
    assert_eq!(snapshot.angle, state.fit.pose.a);
    assert_eq!(snapshot.cost, state.fit.cost());
    assert!(snapshot.angle > -std::f64::consts::PI);
    assert!(snapshot.angle <= std::f64::consts::PI);
}
