use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wavetoy_core::analytic::{angular_frequency, standing};
use wavetoy_core::{Component, IndexBox, MultiField, WaveError, WaveToy, WaveToyConfig};

fn setup(ncells: usize, max_grid_size: usize) -> WaveToy {
    WaveToy::new(&WaveToyConfig {
        ncells,
        max_grid_size,
        ..Default::default()
    })
    .unwrap()
}

/// Overwrite every stored value (ghosts included) with noise.
fn fill_random(field: &mut MultiField, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for p in field.patches_mut() {
        for c in Component::ALL {
            for v in p.component_mut(c) {
                *v = rng.gen_range(-1.0..1.0);
            }
        }
    }
}

fn snapshot(field: &MultiField) -> Vec<Vec<f64>> {
    field
        .patches()
        .iter()
        .flat_map(|p| Component::ALL.map(|c| p.component(c).to_vec()))
        .collect()
}

fn wrap(cell: [i32; 3], n: i32) -> [i32; 3] {
    cell.map(|i| i.rem_euclid(n))
}

fn ghost_cells(valid: IndexBox, fab: IndexBox) -> impl Iterator<Item = [i32; 3]> {
    fab.cells().filter(move |&c| !valid.contains(c))
}

#[test]
fn test_error_stays_second_order_for_ten_steps() {
    let mut w = setup(16, 8);
    w.initialize();
    let dx = w.domain().dx()[0];
    for _ in 0..10 {
        w.step().unwrap();
    }
    w.compute_error();
    let norms = w.error_norms();
    assert!(
        norms.max_abs < 0.5 * dx * dx,
        "max error {} vs dx^2 {}",
        norms.max_abs,
        dx * dx
    );
}

#[test]
fn test_error_bounded_over_one_period() {
    let mut w = setup(16, 16);
    w.initialize();
    let dx = w.domain().dx()[0];
    let period = 2.0 * std::f64::consts::PI / angular_frequency();
    let steps = (period / w.delta_time()).ceil() as usize;

    for _ in 0..steps {
        w.step().unwrap();
        w.compute_error();
        let e = w.error_norms().max_abs;
        assert!(e < dx * dx, "iteration {}: error {}", w.iteration(), e);
    }
}

#[test]
fn test_error_converges_at_second_order() {
    let error_at = |ncells: usize| {
        let mut w = setup(ncells, 8);
        w.initialize();
        // t = 0.5 for both resolutions
        for _ in 0..ncells {
            w.step().unwrap();
        }
        assert!((w.time() - 0.5).abs() < 1e-12);
        w.compute_error();
        w.error_norms().max_abs
    };
    let coarse = error_at(8);
    let fine = error_at(16);
    let ratio = coarse / fine;
    assert!(ratio > 3.0 && ratio < 5.0, "convergence ratio {}", ratio);
}

#[test]
fn test_cycle_copies_bit_identical() {
    let mut w = setup(8, 4);
    fill_random(w.field_mut(), 11);
    let before = snapshot(w.field());

    w.cycle();

    for (n, p) in w.field().patches().iter().enumerate() {
        let old = &before[n * 4..n * 4 + 4];
        let phi_p: Vec<u64> = p.component(Component::PhiP).iter().map(|v| v.to_bits()).collect();
        let phi_p_p: Vec<u64> = p.component(Component::PhiPP).iter().map(|v| v.to_bits()).collect();
        let old_phi: Vec<u64> = old[0].iter().map(|v| v.to_bits()).collect();
        let old_phi_p: Vec<u64> = old[1].iter().map(|v| v.to_bits()).collect();
        assert_eq!(phi_p, old_phi, "patch {}", n);
        assert_eq!(phi_p_p, old_phi_p, "patch {}", n);
        // phi and error untouched
        assert_eq!(p.component(Component::Phi), old[0].as_slice());
        assert_eq!(p.component(Component::Error), old[3].as_slice());
    }
}

#[test]
fn test_ghosts_match_owners_after_sync() {
    for (ncells, nghost, mgs) in [(8, 1, 4), (8, 2, 3), (6, 3, 6), (4, 2, 2)] {
        let mut w = WaveToy::new(&WaveToyConfig {
            ncells,
            nghostzones: nghost,
            max_grid_size: mgs,
            ..Default::default()
        })
        .unwrap();
        fill_random(w.field_mut(), 7 + ncells as u64);
        w.sync();

        let field = w.field();
        for p in field.patches() {
            for g in ghost_cells(p.valid_box(), p.fab_box()) {
                let src = wrap(g, ncells as i32);
                let owner = field.owner(src).unwrap();
                assert_eq!(
                    p.values_at(g),
                    owner.values_at(src),
                    "patch {} ghost {:?} <- patch {} cell {:?}",
                    p.id(),
                    g,
                    owner.id(),
                    src
                );
            }
        }
    }
}

#[test]
fn test_sync_leaves_interiors_alone() {
    let mut w = setup(8, 4);
    fill_random(w.field_mut(), 3);
    let before = snapshot(w.field());
    w.sync();
    for (n, p) in w.field().patches().iter().enumerate() {
        for c in Component::ALL {
            let old = &before[n * 4 + c.index()];
            for cell in p.valid_box().cells() {
                assert_eq!(p.get(c, cell), old[p.offset(cell)]);
            }
        }
    }
}

#[test]
fn test_sync_is_idempotent() {
    let mut w = setup(8, 3);
    fill_random(w.field_mut(), 5);
    w.sync();
    let once = snapshot(w.field());
    w.sync();
    assert_eq!(snapshot(w.field()), once);
}

#[test]
fn test_zero_field_stays_zero() {
    let mut w = setup(8, 4);
    for _ in 0..20 {
        w.step().unwrap();
    }
    for p in w.field().patches() {
        for c in [Component::Phi, Component::PhiP, Component::PhiPP] {
            assert!(p.component(c).iter().all(|&v| v == 0.0));
        }
    }
}

#[test]
fn test_decomposition_does_not_change_result() {
    let mut single = setup(8, 8);
    let mut split = setup(8, 3);
    assert_eq!(single.field().num_patches(), 1);
    assert_eq!(split.field().num_patches(), 27);

    single.initialize();
    split.initialize();
    for _ in 0..6 {
        single.step().unwrap();
        split.step().unwrap();
    }
    for cell in IndexBox::cube(8).cells() {
        for c in [Component::Phi, Component::PhiP, Component::PhiPP] {
            assert_eq!(
                single.sample(c, cell).map(f64::to_bits),
                split.sample(c, cell).map(f64::to_bits),
                "{:?} at {:?}",
                c,
                cell
            );
        }
    }
}

#[test]
fn test_single_step_matches_hand_computed_leapfrog() {
    // [0,4]^3, 4 cells, dx = 1, dt = 0.125, one patch
    let mut w = setup(4, 4);
    let dt = w.delta_time();
    assert_eq!(dt, 0.125);
    w.initialize();

    w.evolve().unwrap();
    w.cycle();
    assert_eq!(w.time(), dt);

    // cell nearest the centre; neighbours at 1.5 and 3.5 on each axis
    let c = 2.5;
    let s0 = |x, y, z| standing(0.0, x, y, z);
    let lap = (s0(1.5, c, c) - 2.0 * s0(c, c, c) + s0(3.5, c, c))
        + (s0(c, 1.5, c) - 2.0 * s0(c, c, c) + s0(c, 3.5, c))
        + (s0(c, c, 1.5) - 2.0 * s0(c, c, c) + s0(c, c, 3.5));
    let expected = -standing(-dt, c, c, c) + 2.0 * s0(c, c, c) + dt * dt * lap;

    let got = w.sample(Component::Phi, [2, 2, 2]).unwrap();
    assert!(
        (got - expected).abs() <= 1e-10 * expected.abs(),
        "got {} expected {}",
        got,
        expected
    );
    // cycle copied the new value into phi_p as well
    assert_eq!(w.sample(Component::PhiP, [2, 2, 2]), Some(got));
}

#[test]
fn test_instability_is_reported() {
    let mut w = setup(8, 4);
    w.initialize();
    let cell = [4, 1, 1];
    let owner = w.field().owner(cell).unwrap().id();
    w.field_mut().patches_mut()[owner].set(Component::Phi, cell, f64::INFINITY);
    match w.evolve() {
        Err(WaveError::NonFinite { patch, .. }) => assert_eq!(patch, owner),
        other => panic!("expected NonFinite, got {:?}", other),
    }
}

#[test]
fn test_unstable_time_step_blows_up_into_an_error() {
    let mut w = WaveToy::new(&WaveToyConfig {
        ncells: 8,
        max_grid_size: 8,
        dtfac: 8.0,
        ..Default::default()
    })
    .unwrap();
    w.initialize();
    let mut failed = false;
    for _ in 0..2000 {
        if let Err(e) = w.step() {
            assert!(matches!(e, WaveError::NonFinite { .. }));
            failed = true;
            break;
        }
    }
    assert!(failed, "courant number 2 should diverge");
}

#[test]
fn test_bad_config_fails_before_allocation() {
    for cfg in [
        WaveToyConfig { ncells: 0, ..Default::default() },
        WaveToyConfig { nghostzones: 0, ..Default::default() },
        WaveToyConfig { hi: [0.0, 4.0, 4.0], ..Default::default() },
    ] {
        assert!(matches!(WaveToy::new(&cfg), Err(WaveError::Config(_))));
    }
}
