//! Property-based tests for the snapshot history.
//!
//! 1. N commits then N undos return to the baseline; N redos return to the last commit.
//! 2. Committing after undo prunes the redo branch: len == step_before + 2.
//! 3. The cursor always stays in bounds and the length never exceeds an explicit limit.

use kurbo::Point;
use proptest::prelude::*;
use wayboard_core::{History, RasterSurface, SerializableColor};

// ── Helpers ─────────────────────────────────────────────────────────────

fn surface() -> RasterSurface {
    let mut surface = RasterSurface::new(1.0, SerializableColor::white()).unwrap();
    surface.resize(40.0, 40.0).unwrap();
    surface
}

fn dab(surface: &mut RasterSurface, seed: u8) {
    let x = f64::from(seed % 40);
    let y = f64::from((seed / 40) % 40);
    let color = SerializableColor::rgb(seed, 255 - seed, seed / 2);
    surface.context().fill_circle(Point::new(x, y), 3.0, color);
}

#[derive(Debug, Clone)]
enum Op {
    Commit(u8),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::Commit),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

// ── 1. Round trip ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn undo_redo_round_trip(seeds in proptest::collection::vec(any::<u8>(), 1..=80)) {
        let mut s = surface();
        let mut history = History::new();
        history.commit(&s);
        let baseline = s.snapshot();

        for &seed in &seeds {
            dab(&mut s, seed);
            history.commit(&s);
        }
        let last = s.snapshot();

        for _ in 0..seeds.len() {
            prop_assert!(history.undo(&mut s));
        }
        prop_assert!(!history.undo(&mut s));
        prop_assert_eq!(s.snapshot(), baseline);

        for _ in 0..seeds.len() {
            prop_assert!(history.redo(&mut s));
        }
        prop_assert!(!history.redo(&mut s));
        prop_assert_eq!(s.snapshot(), last);
    }
}

// ── 2. Redo branch pruning ──────────────────────────────────────────────

proptest! {
    #[test]
    fn commit_after_undo_prunes(commits in 1usize..=20, undos in 1usize..=20, seed in any::<u8>()) {
        let undos = undos.min(commits);
        let mut s = surface();
        let mut history = History::new();
        history.commit(&s);
        for i in 0..commits {
            dab(&mut s, seed.wrapping_add(i as u8));
            history.commit(&s);
        }
        for _ in 0..undos {
            history.undo(&mut s);
        }

        let step_before = history.step().unwrap();
        dab(&mut s, seed.wrapping_mul(3));
        history.commit(&s);

        prop_assert_eq!(history.len(), step_before + 2);
        prop_assert!(!history.can_redo());
    }
}

// ── 3. Bounds under arbitrary operation sequences ──────────────────────

proptest! {
    #[test]
    fn cursor_stays_in_bounds(ops in proptest::collection::vec(op(), 0..60), limit in 1usize..=10) {
        let mut s = surface();
        let mut history = History::with_limit(limit);
        history.commit(&s);

        for op in ops {
            match op {
                Op::Commit(seed) => {
                    dab(&mut s, seed);
                    history.commit(&s);
                }
                Op::Undo => {
                    history.undo(&mut s);
                }
                Op::Redo => {
                    history.redo(&mut s);
                }
            }
            let step = history.step().unwrap();
            prop_assert!(step < history.len());
            prop_assert!(history.len() <= limit);
        }
    }
}
