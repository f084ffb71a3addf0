//! Property-based tests for transit-option generation and pin gestures.
//!
//! 1. Options are a pure function of distance.
//! 2. Options are sorted by cost and respect each mode's distance range.
//! 3. A press and release at the same spot never moves a pin; a release
//!    3px or more away always does.

use kurbo::Point;
use proptest::prelude::*;
use std::time::Duration;
use wayboard_core::{PointerEvent, SurfaceHost, ToolKind, TransitMode, transit_options};

// ── 1. Purity ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn options_are_deterministic(distance in 0u32..5000) {
        prop_assert_eq!(transit_options(distance), transit_options(distance));
    }
}

// ── 2. Ordering and availability ────────────────────────────────────────

proptest! {
    #[test]
    fn options_sorted_and_in_range(distance in 0u32..5000) {
        let options = transit_options(distance);
        prop_assert!(options.windows(2).all(|w| w[0].cost <= w[1].cost));

        let has = |mode| options.iter().any(|o| o.mode == mode);
        prop_assert_eq!(has(TransitMode::Drive), distance < 1000);
        prop_assert_eq!(has(TransitMode::Bus), distance < 500);
        prop_assert_eq!(has(TransitMode::PublicTransit), (20..800).contains(&distance));
        prop_assert_eq!(has(TransitMode::Flight), distance >= 300);
    }
}

// ── 3. Click versus drag ────────────────────────────────────────────────

fn host_with_pin(at: Point) -> SurfaceHost {
    let mut host = SurfaceHost::default();
    host.mount();
    host.resize(400.0, 400.0);
    host.set_tool(ToolKind::Location);
    host.pointer_event(PointerEvent::down(at, Duration::ZERO));
    host.pointer_event(PointerEvent::up(at, Duration::ZERO));
    host
}

proptest! {
    #[test]
    fn click_never_moves_pin(dx in -15.0f64..15.0, dy in -15.0f64..15.0) {
        let pin = Point::new(200.0, 200.0);
        let press = Point::new(pin.x + dx * 0.9, pin.y + dy * 0.9);
        let mut host = host_with_pin(pin);
        host.pointer_event(PointerEvent::down(press, Duration::ZERO));
        host.pointer_event(PointerEvent::up(press, Duration::ZERO));
        prop_assert_eq!(host.store().pins()[0].position, pin);
    }

    #[test]
    fn drag_past_threshold_moves_pin(angle in 0.0f64..std::f64::consts::TAU, len in 3.01f64..120.0) {
        let pin = Point::new(200.0, 200.0);
        let release = Point::new(pin.x + len * angle.cos(), pin.y + len * angle.sin());
        let mut host = host_with_pin(pin);
        host.pointer_event(PointerEvent::down(pin, Duration::ZERO));
        host.pointer_event(PointerEvent::up(release, Duration::ZERO));
        let moved = host.store().pins()[0].position;
        prop_assert!((moved - release).hypot() < 1e-9);
    }
}
