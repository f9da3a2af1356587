//! Integration tests for the scene components.
//!
//! These drive the public API frame by frame the way a host would.

use galaxy_scene::comet::{quadratic_bezier, Comet, CometEvent, CometId, CometStatus};
use galaxy_scene::galaxy::{generate, GalaxyParameters, GalaxyShape};
use galaxy_scene::glow::GlowPulse;
use galaxy_scene::orbital::{default_timeline, ClickTarget, OrbitalConfig, OrbitalMenu};
use galaxy_scene::scheduler::{CometScheduler, SchedulerConfig};
use galaxy_scene::starfield::warp_speed;
use galaxy_scene::transition::PresetTransition;
use galaxy_scene::{SpawnContext, Vec3};
use proptest::prelude::*;

// ============================================================================
// Galaxy generation
// ============================================================================

#[test]
fn test_spiral_points_stay_inside_radius() {
    let params = GalaxyParameters::default().with_count(20_000);
    let cloud = generate(&params, &mut SpawnContext::seeded(11)).unwrap();
    assert_eq!(cloud.len(), 20_000);
    let limit = params.radius * (1.0 + 1e-5);
    assert!(cloud.positions().iter().all(|p| p.length() <= limit));
}

#[test]
fn test_disk_thickness_is_bounded() {
    let params = GalaxyParameters::accretion_disk().with_count(20_000);
    assert_eq!(params.shape, GalaxyShape::Disk);
    let cloud = generate(&params, &mut SpawnContext::seeded(12)).unwrap();
    let limit = 0.1 * params.radius + 1e-5;
    assert!(cloud.positions().iter().all(|p| p.y.abs() <= limit));
}

#[test]
fn test_same_seed_same_cloud() {
    let params = GalaxyParameters::default().with_count(1_000);
    let a = generate(&params, &mut SpawnContext::seeded(5)).unwrap();
    let b = generate(&params, &mut SpawnContext::seeded(5)).unwrap();
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
}

// ============================================================================
// Preset transitions
// ============================================================================

#[test]
fn test_transition_midpoint_and_exact_end() {
    let mut ctx = SpawnContext::seeded(21);
    let from = generate(&GalaxyParameters::default().with_count(2_000), &mut ctx).unwrap();
    let to = generate(&GalaxyParameters::accretion_disk().with_count(2_000), &mut ctx).unwrap();
    let mut transition = PresetTransition::new(from.clone(), to.clone(), 8.0).unwrap();

    // 0.25 is exact in binary, so 16 steps land on 4 s exactly.
    for _ in 0..16 {
        transition.advance(0.25);
    }
    for ((a, b), live) in from
        .positions()
        .iter()
        .zip(to.positions())
        .zip(transition.live().positions())
    {
        assert!((*live - (*a + *b) * 0.5).length() < 1e-4);
    }

    for _ in 0..16 {
        transition.advance(0.25);
    }
    assert!(transition.is_complete());
    assert_eq!(transition.live().positions(), to.positions());
    assert_eq!(transition.live().colors(), to.colors());
}

// ============================================================================
// Comets
// ============================================================================

fn test_comet(duration: f32) -> Comet {
    Comet::new(
        CometId(7),
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::new(10.0, 8.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        0.02,
        duration,
    )
    .unwrap()
}

#[test]
fn test_comet_one_second_flight() {
    let mut comet = test_comet(1.0);
    let mut events = Vec::new();

    comet.update(0.5, &mut events);
    assert!((comet.progress() - 0.5).abs() < 1e-6);
    let expected = quadratic_bezier(
        Vec3::new(20.0, 0.0, 0.0),
        Vec3::new(10.0, 8.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        0.5,
    );
    assert!((comet.position() - expected).length() < 1e-5);

    comet.update(0.5, &mut events);
    assert_eq!(comet.status(), CometStatus::Dying);
    assert_eq!(events, vec![CometEvent::Impact(CometId(7))]);

    // Sample every 100 ms: opacity only ever falls and the comet dies
    // around the 1.5 s mark.
    let mut t = 1.0;
    let mut last_opacity = comet.opacity();
    while comet.status() != CometStatus::Dead {
        comet.update(0.1, &mut events);
        t += 0.1;
        assert!(comet.opacity() <= last_opacity);
        last_opacity = comet.opacity();
        assert!(t < 2.0, "comet never died");
    }
    assert!((t - 1.5_f32).abs() <= 0.15);
    assert_eq!(comet.opacity(), 0.0);
    assert_eq!(events.last(), Some(&CometEvent::Faded(CometId(7))));
}

fn run_to_death(dt: f32) -> Vec<CometEvent> {
    let mut comet = test_comet(1.3);
    let mut events = Vec::new();
    for _ in 0..100_000 {
        comet.update(dt, &mut events);
        if comet.is_dead() {
            break;
        }
    }
    // A few more frames must not fire anything.
    for _ in 0..10 {
        comet.update(dt, &mut events);
    }
    events
}

#[test]
fn test_single_fire_at_any_frame_rate() {
    let expected = vec![CometEvent::Impact(CometId(7)), CometEvent::Faded(CometId(7))];
    assert_eq!(run_to_death(0.7), expected);
    assert_eq!(run_to_death(1.0 / 60.0), expected);
    assert_eq!(run_to_death(0.001), expected);
}

#[test]
fn test_scheduler_impacts_pulse_glow() {
    let config = SchedulerConfig {
        interval: 100.0,
        batch_size: 4,
        max_delay: 0.5,
        duration_min: 0.5,
        duration_max: 0.6,
        ..Default::default()
    };
    let mut scheduler = CometScheduler::new(config).unwrap();
    let mut glow = GlowPulse::default();
    let mut ctx = SpawnContext::seeded(31);
    scheduler.start();

    let mut impacts = 0;
    let mut fades = 0;
    let mut peaked = false;
    for _ in 0..300 {
        glow.update(1.0 / 60.0);
        for event in scheduler.update(1.0 / 60.0, &mut ctx, &mut glow) {
            match event {
                CometEvent::Impact(_) => impacts += 1,
                CometEvent::Faded(_) => fades += 1,
            }
        }
        peaked |= glow.is_pulsing();
    }
    assert_eq!(impacts, 4);
    assert_eq!(fades, 4);
    assert!(peaked);
    assert_eq!(scheduler.active_count(), 0);
}

// ============================================================================
// Orbital menu
// ============================================================================

#[test]
fn test_click_node_three_of_five() {
    let mut menu = OrbitalMenu::new(default_timeline(), OrbitalConfig::default()).unwrap();
    assert!(menu.click(ClickTarget::Node(3)));

    assert_eq!(menu.active_id(), Some(3));
    assert!(menu.is_expanded(3));
    for id in [2, 4] {
        assert!(menu.is_related(id));
        assert!(!menu.is_expanded(id));
    }
    for id in [1, 5] {
        assert!(!menu.is_related(id));
        assert!(!menu.is_expanded(id));
    }
    assert!((menu.rotation_angle() - 126.0).abs() < 1e-4);
    assert!(!menu.auto_rotate());
}

// ============================================================================
// Starfield
// ============================================================================

#[test]
fn test_warp_speed_boundaries() {
    assert_eq!(warp_speed(2.0, 50.0, 2.0, 0.0), 2.0);
    assert_eq!(warp_speed(2.0, 50.0, 2.0, 2.0), 50.0);
    assert_eq!(warp_speed(2.0, 50.0, 2.0, 30.0), 50.0);
    let mid = warp_speed(2.0, 50.0, 2.0, 1.0);
    assert!(mid > 26.0 && mid < 50.0);
}

// ============================================================================
// Properties
// ============================================================================

fn click_strategy() -> impl Strategy<Value = ClickTarget> {
    prop_oneof![
        (0u32..8).prop_map(ClickTarget::Node),
        Just(ClickTarget::Background),
    ]
}

proptest! {
    #[test]
    fn prop_at_most_one_node_expanded(
        clicks in prop::collection::vec((click_strategy(), 0.0f32..0.2), 0..40)
    ) {
        let mut menu = OrbitalMenu::new(default_timeline(), OrbitalConfig::default()).unwrap();
        for (click, dt) in clicks {
            menu.click(click);
            menu.update(dt);
            let expanded = menu.nodes().iter().filter(|v| v.expanded).count();
            prop_assert!(expanded <= 1);
            prop_assert_eq!(expanded == 1, menu.active_id().is_some());
        }
    }

    #[test]
    fn prop_node_position_wraps(rotation in 0.0f32..360.0, index in 0usize..5) {
        let mut a = OrbitalMenu::new(default_timeline(), OrbitalConfig::default()).unwrap();
        let mut b = a.clone();
        a.set_rotation_angle(rotation);
        b.set_rotation_angle(rotation + 360.0);
        let pa = a.node_position(index).unwrap();
        let pb = b.node_position(index).unwrap();
        prop_assert!((pa.x - pb.x).abs() < 1e-2);
        prop_assert!((pa.y - pb.y).abs() < 1e-2);
        prop_assert!((pa.opacity - pb.opacity).abs() < 1e-3);
    }

    #[test]
    fn prop_comet_fires_once_each(dt in 0.001f32..2.0) {
        let events = run_to_death(dt);
        prop_assert_eq!(events, vec![CometEvent::Impact(CometId(7)), CometEvent::Faded(CometId(7))]);
    }
}
