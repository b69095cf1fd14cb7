use super::*;

fn tuning() -> NodeTuning {
    NodeTuning::default()
}

fn config(muted: bool) -> NodeConfig {
    NodeConfig {
        position: Vec3::on_x(-1.5),
        palette: PaletteId::Blue,
        muted,
    }
}

#[test]
fn n_hits_cycle_back_to_the_starting_palette() {
    let t = tuning();
    let mut node = NodeAnimator::new(PaletteId::Blue, 0);
    let mut seen = vec![node.palette()];
    for hit in 1..=PaletteId::CYCLE.len() as u64 {
        node = node.advance(1.0 / 60.0, hit, &t);
        seen.push(node.palette());
    }
    assert_eq!(
        seen,
        vec![
            PaletteId::Blue,
            PaletteId::Cyan,
            PaletteId::Pink,
            PaletteId::Purple,
            PaletteId::Blue,
        ]
    );
}

#[test]
fn hit_resets_flash_to_exactly_one() {
    let t = tuning();
    let mut node = NodeAnimator::new(PaletteId::Purple, 0);
    for (hit, delta) in [(1, 0.0), (2, 0.1), (3, 0.37), (4, 5.0)] {
        node = node.tick(delta, &t);
        node = node.on_trigger(hit);
        assert_eq!(node.flash(), 1.0);
    }
}

#[test]
fn flash_never_rises_between_hits() {
    let t = tuning();
    let mut node = NodeAnimator::new(PaletteId::Purple, 0).on_trigger(1);
    let mut last = node.flash();
    for i in 0..100 {
        node = node.advance(0.013 * f64::from(i % 7), 1, &t);
        assert!(node.flash() <= last);
        assert!(node.flash() >= 0.0);
        last = node.flash();
    }
    assert_eq!(node.flash(), 0.0);
}

#[test]
fn flash_decays_linearly_at_the_configured_rate() {
    let t = tuning();
    let node = NodeAnimator::new(PaletteId::Purple, 0)
        .on_trigger(1)
        .tick(0.25, &t);
    assert!((node.flash() - 0.5).abs() < 1e-12);
    let node = node.tick(0.25, &t);
    assert_eq!(node.flash(), 0.0);
}

#[test]
fn initial_counter_is_not_a_hit() {
    let node = NodeAnimator::new(PaletteId::Cyan, 7).advance(0.016, 7, &tuning());
    assert_eq!(node.palette(), PaletteId::Cyan);
    assert_eq!(node.flash(), 0.0);
}

#[test]
fn lower_counter_is_remembered_without_cycling() {
    let node = NodeAnimator::new(PaletteId::Cyan, 5).on_trigger(2);
    assert_eq!(node.palette(), PaletteId::Cyan);
    assert_eq!(node.last_trigger(), 2);
    assert_eq!(node.on_trigger(3).palette(), PaletteId::Pink);
}

#[test]
fn advance_is_pure() {
    let t = tuning();
    let before = NodeAnimator::new(PaletteId::Purple, 0);
    let snapshot = before;
    let _after = before.advance(0.5, 1, &t);
    assert_eq!(before, snapshot);
}

#[test]
fn emissive_blends_from_white_to_target_with_flash() {
    let t = tuning();
    let pose = FloatPose::default();
    let config = config(false);

    let flashed = NodeAnimator::new(PaletteId::Blue, 0).on_trigger(1);
    let f = flashed.frame(0, &config, pose, &t);
    assert_eq!(f.palette, PaletteId::Cyan);
    assert_eq!(f.emissive, Color::WHITE);
    assert!((f.emissive_intensity - 1.0).abs() < 1e-12);

    let settled = flashed.tick(1.0, &t);
    let f = settled.frame(0, &config, pose, &t);
    assert_eq!(f.emissive, PaletteId::Cyan.color());
    assert!((f.emissive_intensity - 0.3).abs() < 1e-12);
}

#[test]
fn diffuse_color_eases_toward_the_cycled_palette() {
    let t = tuning();
    let node = NodeAnimator::new(PaletteId::Blue, 0).on_trigger(1);
    assert_eq!(node.base_color(), PaletteId::Blue.color());
    let node = node.tick(0.1, &t);
    let expected = PaletteId::Blue.color().mix(PaletteId::Cyan.color(), 0.4);
    assert!((node.base_color().g - expected.g).abs() < 1e-12);
    let node = node.tick(1.0, &t);
    assert_eq!(node.base_color(), PaletteId::Cyan.color());
}

#[test]
fn muted_is_a_render_directive_only() {
    let t = tuning();
    let node = NodeAnimator::new(PaletteId::Blue, 0);
    let pose = FloatPose::default();
    let loud = node.frame(1, &config(false), pose, &t);
    let quiet = node.frame(1, &config(true), pose, &t);

    assert_eq!(loud.scale, 1.0);
    assert!((quiet.scale - 0.85).abs() < 1e-12);
    assert_eq!(quiet.color, PaletteId::Blue.color().mix(t.muted_gray, 0.65));
    assert!((quiet.emissive_intensity - 0.1).abs() < 1e-12);
    assert_eq!(
        quiet.emissive,
        PaletteId::Blue
            .color()
            .mix(Color::from_rgb_u32(0xCCCCCC), 0.7)
    );
    assert_eq!(loud.emissive, PaletteId::Blue.color());
    assert_eq!(quiet.roughness, 0.9);
    assert_eq!(loud.metalness, 0.2);
    assert_eq!(loud.palette, quiet.palette);
    assert_eq!(loud.flash, quiet.flash);
}

#[test]
fn spin_and_float_compose_into_the_frame() {
    let t = tuning();
    let node = NodeAnimator::new(PaletteId::Blue, 0).tick(2.0, &t);
    let pose = FloatPose {
        offset: Vec3::new(0.0, 0.05, 0.0),
        rotation: Vec3::new(0.01, 0.0, 0.0),
    };
    let f = node.frame(0, &config(false), pose, &t);
    assert!((f.rotation.x - (0.2 + 0.01)).abs() < 1e-12);
    assert!((f.rotation.y - 0.6).abs() < 1e-12);
    assert_eq!(f.position, Vec3::new(-1.5, 0.05, 0.0));
}
