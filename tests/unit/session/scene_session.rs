use super::*;
use crate::animation::path::PathState;
use crate::scene::palette::PaletteId;

const TICK: f64 = 1.0 / 64.0;

fn run(session: &mut SceneSession, secs: f64) -> Vec<FrameSnapshot> {
    let ticks = (secs / TICK).round() as usize;
    (0..ticks).map(|_| session.advance(TICK)).collect()
}

fn reached(frames: &[FrameSnapshot]) -> Vec<usize> {
    frames.iter().flat_map(|f| f.waypoints.iter().copied()).collect()
}

fn fast_tuning() -> SceneTuning {
    let mut t = SceneTuning::default();
    t.path.speed = 6.0;
    t
}

#[test]
fn starts_on_the_empty_stage_with_the_glow() {
    let mut s = SceneSession::new(SceneTuning::default()).unwrap();
    assert_eq!(s.stage(), Stage::Empty);
    let f = s.advance(TICK);
    assert!(f.nodes.is_empty());
    assert!(f.marker.is_none());
    let glow = f.glow.unwrap();
    assert!((glow.intensity - (0.5 + (TICK * 2.0).sin() * 0.3)).abs() < 1e-12);
    assert_eq!(f.hit_counts.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn rejects_invalid_tuning() {
    let mut t = SceneTuning::default();
    t.path.speed = -1.0;
    assert!(SceneSession::new(t).is_err());
}

#[test]
fn hit_reaches_its_orb_in_the_same_tick() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Activity).unwrap();
    let frames = run(&mut s, 1.5);
    let last = frames.last().unwrap();

    assert_eq!(reached(&frames), vec![1]);
    assert_eq!(last.waypoints.as_slice(), &[1]);
    assert_eq!(last.hit_counts.as_slice(), &[0, 1, 0, 0]);
    assert_eq!(last.nodes[1].palette, PaletteId::Cyan);
    assert!((last.nodes[1].flash - (1.0 - TICK * 2.0)).abs() < 1e-12);
    assert_eq!(last.nodes[0].palette, PaletteId::Purple);
    assert_eq!(last.nodes[0].flash, 0.0);
}

#[test]
fn marker_is_visible_only_while_running() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Relevance).unwrap();
    let frames = run(&mut s, 2.0);
    let visible: Vec<bool> = frames.iter().map(|f| f.marker.is_some()).collect();
    assert!(!visible[0]);
    assert!(visible[40]);
    assert!(!visible[100]);
    assert!(visible[127]);
}

#[test]
fn orbs_keep_their_state_across_compatible_stages() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Activity).unwrap();
    run(&mut s, 1.5);
    assert_eq!(s.nodes()[1].palette(), PaletteId::Cyan);

    s.set_stage(Stage::Relevance).unwrap();
    assert_eq!(s.nodes().len(), 2);
    assert_eq!(s.nodes()[1].palette(), PaletteId::Cyan);

    s.set_stage(Stage::Goal).unwrap();
    assert_eq!(s.nodes().len(), 4);
    assert_eq!(s.nodes()[1].palette(), PaletteId::Cyan);
    assert_eq!(s.nodes()[2].palette(), PaletteId::Cyan);
    assert_eq!(s.nodes()[3].palette(), PaletteId::Pink);
    let f = s.advance(TICK);
    let muted: Vec<bool> = f.nodes.iter().map(|n| n.muted).collect();
    assert_eq!(muted, vec![true, true, true, false]);
    assert!(f.marker.is_none());
    assert!(s.path().is_none());

    s.set_stage(Stage::Empty).unwrap();
    assert!(s.nodes().is_empty());
}

#[test]
fn chain_feeds_every_downstream_orb() {
    let mut s = SceneSession::with_stage(fast_tuning(), Stage::Task).unwrap();
    let frames = run(&mut s, 2.0);
    assert_eq!(reached(&frames), vec![1, 2, 3]);
    assert_eq!(s.hit_counts(), &[0, 1, 1, 1]);
    let palettes: Vec<PaletteId> = s.nodes().iter().map(|n| n.palette()).collect();
    assert_eq!(
        palettes,
        vec![
            PaletteId::Purple,
            PaletteId::Cyan,
            PaletteId::Pink,
            PaletteId::Purple,
        ]
    );
}

#[test]
fn default_task_chain_is_preempted_before_the_goal() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Task).unwrap();
    let frames = run(&mut s, 6.0);
    let hits = reached(&frames);
    assert_eq!(hits, vec![1, 1, 1]);
    assert_eq!(s.hit_counts()[3], 0);
}

#[test]
fn remounted_orbs_ignore_hits_from_before_they_appeared() {
    let mut s = SceneSession::with_stage(fast_tuning(), Stage::Task).unwrap();
    run(&mut s, 2.0);
    s.set_stage(Stage::Entity).unwrap();
    s.set_stage(Stage::Task).unwrap();

    let f = s.advance(TICK);
    assert_eq!(f.nodes[2].palette, PaletteId::Cyan);
    assert_eq!(f.nodes[2].flash, 0.0);
    assert_eq!(f.nodes[3].palette, PaletteId::Pink);
    assert_eq!(s.path().unwrap().runs_started(), 0);
}

#[test]
fn reselecting_the_same_stage_is_a_no_op() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Activity).unwrap();
    run(&mut s, 1.0);
    let runs = s.path().unwrap().runs_started();
    let elapsed = s.path().unwrap().elapsed();
    s.set_stage(Stage::Activity).unwrap();
    assert_eq!(s.path().unwrap().runs_started(), runs);
    assert_eq!(s.path().unwrap().elapsed(), elapsed);
}

#[test]
fn teardown_cancels_timers_and_silences_hits() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Activity).unwrap();
    run(&mut s, 1.0);
    assert_eq!(s.path().unwrap().state(), PathState::Running);

    s.teardown();
    assert_eq!(s.path().unwrap().pending_timers(), 0);

    let frames = run(&mut s, 10.0);
    assert!(reached(&frames).is_empty());
    assert!(frames.iter().all(|f| f.marker.is_none()));
    assert_eq!(s.hit_counts(), &[0, 0, 0, 0]);
    assert!((s.elapsed() - 11.0).abs() < 1e-9);

    s.set_stage(Stage::Relevance).unwrap();
    assert!(s.path().is_none());
}

#[test]
fn attribute_line_draws_in_with_its_label() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Attribute).unwrap();
    let first = s.advance(TICK).attribute.unwrap();
    let later = run(&mut s, 2.0).pop().unwrap().attribute.unwrap();

    assert!(first.line.progress < later.line.progress);
    assert!(later.line.progress > 0.99);
    assert_eq!(later.label, "szín");
    assert_eq!(later.label_anchor, Vec3::on_x(3.5));
    assert!((later.dot_radius - later.line.progress * 0.1).abs() < 1e-12);
    assert!(first.line.dash.is_none());
    assert_eq!(later.line.color.a, 0.8);
}

#[test]
fn shared_connection_lines_keep_their_progress() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Goal).unwrap();
    run(&mut s, 0.5);
    let before: Vec<f64> = s.snapshot().connections.iter().map(|l| l.progress).collect();

    s.set_stage(Stage::Task).unwrap();
    let after: Vec<f64> = s.snapshot().connections.iter().map(|l| l.progress).collect();
    assert_eq!(before, after);
    assert!(after.iter().all(|p| *p > 0.8));

    s.set_stage(Stage::Relevance).unwrap();
    assert_eq!(s.snapshot().connections[0].progress, after[1]);

    s.set_stage(Stage::Entity).unwrap();
    s.set_stage(Stage::Relevance).unwrap();
    assert_eq!(s.snapshot().connections[0].progress, 0.0);
}

#[test]
fn snapshot_serializes_to_a_json_line() {
    let mut s = SceneSession::with_stage(SceneTuning::default(), Stage::Task).unwrap();
    let f = run(&mut s, 1.0).pop().unwrap();
    let line = f.to_json_line().unwrap();
    assert!(!line.contains('\n'));
    let v: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(v["stage"], "task");
    assert_eq!(v["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(v["nodes"][0]["palette"], "purple");
    assert_eq!(v["connections"][0]["color"], "#8b5cf680");
    assert!(v["marker"]["position"].is_array());
}
