use super::*;

fn drain(s: &mut Scheduler, until: f64) -> Vec<Fired> {
    let mut out = Vec::new();
    while let Some(f) = s.pop_due(until) {
        out.push(f);
    }
    s.advance_to(until);
    out
}

#[test]
fn once_fires_exactly_once() {
    let mut s = Scheduler::new();
    let id = s.schedule_once(0.5).unwrap();
    assert!(drain(&mut s, 0.4).is_empty());
    let fired = drain(&mut s, 0.6);
    assert_eq!(
        fired,
        vec![Fired {
            id,
            at: 0.5,
            missed: 0
        }]
    );
    assert!(!s.is_pending(id));
    assert!(drain(&mut s, 10.0).is_empty());
}

#[test]
fn repeating_rearms_from_due_time() {
    let mut s = Scheduler::new();
    let id = s.schedule_repeating(2.0).unwrap();
    let mut at = Vec::new();
    for until in [1.0, 2.5, 3.0, 4.75, 7.0] {
        at.extend(drain(&mut s, until).into_iter().map(|f| f.at));
    }
    assert_eq!(at, vec![2.0, 4.0, 6.0]);
    assert!(s.is_pending(id));
    assert_eq!(s.now(), 7.0);
}

#[test]
fn missed_periods_fold_into_one_firing() {
    let mut s = Scheduler::new();
    let id = s.schedule_repeating(2.0).unwrap();
    let fired = drain(&mut s, 7.0);
    assert_eq!(
        fired,
        vec![Fired {
            id,
            at: 6.0,
            missed: 2
        }]
    );
    let next = drain(&mut s, 8.0);
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].at, 8.0);
    assert_eq!(next[0].missed, 0);
}

#[test]
fn tiny_interval_fires_once_per_window() {
    let mut s = Scheduler::new();
    s.schedule_repeating(1e-20).unwrap();
    let fired = drain(&mut s, 1.0 / 60.0);
    assert_eq!(fired.len(), 1);
    assert!(fired[0].at <= 1.0 / 60.0);
    assert!(fired[0].missed > 1_000_000);
    assert_eq!(drain(&mut s, 2.0 / 60.0).len(), 1);
}

#[test]
fn fires_in_due_order_then_registration_order() {
    let mut s = Scheduler::new();
    let every = s.schedule_repeating(1.0).unwrap();
    let once = s.schedule_once(1.0).unwrap();
    let early = s.schedule_once(0.25).unwrap();
    let order: Vec<TimerId> = drain(&mut s, 1.0).into_iter().map(|f| f.id).collect();
    assert_eq!(order, vec![early, every, once]);
}

#[test]
fn boundary_is_inclusive() {
    let mut s = Scheduler::new();
    s.schedule_once(1.0).unwrap();
    assert_eq!(drain(&mut s, 1.0).len(), 1);
}

#[test]
fn cancel_stops_future_firings() {
    let mut s = Scheduler::new();
    let a = s.schedule_repeating(1.0).unwrap();
    let b = s.schedule_once(3.0).unwrap();
    assert_eq!(drain(&mut s, 1.5).len(), 1);
    assert!(s.cancel(a));
    assert!(!s.cancel(a));
    assert_eq!(s.pending(), 1);
    assert_eq!(s.cancel_all(), 1);
    assert!(!s.is_pending(b));
    assert!(drain(&mut s, 100.0).is_empty());
}

#[test]
fn clock_never_moves_backward() {
    let mut s = Scheduler::new();
    s.advance_to(5.0);
    s.advance_to(1.0);
    s.advance_to(f64::NAN);
    assert_eq!(s.now(), 5.0);
    s.schedule_once(0.5).unwrap();
    assert_eq!(drain(&mut s, 5.5)[0].at, 5.5);
}

#[test]
fn rejects_bad_durations() {
    let mut s = Scheduler::new();
    assert!(s.schedule_once(-1.0).is_err());
    assert!(s.schedule_once(f64::NAN).is_err());
    assert!(s.schedule_repeating(0.0).is_err());
    assert!(s.schedule_repeating(f64::INFINITY).is_err());
    assert_eq!(s.pending(), 0);
}
