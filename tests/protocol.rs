use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  thread,
};

use rxcore::prelude::*;

/// Exactly one terminal notification, and it is the last one.
fn assert_well_formed<Item: Clone, Err: Clone>(recorder: &Recorder<Item, Err>, op: &str) {
  let notifications = recorder.notifications();
  assert_eq!(recorder.terminal_count(), 1, "`{op}` must terminate exactly once");
  assert!(notifications.last().is_some_and(Notification::is_terminal), "`{op}` ended with next");
}

fn feed(subject: &mut Subject<i32, RxError>, values: &[i32], end: &Option<RxError>) {
  for v in values {
    subject.next(*v);
  }
  match end {
    Some(err) => subject.clone().error(err.clone()),
    None => subject.clone().complete(),
  }
  // Nothing reaches a terminated subject's former subscribers.
  subject.next(99);
}

macro_rules! check_ops {
  ($values:expr, $end:expr; $($op:ident ( $($arg:expr),* )),+ $(,)?) => {$(
    let recorder = Recorder::new();
    let mut subject = Subject::<i32, RxError>::new();
    let handle = subject.clone().$op($($arg),*).subscribe_with(recorder.clone());
    feed(&mut subject, $values, $end);
    assert_well_formed(&recorder, stringify!($op));
    assert!(handle.is_closed(), "`{}` kept its source", stringify!($op));
    assert_eq!(subject.observer_count(), 0);
  )+};
}

#[rxcore_macro::test]
fn every_operator_terminates_exactly_once() {
  let inputs: [&[i32]; 6] = [&[], &[1], &[1, 2, 3], &[5, -1, 7], &[i32::MAX, 1], &[0, 0, 0]];
  let ends = [None, Some(RxError::NoElements)];

  for values in inputs {
    for end in &ends {
      check_ops!(values, end;
        first(), first_or_default(), last(), last_or_default(),
        single(), single_or_default(), element_at(1), element_at_or_default(1),
        sum(), count(), count_where(|v: &i32| *v > 0), average(),
        min(), max(), min_by(|v: &i32| *v), max_by(|v: &i32| v.abs()),
        min_by_cmp(|a: &i32, b: &i32| a.cmp(b)), max_by_cmp(|a: &i32, b: &i32| a.cmp(b)),
        any(), any_with(|v: &i32| *v < 0), all(|v: &i32| *v > 0), contains(2), is_empty(),
        aggregate(|a, b| a.wrapping_add(b)), aggregate_seeded(0i64, |a, b| a + i64::from(b)),
        to_vec(), to_map(|v: &i32| *v), to_lookup(|v: &i32| v % 2),
        try_count_where(|v: &i32| if *v < 0 { Err(RxError::Overflow) } else { Ok(true) }),
        try_max_by(|v: &i32| v.checked_mul(2).ok_or(RxError::Overflow)),
        try_aggregate(|a: i32, b: i32| a.checked_add(b).ok_or(RxError::Overflow)),
      );
    }
  }
}

#[rxcore_macro::test]
fn nothing_is_delivered_after_dispose() {
  let recorder = Recorder::<i32, RxError>::new();
  let mut subject = Subject::<i32, RxError>::new();
  let handle = subject.clone().sum().subscribe_with(recorder.clone());

  subject.next(1);
  handle.clone().unsubscribe();
  handle.dispose();
  subject.next(2);
  subject.complete();
  assert!(recorder.is_empty());
}

#[rxcore_macro::test]
fn disposed_sequence_equal_ignores_both_sides() {
  let recorder = Recorder::<bool, RxError>::new();
  let (left, right) = (Subject::<i32, RxError>::new(), Subject::<i32, RxError>::new());
  let handle = left.clone().sequence_equal(right.clone()).subscribe_with(recorder.clone());

  handle.dispose();
  left.complete();
  right.complete();
  assert!(recorder.is_empty());
}

#[rxcore_macro::test]
fn virtual_time_dispose_cancels_delivery() {
  TestScheduler::init();
  let recorder = Recorder::<i32, RxError>::new();
  let handle = observable::timeline_on(
    vec![
      (Duration::from_millis(10), Notification::Next(1)),
      (Duration::from_millis(20), Notification::Next(2)),
      (Duration::from_millis(30), Notification::Completed),
    ],
    TestScheduler,
  )
  .subscribe_with(recorder.clone());

  TestScheduler::advance_by(Duration::from_millis(15));
  handle.dispose();
  TestScheduler::flush();
  assert_eq!(recorder.notifications(), vec![Notification::Next(1)]);
  assert!(TestScheduler::is_empty());
}

#[rxcore_macro::test]
fn results_arrive_on_virtual_time() {
  TestScheduler::init();
  let recorder = Recorder::<bool, RxError>::new();
  observable::timeline_on(
    vec![
      (Duration::from_millis(10), Notification::Next(-2)),
      (Duration::from_millis(20), Notification::Next(3)),
      (Duration::from_millis(30), Notification::Next(-4)),
      (Duration::from_millis(40), Notification::Completed),
    ],
    TestScheduler,
  )
  .any_with(|v| *v > 0)
  .subscribe_with(recorder.clone());

  TestScheduler::advance_to(Duration::from_millis(19));
  assert!(recorder.is_empty());
  TestScheduler::advance_to(Duration::from_millis(20));
  assert_eq!(recorder.notifications(), vec![Notification::Next(true), Notification::Completed]);
  // Nothing else gets scheduled once the source is released.
  assert!(TestScheduler::is_empty());
}

#[rxcore_macro::test]
fn cold_sources_replay_per_subscription() {
  let source = observable::from_iter(vec![1, 2, 3]);
  let (a, b) = (Recorder::<i32, RxError>::new(), Recorder::<i32, RxError>::new());
  source.clone().sum().subscribe_with(a.clone());
  source.last().subscribe_with(b.clone());
  assert_eq!(a.values(), vec![6]);
  assert_eq!(b.values(), vec![3]);
}

#[rxcore_macro::test]
fn hot_source_with_threaded_producers() {
  let subject = Subject::<usize, RxError>::new();
  let recorder = Recorder::<usize, RxError>::new();
  subject.clone().count().subscribe_with(recorder.clone());

  let started = Arc::new(AtomicUsize::new(0));
  let producers: Vec<_> = (0..4)
    .map(|_| {
      let mut subject = subject.clone();
      let started = started.clone();
      thread::spawn(move || {
        started.fetch_add(1, Ordering::SeqCst);
        (0..250).for_each(|i| subject.next(i));
      })
    })
    .collect();
  for producer in producers {
    producer.join().unwrap();
  }
  subject.clone().complete();

  assert_eq!(started.load(Ordering::SeqCst), 4);
  assert_eq!(recorder.notifications(), vec![Notification::Next(1000), Notification::Completed]);
}

#[rxcore_macro::test]
fn closure_subscription_for_infallible_sources() {
  let mut seen = vec![];
  observable::from_iter(1..=3).on_error(|_: RxError| {}).subscribe(|v| seen.push(v));
  assert_eq!(seen, vec![1, 2, 3]);
}
