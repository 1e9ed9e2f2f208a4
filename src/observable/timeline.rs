use std::convert::Infallible;

use crate::{
  lock::SequentialLock,
  notification::Notification,
  observable::{CoreObservable, ObservableType},
  observer::Observer,
  scheduler::{Duration, ImmediateScheduler, Scheduler},
  subscription::SubscriptionHandle,
};

/// A cold source replaying notifications at fixed offsets from the moment
/// it is subscribed.
///
/// Events are replayed in time order (stable for equal times) through the
/// scheduler, each one scheduled once the previous one ran. Every task runs
/// inside one [`SequentialLock`], so handlers never overlap. A scheduler that
/// runs tasks inline replays any number of events at constant stack depth.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// TestScheduler::init();
/// let recorder = Recorder::<i32, RxError>::new();
/// observable::timeline_on(
///   vec![
///     (Duration::from_millis(10), Notification::Next(1)),
///     (Duration::from_millis(20), Notification::Next(2)),
///     (Duration::from_millis(30), Notification::Completed),
///   ],
///   TestScheduler,
/// )
/// .sum()
/// .subscribe_with(recorder.clone());
///
/// TestScheduler::advance_by(Duration::from_millis(20));
/// assert!(recorder.is_empty());
/// TestScheduler::advance_by(Duration::from_millis(10));
/// assert_eq!(recorder.values(), vec![3]);
/// ```
pub fn timeline_on<Item, Err, S>(
  events: Vec<(Duration, Notification<Item, Err>)>, scheduler: S,
) -> Timeline<Item, Err, S> {
  let mut events = events;
  events.sort_by_key(|(at, _)| *at);
  Timeline { events, scheduler }
}

/// [`timeline_on`] with the default scheduler.
pub fn timeline<Item, Err>(
  events: Vec<(Duration, Notification<Item, Err>)>,
) -> Timeline<Item, Err, ImmediateScheduler> {
  timeline_on(events, ImmediateScheduler)
}

#[derive(Clone)]
pub struct Timeline<Item, Err, S> {
  events: Vec<(Duration, Notification<Item, Err>)>,
  scheduler: S,
}

impl<Item, Err, S> ObservableType for Timeline<Item, Err, S> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err, S, O> CoreObservable<O> for Timeline<Item, Err, S>
where
  Item: Send + 'static,
  Err: Send + 'static,
  S: Scheduler + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = SubscriptionHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let handle = SubscriptionHandle::new();
    let lock = SequentialLock::new();
    handle.add(lock.clone());
    let replay = Replay {
      events: self.events.into_iter(),
      elapsed: Duration::ZERO,
      observer: Some(observer),
      scheduler: self.scheduler,
      lock,
      handle: handle.clone(),
    };
    replay.schedule_next();
    handle
  }
}

struct Replay<Item, Err, S, O> {
  events: std::vec::IntoIter<(Duration, Notification<Item, Err>)>,
  elapsed: Duration,
  // Taken by the terminal notification.
  observer: Option<O>,
  scheduler: S,
  lock: SequentialLock<Infallible>,
  handle: SubscriptionHandle,
}

impl<Item, Err, S, O> Replay<Item, Err, S, O>
where
  Item: Send + 'static,
  Err: Send + 'static,
  S: Scheduler + Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  fn schedule_next(mut self) {
    if self.handle.is_closed() {
      return;
    }
    let Some((at, notification)) = self.events.next() else {
      return;
    };
    let delay = at.saturating_sub(self.elapsed);
    self.elapsed = at;

    let scheduler = self.scheduler.clone();
    let handle = self.handle.clone();
    let lock = self.lock.clone();
    let task = scheduler.schedule(
      move || {
        // An inline scheduler lands here from inside the previous task; the
        // lock then only queues this one, and the running drain picks it up.
        let _ = lock.wait(move || {
          if self.handle.is_closed() {
            return Ok(());
          }
          let terminal = notification.is_terminal();
          notification.deliver(&mut self.observer);
          if terminal {
            self.handle.dispose();
          } else {
            self.schedule_next();
          }
          Ok(())
        });
      },
      Some(delay),
    );
    handle.add(task);
  }
}
