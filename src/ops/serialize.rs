use crate::{
  observable::{CoreObservable, ObservableType},
  observer::{Observer, SerializedObserver},
};

/// Delivers the source through a [`SerializedObserver`].
#[derive(Clone)]
pub struct Serialize<S> {
  source: S,
}

impl<S> Serialize<S> {
  pub fn new(source: S) -> Self { Self { source } }
}

impl<S: ObservableType> ObservableType for Serialize<S> {
  type Item = S::Item;
  type Err = S::Err;
}

impl<S, O> CoreObservable<O> for Serialize<S>
where
  S: CoreObservable<SerializedObserver<O>>,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
  O: Observer<S::Item, S::Err> + Send + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(SerializedObserver::new(observer))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      atomic::{AtomicBool, AtomicUsize, Ordering},
      Arc,
    },
    thread,
  };

  use crate::{
    notification::{Notification, Recorder},
    prelude::*,
  };

  #[rxcore_macro::test]
  fn producers_on_many_threads_never_overlap() {
    let busy = Arc::new(AtomicBool::new(false));
    let count = Arc::new(AtomicUsize::new(0));
    let (c_busy, c_count) = (busy.clone(), count.clone());

    let subject = Subject::<usize, ()>::new();
    subject
      .clone()
      .serialize()
      .on_error(|_| {})
      .subscribe(move |_| {
        assert!(!c_busy.swap(true, Ordering::SeqCst));
        c_count.fetch_add(1, Ordering::SeqCst);
        c_busy.store(false, Ordering::SeqCst);
      });

    let producers: Vec<_> = (0..4)
      .map(|_| {
        let mut subject = subject.clone();
        thread::spawn(move || (0..100).for_each(|i| subject.next(i)))
      })
      .collect();
    for producer in producers {
      producer.join().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 400);
  }

  #[rxcore_macro::test]
  fn passes_notifications_through() {
    let recorder = Recorder::<i32, &str>::new();
    observable::create(|emitter: &mut dyn Emitter<i32, &'static str>| {
      emitter.next(1);
      emitter.complete();
    })
    .serialize()
    .subscribe_with(recorder.clone());
    assert_eq!(recorder.notifications(), vec![Notification::Next(1), Notification::Completed]);
  }
}
