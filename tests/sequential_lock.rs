use std::{
  panic::{self, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
  },
  thread,
};

use rxcore::prelude::*;

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

type Log = Arc<Mutex<Vec<&'static str>>>;

fn record(log: &Log, tag: &'static str) -> impl FnOnce() -> Result<(), String> + Send + 'static {
  let log = log.clone();
  move || {
    log.lock().unwrap().push(tag);
    Ok(())
  }
}

#[rxcore_macro::test]
fn recursive_waits_run_in_enqueue_order() {
  init_tracing();
  let lock = SequentialLock::<String>::new();
  let log: Log = Arc::new(Mutex::new(vec![]));

  let (c_lock, c_log) = (lock.clone(), log.clone());
  lock
    .wait(move || {
      c_log.lock().unwrap().push("a1 start");
      c_lock.wait(record(&c_log, "a2"))?;
      let (cc_lock, cc_log) = (c_lock.clone(), c_log.clone());
      c_lock.wait(move || {
        cc_log.lock().unwrap().push("a3");
        cc_lock.wait(record(&cc_log, "a5"))
      })?;
      c_lock.wait(record(&c_log, "a4"))?;
      c_log.lock().unwrap().push("a1 end");
      Ok(())
    })
    .unwrap();

  assert_eq!(*log.lock().unwrap(), vec!["a1 start", "a1 end", "a2", "a3", "a4", "a5"]);
  assert!(!lock.is_draining());
}

#[rxcore_macro::test]
fn concurrent_waits_never_overlap() {
  init_tracing();
  const THREADS: usize = 8;
  const PER_THREAD: usize = 500;

  let lock = SequentialLock::<()>::new();
  let busy = Arc::new(AtomicBool::new(false));
  let runs = Arc::new(AtomicUsize::new(0));
  let order = Arc::new(Mutex::new(vec![Vec::new(); THREADS]));
  let barrier = Arc::new(Barrier::new(THREADS));

  let workers: Vec<_> = (0..THREADS)
    .map(|t| {
      let (lock, busy, runs, order, barrier) =
        (lock.clone(), busy.clone(), runs.clone(), order.clone(), barrier.clone());
      thread::spawn(move || {
        barrier.wait();
        for i in 0..PER_THREAD {
          let (busy, runs, order) = (busy.clone(), runs.clone(), order.clone());
          lock
            .wait(move || {
              assert!(!busy.swap(true, Ordering::SeqCst), "two actions overlapped");
              order.lock().unwrap()[t].push(i);
              runs.fetch_add(1, Ordering::SeqCst);
              busy.store(false, Ordering::SeqCst);
              Ok(())
            })
            .unwrap();
        }
      })
    })
    .collect();
  for worker in workers {
    worker.join().unwrap();
  }

  assert_eq!(runs.load(Ordering::SeqCst), THREADS * PER_THREAD);
  // Each thread's own actions keep their relative order.
  for per_thread in order.lock().unwrap().iter() {
    assert_eq!(*per_thread, (0..PER_THREAD).collect::<Vec<_>>());
  }
  assert_eq!(lock.pending(), 0);
}

#[rxcore_macro::test]
fn fault_latches_for_good() {
  init_tracing();
  let lock = SequentialLock::<String>::new();
  let log: Log = Arc::new(Mutex::new(vec![]));

  let (c_lock, c_log) = (lock.clone(), log.clone());
  let result = lock.wait(move || {
    c_lock.wait(record(&c_log, "queued before the fault"))?;
    Err("boom".to_string())
  });
  assert_eq!(result, Err("boom".to_string()));
  assert!(lock.is_faulted());

  for _ in 0..3 {
    assert_eq!(lock.wait(record(&log, "after the fault")), Ok(()));
  }
  assert!(log.lock().unwrap().is_empty());
  assert!(lock.is_faulted());
}

#[rxcore_macro::test]
fn panic_faults_the_lock_and_reaches_the_drainer() {
  init_tracing();
  let lock = SequentialLock::<()>::new();
  let ran = Arc::new(AtomicBool::new(false));

  let c_lock = lock.clone();
  let c_ran = ran.clone();
  let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
    lock.wait(move || {
      c_lock.wait(move || {
        c_ran.store(true, Ordering::SeqCst);
        Ok(())
      })?;
      panic!("handler failed");
    })
  }));

  assert!(outcome.is_err());
  assert!(lock.is_faulted());
  assert!(!lock.is_draining());
  assert!(!ran.load(Ordering::SeqCst));
}

#[rxcore_macro::test]
fn dispose_from_running_action() {
  init_tracing();
  let lock = SequentialLock::<String>::new();
  let log: Log = Arc::new(Mutex::new(vec![]));

  let (c_lock, c_log) = (lock.clone(), log.clone());
  lock
    .wait(move || {
      c_lock.wait(record(&c_log, "enqueued before dispose"))?;
      c_lock.dispose();
      c_lock.wait(record(&c_log, "enqueued after dispose"))?;
      c_log.lock().unwrap().push("disposer");
      Ok(())
    })
    .unwrap();

  lock.wait(record(&log, "much later")).unwrap();
  assert_eq!(*log.lock().unwrap(), vec!["disposer"]);
  assert!(lock.is_disposed());
}

#[rxcore_macro::test]
fn disposing_twice_is_harmless() {
  let lock = SequentialLock::<()>::new();
  lock.clone().unsubscribe();
  lock.dispose();
  assert!(lock.is_closed());
  assert_eq!(lock.pending(), 0);
}
