//! Virtual-time scheduler for deterministic tests.
//!
//! Time only moves when a test calls [`TestScheduler::advance_by`],
//! [`TestScheduler::advance_to`] or [`TestScheduler::flush`]. Due tasks then
//! run synchronously on the calling thread, ordered by due time and, for equal
//! times, by the order they were scheduled in.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxcore::scheduler::{Duration, Scheduler, TestScheduler};
//!
//! TestScheduler::init();
//! let log = Arc::new(Mutex::new(vec![]));
//! let c_log = log.clone();
//! TestScheduler.schedule(move || c_log.lock().unwrap().push(1), Some(Duration::from_millis(10)));
//!
//! TestScheduler::advance_by(Duration::from_millis(9));
//! assert!(log.lock().unwrap().is_empty());
//! TestScheduler::advance_by(Duration::from_millis(1));
//! assert_eq!(*log.lock().unwrap(), vec![1]);
//! ```
//!
//! The state is thread-local: every test thread has its own clock and queue.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, TaskHandle};

struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
  initialized: bool,
}

impl Default for TestSchedulerState {
  fn default() -> Self {
    Self {
      virtual_time: Duration::ZERO,
      task_queue: BinaryHeap::new(),
      next_task_id: 0,
      initialized: false,
    }
  }
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Box<dyn FnOnce()>,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState>
    = RefCell::new(TestSchedulerState::default());
}

/// A virtual-time scheduler backed by thread-local state.
///
/// Zero-sized: every instance on a thread shares the same clock and queue.
#[derive(Clone, Copy, Default, Debug)]
pub struct TestScheduler;

impl TestScheduler {
  /// Reset the clock to zero and drop every pending task.
  ///
  /// Must be called at the start of each test; the other methods panic
  /// otherwise.
  pub fn init() {
    let dropped = TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.next_task_id = 0;
      state.initialized = true;
      std::mem::take(&mut state.task_queue)
    });
    drop(dropped);
  }

  fn ensure_initialized() {
    TEST_SCHEDULER_STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// The current virtual time.
  pub fn now() -> Duration {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time)
  }

  /// Number of tasks waiting in the queue, cancelled ones included.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().task_queue.len())
  }

  pub fn is_empty() -> bool { Self::pending_count() == 0 }

  fn execute_tasks_until(target_time: Option<Duration>) {
    loop {
      let task = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.is_none_or(|limit| peek.scheduled_time <= limit));
        if !due {
          return None;
        }
        let scheduled_task = state.task_queue.pop()?;
        state.virtual_time = scheduled_task.scheduled_time;
        Some(scheduled_task)
      });

      let Some(ScheduledTask { task, handle, .. }) = task else {
        break;
      };
      // The borrow is released here, so the task may schedule more work.
      handle.run(task);
    }
  }

  /// Advance the clock by `duration`, running every task that becomes due.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);
    Self::advance_to(target_time);
  }

  /// Advance the clock to `time`, running every task due until then. Moving
  /// backwards is a no-op.
  pub fn advance_to(time: Duration) {
    Self::ensure_initialized();
    if time < Self::now() {
      return;
    }
    Self::execute_tasks_until(Some(time));
    TEST_SCHEDULER_STATE.with(|state| {
      state.borrow_mut().virtual_time = time;
    });
  }

  /// Run every pending task, jumping the clock to each task's due time.
  pub fn flush() {
    Self::ensure_initialized();
    Self::execute_tasks_until(None);
  }
}

impl Scheduler for TestScheduler {
  fn schedule<F>(&self, task: F, delay: Option<Duration>) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let scheduled_time = state.virtual_time + delay.unwrap_or(Duration::ZERO);
      let task_id = state.next_task_id;
      state.next_task_id += 1;

      let handle = TaskHandle::new();
      state.task_queue.push(ScheduledTask {
        scheduled_time,
        task_id,
        task: Box::new(task),
        handle: handle.clone(),
      });
      handle
    })
  }
}
