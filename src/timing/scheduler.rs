use std::cell::RefCell;
#[cfg(test)]
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use gloo_timers::callback::Timeout;

pub type Task = Box<dyn FnOnce()>;

/// Handle returned by [`Scheduler::schedule_once`], used to cancel one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelToken(u64);

/// Identifies whoever owns a group of scheduled tasks (one widget, one timer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        OwnerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One-shot timer registry. Tasks are grouped by owner so that teardown is a
/// single `cancel_all` call.
pub trait Scheduler {
    fn schedule_once(&self, owner: OwnerId, delay_ms: u32, task: Task) -> CancelToken;

    fn cancel(&self, token: CancelToken);

    fn cancel_all(&self, owner: OwnerId);

    /// Number of tasks still waiting to fire for `owner`.
    fn pending(&self, owner: OwnerId) -> usize;
}

#[derive(Default)]
struct BrowserTimers {
    next_token: u64,
    timers: HashMap<CancelToken, (OwnerId, Timeout)>,
}

/// Scheduler backed by `setTimeout`. Dropping a `Timeout` clears it, so
/// removing an entry from the map is enough to cancel.
#[derive(Clone, Default)]
pub struct BrowserScheduler {
    inner: Rc<RefCell<BrowserTimers>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule_once(&self, owner: OwnerId, delay_ms: u32, task: Task) -> CancelToken {
        let token = {
            let mut inner = self.inner.borrow_mut();
            inner.next_token += 1;
            CancelToken(inner.next_token)
        };

        let registry: Weak<RefCell<BrowserTimers>> = Rc::downgrade(&self.inner);
        let timeout = Timeout::new(delay_ms, move || {
            let fired = registry
                .upgrade()
                .and_then(|inner| inner.borrow_mut().timers.remove(&token));
            // Run outside the borrow: the task usually schedules its successor.
            task();
            drop(fired);
        });

        self.inner.borrow_mut().timers.insert(token, (owner, timeout));
        token
    }

    fn cancel(&self, token: CancelToken) {
        let removed = self.inner.borrow_mut().timers.remove(&token);
        drop(removed);
    }

    fn cancel_all(&self, owner: OwnerId) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|_, (task_owner, _)| *task_owner != owner);
    }

    fn pending(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .timers
            .values()
            .filter(|(task_owner, _)| *task_owner == owner)
            .count()
    }
}

#[cfg(test)]
struct QueuedTask {
    token: CancelToken,
    owner: OwnerId,
    task: Task,
}

#[cfg(test)]
#[derive(Default)]
struct VirtualQueue {
    now_ms: u64,
    next_seq: u64,
    // Keyed by (due time, insertion order) so equal deadlines fire FIFO.
    tasks: BTreeMap<(u64, u64), QueuedTask>,
}

/// Deterministic scheduler driven by an explicit virtual clock.
#[cfg(test)]
#[derive(Default)]
pub struct VirtualScheduler {
    inner: RefCell<VirtualQueue>,
}

#[cfg(test)]
impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Moves virtual time forward by `ms`, running every task that falls due
    /// on the way, including ones scheduled by the tasks themselves.
    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now_ms + ms;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                match inner.tasks.first_key_value() {
                    Some((&(due, _), _)) if due <= target => {
                        inner.now_ms = due;
                        inner.tasks.pop_first().map(|(_, queued)| queued)
                    }
                    _ => None,
                }
            };
            match next {
                Some(queued) => (queued.task)(),
                None => break,
            }
        }
        self.inner.borrow_mut().now_ms = target;
    }

    pub fn total_pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }
}

#[cfg(test)]
impl Scheduler for VirtualScheduler {
    fn schedule_once(&self, owner: OwnerId, delay_ms: u32, task: Task) -> CancelToken {
        let mut inner = self.inner.borrow_mut();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        let due = inner.now_ms + u64::from(delay_ms);
        let token = CancelToken(seq);
        inner.tasks.insert((due, seq), QueuedTask { token, owner, task });
        token
    }

    fn cancel(&self, token: CancelToken) {
        self.inner
            .borrow_mut()
            .tasks
            .retain(|_, queued| queued.token != token);
    }

    fn cancel_all(&self, owner: OwnerId) {
        self.inner
            .borrow_mut()
            .tasks
            .retain(|_, queued| queued.owner != owner);
    }

    fn pending(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .tasks
            .values()
            .filter(|queued| queued.owner == owner)
            .count()
    }
}
