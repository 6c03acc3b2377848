//! # Lifecycle
//!
//! Deterministic frame scheduling and throttling primitives for the UI core.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Frames run when the host says so, not on a timer
//! - **Testability first**: A frame is a queue drained by `run_frame`
//! - **Cancellable**: Every scheduled callback has a handle that can revoke it
//! - **No async runtime required**: Single-threaded, `Rc`-shared state
//!
//! ## Core Concepts
//!
//! - `FrameScheduler`: Cloneable handle to the animation-frame and idle queues
//! - `FrameHandle`: Identifies one scheduled callback so it can be cancelled
//! - `RafThrottle`: Coalesces bursts of calls into one callback per frame

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Identifies a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Returns the raw sequence number
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame:{}", self.0)
    }
}

type Callback = Box<dyn FnOnce()>;

/// Which queue a callback waits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Queue {
    Frame,
    Idle,
}

/// Shared state between all clones of a scheduler
struct SchedulerQueues {
    next_id: u64,
    frames: VecDeque<(FrameHandle, Callback)>,
    idle: VecDeque<(FrameHandle, Callback)>,
}

impl SchedulerQueues {
    fn queue_mut(&mut self, queue: Queue) -> &mut VecDeque<(FrameHandle, Callback)> {
        match queue {
            Queue::Frame => &mut self.frames,
            Queue::Idle => &mut self.idle,
        }
    }
}

/// Animation-frame and idle-callback scheduler
///
/// Callbacks requested while a frame is running are deferred to the next
/// frame, matching how a browser treats `requestAnimationFrame` from inside
/// a frame callback.
///
/// ## Example
///
/// ```
/// use lifecycle::FrameScheduler;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let scheduler = FrameScheduler::new();
/// let hits = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&hits);
/// scheduler.request_frame(move || counter.set(counter.get() + 1));
/// assert_eq!(hits.get(), 0);
///
/// assert_eq!(scheduler.run_frame(), 1);
/// assert_eq!(hits.get(), 1);
/// ```
#[derive(Clone)]
pub struct FrameScheduler {
    shared: Rc<RefCell<SchedulerQueues>>,
}

impl FrameScheduler {
    /// Creates a scheduler with empty queues
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(SchedulerQueues {
                next_id: 0,
                frames: VecDeque::new(),
                idle: VecDeque::new(),
            })),
        }
    }

    /// Schedules a callback for the next animation frame
    pub fn request_frame(&self, callback: impl FnOnce() + 'static) -> FrameHandle {
        self.push(Queue::Frame, Box::new(callback))
    }

    /// Schedules a callback for the next idle period
    pub fn request_idle(&self, callback: impl FnOnce() + 'static) -> FrameHandle {
        self.push(Queue::Idle, Box::new(callback))
    }

    /// Cancels a pending callback
    ///
    /// Returns false if the callback already ran or was never scheduled here.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        let mut queues = self.shared.borrow_mut();
        for queue in [Queue::Frame, Queue::Idle] {
            let pending = queues.queue_mut(queue);
            if let Some(pos) = pending.iter().position(|(h, _)| *h == handle) {
                pending.remove(pos);
                tracing::trace!(%handle, "cancelled scheduled callback");
                return true;
            }
        }
        false
    }

    /// Runs every frame callback that was pending when the frame started
    ///
    /// Returns the number of callbacks executed.
    pub fn run_frame(&self) -> usize {
        self.drain(Queue::Frame)
    }

    /// Runs every idle callback that was pending when the call started
    pub fn run_idle(&self) -> usize {
        self.drain(Queue::Idle)
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.shared.borrow().frames.len()
    }

    /// Number of callbacks waiting for idle time
    pub fn pending_idle(&self) -> usize {
        self.shared.borrow().idle.len()
    }

    fn push(&self, queue: Queue, callback: Callback) -> FrameHandle {
        let mut queues = self.shared.borrow_mut();
        let handle = FrameHandle(queues.next_id);
        queues.next_id += 1;
        queues.queue_mut(queue).push_back((handle, callback));
        handle
    }

    fn drain(&self, queue: Queue) -> usize {
        let cutoff = self.shared.borrow().next_id;
        let mut executed = 0;

        loop {
            // The borrow is released before the callback runs so that
            // callbacks may schedule or cancel freely.
            let next = {
                let mut queues = self.shared.borrow_mut();
                let pending = queues.queue_mut(queue);
                match pending.front() {
                    Some((handle, _)) if handle.0 < cutoff => pending.pop_front(),
                    _ => None,
                }
            };

            match next {
                Some((_, callback)) => {
                    callback();
                    executed += 1;
                }
                None => break,
            }
        }

        executed
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending_frames", &self.pending_frames())
            .field("pending_idle", &self.pending_idle())
            .finish()
    }
}

/// Throttles a callback to at most one invocation per animation frame
///
/// Calling `call` while a frame is already pending is a no-op; the pending
/// frame runs the callback once. `cancel` revokes the pending frame.
pub struct RafThrottle {
    scheduler: FrameScheduler,
    pending: Rc<Cell<Option<FrameHandle>>>,
    callback: Rc<dyn Fn()>,
}

impl RafThrottle {
    /// Wraps a callback so it runs on the next frame
    pub fn new(scheduler: FrameScheduler, callback: impl Fn() + 'static) -> Self {
        Self {
            scheduler,
            pending: Rc::new(Cell::new(None)),
            callback: Rc::new(callback),
        }
    }

    /// Requests a run on the next frame unless one is already pending
    pub fn call(&self) {
        if self.pending.get().is_some() {
            tracing::trace!("throttled call coalesced into pending frame");
            return;
        }

        let pending = Rc::clone(&self.pending);
        let callback = Rc::clone(&self.callback);
        let handle = self.scheduler.request_frame(move || {
            pending.set(None);
            callback();
        });
        self.pending.set(Some(handle));
    }

    /// Cancels the pending frame, if any
    pub fn cancel(&self) -> bool {
        match self.pending.take() {
            Some(handle) => self.scheduler.cancel(handle),
            None => false,
        }
    }

    /// Returns true if a frame is scheduled
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl fmt::Debug for RafThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RafThrottle")
            .field("pending", &self.pending.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone + 'static) {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        (hits, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = FrameScheduler::new();
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_idle(), 0);
        assert_eq!(scheduler.run_frame(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let scheduler = FrameScheduler::new();
        let a = scheduler.request_frame(|| {});
        let b = scheduler.request_idle(|| {});
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_frame_runs_in_request_order() {
        let scheduler = FrameScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = Rc::clone(&order);
            scheduler.request_frame(move || order.borrow_mut().push(i));
        }

        assert_eq!(scheduler.run_frame(), 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_nested_request_waits_for_next_frame() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();

        let inner = scheduler.clone();
        scheduler.request_frame(move || {
            inner.request_frame(bump);
        });

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending_frames(), 1);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cancel_pending_frame() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();

        let handle = scheduler.request_frame(bump);
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));

        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_cancel_from_inside_frame() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();

        let victim = Rc::new(Cell::new(None));
        let slot = Rc::clone(&victim);
        let inner = scheduler.clone();
        scheduler.request_frame(move || {
            if let Some(handle) = slot.get() {
                inner.cancel(handle);
            }
        });
        victim.set(Some(scheduler.request_frame(bump)));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_idle_queue_is_separate() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();

        scheduler.request_idle(bump);
        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.get(), 0);

        assert_eq!(scheduler.run_idle(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_throttle_coalesces_calls() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();
        let throttle = RafThrottle::new(scheduler.clone(), bump);

        throttle.call();
        throttle.call();
        throttle.call();
        assert!(throttle.is_pending());
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.run_frame();
        assert_eq!(hits.get(), 1);
        assert!(!throttle.is_pending());

        throttle.call();
        scheduler.run_frame();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_throttle_cancel() {
        let scheduler = FrameScheduler::new();
        let (hits, bump) = counter();
        let throttle = RafThrottle::new(scheduler.clone(), bump);

        assert!(!throttle.cancel());

        throttle.call();
        assert!(throttle.cancel());
        assert!(!throttle.is_pending());
        assert_eq!(scheduler.pending_frames(), 0);

        scheduler.run_frame();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_frame_handle_display() {
        let scheduler = FrameScheduler::new();
        let handle = scheduler.request_frame(|| {});
        assert_eq!(handle.to_string(), "frame:0");
        assert_eq!(handle.as_u64(), 0);
    }
}
