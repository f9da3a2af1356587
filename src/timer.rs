//! Frame-driven timers.
//!
//! Nothing here sleeps or spawns threads. Timers are advanced by the same
//! `dt` that drives the rest of the scene, and due payloads are handed back
//! to the caller in the order they fell due.

/// Handle returned by the scheduling methods, used to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    handle: TimerHandle,
    remaining: f32,
    /// `Some` for repeating timers.
    interval: Option<f32>,
    payload: T,
}

/// A queue of one-shot and repeating timers carrying payloads of type `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_handle: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Fire `payload` once after `delay` seconds.
    pub fn schedule_once(&mut self, delay: f32, payload: T) -> TimerHandle {
        let handle = self.handle();
        self.timers.push(Timer {
            handle,
            remaining: delay.max(0.0),
            interval: None,
            payload,
        });
        handle
    }

    /// Fire `payload` every `interval` seconds, first after one interval.
    ///
    /// Intervals are floored at a millisecond so a zero interval cannot
    /// fire forever within a single advance.
    pub fn schedule_repeating(&mut self, interval: f32, payload: T) -> TimerHandle {
        let interval = interval.max(1e-3);
        let handle = self.handle();
        self.timers.push(Timer {
            handle,
            remaining: interval,
            interval: Some(interval),
            payload,
        });
        handle
    }

    /// Cancel a timer. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Advance by `dt` seconds and return every payload that fell due.
    ///
    /// Payloads are ordered by due time; a repeating timer fires once per
    /// interval crossed.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let dt = dt.max(0.0);
        // (due offset within this advance, insertion order, payload)
        let mut due: Vec<(f32, usize, T)> = Vec::new();

        for timer in &mut self.timers {
            let mut offset = timer.remaining;
            if offset > dt {
                timer.remaining -= dt;
                continue;
            }
            match timer.interval {
                None => {
                    due.push((offset, due.len(), timer.payload.clone()));
                    timer.remaining = -1.0;
                }
                Some(interval) => {
                    while offset <= dt {
                        due.push((offset, due.len(), timer.payload.clone()));
                        offset += interval;
                    }
                    timer.remaining = offset - dt;
                }
            }
        }

        self.timers.retain(|t| t.interval.is_some() || t.remaining >= 0.0);
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, payload)| payload).collect()
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
