//! Single-threaded timer queue
//!
//! Stands in for a host's `delayedCall` / `periodic` facilities. Timers are
//! driven by the session clock and only fire when the tick asks for due work,
//! so a callback can never run concurrently with the rest of the update.
//! Callbacks are plain data (`TimerAction`); the tick decides what they do.

/// Handle returned when scheduling; used to cancel or retune
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// One of the fixed opening spikes (1-based index)
    WarmupSpawn { index: u32 },
    /// Periodic obstacle generator
    SpawnCycle,
    /// Re-check whether the player still touches a platform
    SurfaceDebounce,
}

/// Periodic timers catch up at most this many missed cycles per advance
const MAX_CATCH_UP: u32 = 8;

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    action: TimerAction,
    due_ms: f64,
    /// Some(interval) for periodic timers
    interval_ms: Option<f64>,
    /// Catch-up firings so far in the current advance
    fired: u32,
}

/// Delayed and periodic timers keyed to a millisecond clock
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    timers: Vec<Timer>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of timers still armed
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Fire `action` once, `delay_ms` from now
    pub fn delayed_call(&mut self, delay_ms: f64, action: TimerAction) -> TimerId {
        self.schedule(delay_ms, None, action)
    }

    /// Fire `action` every `interval_ms`, first firing one interval from now
    pub fn periodic(&mut self, interval_ms: f64, action: TimerAction) -> TimerId {
        self.schedule(interval_ms, Some(interval_ms), action)
    }

    fn schedule(&mut self, delay_ms: f64, interval_ms: Option<f64>, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            action,
            due_ms: self.now_ms + delay_ms.max(0.0),
            interval_ms,
            fired: 0,
        });
        id
    }

    /// Change a periodic timer's interval. The cycle in progress is measured
    /// against the new interval. Returns false for unknown or one-shot timers.
    pub fn set_interval(&mut self, id: TimerId, interval_ms: f64) -> bool {
        let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        let Some(old) = timer.interval_ms else {
            return false;
        };
        let cycle_start = timer.due_ms - old;
        timer.due_ms = cycle_start + interval_ms;
        timer.interval_ms = Some(interval_ms);
        true
    }

    /// Disarm a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Disarm everything (session teardown)
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Move the clock forward. Due work is collected with `pop_due`.
    pub fn advance(&mut self, dt_ms: f64) {
        self.now_ms += dt_ms.max(0.0);
        for timer in &mut self.timers {
            timer.fired = 0;
        }
    }

    /// Next due timer, earliest first (ties broken by scheduling order).
    ///
    /// Periodic timers are re-armed before being returned, so an action that
    /// cancels its own timer takes effect immediately.
    pub fn pop_due(&mut self) -> Option<(TimerId, TimerAction)> {
        let now = self.now_ms;
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.0.cmp(&b.id.0))
            })
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let fired = (timer.id, timer.action);
        match timer.interval_ms {
            Some(interval) => {
                timer.fired += 1;
                timer.due_ms += interval;
                if timer.fired >= MAX_CATCH_UP && timer.due_ms <= now {
                    // Too far behind: skip the backlog rather than burst
                    timer.due_ms = now + interval;
                }
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler) -> Vec<TimerAction> {
        std::iter::from_fn(|| s.pop_due().map(|(_, a)| a)).collect()
    }

    #[test]
    fn test_delayed_call_fires_once() {
        let mut s = Scheduler::new();
        s.delayed_call(100.0, TimerAction::SurfaceDebounce);

        s.advance(99.0);
        assert!(drain(&mut s).is_empty());

        s.advance(1.0);
        assert_eq!(drain(&mut s), vec![TimerAction::SurfaceDebounce]);

        s.advance(500.0);
        assert!(drain(&mut s).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_periodic_rearms() {
        let mut s = Scheduler::new();
        s.periodic(1500.0, TimerAction::SpawnCycle);

        s.advance(1500.0);
        assert_eq!(drain(&mut s).len(), 1);
        s.advance(1499.0);
        assert!(drain(&mut s).is_empty());
        s.advance(1.0);
        assert_eq!(drain(&mut s).len(), 1);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_due_order_by_time_then_id() {
        let mut s = Scheduler::new();
        s.delayed_call(30.0, TimerAction::WarmupSpawn { index: 3 });
        s.delayed_call(10.0, TimerAction::WarmupSpawn { index: 1 });
        s.delayed_call(10.0, TimerAction::WarmupSpawn { index: 2 });

        s.advance(50.0);
        assert_eq!(
            drain(&mut s),
            vec![
                TimerAction::WarmupSpawn { index: 1 },
                TimerAction::WarmupSpawn { index: 2 },
                TimerAction::WarmupSpawn { index: 3 },
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let id = s.delayed_call(100.0, TimerAction::SurfaceDebounce);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));

        s.advance(200.0);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_cancel_all_prevents_stale_work() {
        let mut s = Scheduler::new();
        s.periodic(100.0, TimerAction::SpawnCycle);
        s.delayed_call(50.0, TimerAction::SurfaceDebounce);
        s.cancel_all();

        s.advance(1000.0);
        assert!(drain(&mut s).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_set_interval_applies_to_current_cycle() {
        let mut s = Scheduler::new();
        let id = s.periodic(1500.0, TimerAction::SpawnCycle);

        s.advance(1000.0);
        assert!(s.set_interval(id, 1300.0));
        s.advance(299.0);
        assert!(drain(&mut s).is_empty());
        s.advance(1.0);
        assert_eq!(drain(&mut s).len(), 1);

        // Next cycle uses the new interval too
        s.advance(1300.0);
        assert_eq!(drain(&mut s).len(), 1);
    }

    #[test]
    fn test_set_interval_rejects_one_shot() {
        let mut s = Scheduler::new();
        let id = s.delayed_call(100.0, TimerAction::SurfaceDebounce);
        assert!(!s.set_interval(id, 50.0));
    }

    #[test]
    fn test_periodic_catch_up_is_bounded() {
        let mut s = Scheduler::new();
        s.periodic(1.0, TimerAction::SpawnCycle);
        s.advance(1000.0);
        assert_eq!(drain(&mut s).len(), MAX_CATCH_UP as usize);
    }
}
