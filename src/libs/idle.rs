//! Inactivity policy for a signed-in session.
//!
//! [`IdleMonitor`] is a finite-state machine over [`SessionState`]:
//!
//! ```text
//!   Idle --enable--> Active --warning_delay--> Warning --grace elapsed--> LoggedOut
//!                     ^  |                        |
//!                     |  +--activity (debounced)  +--stay_signed_in--> Active
//!                     +---------------------------+
//! ```
//!
//! All timer bookkeeping goes through [`Scheduler`], and every state change
//! goes through a single transition function that cancels every timer the
//! monitor owns before scheduling the timers of the next state. A timer that
//! fires after it was cancelled is recognised by its [`TimerId`] and dropped.
//!
//! Activity while the warning is shown does not dismiss it; only
//! [`IdleMonitor::stay_signed_in`] does.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dha::libs::idle::{IdleConfig, IdleMonitor, VirtualScheduler};
//!
//! let logouts = Arc::new(AtomicUsize::new(0));
//! let counter = logouts.clone();
//! let config = IdleConfig::new(Duration::from_secs(5), Duration::from_secs(10));
//! let mut monitor = IdleMonitor::new(config, VirtualScheduler::new(), move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! monitor.set_enabled(true);
//! monitor.advance(Duration::from_secs(5));
//! assert!(monitor.warning_visible());
//! assert_eq!(monitor.time_remaining_display(), "0:05");
//!
//! monitor.advance(Duration::from_secs(5));
//! assert_eq!(logouts.load(Ordering::SeqCst), 1);
//! ```

use crate::libs::config::SessionConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    Warning,
    Countdown,
    Logout,
    Debounce,
}

/// Identity of one scheduled timer. Sequence numbers are never reused within
/// a monitor, so a late fire from a cancelled timer cannot be mistaken for a
/// live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    pub kind: TimerKind,
    pub seq: u64,
}

/// Host timer primitives. Fired timers are reported back through
/// [`IdleMonitor::on_timer`].
pub trait Scheduler {
    fn now(&self) -> Instant;
    fn schedule_once(&mut self, id: TimerId, after: Duration);
    fn schedule_repeating(&mut self, id: TimerId, period: Duration);
    /// Cancelling an unknown or already fired timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleConfig {
    /// Inactivity before the warning is shown.
    pub warning_delay: Duration,
    /// Inactivity before the forced logout, from the same origin.
    pub total_timeout: Duration,
    pub debounce: Duration,
    pub tick: Duration,
}

impl IdleConfig {
    pub fn new(warning_delay: Duration, total_timeout: Duration) -> Self {
        Self {
            warning_delay,
            total_timeout,
            debounce: Duration::from_secs(1),
            tick: Duration::from_secs(1),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Time between the warning and the forced logout.
    pub fn grace(&self) -> Duration {
        self.total_timeout.saturating_sub(self.warning_delay)
    }
}

impl From<&SessionConfig> for IdleConfig {
    fn from(config: &SessionConfig) -> Self {
        IdleConfig::new(config.warning_delay(), config.total_timeout())
            .with_debounce(config.debounce())
            .with_tick(config.tick())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Monitor disabled; no timers.
    Idle,
    Active {
        last_activity: Instant,
    },
    Warning {
        started: Instant,
        remaining: Duration,
    },
    /// Terminal for the current activation.
    LoggedOut,
}

/// Read-only snapshot for whatever renders the session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorView {
    pub enabled: bool,
    pub warning_visible: bool,
    pub time_remaining: String,
    pub logged_out: bool,
}

pub struct IdleMonitor<S: Scheduler> {
    config: IdleConfig,
    scheduler: S,
    state: SessionState,
    timers: Vec<TimerId>,
    debounce: Option<TimerId>,
    next_seq: u64,
    on_logout: Box<dyn FnMut() + Send>,
}

impl<S: Scheduler> IdleMonitor<S> {
    /// Creates a disabled monitor.
    pub fn new(config: IdleConfig, scheduler: S, on_logout: impl FnMut() + Send + 'static) -> Self {
        Self {
            config,
            scheduler,
            state: SessionState::Idle,
            timers: Vec::new(),
            debounce: None,
            next_seq: 0,
            on_logout: Box::new(on_logout),
        }
    }

    pub fn config(&self) -> &IdleConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Enabling starts a fresh inactivity window unless one is already
    /// running. Disabling cancels everything without logging out.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.state) {
            (true, SessionState::Idle | SessionState::LoggedOut) => {
                let now = self.scheduler.now();
                self.transition(SessionState::Active { last_activity: now });
            }
            (false, SessionState::Idle) => {}
            (false, _) => self.transition(SessionState::Idle),
            (true, _) => {}
        }
    }

    /// Notes user activity. Bursts are coalesced: the inactivity window
    /// restarts once `debounce` passes without further activity.
    pub fn record_activity(&mut self) {
        if !matches!(self.state, SessionState::Active { .. }) {
            trace!(state = ?self.state, "activity ignored");
            return;
        }
        if let Some(pending) = self.debounce.take() {
            self.scheduler.cancel(pending);
        }
        let id = self.next_id(TimerKind::Debounce);
        self.scheduler.schedule_once(id, self.config.debounce);
        self.debounce = Some(id);
    }

    /// Dismisses the warning and restarts the full inactivity window.
    pub fn stay_signed_in(&mut self) {
        if matches!(self.state, SessionState::Active { .. } | SessionState::Warning { .. }) {
            let now = self.scheduler.now();
            self.transition(SessionState::Active { last_activity: now });
        }
    }

    /// Logs out immediately. Does nothing unless the monitor is running.
    pub fn sign_out(&mut self) {
        if matches!(self.state, SessionState::Active { .. } | SessionState::Warning { .. }) {
            self.transition(SessionState::LoggedOut);
        }
    }

    /// Dispatches a fired timer.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.debounce == Some(id) {
            self.debounce = None;
            self.scheduler.cancel(id);
            if matches!(self.state, SessionState::Active { .. }) {
                let now = self.scheduler.now();
                self.transition(SessionState::Active { last_activity: now });
            }
            return;
        }

        if !self.timers.contains(&id) {
            debug!(?id, "discarding stale timer");
            return;
        }

        match (id.kind, self.state) {
            (TimerKind::Warning, SessionState::Active { .. }) => {
                let started = self.scheduler.now();
                self.transition(SessionState::Warning {
                    started,
                    remaining: self.config.grace(),
                });
            }
            (TimerKind::Countdown, SessionState::Warning { started, .. }) => {
                let elapsed = self.scheduler.now().saturating_duration_since(started);
                let remaining = self.config.grace().saturating_sub(elapsed);
                if remaining.is_zero() {
                    self.transition(SessionState::LoggedOut);
                } else {
                    self.state = SessionState::Warning { started, remaining };
                }
            }
            (TimerKind::Logout, SessionState::Warning { .. }) => self.transition(SessionState::LoggedOut),
            (kind, state) => debug!(?kind, ?state, "timer does not apply to current state"),
        }
    }

    pub fn warning_visible(&self) -> bool {
        matches!(self.state, SessionState::Warning { .. })
    }

    pub fn time_remaining(&self) -> Duration {
        match self.state {
            SessionState::Warning { remaining, .. } => remaining,
            _ => Duration::ZERO,
        }
    }

    pub fn time_remaining_display(&self) -> String {
        format_remaining(self.time_remaining())
    }

    pub fn view(&self) -> MonitorView {
        MonitorView {
            enabled: self.state != SessionState::Idle,
            warning_visible: self.warning_visible(),
            time_remaining: self.time_remaining_display(),
            logged_out: self.state == SessionState::LoggedOut,
        }
    }

    fn next_id(&mut self, kind: TimerKind) -> TimerId {
        self.next_seq += 1;
        TimerId { kind, seq: self.next_seq }
    }

    fn cancel_all(&mut self) {
        for id in self.timers.drain(..) {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.debounce.take() {
            self.scheduler.cancel(id);
        }
    }

    fn transition(&mut self, next: SessionState) {
        self.cancel_all();
        debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;

        match next {
            SessionState::Active { .. } => {
                let id = self.next_id(TimerKind::Warning);
                self.scheduler.schedule_once(id, self.config.warning_delay);
                self.timers.push(id);
            }
            SessionState::Warning { remaining, .. } => {
                let countdown = self.next_id(TimerKind::Countdown);
                self.scheduler.schedule_repeating(countdown, self.config.tick);
                self.timers.push(countdown);

                let logout = self.next_id(TimerKind::Logout);
                self.scheduler.schedule_once(logout, remaining);
                self.timers.push(logout);
            }
            SessionState::LoggedOut => (self.on_logout)(),
            SessionState::Idle => {}
        }
    }
}

impl<S: Scheduler> Drop for IdleMonitor<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl<S: Scheduler> fmt::Debug for IdleMonitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleMonitor")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("timers", &self.timers)
            .field("debounce", &self.debounce)
            .finish()
    }
}

/// Formats as `minutes:seconds`, rounding partial seconds up (`4:05`).
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_millis().div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy)]
struct VirtualTimer {
    due: Duration,
    period: Option<Duration>,
}

/// A manually advanced clock for driving a monitor deterministically.
#[derive(Debug)]
pub struct VirtualScheduler {
    origin: Instant,
    elapsed: Duration,
    timers: BTreeMap<TimerId, VirtualTimer>,
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            timers: BTreeMap::new(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of timers that are still scheduled.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Removes (or re-arms, if periodic) the earliest timer due by `until`.
    fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (id, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(id, timer)| (timer.due, id.seq))
            .map(|(id, timer)| (*id, *timer))?;

        self.elapsed = timer.due;
        match timer.period {
            Some(period) => {
                if let Some(entry) = self.timers.get_mut(&id) {
                    entry.due += period;
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(id)
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn schedule_once(&mut self, id: TimerId, after: Duration) {
        self.timers.insert(
            id,
            VirtualTimer {
                due: self.elapsed + after,
                period: None,
            },
        );
    }

    fn schedule_repeating(&mut self, id: TimerId, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        self.timers.insert(
            id,
            VirtualTimer {
                due: self.elapsed + period,
                period: Some(period),
            },
        );
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}

impl IdleMonitor<VirtualScheduler> {
    /// Moves the virtual clock forward, firing every timer that falls due in
    /// order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.elapsed + by;
        while let Some(id) = self.scheduler.pop_due(until) {
            self.on_timer(id);
        }
        self.scheduler.elapsed = until;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_minutes_and_padded_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(245)), "4:05");
        assert_eq!(format_remaining(Duration::from_secs(300)), "5:00");
        assert_eq!(format_remaining(Duration::from_secs(5)), "0:05");
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(format_remaining(Duration::from_millis(4001)), "0:05");
        assert_eq!(format_remaining(Duration::from_millis(59_500)), "1:00");
    }

    #[test]
    fn grace_never_underflows() {
        let config = IdleConfig::new(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(config.grace(), Duration::ZERO);
    }

    #[test]
    fn periodic_timers_rearm() {
        let mut scheduler = VirtualScheduler::new();
        let id = TimerId {
            kind: TimerKind::Countdown,
            seq: 1,
        };
        scheduler.schedule_repeating(id, Duration::from_secs(1));
        assert_eq!(scheduler.pop_due(Duration::from_secs(3)), Some(id));
        assert_eq!(scheduler.pop_due(Duration::from_secs(3)), Some(id));
        assert_eq!(scheduler.pop_due(Duration::from_secs(3)), Some(id));
        assert_eq!(scheduler.pop_due(Duration::from_secs(3)), None);
        assert!(scheduler.is_scheduled(id));
    }
}
