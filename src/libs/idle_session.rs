//! Runs an [`IdleMonitor`] on the tokio runtime.
//!
//! The monitor lives inside a driver task that owns it exclusively. Timers
//! are tokio tasks that report back over a channel, and callers talk to the
//! driver through [`IdleSession`], which also publishes a [`MonitorView`]
//! over a `watch` channel after every event.

use super::idle::{IdleConfig, IdleMonitor, MonitorView, Scheduler, SessionState, TimerId};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

/// [`Scheduler`] backed by `tokio::time`; every timer is a spawned task.
pub struct TokioScheduler {
    fired: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(fired: mpsc::UnboundedSender<TimerId>) -> Self {
        Self {
            fired,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        time::Instant::now().into_std()
    }

    fn schedule_once(&mut self, id: TimerId, after: Duration) {
        let fired = self.fired.clone();
        let handle = tokio::spawn(async move {
            time::sleep(after).await;
            let _ = fired.send(id);
        });
        self.tasks.insert(id, handle);
    }

    fn schedule_repeating(&mut self, id: TimerId, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        let fired = self.fired.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if fired.send(id).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, handle);
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Activity,
    StaySignedIn,
    SignOut,
    Disable,
}

/// Reports activity from outside the runtime, e.g. an input hook thread.
#[derive(Debug, Clone)]
pub struct ActivitySender {
    commands: mpsc::UnboundedSender<Command>,
}

impl ActivitySender {
    /// Returns false once the session has ended.
    pub fn notify(&self) -> bool {
        self.commands.send(Command::Activity).is_ok()
    }
}

/// Handle to a running, enabled idle monitor.
///
/// The driver stops once the session is logged out or disabled; dropping the
/// handle stops it too, cancelling every timer.
pub struct IdleSession {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<MonitorView>,
    driver: JoinHandle<()>,
}

impl IdleSession {
    /// Starts an enabled monitor. Must be called within a tokio runtime.
    pub fn spawn(config: IdleConfig, on_logout: impl FnMut() + Send + 'static) -> Self {
        let (fired_tx, mut fired_rx) = mpsc::unbounded_channel();
        let (commands, mut command_rx) = mpsc::unbounded_channel();

        let mut monitor = IdleMonitor::new(config, TokioScheduler::new(fired_tx), on_logout);
        monitor.set_enabled(true);
        let (view_tx, view) = watch::channel(monitor.view());

        let driver = tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(id) = fired_rx.recv() => monitor.on_timer(id),
                    command = command_rx.recv() => match command {
                        Some(Command::Activity) => monitor.record_activity(),
                        Some(Command::StaySignedIn) => monitor.stay_signed_in(),
                        Some(Command::SignOut) => monitor.sign_out(),
                        Some(Command::Disable) | None => monitor.set_enabled(false),
                    },
                }

                let next = monitor.view();
                view_tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });

                if matches!(monitor.state(), SessionState::Idle | SessionState::LoggedOut) {
                    debug!(state = ?monitor.state(), "idle session driver stopping");
                    break;
                }
            }
        });

        Self { commands, view, driver }
    }

    pub fn activity(&self) {
        let _ = self.commands.send(Command::Activity);
    }

    pub fn stay_signed_in(&self) {
        let _ = self.commands.send(Command::StaySignedIn);
    }

    pub fn sign_out(&self) {
        let _ = self.commands.send(Command::SignOut);
    }

    /// Stops the monitor without logging out.
    pub fn disable(&self) {
        let _ = self.commands.send(Command::Disable);
    }

    pub fn activity_sender(&self) -> ActivitySender {
        ActivitySender {
            commands: self.commands.clone(),
        }
    }

    pub fn view(&self) -> MonitorView {
        self.view.borrow().clone()
    }

    pub fn warning_visible(&self) -> bool {
        self.view.borrow().warning_visible
    }

    pub fn time_remaining_display(&self) -> String {
        self.view.borrow().time_remaining.clone()
    }

    /// A receiver that wakes on every change and errors once the driver stops.
    pub fn subscribe(&self) -> watch::Receiver<MonitorView> {
        self.view.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }
}

impl Drop for IdleSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
