//! System-wide keyboard and mouse activity, fed into a running idle session.
//!
//! `rdev::listen` blocks forever, so it runs on its own thread and is
//! restarted after errors (e.g. missing accessibility permissions).

use super::idle_session::ActivitySender;
use rdev::{listen, Event, EventType};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub fn spawn(activity: ActivitySender) {
    thread::spawn(move || loop {
        let sender = activity.clone();
        let result = listen(move |event: Event| match event.event_type {
            EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::MouseMove { .. } | EventType::Wheel { .. } => {
                if !sender.notify() {
                    debug!("idle session ended, dropping input event");
                }
            }
            _ => {}
        });

        match result {
            Ok(()) => break,
            Err(e) => {
                warn!("Failed to listen for input events: {:?}. Retrying in 1 second...", e);
                thread::sleep(Duration::from_secs(1));
            }
        }
    });
}
