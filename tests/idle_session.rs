#[cfg(test)]
mod tests {
    use dha::libs::idle::IdleConfig;
    use dha::libs::idle_session::IdleSession;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn spawn_session() -> (IdleSession, Arc<AtomicUsize>) {
        let logouts = Arc::new(AtomicUsize::new(0));
        let counter = logouts.clone();
        let config = IdleConfig::new(Duration::from_secs(5), Duration::from_secs(10));
        let session = IdleSession::spawn(config, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (session, logouts)
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_and_timeout_on_tokio_clock() {
        let (session, logouts) = spawn_session();
        assert!(session.view().enabled);

        sleep(Duration::from_millis(4500)).await;
        assert!(!session.warning_visible());

        sleep(Duration::from_secs(1)).await;
        assert!(session.warning_visible());
        assert_eq!(session.time_remaining_display(), "0:05");

        sleep(Duration::from_secs(5)).await;
        assert_eq!(logouts.load(Ordering::SeqCst), 1);
        assert!(session.view().logged_out);
        assert!(session.is_finished());

        sleep(Duration::from_secs(30)).await;
        assert_eq!(logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_postpones_warning() {
        let (session, logouts) = spawn_session();

        sleep(Duration::from_secs(3)).await;
        session.activity();

        sleep(Duration::from_millis(5500)).await;
        assert!(!session.warning_visible());

        sleep(Duration::from_secs(1)).await;
        assert!(session.warning_visible());
        assert_eq!(logouts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stay_signed_in_dismisses_warning() {
        let (session, logouts) = spawn_session();

        sleep(Duration::from_millis(5500)).await;
        assert!(session.warning_visible());

        session.stay_signed_in();
        sleep(Duration::from_secs(1)).await;
        assert!(!session.warning_visible());

        sleep(Duration::from_secs(3)).await;
        assert!(!session.warning_visible());
        assert_eq!(logouts.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(1500)).await;
        assert!(session.warning_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_reaches_subscribers() {
        let (session, logouts) = spawn_session();
        let mut view = session.subscribe();

        session.sign_out();
        let _ = view.wait_for(|current| current.logged_out).await;

        assert_eq!(logouts.load(Ordering::SeqCst), 1);
        assert!(session.view().logged_out);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_stops_without_logout() {
        let (session, logouts) = spawn_session();
        let activity = session.activity_sender();

        sleep(Duration::from_secs(6)).await;
        session.disable();

        sleep(Duration::from_secs(60)).await;
        assert_eq!(logouts.load(Ordering::SeqCst), 0);
        assert!(session.is_finished());
        assert!(!session.view().enabled);
        assert!(!activity.notify());
    }
}
