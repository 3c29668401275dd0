//! Freedesktop notifications over D-Bus via `notify-rust`.

use super::dispatcher::{Notification, NotificationSink, PermissionState};
use log::{debug, warn};
use notify_rust::{NotificationHandle, Timeout};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const APP_NAME: &str = "remindr";
/// Action key the notification server reports for a body click.
const DEFAULT_ACTION: &str = "default";

/// Called with the notification tag when the user clicks a notification.
pub type ClickHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Desktop notification sink.
///
/// Support is checked once against the notification server; desktop sessions
/// have no separate permission prompt, so support implies a granted
/// permission. Each shown notification gets a watcher thread that closes it
/// after `auto_close_after` or right after a click.
#[derive(Default)]
pub struct DesktopNotifier {
    supported: OnceCell<bool>,
    /// Server-assigned id of the last notification raised per tag.
    server_ids: HashMap<String, u32>,
    on_click: Option<ClickHandler>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `handler` when a notification body is clicked, e.g. to raise
    /// the host window.
    pub fn with_click_handler(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    fn query_server() -> bool {
        match notify_rust::get_server_information() {
            Ok(info) => {
                debug!(
                    "event=notifier_check module=notify status=ok server={}",
                    info.name
                );
                true
            }
            Err(err) => {
                debug!("event=notifier_check module=notify status=unavailable error={err}");
                false
            }
        }
    }

    fn build(notification: &Notification, replaces_id: Option<u32>) -> notify_rust::Notification {
        let mut built = notify_rust::Notification::new();
        built
            .appname(APP_NAME)
            .summary(&notification.title)
            .body(&notification.body)
            .action(DEFAULT_ACTION, "Open")
            .timeout(if notification.require_interaction {
                Timeout::Never
            } else {
                Timeout::Milliseconds(
                    u32::try_from(notification.auto_close_after.as_millis()).unwrap_or(u32::MAX),
                )
            });
        if let Some(id) = replaces_id {
            built.id(id);
        }
        built
    }

    fn watch(&self, handle: NotificationHandle, notification: &Notification) {
        let id = handle.id();
        let tag = notification.tag.clone();
        let on_click = notification
            .focus_on_click
            .then(|| self.on_click.clone())
            .flatten();
        let (done_tx, done_rx) = mpsc::channel();

        thread::spawn(move || {
            notify_rust::handle_action(id, |response: &notify_rust::ActionResponse<'_>| {
                if matches!(response, notify_rust::ActionResponse::Custom(action) if *action == DEFAULT_ACTION) {
                    debug!("event=notification_click module=notify status=ok tag={tag}");
                    if let Some(on_click) = on_click {
                        on_click(&tag);
                    }
                }
                let _ = done_tx.send(());
            });
        });

        spawn_closer(done_rx, notification.auto_close_after, move || handle.close());
    }
}

/// Runs `close` once `done` fires or `wait` elapses, whichever is first.
fn spawn_closer(
    done: Receiver<()>,
    wait: Duration,
    close: impl FnOnce() + Send + 'static,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = done.recv_timeout(wait);
        close();
    })
}

impl NotificationSink for DesktopNotifier {
    fn is_supported(&self) -> bool {
        *self.supported.get_or_init(Self::query_server)
    }

    fn permission(&self) -> PermissionState {
        if self.is_supported() {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }

    fn request_permission(&mut self) -> PermissionState {
        self.permission()
    }

    fn show(&mut self, notification: &Notification) {
        let replaces_id = self.server_ids.get(&notification.tag).copied();
        match Self::build(notification, replaces_id).show() {
            Ok(handle) => {
                debug!(
                    "event=notification_show module=notify status=ok tag={} id={}",
                    notification.tag,
                    handle.id()
                );
                self.server_ids.insert(notification.tag.clone(), handle.id());
                self.watch(handle, notification);
            }
            Err(err) => warn!(
                "event=notification_show module=notify status=error tag={} error={err}",
                notification.tag
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{spawn_closer, DesktopNotifier, DEFAULT_ACTION};
    use crate::model::reminder::Reminder;
    use crate::notify::dispatcher::Notification;
    use notify_rust::Timeout;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn notification() -> Notification {
        let reminder = Reminder::new("9", "IC vote", 0).with_description("Room 4");
        Notification::for_reminder(&reminder)
    }

    #[test]
    fn build_carries_text_action_and_interaction_timeout() {
        let built = DesktopNotifier::build(&notification(), None);

        assert_eq!(built.appname, "remindr");
        assert_eq!(built.summary, "🔔 Reminder: IC vote");
        assert_eq!(built.body, "Room 4");
        assert_eq!(built.timeout, Timeout::Never);
        assert_eq!(built.id, None);
        assert!(built.actions.iter().any(|action| action == DEFAULT_ACTION));
    }

    #[test]
    fn build_replaces_previous_server_id() {
        let built = DesktopNotifier::build(&notification(), Some(17));
        assert_eq!(built.id, Some(17));
    }

    #[test]
    fn build_without_interaction_uses_server_timeout() {
        let mut passive = notification();
        passive.require_interaction = false;

        let built = DesktopNotifier::build(&passive, None);
        assert_eq!(built.timeout, Timeout::Milliseconds(10_000));
    }

    #[test]
    fn closer_fires_after_wait_elapses() {
        let (_done_tx, done_rx) = mpsc::channel::<()>();
        let (closed_tx, closed_rx) = mpsc::channel();
        let started = Instant::now();

        spawn_closer(done_rx, Duration::from_millis(50), move || {
            let _ = closed_tx.send(());
        })
        .join()
        .unwrap();

        assert!(closed_rx.try_recv().is_ok());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn closer_fires_early_on_click() {
        let (done_tx, done_rx) = mpsc::channel();
        let (closed_tx, closed_rx) = mpsc::channel();
        let started = Instant::now();

        let closer = spawn_closer(done_rx, Duration::from_secs(30), move || {
            let _ = closed_tx.send(());
        });
        done_tx.send(()).unwrap();
        closer.join().unwrap();

        assert!(closed_rx.try_recv().is_ok());
        assert!(started.elapsed() < Duration::from_secs(30));
    }
}
