//! Notification capability contract and permission-gated dispatcher.

use crate::model::reminder::Reminder;
use log::{debug, info};
use std::time::Duration;

/// Untouched notifications are force-closed after this long.
pub const NOTIFICATION_AUTO_CLOSE: Duration = Duration::from_secs(10);
/// Body used when a reminder has no description.
pub const NOTIFICATION_FALLBACK_BODY: &str = "You have a reminder due";

/// Host notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Not yet asked.
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

/// One visual notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Replacement key; a new notification with the same tag replaces the old one.
    pub tag: String,
    pub title: String,
    pub body: String,
    /// Stay on screen until the user interacts (or auto-close fires).
    pub require_interaction: bool,
    pub auto_close_after: Duration,
    /// Clicking brings the host window forward and dismisses.
    pub focus_on_click: bool,
}

impl Notification {
    pub fn for_reminder(reminder: &Reminder) -> Self {
        Self {
            tag: format!("reminder-{}", reminder.id),
            title: format!("🔔 Reminder: {}", reminder.title),
            body: reminder
                .description
                .as_deref()
                .filter(|description| !description.is_empty())
                .unwrap_or(NOTIFICATION_FALLBACK_BODY)
                .to_string(),
            require_interaction: true,
            auto_close_after: NOTIFICATION_AUTO_CLOSE,
            focus_on_click: true,
        }
    }
}

/// Host notification capability.
///
/// Implementations must never panic; host failures are logged and dropped.
pub trait NotificationSink {
    fn is_supported(&self) -> bool;
    /// Current host permission without prompting.
    fn permission(&self) -> PermissionState;
    /// Prompts the host for permission and returns the outcome.
    fn request_permission(&mut self) -> PermissionState;
    fn show(&mut self, notification: &Notification);
}

/// Sink for hosts without any notification capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl NotificationSink for DisabledNotifier {
    fn is_supported(&self) -> bool {
        false
    }

    fn permission(&self) -> PermissionState {
        PermissionState::Denied
    }

    fn request_permission(&mut self) -> PermissionState {
        PermissionState::Denied
    }

    fn show(&mut self, _notification: &Notification) {}
}

/// Permission-gated notification dispatcher.
pub struct NotificationDispatcher<S: NotificationSink> {
    sink: S,
    permission: PermissionState,
}

impl<S: NotificationSink> NotificationDispatcher<S> {
    pub fn new(sink: S) -> Self {
        let permission = if sink.is_supported() {
            sink.permission()
        } else {
            PermissionState::Denied
        };
        Self { sink, permission }
    }

    pub fn is_supported(&self) -> bool {
        self.sink.is_supported()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Asks the host once; later calls return the cached answer.
    pub fn request_permission(&mut self) -> bool {
        if !self.sink.is_supported() {
            return false;
        }
        if self.permission == PermissionState::Default {
            self.permission = self.sink.request_permission();
            info!(
                "event=notification_permission module=notify status=ok permission={}",
                self.permission.as_str()
            );
        }
        self.permission == PermissionState::Granted
    }

    /// Raises the notification for `reminder` when permission is granted.
    pub fn show(&mut self, reminder: &Reminder) {
        if !self.sink.is_supported() || self.permission != PermissionState::Granted {
            debug!(
                "event=notification_show module=notify status=skipped permission={}",
                self.permission.as_str()
            );
            return;
        }
        self.sink.show(&Notification::for_reminder(reminder));
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DisabledNotifier, Notification, NotificationDispatcher, NotificationSink,
        PermissionState, NOTIFICATION_AUTO_CLOSE, NOTIFICATION_FALLBACK_BODY,
    };
    use crate::model::reminder::Reminder;

    struct PromptingSink {
        answer: PermissionState,
        current: PermissionState,
        prompts: usize,
        shown: Vec<Notification>,
    }

    impl PromptingSink {
        fn answering(answer: PermissionState) -> Self {
            Self {
                answer,
                current: PermissionState::Default,
                prompts: 0,
                shown: Vec::new(),
            }
        }
    }

    impl NotificationSink for PromptingSink {
        fn is_supported(&self) -> bool {
            true
        }

        fn permission(&self) -> PermissionState {
            self.current
        }

        fn request_permission(&mut self) -> PermissionState {
            self.prompts += 1;
            self.current = self.answer;
            self.answer
        }

        fn show(&mut self, notification: &Notification) {
            self.shown.push(notification.clone());
        }
    }

    #[test]
    fn notification_uses_reminder_text_and_tag() {
        let reminder = Reminder::new("42", "Partner meeting", 0).with_description("Bring deck");
        let notification = Notification::for_reminder(&reminder);

        assert_eq!(notification.tag, "reminder-42");
        assert_eq!(notification.title, "🔔 Reminder: Partner meeting");
        assert_eq!(notification.body, "Bring deck");
        assert!(notification.require_interaction);
        assert_eq!(notification.auto_close_after, NOTIFICATION_AUTO_CLOSE);
    }

    #[test]
    fn notification_falls_back_to_generic_body() {
        let notification = Notification::for_reminder(&Reminder::new("7", "LP update", 0));
        assert_eq!(notification.body, NOTIFICATION_FALLBACK_BODY);
    }

    #[test]
    fn permission_is_requested_once() {
        let mut dispatcher =
            NotificationDispatcher::new(PromptingSink::answering(PermissionState::Granted));
        assert_eq!(dispatcher.permission(), PermissionState::Default);

        assert!(dispatcher.request_permission());
        assert!(dispatcher.request_permission());
        assert_eq!(dispatcher.sink().prompts, 1);
    }

    #[test]
    fn show_requires_granted_permission() {
        let reminder = Reminder::new("1", "Diligence call", 0);
        let mut dispatcher =
            NotificationDispatcher::new(PromptingSink::answering(PermissionState::Denied));

        dispatcher.show(&reminder);
        assert!(!dispatcher.request_permission());
        dispatcher.show(&reminder);
        assert!(dispatcher.sink().shown.is_empty());

        let mut granted =
            NotificationDispatcher::new(PromptingSink::answering(PermissionState::Granted));
        granted.request_permission();
        granted.show(&reminder);
        assert_eq!(granted.sink().shown.len(), 1);
    }

    #[test]
    fn unsupported_host_never_grants() {
        let mut dispatcher = NotificationDispatcher::new(DisabledNotifier);
        assert!(!dispatcher.is_supported());
        assert!(!dispatcher.request_permission());
        assert_eq!(dispatcher.permission(), PermissionState::Denied);
        dispatcher.show(&Reminder::new("1", "noop", 0));
    }
}
