//! Visual reminder notifications.
//!
//! # Responsibility
//! - Track host notification permission and request it at most once.
//! - Raise one tagged, self-dismissing notification per fired reminder.
//!
//! # Invariants
//! - Missing capability and denied permission are both silent no-ops.
//! - Notifications for the same reminder share a tag and replace each other.

#[cfg(all(unix, not(target_os = "macos")))]
pub mod desktop;
pub mod dispatcher;

#[cfg(all(unix, not(target_os = "macos")))]
pub use desktop::{ClickHandler, DesktopNotifier};
pub use dispatcher::{
    DisabledNotifier, Notification, NotificationDispatcher, NotificationSink, PermissionState,
    NOTIFICATION_AUTO_CLOSE, NOTIFICATION_FALLBACK_BODY,
};
