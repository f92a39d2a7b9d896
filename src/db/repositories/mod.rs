//! Database repositories
//!
//! One repository per entity. Each exposes an async trait and a sqlx
//! implementation that dispatches to SQLite or MySQL at runtime.

pub mod collaboration;
pub mod content;
pub mod interaction;
pub mod notification;
pub mod session;
pub mod suggestion;
pub mod tag;
pub mod user;
pub mod widget;

pub use collaboration::{CollaborationRepository, SqlxCollaborationRepository};
pub use content::{ContentRepository, SqlxContentRepository};
pub use interaction::{InteractionRepository, SqlxInteractionRepository};
pub use notification::{NotificationRepository, SqlxNotificationRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use suggestion::{SqlxSuggestionRepository, SuggestionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use widget::{SqlxWidgetRepository, WidgetRepository};

/// `?, ?, ?` for binding `n` values into an `IN (...)` list
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Whether a repository error was caused by a unique index rejecting a row
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}
