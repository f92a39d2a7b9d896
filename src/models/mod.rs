//! Data models
//!
//! Database entities, their enums and the input types the services accept.

mod collaboration;
mod content;
mod interaction;
mod notification;
mod session;
mod suggestion;
mod tag;
mod user;
mod widget;

pub use collaboration::{Collaboration, CollaborationRole, CreateCollaborationInput};
pub use content::{
    AuthorBrief, Content, ContentChanges, ContentFilter, ContentFormat, ContentStatus, ContentWithMeta,
    CreateContentInput, ListParams, PagedResult, UpdateContentInput, Visibility,
};
pub use interaction::{CreateInteractionInput, Interaction, InteractionKind};
pub use notification::{Notification, NotificationKind};
pub use session::Session;
pub use suggestion::{ContentSuggestion, SuggestionKind};
pub use tag::{CreateTagInput, Tag, TagKind};
pub use user::{UpdateUserInput, User, UserRole};
pub use widget::{CreateWidgetInput, UpdateWidgetInput, Widget, WidgetKind, WidgetSize};
