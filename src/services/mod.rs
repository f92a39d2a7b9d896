//! Services layer - Business logic
//!
//! This module contains the business logic of Architekt.
//! Services are responsible for:
//! - Enforcing access rules and validation
//! - Coordinating between repositories and cache
//! - Running the AI heuristics and provider calls

pub mod ai;
pub mod collaboration;
pub mod content;
pub mod enhanced_ai;
pub mod insights;
pub mod interaction;
pub mod llm;
pub mod notification;
pub mod password;
pub mod rate_limiter;
pub mod suggestion;
pub mod tag;
pub mod text_analysis;
pub mod user;
pub mod widget;

pub use ai::{AiService, AiServiceError};
pub use collaboration::{CollaborationService, CollaborationServiceError};
pub use content::{ContentQuery, ContentService, ContentServiceError};
pub use enhanced_ai::{EnhancedAiError, EnhancedAiService, GenerateOptions, SummarizeOptions};
pub use interaction::{InteractionService, InteractionServiceError};
pub use llm::Provider;
pub use notification::{NotificationService, NotificationServiceError};
pub use password::{hash_password, verify_password};
pub use rate_limiter::LoginRateLimiter;
pub use suggestion::{SuggestionService, SuggestionServiceError};
pub use tag::{TagService, TagServiceError};
pub use user::{LoginInput, RegisterInput, UserService, UserServiceError};
pub use widget::{WidgetService, WidgetServiceError};
