//! Core session model
//!
//! Document identity, invocation context, the edit session state and the
//! notification sink the editor reports through.

pub mod context;
pub mod document;
pub mod mimetype;
pub mod notification;
pub mod session;

pub use context::{ActionParams, InvocationContext};
pub use document::{DocumentId, LoadedDocument, SaveReceipt};
pub use notification::{ChannelNotifier, Notification, NotificationKind, Notifier};
pub use session::{EditSession, Phase, SessionStore};
