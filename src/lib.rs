//! Document Editor
//!
//! Edit-session controller for the text content of documents stored in a
//! content-management backend.
//!
//! This library provides:
//! - Session state with a change feed for views
//! - Guarded load and save through pluggable backend gateways
//! - JSON-RPC transport over HTTP
//! - Configuration management and a command-line host

pub mod config;
pub mod core;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod host;
pub mod rpc;

pub use config::Config;
pub use crate::core::{EditSession, InvocationContext, Notification, NotificationKind, Phase};
pub use editor::{Editor, EditorFactory, LoadOutcome, SaveOutcome};
pub use error::EditorError;
pub use gateway::{DocumentGateway, GatewayKind};
