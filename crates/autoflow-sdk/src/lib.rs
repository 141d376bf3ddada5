//! # AutoFlow SDK
//!
//! Connects the headless builder to the persistence API. The backend is an async
//! trait so hosts can plug in their HTTP client; [`InMemoryBackend`] serves tests
//! and demos.

pub mod backend;
pub mod session;

pub use backend::{AutomationBackend, AutomationId, BackendError, InMemoryBackend, StoredAutomation};
pub use session::{EditorSession, Notice, NoticeLevel, SessionError};
