//! HTTP adapters
//!
//! [`TodoistClient`] pulls pending tasks and closes them; [`SyncSignClient`]
//! lists display nodes and pushes layouts to them. Both implement the core
//! effect traits so the orchestrator can use them directly.

pub mod error;
pub mod syncsign;
pub mod todoist;

pub use error::{ClientError, ClientResult};
pub use syncsign::{SyncSignClient, SyncSignConfig};
pub use todoist::{TodoistClient, TodoistConfig};

/// User agent sent with every outbound request
pub(crate) const USER_AGENT: &str = concat!("todoscreens/", env!("CARGO_PKG_VERSION"));
