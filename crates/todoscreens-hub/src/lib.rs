//! Device-side button handling
//!
//! The display hub reports button presses as `{nodeId, buttonMask, status}`
//! events. A [`ButtonMap`] turns a press into a [`HubAction`], and the
//! [`Dispatcher`] forwards actions to the webhook server through a bounded
//! queue drained by a single worker, so at most one request is in flight.
//!
//! ```text
//! -------------------------
//! |                       |
//! |        display        |
//! |                       |
//! -------------------------
//! |  1  |  2  |  4  |  8  |
//! -------------------------
//! ```

pub mod button;
pub mod config;
pub mod dispatcher;
pub mod trigger;

pub use button::{Binding, ButtonEvent, ButtonMap, HubAction};
pub use config::{HubConfig, HubConfigError};
pub use dispatcher::{Dispatch, Dispatcher, RelayStats};
pub use trigger::{HttpTrigger, TriggerClient, TriggerError, TriggerReply, WebhookConfig};
