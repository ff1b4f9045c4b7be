//! Todoscreens core
//!
//! Relays task lists from a task-tracking service to e-paper displays:
//! - [`todo`]: task records and priority ordering
//! - [`layout`]: the display's drawing document and its JSON export
//! - [`render`]: todo list -> layout
//! - [`effects`]: traits for the task service, display service and clock
//! - [`orchestrator`]: the fetch -> render -> push cycle and mark-done

pub mod effects;
pub mod layout;
pub mod orchestrator;
pub mod render;
pub mod todo;

pub use effects::{Clock, DisplayNode, DisplaySink, SourceError, SystemClock, TaskSource};
pub use layout::{
    Align, BottomButtons, Button, ButtonStyle, Color, Font, Item, Layout, LayoutDocument,
    Rectangle, Text, BUTTON_SLOTS,
};
pub use orchestrator::{MarkDone, Orchestrator, OrchestratorError, RefreshReport};
pub use render::{render_todos, RenderConfig, RenderError, Renderer};
pub use todo::{sort_by_priority, TaskId, Todo};
