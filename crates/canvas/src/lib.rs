//! Interactive editing on top of the `figure` document model.
//!
//! [`Canvas`] ties a drawing to an undo history, a view transform and the
//! active tool. Every change to the drawing is a [`history::Command`], so
//! gestures, scripted requests and API calls all undo the same way.

mod canvas;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod handles;
pub mod history;
pub mod preview;
pub mod request;
pub mod selection;
pub mod text_edit;
pub mod tools;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError};
pub use document::Document;
pub use error::{CanvasError, CommandError, EditCancelled};
pub use events::{DragEvent, PointerEvent};
pub use handles::Handle;
pub use history::{
    ChangeAttribute, ChangeFigureRect, Command, CommandStack, CreateFigure,
    RemoveFigureAndContained,
};
pub use preview::Preview;
pub use request::CommandRequest;
pub use selection::Selection;
pub use text_edit::{NoTextPrompt, TextPrompt};
pub use tools::{CreateFigureTool, NoopTool, SelectionTool, Tool, ToolKind};
pub use viewport::ViewTransform;
