use figure::{AttributeError, FigureId, GeometryError, SerializationError, TreeError};
use thiserror::Error;

/// The host dismissed a text prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("text edit was cancelled")]
pub struct EditCancelled;

/// Failures while building, applying or reversing a command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Cancelled(#[from] EditCancelled),
    #[error("figure {0} is not part of the drawing")]
    NotInDrawing(FigureId),
    #[error("no figure is selected")]
    NoSelection,
}

/// Failures surfaced by [`crate::Canvas`] operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
