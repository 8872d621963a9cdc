use crate::attributes::AttributeType;
use crate::FigureId;
use thiserror::Error;

/// Geometry values that cannot be represented.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{component} is not a number")]
    NotANumber { component: &'static str },
    #[error("size {width}x{height} is negative")]
    NegativeSize { width: f64, height: f64 },
}

/// Failures of structural edits on a [`crate::Drawing`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("figure {0} does not exist in this drawing")]
    UnknownFigure(FigureId),
    #[error("figure {child} is not enclosed by container {container}")]
    OutsideContainer { container: FigureId, child: FigureId },
    #[error("appending {child} to {container} would make it its own ancestor")]
    CircularContainment { container: FigureId, child: FigureId },
    #[error("figure {child} is not contained in {container}")]
    NotAChild { container: FigureId, child: FigureId },
    #[error("the drawing root cannot be moved, detached or removed")]
    RootIsFixed,
    #[error("figure {0} is not attached to the drawing")]
    Detached(FigureId),
    #[error("figure {0} is still held by a container")]
    StillAttached(FigureId),
    #[error("no figure encloses the requested rectangle")]
    NoEnclosingContainer,
    #[error("no figure at path {0:?}")]
    InvalidPath(Vec<usize>),
}

/// Failures of reads and writes on an [`crate::Attributes`] bag.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error("attribute `{0}` is not declared for this figure")]
    UndeclaredKey(String),
    #[error("attribute `{key}` expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: AttributeType,
        found: AttributeType,
    },
    #[error("selected index {index} is out of range for {len} labels")]
    InvalidSelection { index: usize, len: usize },
    #[error("attribute `{key}` cannot be decoded: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Failures while turning JSON into a drawing.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unknown figure type `{0}`")]
    UnknownType(String),
    #[error("expected a figure object, found {0}")]
    ExpectedFigureObject(&'static str),
    #[error("figure record is missing `{0}`")]
    MissingField(&'static str),
    #[error("figure type `{kind}` has no attribute `{field}`")]
    UnexpectedField { kind: String, field: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
