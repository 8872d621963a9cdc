//! Document model for a structured diagram editor.
//!
//! Figures are rectangles arranged in a tree whose shape follows geometry:
//! a figure is contained by the innermost figure that strictly encloses it.
//! This crate holds the tree ([`Drawing`]), the figure kinds, the geometric
//! queries used for hit testing and for deciding where a figure belongs,
//! and JSON persistence.

pub mod attributes;
pub mod containment;
pub mod drawing;
pub mod error;
pub mod figure;
pub mod geometry;
pub mod hit_test;
pub mod kinds;
pub mod labels;
pub mod registry;
pub mod render;
pub mod serialization;

pub use attributes::{AttributeKey, AttributeType, AttributeValue, Attributes};
pub use containment::{
    find_figures_enclosing_and_enclosed, find_figures_enclosing_and_enclosed_excluding, Containment,
};
pub use drawing::{Drawing, FigureId, FigureSnapshot, DEFAULT_EXTENT};
pub use error::{AttributeError, GeometryError, SerializationError, TreeError};
pub use figure::Figure;
pub use geometry::{Corner, Point, Rect};
pub use hit_test::{find_enclosing_figures, find_figures_below_point, walk_tree_lazy};
pub use kinds::{ButtonKind, FigureKind, HandleSpec, RadioButtonListKind, RectKind};
pub use labels::{LabelList, SingleSelectLabelList};
pub use registry::FigureRegistry;
pub use render::{Color, DrawCall, RecordingSurface, RenderSurface, TextMetrics};
