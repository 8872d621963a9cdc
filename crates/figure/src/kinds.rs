//! Figure kinds: the per-type behavior of a [`Figure`].
//!
//! A figure is a single node type; what it looks like, which attributes it
//! carries and which handles it offers are supplied by the shared
//! [`FigureKind`] it was created with.

use crate::attributes::{AttributeKey, Attributes};
use crate::figure::Figure;
use crate::geometry::{Corner, Point, Rect};
use crate::labels::SingleSelectLabelList;
use crate::render::{Color, RenderSurface};
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// A handle a figure kind offers while its figure is selected.
///
/// Geometry is given in document space; the view decides the on-screen size.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleSpec {
    /// Drag a corner while the opposite one stays fixed.
    Resize(Corner),
    /// Edit a text attribute through the host's text prompt.
    EditText {
        attribute: &'static str,
        anchor: Point,
    },
    /// Select one entry of a single-select list attribute.
    ToggleListItem {
        attribute: &'static str,
        index: usize,
        area: Rect,
    },
    /// Remove the figure together with everything it contains.
    Delete,
}

/// Resize handles on all four corners followed by a delete handle.
pub fn standard_handles() -> Vec<HandleSpec> {
    Corner::iter()
        .map(HandleSpec::Resize)
        .chain(std::iter::once(HandleSpec::Delete))
        .collect()
}

pub trait FigureKind: fmt::Debug + Send + Sync {
    /// The `type` tag used in persisted documents.
    fn type_name(&self) -> &'static str;

    /// Declare the attribute keys of this kind and store their initial values.
    fn init_attributes(&self, _attributes: &mut Attributes) {}

    /// Draw the figure itself. Contained figures are drawn by the caller.
    fn draw(&self, figure: &Figure, surface: &mut dyn RenderSurface);

    fn handles(&self, _figure: &Figure) -> Vec<HandleSpec> {
        standard_handles()
    }
}

/// The root of a drawing.
#[derive(Debug, Default)]
pub struct DrawingKind;

impl FigureKind for DrawingKind {
    fn type_name(&self) -> &'static str {
        "Drawing"
    }

    fn draw(&self, _figure: &Figure, _surface: &mut dyn RenderSurface) {}

    fn handles(&self, _figure: &Figure) -> Vec<HandleSpec> {
        Vec::new()
    }
}

/// A plain outlined rectangle.
#[derive(Debug, Default)]
pub struct RectKind;

impl FigureKind for RectKind {
    fn type_name(&self) -> &'static str {
        "RectFigure"
    }

    fn draw(&self, figure: &Figure, surface: &mut dyn RenderSurface) {
        surface.stroke_rect(figure.rect(), Color::BLACK);
    }
}

/// An outlined rectangle with a centered label.
#[derive(Debug, Default)]
pub struct ButtonKind;

impl ButtonKind {
    pub const LABEL: AttributeKey<String> = AttributeKey::new("label");
    pub const DEFAULT_LABEL: &'static str = "OK";
}

impl FigureKind for ButtonKind {
    fn type_name(&self) -> &'static str {
        "ButtonFigure"
    }

    fn init_attributes(&self, attributes: &mut Attributes) {
        attributes.declare_typed(Self::LABEL, Self::DEFAULT_LABEL.to_string());
    }

    fn draw(&self, figure: &Figure, surface: &mut dyn RenderSurface) {
        let rect = figure.rect();
        surface.stroke_rect(rect, Color::BLACK);

        let label = figure.attributes().get_typed(Self::LABEL).unwrap_or_default();
        let metrics = surface.measure_text(&label);
        let offset = Point::new(-metrics.width / 2.0, (metrics.ascent - metrics.descent) / 2.0)
            .unwrap_or(Point::ZERO);
        surface.fill_text(&label, rect.center() + offset, Color::BLACK);
    }

    fn handles(&self, figure: &Figure) -> Vec<HandleSpec> {
        let rect = figure.rect();
        let mut handles = standard_handles();
        handles.push(HandleSpec::EditText {
            attribute: Self::LABEL.name(),
            anchor: Point::new(rect.right() + 2.0, rect.center().y()).unwrap_or(rect.center()),
        });
        handles
    }
}

/// A vertical list of radio buttons backed by a single-select label list.
#[derive(Debug, Default)]
pub struct RadioButtonListKind;

impl RadioButtonListKind {
    pub const RADIO_BUTTONS: AttributeKey<SingleSelectLabelList> =
        AttributeKey::new("radioButtons");
    pub const ROW_HEIGHT: f64 = 20.0;
    const RADIO_SIZE: f64 = 10.0;
    const MARK_SIZE: f64 = 6.0;

    /// Document rect of each list row, top to bottom. Rows are clipped to the
    /// figure's bottom edge and rows starting below it are left out.
    pub fn row_rects(figure: &Figure) -> Vec<Rect> {
        let rect = figure.rect();
        let count = figure
            .attributes()
            .get_typed(Self::RADIO_BUTTONS)
            .map(|list| list.labels().len())
            .unwrap_or(0);
        (0..count)
            .map_while(|index| {
                let top = rect.y() + index as f64 * Self::ROW_HEIGHT;
                let height = Self::ROW_HEIGHT.min(rect.bottom() - top);
                if height <= 0.0 {
                    return None;
                }
                Rect::new(rect.x(), top, rect.width(), height).ok()
            })
            .collect()
    }

    /// Click target of each row: the radio button column on its left.
    pub fn toggle_rects(figure: &Figure) -> Vec<Rect> {
        Self::row_rects(figure)
            .into_iter()
            .filter_map(|row| {
                Rect::new(row.x(), row.y(), Self::RADIO_SIZE.min(row.width()), row.height()).ok()
            })
            .collect()
    }
}

impl FigureKind for RadioButtonListKind {
    fn type_name(&self) -> &'static str {
        "RadioButtonListFigure"
    }

    fn init_attributes(&self, attributes: &mut Attributes) {
        attributes.declare_typed(Self::RADIO_BUTTONS, SingleSelectLabelList::default());
    }

    fn draw(&self, figure: &Figure, surface: &mut dyn RenderSurface) {
        let Some(list) = figure.attributes().get_typed(Self::RADIO_BUTTONS) else {
            return;
        };
        let rows = Self::row_rects(figure);
        for ((index, label), row) in list.labels().iter().enumerate().zip(rows) {
            let radio_top = row.y() + (Self::ROW_HEIGHT - Self::RADIO_SIZE) / 2.0;
            if let Ok(radio) = Rect::new(row.x(), radio_top, Self::RADIO_SIZE, Self::RADIO_SIZE) {
                surface.stroke_rect(radio, Color::BLACK);
                if index == list.selected_index() {
                    let inset = (Self::RADIO_SIZE - Self::MARK_SIZE) / 2.0;
                    if let Ok(mark) = Rect::new(
                        radio.x() + inset,
                        radio.y() + inset,
                        Self::MARK_SIZE,
                        Self::MARK_SIZE,
                    ) {
                        surface.fill_rect(mark, Color::BLACK);
                    }
                }
            }
            if let Ok(position) = Point::new(
                row.x() + Self::RADIO_SIZE + 10.0,
                row.y() + Self::ROW_HEIGHT * 0.7,
            ) {
                surface.fill_text(label, position, Color::BLACK);
            }
        }
    }

    fn handles(&self, figure: &Figure) -> Vec<HandleSpec> {
        let mut handles: Vec<HandleSpec> = Corner::iter().map(HandleSpec::Resize).collect();
        handles.extend(
            Self::toggle_rects(figure)
                .into_iter()
                .enumerate()
                .map(|(index, area)| HandleSpec::ToggleListItem {
                    attribute: Self::RADIO_BUTTONS.name(),
                    index,
                    area,
                }),
        );
        handles.push(HandleSpec::Delete);
        handles
    }
}

/// Shared instances of the built-in kinds.
pub fn drawing_kind() -> Arc<dyn FigureKind> {
    Arc::new(DrawingKind)
}

pub fn rect_kind() -> Arc<dyn FigureKind> {
    Arc::new(RectKind)
}

pub fn button_kind() -> Arc<dyn FigureKind> {
    Arc::new(ButtonKind)
}

pub fn radio_button_list_kind() -> Arc<dyn FigureKind> {
    Arc::new(RadioButtonListKind)
}
