//! JSON persistence of drawings.
//!
//! A figure is stored as an object with its `type` tag, its `rect`, one
//! field per stored attribute and its `containedFigures`. A document is the
//! record of the drawing's root.
//!
//! Decoding builds every figure in a fresh [`Drawing`] and attaches children
//! to their parent before the parent is attached to its own container, so
//! the geometric containment rules are checked on the way in. Any failure
//! discards the partially built drawing.

use crate::drawing::{Drawing, FigureId};
use crate::error::SerializationError;
use crate::figure::Figure;
use crate::geometry::Rect;
use crate::registry::FigureRegistry;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const TYPE_FIELD: &str = "type";
const RECT_FIELD: &str = "rect";
const CONTAINED_FIELD: &str = "containedFigures";

/// The persisted form of a figure and its contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub rect: Rect,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(rename = "containedFigures")]
    pub contained_figures: Vec<FigureRecord>,
}

impl FigureRecord {
    /// Record of the subtree at `id`.
    pub fn from_drawing(drawing: &Drawing, id: FigureId) -> Result<Self, SerializationError> {
        let figure = drawing.figure(id)?;
        let contained_figures = figure
            .children()
            .iter()
            .map(|child| FigureRecord::from_drawing(drawing, *child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            type_name: figure.type_name().to_string(),
            rect: figure.rect(),
            attributes: figure
                .attributes()
                .values()
                .map(|(key, value)| (key.to_string(), value.to_json()))
                .collect(),
            contained_figures,
        })
    }
}

pub fn to_json_value(drawing: &Drawing) -> Result<Value, SerializationError> {
    let record = FigureRecord::from_drawing(drawing, drawing.root())?;
    Ok(serde_json::to_value(record)?)
}

pub fn to_json_string(drawing: &Drawing) -> Result<String, SerializationError> {
    let record = FigureRecord::from_drawing(drawing, drawing.root())?;
    Ok(serde_json::to_string_pretty(&record)?)
}

pub fn from_json_str(registry: &FigureRegistry, json: &str) -> Result<Drawing, SerializationError> {
    let value: Value = serde_json::from_str(json)?;
    from_json_value(registry, value)
}

pub fn from_json_value(
    registry: &FigureRegistry,
    value: Value,
) -> Result<Drawing, SerializationError> {
    let (root, contained) = decode_figure(registry, value)?;
    let mut drawing = Drawing::with_root(root);
    let root_id = drawing.root();
    let mut count = 0;
    for child in contained {
        let child_id = build_subtree(registry, &mut drawing, child, &mut count)?;
        drawing.append_figure(root_id, child_id)?;
    }
    debug!("decoded drawing with {count} figures");
    Ok(drawing)
}

/// Decodes one record into a detached figure plus its still-encoded contents.
fn decode_figure(
    registry: &FigureRegistry,
    value: Value,
) -> Result<(Figure, Vec<Value>), SerializationError> {
    let mut fields = expect_object(value)?;

    let type_name = match fields.remove(TYPE_FIELD) {
        Some(Value::String(name)) => name,
        Some(_) | None => return Err(SerializationError::MissingField(TYPE_FIELD)),
    };
    let kind = registry.lookup(&type_name)?;

    let rect_value = fields
        .remove(RECT_FIELD)
        .ok_or(SerializationError::MissingField(RECT_FIELD))?;
    let rect: Rect = serde_json::from_value(rect_value)?;

    let contained = match fields.remove(CONTAINED_FIELD) {
        Some(Value::Array(items)) => items,
        Some(other) => return Err(SerializationError::ExpectedFigureObject(json_kind(&other))),
        None => Vec::new(),
    };

    let mut figure = Figure::new(kind, rect);
    for (key, value) in fields {
        let Some(ty) = figure.attributes().declared_type(&key) else {
            return Err(SerializationError::UnexpectedField {
                kind: type_name,
                field: key,
            });
        };
        let decoded = ty.decode(&key, value)?;
        figure.attributes_mut().set(&key, decoded)?;
    }
    Ok((figure, contained))
}

fn build_subtree(
    registry: &FigureRegistry,
    drawing: &mut Drawing,
    value: Value,
    count: &mut usize,
) -> Result<FigureId, SerializationError> {
    let (figure, contained) = decode_figure(registry, value)?;
    let id = drawing.insert(figure);
    *count += 1;
    for child in contained {
        let child_id = build_subtree(registry, drawing, child, count)?;
        drawing.append_figure(id, child_id)?;
    }
    Ok(id)
}

fn expect_object(value: Value) -> Result<Map<String, Value>, SerializationError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(SerializationError::ExpectedFigureObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;
    use crate::error::TreeError;
    use crate::kinds::{button_kind, radio_button_list_kind, rect_kind, ButtonKind};
    use serde_json::json;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn sample_drawing() -> Drawing {
        let mut drawing = Drawing::new(rect(0.0, 0.0, 1000.0, 1000.0));
        let root = drawing.root();
        let outer = drawing.insert(Figure::new(rect_kind(), rect(10.0, 10.0, 500.0, 500.0)));
        drawing.append_figure(root, outer).unwrap();
        let panel = drawing.insert(Figure::new(rect_kind(), rect(20.0, 20.0, 300.0, 300.0)));
        drawing.append_figure(outer, panel).unwrap();
        let button = drawing.insert(
            Figure::new(button_kind(), rect(30.0, 30.0, 80.0, 20.0))
                .with_attribute("label", AttributeValue::Text("Save".into()))
                .unwrap(),
        );
        drawing.append_figure(panel, button).unwrap();
        let radios =
            drawing.insert(Figure::new(radio_button_list_kind(), rect(30.0, 100.0, 100.0, 110.0)));
        drawing.append_figure(panel, radios).unwrap();
        drawing
    }

    #[test]
    fn test_encoding_shape() {
        let value = to_json_value(&sample_drawing()).unwrap();
        assert_eq!(value["type"], "Drawing");
        let outer = &value["containedFigures"][0];
        assert_eq!(outer["type"], "RectFigure");
        assert_eq!(outer["rect"], json!({"x": 10.0, "y": 10.0, "width": 500.0, "height": 500.0}));
        let button = &outer["containedFigures"][0]["containedFigures"][0];
        assert_eq!(button["label"], "Save");
        let radios = &outer["containedFigures"][0]["containedFigures"][1];
        assert_eq!(radios["radioButtons"]["selectedIndex"], 0);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let registry = FigureRegistry::with_default_kinds();
        let first = to_json_string(&sample_drawing()).unwrap();
        let decoded = from_json_str(&registry, &first).unwrap();
        let second = to_json_string(&decoded).unwrap();
        assert_eq!(first, second);
        assert!(decoded.check_invariants().is_ok());

        let button = decoded.resolve_path(&[0, 0, 0]).unwrap();
        assert_eq!(
            decoded.figure(button).unwrap().attributes().get_typed(ButtonKind::LABEL),
            Some("Save".to_string())
        );
    }

    #[test]
    fn test_array_is_rejected() {
        let registry = FigureRegistry::with_default_kinds();
        let err = from_json_str(&registry, "[]").unwrap_err();
        assert!(matches!(err, SerializationError::ExpectedFigureObject("an array")));

        let nested = json!({
            "type": "Drawing",
            "rect": {"x": 0, "y": 0, "width": 100, "height": 100},
            "containedFigures": [[]]
        });
        assert!(matches!(
            from_json_value(&registry, nested),
            Err(SerializationError::ExpectedFigureObject("an array"))
        ));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let registry = FigureRegistry::with_default_kinds();
        let value = json!({
            "type": "Drawing",
            "rect": {"x": 0, "y": 0, "width": 100, "height": 100},
            "containedFigures": [
                {"type": "CircleFigure", "rect": {"x": 1, "y": 1, "width": 2, "height": 2}}
            ]
        });
        assert!(matches!(
            from_json_value(&registry, value),
            Err(SerializationError::UnknownType(name)) if name == "CircleFigure"
        ));
    }

    #[test]
    fn test_containment_violation_is_rejected() {
        let registry = FigureRegistry::with_default_kinds();
        let value = json!({
            "type": "Drawing",
            "rect": {"x": 0, "y": 0, "width": 100, "height": 100},
            "containedFigures": [
                {"type": "RectFigure", "rect": {"x": 50, "y": 50, "width": 80, "height": 10}}
            ]
        });
        assert!(matches!(
            from_json_value(&registry, value),
            Err(SerializationError::Tree(TreeError::OutsideContainer { .. }))
        ));
    }

    #[test]
    fn test_attribute_fields_are_checked() {
        let registry = FigureRegistry::with_default_kinds();
        let wrong_type = json!({
            "type": "ButtonFigure",
            "rect": {"x": 0, "y": 0, "width": 10, "height": 10},
            "label": 12
        });
        assert!(matches!(
            from_json_value(&registry, wrong_type),
            Err(SerializationError::Attribute(_))
        ));

        let unknown = json!({
            "type": "RectFigure",
            "rect": {"x": 0, "y": 0, "width": 10, "height": 10},
            "label": "nope"
        });
        assert!(matches!(
            from_json_value(&registry, unknown),
            Err(SerializationError::UnexpectedField { .. })
        ));
    }
}
