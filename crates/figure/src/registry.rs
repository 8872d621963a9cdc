use crate::error::SerializationError;
use crate::figure::Figure;
use crate::geometry::Rect;
use crate::kinds::{
    button_kind, drawing_kind, radio_button_list_kind, rect_kind, FigureKind,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps persisted `type` tags to figure kinds.
#[derive(Debug, Clone, Default)]
pub struct FigureRegistry {
    kinds: HashMap<&'static str, Arc<dyn FigureKind>>,
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows every built-in kind.
    pub fn with_default_kinds() -> Self {
        let mut registry = Self::new();
        registry
            .register(drawing_kind())
            .register(rect_kind())
            .register(button_kind())
            .register(radio_button_list_kind());
        registry
    }

    /// Registers `kind` under its type name, replacing any previous kind with that name.
    pub fn register(&mut self, kind: Arc<dyn FigureKind>) -> &mut Self {
        self.kinds.insert(kind.type_name(), kind);
        self
    }

    pub fn lookup(&self, type_name: &str) -> Result<Arc<dyn FigureKind>, SerializationError> {
        self.kinds
            .get(type_name)
            .cloned()
            .ok_or_else(|| SerializationError::UnknownType(type_name.to_string()))
    }

    /// Creates a detached figure of the named kind.
    pub fn create(&self, type_name: &str, rect: Rect) -> Result<Figure, SerializationError> {
        Ok(Figure::new(self.lookup(type_name)?, rect))
    }

    /// Registered type names in sorted order.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.kinds.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kinds() {
        let registry = FigureRegistry::with_default_kinds();
        assert_eq!(
            registry.type_names(),
            vec!["ButtonFigure", "Drawing", "RadioButtonListFigure", "RectFigure"]
        );
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let button = registry.create("ButtonFigure", rect).unwrap();
        assert_eq!(button.type_name(), "ButtonFigure");
        assert!(button.attributes().is_declared("label"));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let registry = FigureRegistry::with_default_kinds();
        assert!(matches!(
            registry.lookup("TriangleFigure"),
            Err(SerializationError::UnknownType(name)) if name == "TriangleFigure"
        ));
    }
}
