use super::Command;
use crate::document::Document;
use crate::error::CommandError;
use figure::{AttributeValue, FigureId};

/// Sets one attribute of a figure.
#[derive(Debug)]
pub struct ChangeAttribute {
    figure: FigureId,
    key: String,
    new_value: AttributeValue,
    old_value: Option<AttributeValue>,
}

impl ChangeAttribute {
    /// Fails if `key` is not declared for the figure or `value` has the wrong type.
    pub fn new(
        document: &Document,
        figure: FigureId,
        key: impl Into<String>,
        value: AttributeValue,
    ) -> Result<Self, CommandError> {
        let key = key.into();
        let attributes = document.drawing.figure(figure)?.attributes();
        attributes.check(&key, &value)?;
        let old_value = attributes.get(&key)?.cloned();
        Ok(Self {
            figure,
            key,
            new_value: value,
            old_value,
        })
    }
}

impl Command for ChangeAttribute {
    fn label(&self) -> &'static str {
        "Change attribute"
    }

    fn apply(&mut self, document: &mut Document) -> Result<(), CommandError> {
        document
            .drawing
            .attributes_mut(self.figure)?
            .set(&self.key, self.new_value.clone())?;
        Ok(())
    }

    fn reverse(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let attributes = document.drawing.attributes_mut(self.figure)?;
        match &self.old_value {
            Some(old) => {
                attributes.set(&self.key, old.clone())?;
            }
            None => {
                attributes.unset(&self.key)?;
            }
        }
        Ok(())
    }
}
