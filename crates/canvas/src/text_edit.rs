use crate::error::EditCancelled;

/// Asks the host for a string, e.g. through a modal input field.
pub trait TextPrompt {
    /// Returns the entered text, or [`EditCancelled`] if the user dismissed the prompt.
    fn request_text(&mut self, prompt: &str, prefill: &str) -> Result<String, EditCancelled>;
}

impl<F> TextPrompt for F
where
    F: FnMut(&str, &str) -> Result<String, EditCancelled>,
{
    fn request_text(&mut self, prompt: &str, prefill: &str) -> Result<String, EditCancelled> {
        self(prompt, prefill)
    }
}

/// Prompt for hosts without text input. Every request is cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextPrompt;

impl TextPrompt for NoTextPrompt {
    fn request_text(&mut self, _prompt: &str, _prefill: &str) -> Result<String, EditCancelled> {
        Err(EditCancelled)
    }
}
