//! Selection collaborator

use crate::{Error, Result};

/// Interactive choice between items.
///
/// `Ok(None)` from any method means the operator cancelled.
pub trait Selector {
    /// Pick one of `items`, optionally with type-to-filter.
    fn choose(&self, prompt: &str, items: &[String], filter: bool) -> Result<Option<usize>>;

    /// Free-text input.
    fn input(&self, prompt: &str) -> Result<Option<String>>;

    /// Yes/no question. Cancelling counts as "no".
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let items = ["Yes".to_string(), "No".to_string()];
        Ok(self.choose(prompt, &items, false)? == Some(0))
    }
}

/// Let the operator pick one of `items`.
///
/// No items is [`Error::NotFound`] naming `what`; cancelling is
/// [`Error::NoSelection`].
pub fn select<'a, T>(
    selector: &dyn Selector,
    prompt: &str,
    items: &'a [T],
    what: &str,
    filter: bool,
    label: impl Fn(&T) -> String,
) -> Result<&'a T> {
    if items.is_empty() {
        return Err(Error::not_found(what));
    }
    let labels: Vec<String> = items.iter().map(label).collect();
    match selector.choose(prompt, &labels, filter)? {
        Some(index) => items.get(index).ok_or(Error::NoSelection),
        None => Err(Error::NoSelection),
    }
}
