//!
//! Suggestions while typing.
//!

use dyn_clone::DynClone;
use std::fmt::Debug;
use std::sync::Arc;

/// Suggests a completion for the text typed so far.
pub trait Autocomplete: DynClone + Debug {
    /// Returns the full suggested text, or None.
    ///
    /// Only suggestions longer than the text are used,
    /// and only if the mask accepts them.
    fn complete(&self, text: &str) -> Option<String>;
}

/// Completes from a fixed list of values.
///
/// The first value that starts with the text wins.
/// The comparison ignores case.
#[derive(Debug, Default, Clone)]
pub struct LookupCompletion {
    values: Arc<Vec<String>>,
}

impl LookupCompletion {
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: Arc::new(values.into_iter().map(|v| v.into()).collect()),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Autocomplete for LookupCompletion {
    fn complete(&self, text: &str) -> Option<String> {
        let text = text.to_uppercase();
        self.values
            .iter()
            .find(|v| v.to_uppercase().starts_with(&text))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyn_clone::clone_box;

    #[test]
    fn test_lookup() {
        let c = LookupCompletion::new(["Apple", "Apricot", "Banana"]);
        assert_eq!(c.complete("ap"), Some("Apple".to_string()));
        assert_eq!(c.complete("APR"), Some("Apricot".to_string()));
        assert_eq!(c.complete("c"), None);

        let b: Box<dyn Autocomplete> = Box::new(c);
        let b2 = clone_box(b.as_ref());
        assert_eq!(b2.complete("b"), Some("Banana".to_string()));
    }
}
