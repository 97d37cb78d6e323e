use serde::Deserialize;

/// Configuration for [`Entity::with_options`](crate::Entity::with_options).
///
/// Deserializes from camelCase keys, and missing keys take their defaults, so
/// `{"markClean": true}` is a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityOptions {
    /// Route the initial properties through registered setters.
    ///
    /// Default: `true`.
    pub use_setters: bool,
    /// Clear the dirty set and the error store once the initial properties
    /// are assigned.
    ///
    /// Default: `false`.
    pub mark_clean: bool,
    /// Known persistence state. `None` leaves it unknown.
    ///
    /// Default: `None`.
    pub mark_new: Option<bool>,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            use_setters: true,
            mark_clean: false,
            mark_new: None,
        }
    }
}

impl EntityOptions {
    pub fn with_setters(mut self, use_setters: bool) -> Self {
        self.use_setters = use_setters;
        self
    }

    pub fn with_mark_clean(mut self, mark_clean: bool) -> Self {
        self.mark_clean = mark_clean;
        self
    }

    pub fn with_mark_new(mut self, mark_new: bool) -> Self {
        self.mark_new = Some(mark_new);
        self
    }
}
