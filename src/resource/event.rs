//! Change notification types.

/// Emitted after a resource has been mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Locale of the resource that changed.
    pub locale: String,
    /// Key the edit was addressed to (for a rename, the new key).
    pub key: String,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(locale: impl Into<String>, key: impl Into<String>) -> Self {
        Self { locale: locale.into(), key: key.into() }
    }
}

/// Observer of a single resource.
///
/// Delivery is synchronous and in registration order. Listeners needing
/// mutable state use interior mutability since the editing model is
/// single-threaded.
pub trait ResourceListener {
    fn on_changed(&self, event: &ChangeEvent);
}

impl<F> ResourceListener for F
where
    F: Fn(&ChangeEvent),
{
    fn on_changed(&self, event: &ChangeEvent) {
        self(event);
    }
}
