//! Per-locale translation store.

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::rc::Rc;

use crate::key::{
    self,
    KeyError,
};
use crate::resource::event::{
    ChangeEvent,
    ResourceListener,
};

/// Flat, sorted key → value map for one locale.
///
/// No two stored keys are ever in an ancestor/descendant relationship: a key
/// either holds a value or acts as a namespace for deeper keys, never both.
/// Storing a key evicts its ancestors and descendants to keep it that way.
pub struct Resource {
    /// Locale code (e.g. "en", "ja-JP")
    locale: String,
    /// Backing file, if the resource was loaded from or saved to disk
    path: Option<PathBuf>,
    translations: BTreeMap<String, String>,
    listeners: Vec<Rc<dyn ResourceListener>>,
    /// Unsaved changes exist
    dirty: bool,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("locale", &self.locale)
            .field("path", &self.path)
            .field("translations", &self.translations)
            .field("listeners", &self.listeners.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Resource {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            path: None,
            translations: BTreeMap::new(),
            listeners: Vec::new(),
            dirty: false,
        }
    }

    /// Builds a resource from loader output.
    ///
    /// Pairs are applied in order with the usual eviction rules, so a later
    /// pair wins over an earlier conflicting one. Invalid keys are skipped.
    #[must_use]
    pub fn from_entries<I, K, V>(locale: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut resource = Self::new(locale);
        for (key, value) in entries {
            let key = key.as_ref();
            if let Err(e) = key::validate(key) {
                tracing::warn!(locale = %resource.locale, %e, "Skipping invalid translation key");
                continue;
            }
            resource.apply_store(key, value.as_ref());
        }
        resource
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    #[must_use]
    pub fn translation(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.translations.contains_key(key)
    }

    /// Returns `true` if any stored key lies below `key`.
    #[must_use]
    pub fn has_descendants(&self, key: &str) -> bool {
        self.descendant_keys(key).next().is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.translations.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub const fn translations(&self) -> &BTreeMap<String, String> {
        &self.translations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn add_listener(&mut self, listener: Rc<dyn ResourceListener>) {
        self.listeners.push(listener);
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn ResourceListener>) {
        self.listeners.retain(|l| !std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(listener)));
    }

    /// Stores `value` under `key`.
    ///
    /// Ancestors of `key` are evicted first, then descendants. An empty
    /// value removes the key. Returns `false` (and notifies nobody) when the
    /// resource is left unchanged.
    pub fn store_translation(&mut self, key: &str, value: &str) -> Result<bool, KeyError> {
        key::validate(key)?;
        if !self.apply_store(key, value) {
            return Ok(false);
        }
        self.notify(key);
        Ok(true)
    }

    /// Removes `key` and every key below it.
    pub fn remove_translation(&mut self, key: &str) -> Result<bool, KeyError> {
        key::validate(key)?;
        if !self.remove_subtree(key) {
            return Ok(false);
        }
        self.notify(key);
        Ok(true)
    }

    /// Moves the subtree at `key` under `new_key`.
    ///
    /// Whatever was stored at or below `new_key` is replaced. Does nothing if
    /// `key` holds nothing.
    pub fn rename_translation(&mut self, key: &str, new_key: &str) -> Result<bool, KeyError> {
        key::validate(key)?;
        key::validate(new_key)?;
        if !self.has_subtree(key) {
            return Ok(false);
        }
        self.relocate_translation(key, new_key, &[new_key.to_string()], false)
    }

    /// Copies the subtree at `key` under `new_key`, leaving the source intact.
    pub fn duplicate_translation(&mut self, key: &str, new_key: &str) -> Result<bool, KeyError> {
        key::validate(key)?;
        key::validate(new_key)?;
        if !self.has_subtree(key) {
            return Ok(false);
        }
        self.relocate_translation(key, new_key, &[new_key.to_string()], true)
    }

    /// General form of rename/duplicate.
    ///
    /// The source subtree is snapshotted, removed unless `keep_source`, then
    /// every subtree rooted at a `displaced` key is evicted along with the
    /// exact `new_key` entry. Finally each snapshotted entry is stored under
    /// `new_key` with the ordinary eviction rules. Passing `[new_key]` as
    /// `displaced` replaces the target wholesale; passing the paths reported
    /// by the tree merge reproduces a merge.
    pub fn relocate_translation(
        &mut self,
        key: &str,
        new_key: &str,
        displaced: &[String],
        keep_source: bool,
    ) -> Result<bool, KeyError> {
        key::validate(key)?;
        key::validate(new_key)?;
        if key == new_key {
            return Ok(false);
        }

        let moved: Vec<(String, String)> = self
            .subtree_entries(key)
            .map(|(k, v)| (key::create(new_key, key::child_suffix(k, key)), v.to_string()))
            .collect();

        let mut changed = false;
        if !keep_source {
            changed |= self.remove_subtree(key);
        }
        for root in displaced {
            changed |= self.remove_subtree(root);
        }
        changed |= self.translations.remove(new_key).is_some();
        for (k, v) in &moved {
            changed |= self.apply_store(k, v);
        }

        if changed {
            tracing::debug!(
                locale = %self.locale,
                key,
                new_key,
                moved = moved.len(),
                keep_source,
                "Relocated translation subtree"
            );
            self.notify(new_key);
        }
        Ok(changed)
    }

    /// `key` itself and all keys below it, in key order.
    pub fn subtree_entries<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.translations
            .get_key_value(key)
            .into_iter()
            .chain(self.descendant_entries(key))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn has_subtree(&self, key: &str) -> bool {
        self.contains_key(key) || self.has_descendants(key)
    }

    fn descendant_entries<'a>(
        &'a self,
        key: &str,
    ) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
        let prefix = format!("{key}{}", key::SEPARATOR);
        self.translations
            .range(prefix.clone()..)
            .take_while(move |(k, _)| k.starts_with(prefix.as_str()))
    }

    fn descendant_keys<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a String> + 'a {
        self.descendant_entries(key).map(|(k, _)| k)
    }

    /// Applies the store rules without validation or notification.
    fn apply_store(&mut self, key: &str, value: &str) -> bool {
        if self.translations.get(key).is_some_and(|existing| existing == value) {
            return false;
        }

        let mut changed = false;
        for ancestor in key::ancestors(key) {
            changed |= self.translations.remove(ancestor).is_some();
        }
        changed |= self.remove_descendants(key);

        if value.is_empty() {
            changed |= self.translations.remove(key).is_some();
        } else {
            self.translations.insert(key.to_string(), value.to_string());
            changed = true;
        }
        changed
    }

    fn remove_subtree(&mut self, key: &str) -> bool {
        let removed = self.translations.remove(key).is_some();
        self.remove_descendants(key) || removed
    }

    fn remove_descendants(&mut self, key: &str) -> bool {
        let doomed: Vec<String> = self.descendant_keys(key).cloned().collect();
        for k in &doomed {
            self.translations.remove(k);
        }
        !doomed.is_empty()
    }

    fn notify(&mut self, key: &str) {
        self.dirty = true;
        let event = ChangeEvent::new(self.locale.as_str(), key);
        tracing::trace!(locale = %event.locale, key = %event.key, "Resource changed");
        for listener in &self.listeners {
            listener.on_changed(&event);
        }
    }
}
