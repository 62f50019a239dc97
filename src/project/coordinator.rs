//! Structural edits fanned out over every resource of a project.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::key;
use crate::project::error::ProjectError;
use crate::resource::{
    Resource,
    ResourceListener,
};
use crate::tree::{
    Conflict,
    Resolution,
    TranslationTree,
};

/// Owns the locale resources of one project and the tree over their keys.
///
/// Every structural edit is validated once, applied to the tree, repeated on
/// each resource and finally reconciled so that the tree contains exactly the
/// stored keys, their prefixes and the keys added without a value yet.
#[derive(Debug, Default)]
pub struct Project {
    resources: Vec<Resource>,
    tree: TranslationTree,
    /// Keys added through `add_key` that no resource backs yet
    placeholders: BTreeSet<String>,
}

impl Project {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a project and builds the tree from the union of all keys.
    pub fn from_resources(
        resources: impl IntoIterator<Item = Resource>,
    ) -> Result<Self, ProjectError> {
        let mut project = Self::new();
        for resource in resources {
            project.push_resource(resource)?;
        }
        let keys: Vec<String> = project.keys().into_iter().map(str::to_string).collect();
        project.tree = TranslationTree::from_keys(&keys);
        tracing::debug!(
            locales = project.resources.len(),
            nodes = project.tree.len(),
            "Built translation tree"
        );
        Ok(project)
    }

    /// Adds another locale, extending the tree with its keys.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), ProjectError> {
        let keys: Vec<String> = resource.keys().map(str::to_string).collect();
        self.push_resource(resource)?;
        for k in &keys {
            self.tree.add_node_by_key(k);
        }
        self.forget_stale_placeholders();
        Ok(())
    }

    fn push_resource(&mut self, resource: Resource) -> Result<(), ProjectError> {
        if self.resource(resource.locale()).is_some() {
            return Err(ProjectError::DuplicateLocale(resource.locale().to_string()));
        }
        self.resources.push(resource);
        Ok(())
    }

    #[must_use]
    pub fn resource(&self, locale: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.locale() == locale)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub(crate) fn resources_mut(&mut self) -> impl Iterator<Item = &mut Resource> {
        self.resources.iter_mut()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(Resource::locale)
    }

    #[must_use]
    pub const fn tree(&self) -> &TranslationTree {
        &self.tree
    }

    /// Union of the keys stored in any resource.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<&str> {
        self.resources.iter().flat_map(Resource::keys).collect()
    }

    /// Whether `key` was added without a value and still has none.
    #[must_use]
    pub fn is_placeholder(&self, key: &str) -> bool {
        self.placeholders.contains(key)
    }

    /// Expands or collapses the tree node at `key`.
    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> bool {
        self.tree.set_expanded(key, expanded)
    }

    /// Subscribes `listener` to every loaded resource.
    pub fn add_listener(&mut self, listener: &Rc<dyn ResourceListener>) {
        for resource in &mut self.resources {
            resource.add_listener(Rc::clone(listener));
        }
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.resources.iter().any(Resource::is_dirty)
    }

    pub fn dirty_locales(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().filter(|r| r.is_dirty()).map(Resource::locale)
    }

    /// Registers a new key in every resource and the tree.
    ///
    /// Ancestor keys holding a value are evicted from each resource. The key
    /// itself stays a value-less placeholder until a translation is stored.
    /// Returns `false` if the tree already has the key.
    pub fn add_key(&mut self, key: &str) -> Result<bool, ProjectError> {
        key::validate(key)?;
        if self.tree.node_by_key(key).is_some() {
            return Ok(false);
        }

        let before = self.owned_keys();
        for resource in &mut self.resources {
            resource.store_translation(key, "")?;
        }
        self.tree.add_node_by_key(key);
        self.placeholders.insert(key.to_string());
        self.settle(&before, Vec::new());

        tracing::debug!(key, "Added translation key");
        Ok(true)
    }

    /// Stores one translation in the resource of `locale`.
    ///
    /// An empty value removes the key from that resource only; the tree keeps
    /// the node while another resource still uses it.
    pub fn store_translation(
        &mut self,
        locale: &str,
        key: &str,
        value: &str,
    ) -> Result<bool, ProjectError> {
        key::validate(key)?;
        let before = self.owned_keys();
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.locale() == locale)
            .ok_or_else(|| ProjectError::UnknownLocale(locale.to_string()))?;
        if !resource.store_translation(key, value)? {
            return Ok(false);
        }

        if !value.is_empty() {
            self.tree.add_node_by_key(key);
        }
        self.settle(&before, vec![key.to_string()]);

        tracing::debug!(locale, key, "Stored translation");
        Ok(true)
    }

    /// Removes `key` and everything below it from every resource and the tree.
    pub fn remove_key(&mut self, key: &str) -> Result<bool, ProjectError> {
        key::validate(key)?;
        if self.tree.node_by_key(key).is_none() {
            return Ok(false);
        }

        let before = self.owned_keys();
        for resource in &mut self.resources {
            resource.remove_translation(key)?;
        }
        self.tree.remove_node_by_key(key);
        self.placeholders.retain(|p| p != key && !key::is_ancestor_of(key, p));
        self.settle(&before, key::parent(key).map(str::to_string).into_iter().collect());

        tracing::debug!(key, "Removed translation key");
        Ok(true)
    }

    /// Reports how [`rename_key`](Self::rename_key) would resolve an
    /// occupied `new_key`.
    pub fn rename_conflict(
        &self,
        key: &str,
        new_key: &str,
    ) -> Result<Option<Conflict>, ProjectError> {
        self.conflict(key, new_key, false)
    }

    /// Reports how [`duplicate_key`](Self::duplicate_key) would resolve an
    /// occupied `new_key`.
    pub fn duplicate_conflict(
        &self,
        key: &str,
        new_key: &str,
    ) -> Result<Option<Conflict>, ProjectError> {
        self.conflict(key, new_key, true)
    }

    fn conflict(
        &self,
        key: &str,
        new_key: &str,
        keep_source: bool,
    ) -> Result<Option<Conflict>, ProjectError> {
        key::validate(key)?;
        key::validate(new_key)?;
        Ok(self.tree.conflict(key, new_key, keep_source))
    }

    /// Moves `key` and its subtree to `new_key` in every resource.
    ///
    /// An occupied target is merged or replaced as decided by
    /// [`Resolution::for_leaves`].
    pub fn rename_key(&mut self, key: &str, new_key: &str) -> Result<bool, ProjectError> {
        self.relocate(key, new_key, false, None)
    }

    /// Copies `key` and its subtree to `new_key` in every resource.
    pub fn duplicate_key(&mut self, key: &str, new_key: &str) -> Result<bool, ProjectError> {
        self.relocate(key, new_key, true, None)
    }

    /// [`rename_key`](Self::rename_key) with an explicit policy for an
    /// occupied target.
    pub fn rename_key_with(
        &mut self,
        key: &str,
        new_key: &str,
        resolution: Resolution,
    ) -> Result<bool, ProjectError> {
        self.relocate(key, new_key, false, Some(resolution))
    }

    /// [`duplicate_key`](Self::duplicate_key) with an explicit policy for an
    /// occupied target.
    pub fn duplicate_key_with(
        &mut self,
        key: &str,
        new_key: &str,
        resolution: Resolution,
    ) -> Result<bool, ProjectError> {
        self.relocate(key, new_key, true, Some(resolution))
    }

    fn relocate(
        &mut self,
        key: &str,
        new_key: &str,
        keep_source: bool,
        resolution: Option<Resolution>,
    ) -> Result<bool, ProjectError> {
        key::validate(key)?;
        key::validate(new_key)?;
        if self.tree.node_by_key(key).is_none() {
            return Err(ProjectError::UnknownKey(key.to_string()));
        }
        if key == new_key {
            return Ok(false);
        }

        let before = self.owned_keys();
        let displaced = self
            .tree
            .relocate_node_by_key(key, new_key, keep_source, resolution)
            .ok_or_else(|| ProjectError::UnknownKey(key.to_string()))?;
        for resource in &mut self.resources {
            resource.relocate_translation(key, new_key, &displaced, keep_source)?;
        }

        let moved: Vec<String> = self
            .placeholders
            .iter()
            .filter(|p| p.as_str() == key || key::is_ancestor_of(key, p))
            .cloned()
            .collect();
        if !keep_source {
            for p in &moved {
                self.placeholders.remove(p);
            }
        }
        self.placeholders
            .extend(moved.iter().map(|p| key::create(new_key, key::child_suffix(p, key))));

        let candidates = if keep_source {
            Vec::new()
        } else {
            key::parent(key).map(str::to_string).into_iter().collect()
        };
        self.settle(&before, candidates);

        tracing::debug!(
            key,
            new_key,
            keep_source,
            displaced = displaced.len(),
            "Relocated translation key"
        );
        Ok(true)
    }

    fn owned_keys(&self) -> BTreeSet<String> {
        self.resources.iter().flat_map(Resource::keys).map(str::to_string).collect()
    }

    /// Drops tree nodes the last edit left without backing.
    ///
    /// Candidates are the keys that disappeared from every resource plus
    /// `extra`; each is removed while it is an unbacked leaf, then its parent
    /// is tried.
    fn settle(&mut self, before: &BTreeSet<String>, mut extra: Vec<String>) {
        self.forget_stale_placeholders();

        let after = self.owned_keys();
        extra.extend(before.difference(&after).cloned());
        for candidate in &extra {
            self.prune_from(candidate);
        }
    }

    fn prune_from(&mut self, key: &str) {
        let mut current = Some(key);
        while let Some(k) = current {
            if let Some(node) = self.tree.node_by_key(k) {
                if !self.tree.is_leaf(node) || self.is_backed(k) {
                    break;
                }
                self.tree.remove_node_by_key(k);
                tracing::trace!(key = k, "Pruned unbacked tree node");
            }
            current = key::parent(k);
        }
    }

    fn is_backed(&self, key: &str) -> bool {
        self.resources.iter().any(|r| r.contains_key(key) || r.has_descendants(key))
            || self.placeholders.iter().any(|p| p == key || key::is_ancestor_of(key, p))
    }

    /// Placeholders are only kept while they are value-less tree leaves.
    fn forget_stale_placeholders(&mut self) {
        let tree = &self.tree;
        let resources = &self.resources;
        self.placeholders.retain(|p| {
            tree.node_by_key(p).is_some_and(|node| tree.is_leaf(node))
                && !resources.iter().any(|r| r.contains_key(p))
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::resource::ChangeEvent;
    use crate::test_utils::{
        paths_with_prefixes,
        resource_with,
        snapshot,
        tree_paths,
    };

    fn assert_coherent(project: &Project) {
        let mut expected = paths_with_prefixes(project.keys());
        expected.extend(paths_with_prefixes(project.placeholders.iter().map(String::as_str)));
        assert_eq!(tree_paths(project.tree()), expected);
    }

    #[fixture]
    fn ab_project() -> Project {
        Project::from_resources([
            resource_with("en", &[("a.a", "aa"), ("a.b", "ab"), ("b.a", "ba"), ("b.b", "bb")]),
            resource_with("ja", &[("a.a", "あa"), ("a.b", "あb"), ("b.a", "びa"), ("b.b", "びb")]),
        ])
        .unwrap()
    }

    #[fixture]
    fn nested_project() -> Project {
        Project::from_resources([
            resource_with("en", &[("a.c", "ac"), ("b.a", "ba"), ("b.b.a", "bba"), ("b.b.b", "bbb")]),
            resource_with("ja", &[("b.a", "びa")]),
        ])
        .unwrap()
    }

    #[rstest]
    fn from_resources_builds_tree_from_key_union(nested_project: Project) {
        assert_eq!(
            nested_project.tree().keys(),
            vec!["a", "a.c", "b", "b.a", "b.b", "b.b.a", "b.b.b"]
        );
        assert_eq!(nested_project.locales().collect::<Vec<_>>(), vec!["en", "ja"]);
        assert_that!(nested_project.is_dirty(), eq(false));
    }

    #[rstest]
    fn duplicate_locale_is_rejected(mut ab_project: Project) {
        let result = ab_project.add_resource(Resource::new("en"));

        assert_eq!(result, Err(ProjectError::DuplicateLocale("en".to_string())));
    }

    #[rstest]
    fn add_resource_extends_tree(mut ab_project: Project) {
        ab_project.add_resource(resource_with("de", &[("c.d", "cd"), ("a.a", "x")])).unwrap();

        assert_eq!(
            ab_project.tree().keys(),
            vec!["a", "a.a", "a.b", "b", "b.a", "b.b", "c", "c.d"]
        );
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn rename_applies_to_every_resource(mut ab_project: Project) {
        assert_that!(ab_project.rename_key("b", "c").unwrap(), eq(true));

        assert_eq!(
            snapshot(ab_project.resource("en").unwrap()),
            vec![("a.a", "aa"), ("a.b", "ab"), ("c.a", "ba"), ("c.b", "bb")]
        );
        assert_eq!(
            snapshot(ab_project.resource("ja").unwrap()),
            vec![("a.a", "あa"), ("a.b", "あb"), ("c.a", "びa"), ("c.b", "びb")]
        );

        ab_project.rename_key("c.a", "d").unwrap();

        assert_eq!(
            snapshot(ab_project.resource("en").unwrap()),
            vec![("a.a", "aa"), ("a.b", "ab"), ("c.b", "bb"), ("d", "ba")]
        );
        assert_eq!(ab_project.tree().keys(), vec!["a", "a.a", "a.b", "c", "c.b", "d"]);
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn rename_merges_namespaces(mut nested_project: Project) {
        nested_project.rename_key("b", "a").unwrap();

        assert_eq!(
            snapshot(nested_project.resource("en").unwrap()),
            vec![("a.a", "ba"), ("a.b.a", "bba"), ("a.b.b", "bbb"), ("a.c", "ac")]
        );
        assert_eq!(snapshot(nested_project.resource("ja").unwrap()), vec![("a.a", "びa")]);
        assert_coherent(&nested_project);

        nested_project.rename_key("a.b", "a").unwrap();

        assert_eq!(
            snapshot(nested_project.resource("en").unwrap()),
            vec![("a.a", "bba"), ("a.b", "bbb"), ("a.c", "ac")]
        );
        assert_eq!(snapshot(nested_project.resource("ja").unwrap()), Vec::<(&str, &str)>::new());
        assert_eq!(nested_project.tree().keys(), vec!["a", "a.a", "a.b", "a.c"]);
        assert_coherent(&nested_project);
    }

    #[rstest]
    fn rename_with_replace_discards_target(mut nested_project: Project) {
        nested_project.rename_key_with("b", "a", Resolution::Replace).unwrap();

        assert_eq!(
            snapshot(nested_project.resource("en").unwrap()),
            vec![("a.a", "ba"), ("a.b.a", "bba"), ("a.b.b", "bbb")]
        );

        nested_project.rename_key_with("a.b", "a", Resolution::Replace).unwrap();

        assert_eq!(
            snapshot(nested_project.resource("en").unwrap()),
            vec![("a.a", "bba"), ("a.b", "bbb")]
        );
        assert_eq!(nested_project.tree().keys(), vec!["a", "a.a", "a.b"]);
        assert_coherent(&nested_project);
    }

    #[rstest]
    fn duplicate_keeps_source_in_every_resource(mut ab_project: Project) {
        assert_that!(ab_project.duplicate_key("b", "c").unwrap(), eq(true));

        assert_eq!(
            snapshot(ab_project.resource("ja").unwrap()),
            vec![
                ("a.a", "あa"),
                ("a.b", "あb"),
                ("b.a", "びa"),
                ("b.b", "びb"),
                ("c.a", "びa"),
                ("c.b", "びb")
            ]
        );
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn duplicate_with_replace_keeps_source(mut nested_project: Project) {
        nested_project.duplicate_key_with("b", "a", Resolution::Replace).unwrap();

        assert_eq!(
            snapshot(nested_project.resource("en").unwrap()),
            vec![
                ("a.a", "ba"),
                ("a.b.a", "bba"),
                ("a.b.b", "bbb"),
                ("b.a", "ba"),
                ("b.b.a", "bba"),
                ("b.b.b", "bbb")
            ]
        );
        assert_coherent(&nested_project);
    }

    #[rstest]
    fn rename_leaf_onto_namespace_replaces_it() {
        let mut project = Project::from_resources([
            resource_with("en", &[("title", "Title"), ("nav.home", "Home"), ("nav.back", "Back")]),
            resource_with("ja", &[("nav.home", "ホーム")]),
        ])
        .unwrap();

        project.rename_key("title", "nav").unwrap();

        assert_eq!(snapshot(project.resource("en").unwrap()), vec![("nav", "Title")]);
        assert_eq!(snapshot(project.resource("ja").unwrap()), Vec::<(&str, &str)>::new());
        assert_eq!(project.tree().keys(), vec!["nav"]);
        assert_coherent(&project);
    }

    #[rstest]
    fn rename_prunes_emptied_parent() {
        let mut project =
            Project::from_resources([resource_with("en", &[("a.b.c", "1"), ("x", "2")])]).unwrap();

        project.rename_key("a.b.c", "y").unwrap();

        assert_eq!(project.tree().keys(), vec!["x", "y"]);
    }

    #[rstest]
    fn rename_unknown_key_is_error(mut ab_project: Project) {
        let result = ab_project.rename_key("missing", "c");

        assert_eq!(result, Err(ProjectError::UnknownKey("missing".to_string())));
        assert_that!(ab_project.is_dirty(), eq(false));
    }

    #[rstest]
    fn rename_onto_itself_is_noop(mut ab_project: Project) {
        assert_that!(ab_project.rename_key("a", "a").unwrap(), eq(false));
        assert_that!(ab_project.is_dirty(), eq(false));
    }

    #[rstest]
    #[case::source("a..b", "c")]
    #[case::target("a", "c d")]
    #[case::leading("a", ".c")]
    fn invalid_keys_are_rejected_before_mutation(
        mut ab_project: Project,
        #[case] key: &str,
        #[case] new_key: &str,
    ) {
        let result = ab_project.rename_key(key, new_key);

        assert!(matches!(result, Err(ProjectError::InvalidKey(_))));
        assert_that!(ab_project.is_dirty(), eq(false));
        assert_eq!(ab_project.tree().len(), 6);
    }

    #[rstest]
    fn remove_key_prunes_tree(mut ab_project: Project) {
        assert_that!(ab_project.remove_key("b.a").unwrap(), eq(true));
        assert_that!(ab_project.remove_key("b.b").unwrap(), eq(true));
        assert_that!(ab_project.remove_key("b").unwrap(), eq(false));

        assert_eq!(ab_project.tree().keys(), vec!["a", "a.a", "a.b"]);
        assert_eq!(ab_project.dirty_locales().collect::<Vec<_>>(), vec!["en", "ja"]);
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn store_translation_targets_one_locale(mut ab_project: Project) {
        assert_that!(ab_project.store_translation("ja", "c.d", "しd").unwrap(), eq(true));

        assert_that!(ab_project.resource("ja").unwrap().translation("c.d"), some(eq("しd")));
        assert_that!(ab_project.resource("en").unwrap().translation("c.d"), none());
        assert_eq!(ab_project.dirty_locales().collect::<Vec<_>>(), vec!["ja"]);
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn store_unknown_locale_is_error(mut ab_project: Project) {
        let result = ab_project.store_translation("fr", "a.a", "x");

        assert_eq!(result, Err(ProjectError::UnknownLocale("fr".to_string())));
    }

    #[rstest]
    fn store_leaf_over_namespace_prunes_evicted_nodes(mut nested_project: Project) {
        nested_project.store_translation("en", "b.b", "leaf").unwrap();

        assert_eq!(nested_project.tree().keys(), vec!["a", "a.c", "b", "b.a", "b.b"]);
        assert_coherent(&nested_project);
    }

    #[rstest]
    fn store_empty_value_keeps_node_used_elsewhere(mut nested_project: Project) {
        nested_project.store_translation("en", "b.a", "").unwrap();
        assert_that!(nested_project.tree().node_by_key("b.a"), some(anything()));

        nested_project.store_translation("ja", "b.a", "").unwrap();
        assert_that!(nested_project.tree().node_by_key("b.a"), none());
        assert_coherent(&nested_project);
    }

    #[rstest]
    fn mixed_leafness_across_locales() {
        let mut project = Project::from_resources([
            resource_with("en", &[("a", "1")]),
            resource_with("ja", &[("a.b", "2")]),
        ])
        .unwrap();
        assert_eq!(project.tree().keys(), vec!["a", "a.b"]);

        project.store_translation("ja", "a.b", "").unwrap();

        assert_eq!(project.tree().keys(), vec!["a"]);
        assert_coherent(&project);
    }

    #[rstest]
    fn add_key_creates_placeholder(mut ab_project: Project) {
        assert_that!(ab_project.add_key("c.d").unwrap(), eq(true));
        assert_that!(ab_project.add_key("c.d").unwrap(), eq(false));

        assert_that!(ab_project.is_placeholder("c.d"), eq(true));
        assert_that!(ab_project.tree().node_by_key("c.d"), some(anything()));
        assert_that!(ab_project.resource("en").unwrap().translation("c.d"), none());
        assert_that!(ab_project.is_dirty(), eq(false));
        assert_coherent(&ab_project);

        ab_project.store_translation("en", "c.d", "cd").unwrap();

        assert_that!(ab_project.is_placeholder("c.d"), eq(false));
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn add_key_evicts_ancestor_values(mut ab_project: Project) {
        ab_project.add_key("a.a.x").unwrap();

        assert_that!(ab_project.resource("en").unwrap().translation("a.a"), none());
        assert_that!(ab_project.resource("ja").unwrap().translation("a.a"), none());
        assert_eq!(ab_project.tree().keys(), vec!["a", "a.a", "a.a.x", "a.b", "b", "b.a", "b.b"]);
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn placeholders_follow_rename_and_remove(mut ab_project: Project) {
        ab_project.add_key("b.c").unwrap();

        ab_project.rename_key("b", "z").unwrap();
        assert_that!(ab_project.is_placeholder("z.c"), eq(true));
        assert_that!(ab_project.is_placeholder("b.c"), eq(false));
        assert_coherent(&ab_project);

        ab_project.duplicate_key("z.c", "y").unwrap();
        assert_that!(ab_project.is_placeholder("y"), eq(true));

        ab_project.remove_key("z").unwrap();
        assert_that!(ab_project.is_placeholder("z.c"), eq(false));
        assert_eq!(ab_project.tree().keys(), vec!["a", "a.a", "a.b", "y"]);
        assert_coherent(&ab_project);
    }

    #[rstest]
    fn conflict_is_reported_before_edit(ab_project: Project) {
        assert_that!(
            ab_project.rename_conflict("b", "a").unwrap(),
            some(eq(Conflict { source_is_leaf: false, target_is_leaf: false }))
        );
        assert_that!(ab_project.rename_conflict("b", "c").unwrap(), none());
        assert!(ab_project.rename_conflict("b", "").is_err());
    }

    #[rstest]
    fn reported_resolution_is_the_applied_one() {
        let entries = [("menu.file.open", "Open"), ("menu.file.close", "Close")];
        let mut renamed = Project::from_resources([resource_with("en", &entries)]).unwrap();
        let mut copied = Project::from_resources([resource_with("en", &entries)]).unwrap();

        let rename = renamed.rename_conflict("menu.file", "menu").unwrap();
        let duplicate = copied.duplicate_conflict("menu.file", "menu").unwrap();
        renamed.rename_key("menu.file", "menu").unwrap();
        copied.duplicate_key("menu.file", "menu").unwrap();

        assert_that!(rename.map(|c| c.resolution()), some(eq(Resolution::Replace)));
        assert_that!(duplicate.map(|c| c.resolution()), some(eq(Resolution::Merge)));
        assert_eq!(
            snapshot(renamed.resource("en").unwrap()),
            vec![("menu.close", "Close"), ("menu.open", "Open")]
        );
        assert_eq!(
            snapshot(copied.resource("en").unwrap()),
            vec![
                ("menu.close", "Close"),
                ("menu.file.close", "Close"),
                ("menu.file.open", "Open"),
                ("menu.open", "Open")
            ]
        );
        assert_coherent(&renamed);
        assert_coherent(&copied);
    }

    #[rstest]
    fn listeners_see_every_locale(mut ab_project: Project) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let listener: Rc<dyn ResourceListener> =
            Rc::new(move |event: &ChangeEvent| sink.borrow_mut().push(event.clone()));
        ab_project.add_listener(&listener);

        ab_project.rename_key("b", "c").unwrap();

        assert_eq!(*events.borrow(), vec![ChangeEvent::new("en", "c"), ChangeEvent::new("ja", "c")]);
    }

    #[rstest]
    fn expanded_state_survives_rename(mut ab_project: Project) {
        assert!(ab_project.set_expanded("b", true));

        ab_project.rename_key("b", "c").unwrap();

        assert!(ab_project.tree().is_expanded("c"));
        assert!(!ab_project.tree().is_expanded("b"));
    }
}
