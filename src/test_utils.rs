//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::key;
use crate::resource::{
    ChangeEvent,
    Resource,
};
use crate::tree::TranslationTree;

/// テスト用の Resource を作成する
///
/// # Arguments
/// * `locale` - 言語コード（例: "en", "ja"）
/// * `entries` - キーと値のペア
pub(crate) fn resource_with(locale: &str, entries: &[(&str, &str)]) -> Resource {
    Resource::from_entries(locale, entries.iter().copied())
}

/// Resource の内容をキー順のペアとして取得する
pub(crate) fn snapshot(resource: &Resource) -> Vec<(&str, &str)> {
    resource.entries().collect()
}

/// Resource に通知を記録するリスナーを登録する
pub(crate) fn record_events(resource: &mut Resource) -> Rc<RefCell<Vec<ChangeEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    resource.add_listener(Rc::new(move |event: &ChangeEvent| sink.borrow_mut().push(event.clone())));
    events
}

/// キー集合とその全ての祖先キー
pub(crate) fn paths_with_prefixes<'a>(keys: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for k in keys {
        for ancestor in key::ancestors(k) {
            paths.insert(ancestor.to_string());
        }
        paths.insert(k.to_string());
    }
    paths
}

/// ツリーの全ノードパス
pub(crate) fn tree_paths(tree: &TranslationTree) -> BTreeSet<String> {
    tree.keys().into_iter().collect()
}
