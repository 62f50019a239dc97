//! 設定ファイルの読み込み関数

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    EditorSettings,
};

/// プロジェクトルートに置かれる設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-keytree.json";

/// プロジェクトから設定を読み込む
///
/// `.i18n-keytree.json` ファイルを探して読み込む
///
/// # Arguments
/// * `project_root` - プロジェクトのルートパス
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルを読み込めた
/// - `Ok(None)`: 設定ファイルがない（デフォルト設定を使う）
/// - `Err(ConfigError)`: 読み込みまたはパースに失敗
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_project(project_root: &Path) -> Result<Option<EditorSettings>, ConfigError> {
    let config_path = project_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No project settings file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(path = %config_path.display(), "Read project settings file");
    Ok(Some(serde_json::from_str(&content)?))
}
