//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    EditorSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: EditorSettings,

    /// プロジェクトのルートパス
    project_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: EditorSettings::default(), project_root: None }
    }

    /// プロジェクトの設定ファイルを読み込んで適用する
    ///
    /// `project_root` が `None` の場合はデフォルト設定になる。
    /// 失敗した場合、現在の設定とプロジェクトルートは変更されない。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, project_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match project_root.as_deref() {
            Some(root) => loader::load_from_project(root)?.unwrap_or_default(),
            None => EditorSettings::default(),
        };
        self.apply(settings)?;
        self.project_root = project_root;
        tracing::debug!(settings = ?self.current_settings, "Project settings loaded");
        Ok(())
    }

    /// 設定を差し替える
    ///
    /// # Errors
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn update_settings(&mut self, new_settings: EditorSettings) -> Result<(), ConfigError> {
        self.apply(new_settings)?;
        tracing::debug!("Project settings replaced");
        Ok(())
    }

    fn apply(&mut self, settings: EditorSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &EditorSettings {
        &self.current_settings
    }

    /// プロジェクトルートを取得
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}
