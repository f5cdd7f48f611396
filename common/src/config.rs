//! 設定管理
//!
//! 操作パネルの設定の読み込み、保存、および管理機能を提供します。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::command::DEFAULT_COMMAND_BASE_URL;
use crate::error::{PanelError, Result};
use crate::playback::{AdaptorConfig, DEFAULT_AUTOPLAY_STREAM, DEFAULT_REMOTE_VIDEO_ID};
use crate::signalling::{
    SignallingEndpoint, DEFAULT_CHANNEL, DEFAULT_SIGNALLING_PORT, DEFAULT_STREAM_KEY,
};

/// 既定のロボットアドレス
pub const DEFAULT_ROBOT_HOST: &str = "10.33.85.8";

/// 設定形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// JSON 形式
    #[default]
    Json,
    /// TOML 形式
    Toml,
}

impl ConfigFormat {
    /// ファイル拡張子から設定形式を判定
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// シグナリング設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignallingSettings {
    /// URLを直接指定（指定時は他の項目より優先）
    pub url: Option<String>,
    /// ポート番号
    pub port: u16,
    /// ストリームキー
    pub stream_key: String,
    /// チャネル番号
    pub channel: u32,
}

impl Default for SignallingSettings {
    fn default() -> Self {
        Self {
            url: None,
            port: DEFAULT_SIGNALLING_PORT,
            stream_key: DEFAULT_STREAM_KEY.to_string(),
            channel: DEFAULT_CHANNEL,
        }
    }
}

/// パネル設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// コマンド送信先のベースURL
    pub command_base_url: String,
    /// ロボットのホスト名またはIPアドレス
    pub robot_host: String,
    /// 初期化後に自動再生するストリームID
    pub autoplay_stream: Option<String>,
    /// ICEサーバーのURL
    pub ice_servers: Vec<String>,
    /// 映像要素のID
    pub remote_video_id: String,
    /// シグナリング設定（TOMLではテーブルになるため最後に置く）
    pub signalling: SignallingSettings,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            command_base_url: DEFAULT_COMMAND_BASE_URL.to_string(),
            robot_host: DEFAULT_ROBOT_HOST.to_string(),
            autoplay_stream: Some(DEFAULT_AUTOPLAY_STREAM.to_string()),
            ice_servers: Vec::new(),
            remote_video_id: DEFAULT_REMOTE_VIDEO_ID.to_string(),
            signalling: SignallingSettings::default(),
        }
    }
}

impl PanelConfig {
    /// シグナリングエンドポイントを取得
    pub fn signalling_endpoint(&self) -> SignallingEndpoint {
        match &self.signalling.url {
            Some(url) => SignallingEndpoint::Url(url.clone()),
            None => SignallingEndpoint::Components {
                host: self.robot_host.clone(),
                port: self.signalling.port,
                stream_key: self.signalling.stream_key.clone(),
                channel: self.signalling.channel,
            },
        }
    }

    /// アダプタ設定を構築
    pub fn adaptor_config(&self) -> Result<AdaptorConfig> {
        let url = self.signalling_endpoint().to_url()?;
        Ok(AdaptorConfig::new(url)
            .with_ice_servers(self.ice_servers.clone())
            .with_remote_video_id(self.remote_video_id.clone()))
    }

    /// 文字列から読み込む
    pub fn from_str_with_format(s: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Json => serde_json::from_str(s)?,
            ConfigFormat::Toml => toml::from_str(s)?,
        };
        Ok(config)
    }

    /// 文字列に変換
    pub fn to_string_with_format(&self, format: ConfigFormat) -> Result<String> {
        let s = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        Ok(s)
    }

    /// ファイルから読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            PanelError::ConfigError(format!("未対応の設定ファイル形式です: {}", path.display()))
        })?;

        let content = fs::read_to_string(path)?;
        let config = Self::from_str_with_format(&content, format)?;
        log::info!("設定を読み込みました: {}", path.display());
        Ok(config)
    }

    /// ファイルに保存
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).unwrap_or_default();

        // ディレクトリが存在しない場合は作成
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_string_with_format(format)?)?;
        log::info!("設定を保存しました: {}", path.display());
        Ok(())
    }
}
