//! エラー型定義
//!
//! 操作パネルで使用する共通エラー型を定義します。

use std::io;
use thiserror::Error;

/// 共通エラー
#[derive(Error, Debug)]
pub enum PanelError {
    /// 入出力エラー
    #[error("I/Oエラー: {0}")]
    IoError(#[from] io::Error),

    /// JSON エラー
    #[error("JSONの処理に失敗しました: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML デシリアライズエラー
    #[error("TOMLの解析に失敗しました: {0}")]
    TomlDeError(#[from] toml::de::Error),

    /// TOML シリアライズエラー
    #[error("TOMLのシリアライズに失敗しました: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// HTTPステータスが成功以外
    #[error("HTTPエラー: ステータス {0}")]
    HttpStatus(u16),

    /// 未定義のコマンド名
    #[error("不明なコマンド: {0}")]
    UnknownCommand(String),

    /// URLの構築・解析エラー
    #[error("無効なURL: {0}")]
    InvalidUrl(String),

    /// ストリーミングアダプタのエラー
    #[error("アダプタエラー: {0}")]
    AdaptorError(String),

    /// 設定エラー
    #[error("設定エラー: {0}")]
    ConfigError(String),
}

impl From<url::ParseError> for PanelError {
    fn from(err: url::ParseError) -> Self {
        PanelError::InvalidUrl(err.to_string())
    }
}

/// 結果型のエイリアス
pub type Result<T> = std::result::Result<T, PanelError>;
