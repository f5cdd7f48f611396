//! コマンド送信モジュール
//!
//! ロボットへのワンショットコマンドと、その送信処理を定義します。
//! コマンドは `POST <base_url>/<コマンド名>` として送られ、応答は利用しません。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PanelError, Result};

/// コマンド送信先の既定ベースURL
pub const DEFAULT_COMMAND_BASE_URL: &str = "http://localhost:3000";

/// ロボットに送信するコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// 力こぶポーズ
    Muscles,
    /// ダブ
    Dab,
}

impl Command {
    /// 定義済みの全コマンド
    pub const ALL: [Command; 2] = [Command::Muscles, Command::Dab];

    /// URLパスに使うコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Command::Muscles => "muscles",
            Command::Dab => "dab",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "muscles" => Ok(Command::Muscles),
            "dab" => Ok(Command::Dab),
            _ => Err(PanelError::UnknownCommand(s.to_string())),
        }
    }
}

/// コマンドの転送手段
///
/// ブラウザでは fetch、ネイティブでは HTTP クライアントが実装します。
#[async_trait(?Send)]
pub trait CommandTransport {
    /// 本文なしで POST する
    async fn post(&self, url: &str) -> Result<()>;
}

/// コマンド送信器
#[derive(Debug, Clone)]
pub struct CommandDispatcher<T> {
    /// 送信先ベースURL
    base_url: String,
    /// 転送手段
    transport: T,
}

impl<T: CommandTransport> CommandDispatcher<T> {
    /// 新しい送信器を作成
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// 既定のベースURLで送信器を作成
    pub fn with_transport(transport: T) -> Self {
        Self::new(DEFAULT_COMMAND_BASE_URL, transport)
    }

    /// ベースURLを取得
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 転送手段を取得
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// コマンドの送信先URLを構築
    pub fn command_url(&self, command: Command) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), command.name())
    }

    /// コマンドを送信する
    ///
    /// 失敗はログに記録するだけで呼び出し元には返さない。再送もしない。
    pub async fn dispatch(&self, command: Command) {
        let url = self.command_url(command);
        log::debug!("コマンドを送信: {} -> {}", command, url);

        if let Err(e) = self.transport.post(&url).await {
            log::error!("コマンド {} の実行に失敗しました: {}", command, e);
        }
    }
}
