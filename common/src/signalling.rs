//! シグナリングエンドポイント
//!
//! 映像ストリームのネゴシエーションに使うURLを組み立てます。

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PanelError, Result};

/// シグナリングサーバーの既定ポート
pub const DEFAULT_SIGNALLING_PORT: u16 = 8083;
/// 既定のストリームキー
pub const DEFAULT_STREAM_KEY: &str = "s1";
/// 既定のチャネル番号
pub const DEFAULT_CHANNEL: u32 = 0;

/// シグナリングエンドポイント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignallingEndpoint {
    /// URLをそのまま使う
    Url(String),
    /// ホスト・ポート・ストリームキー・チャネルから組み立てる
    Components {
        /// ロボットのホスト名またはIPアドレス
        host: String,
        /// ポート番号
        port: u16,
        /// ストリームキー
        stream_key: String,
        /// チャネル番号
        channel: u32,
    },
}

impl SignallingEndpoint {
    /// 既定のポート・ストリームでホストを指定
    pub fn for_host(host: impl Into<String>) -> Self {
        SignallingEndpoint::Components {
            host: host.into(),
            port: DEFAULT_SIGNALLING_PORT,
            stream_key: DEFAULT_STREAM_KEY.to_string(),
            channel: DEFAULT_CHANNEL,
        }
    }

    /// URL文字列に変換
    ///
    /// `Url` はそのまま返す（形式だけ検証する）。
    pub fn to_url(&self) -> Result<String> {
        match self {
            SignallingEndpoint::Url(url) => {
                Url::parse(url)?;
                Ok(url.clone())
            }
            SignallingEndpoint::Components {
                host,
                port,
                stream_key,
                channel,
            } => {
                if host.is_empty() {
                    return Err(PanelError::InvalidUrl("ホストが指定されていません".to_string()));
                }

                // IPv6アドレスは角括弧で囲む
                let authority = match host.parse::<Ipv6Addr>() {
                    Ok(addr) => format!("[{}]:{}", addr, port),
                    Err(_) => format!("{}:{}", host, port),
                };
                let mut url = Url::parse(&format!("http://{}/", authority))?;
                let channel = channel.to_string();

                url.path_segments_mut()
                    .map_err(|_| PanelError::InvalidUrl(format!("パスを設定できません: {}", host)))?
                    .pop_if_empty()
                    .extend(["stream", stream_key.as_str(), "channel", channel.as_str(), "webrtc"]);
                url.query_pairs_mut()
                    .append_pair("uuid", stream_key)
                    .append_pair("channel", &channel);

                Ok(url.into())
            }
        }
    }
}
