//! ロボット操作パネル共通ライブラリ
//!
//! このクレートは、ロボット操作パネルで使用される共通の機能を提供します。
//! Webクライアントとコマンドラインクライアントの両方で使用されます。
//!
//! - [`command`]: ボタンから送信するコマンドと送信器
//! - [`panel`]: ボタン配置
//! - [`signalling`] / [`playback`]: 映像ウィジェットの接続先とアダプタ管理

pub mod command;
pub mod config;
pub mod error;
pub mod panel;
pub mod playback;
pub mod signalling;
pub mod utils;

// 主要コンポーネントを再エクスポート
pub use command::{Command, CommandDispatcher, CommandTransport};
pub use config::PanelConfig;
pub use error::{PanelError, Result};
pub use panel::PanelLayout;
pub use playback::{
    AdaptorConfig, AdaptorEvent, ConnectionState, PlaybackController, PlaybackObserver,
    SharedPlayback, StreamAdaptor,
};
pub use signalling::SignallingEndpoint;

/// ライブラリのバージョン
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
