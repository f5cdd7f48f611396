//! Webクライアントのコンポーネントモジュール

pub mod controls;
pub mod playback;

// 主要コンポーネントをre-export
pub use controls::ControlPanel;
pub use playback::Playback;
