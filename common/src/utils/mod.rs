//! ユーティリティモジュール

pub mod logging;
