//! ユーティリティモジュール

pub mod storage;
