//! ロギング機能
//!
//! ネイティブ環境向けのロガー初期化を提供します。
//! ブラウザでは `wasm-logger` を使用するため、ここでは扱いません。

/// ロガーを初期化
///
/// `RUST_LOG` が設定されていればそちらを優先する。二度目以降の呼び出しは無視される。
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logger(default_filter: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();

    if let Err(e) = result {
        log::debug!("ロガーは既に初期化されています: {}", e);
    }
}

/// パニック時のログ記録ハンドラーを設定
pub fn set_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic payload",
            },
        };

        let location = match panic_info.location() {
            Some(loc) => format!(" at {}:{}", loc.file(), loc.line()),
            None => String::new(),
        };

        log::error!("パニックが発生しました: {}{}", message, location);
    }));
}

/// 詳細度からログフィルタを決定
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for_verbosity(0), "info");
        assert_eq!(filter_for_verbosity(1), "debug");
        assert_eq!(filter_for_verbosity(5), "trace");
    }
}
