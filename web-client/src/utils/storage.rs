//! ストレージユーティリティ
//!
//! ブラウザのローカルストレージを使用してパネル設定の保存と読み込みを行います。

use robot_panel_common::PanelConfig;
use wasm_bindgen::JsValue;
use web_sys::{window, Storage};

/// 設定の保存キー
const CONFIG_KEY: &str = "robot-panel.config";

/// ローカルストレージから設定を読み込む
///
/// 保存された設定が無い場合は既定値を書き込み、開発者ツールから編集できるようにする。
pub fn load_config() -> PanelConfig {
    let Some(storage) = get_local_storage() else {
        log::warn!("ローカルストレージを取得できませんでした。デフォルト設定を使用します。");
        return PanelConfig::default();
    };

    match storage.get_item(CONFIG_KEY) {
        Ok(Some(value)) => match serde_json::from_str::<PanelConfig>(&value) {
            Ok(config) => {
                log::info!("設定を読み込みました: {:?}", config);
                config
            }
            Err(e) => {
                log::error!("設定のデシリアライズに失敗しました: {}", e);
                PanelConfig::default()
            }
        },
        Ok(None) => {
            log::info!("保存された設定がありません。デフォルト設定を使用します。");
            let config = PanelConfig::default();
            if let Err(e) = save_config(&config) {
                log::warn!("デフォルト設定を保存できませんでした: {:?}", e);
            }
            config
        }
        Err(e) => {
            log::error!("設定の読み込みに失敗しました: {:?}", e);
            PanelConfig::default()
        }
    }
}

/// ローカルストレージに設定を保存する
pub fn save_config(config: &PanelConfig) -> Result<(), JsValue> {
    let storage = get_local_storage()
        .ok_or_else(|| JsValue::from_str("ローカルストレージを取得できませんでした"))?;

    let json = serde_json::to_string(config)
        .map_err(|e| JsValue::from_str(&format!("設定のシリアライズに失敗しました: {}", e)))?;

    storage.set_item(CONFIG_KEY, &json)?;
    log::info!("設定を保存しました");
    Ok(())
}

/// ローカルストレージを取得
fn get_local_storage() -> Option<Storage> {
    window()
        .and_then(|win| win.local_storage().ok())
        .flatten()
}
