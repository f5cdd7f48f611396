//! Webクライアントエントリポイント
//!
//! このクレートは、ロボット操作パネルのWebクライアント実装を提供します。
//! WebAssemblyにコンパイルされ、ブラウザ上で実行されます。
//! ページには事前に `WebRTCAdaptor` を読み込んでおく必要があります。

mod adaptor;
mod app;
mod components;
mod transport;
mod utils;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

/// パネルを描画する要素のID
const ROOT_ID: &str = "app";

/// Webクライアントの初期化
#[wasm_bindgen]
pub fn initialize() -> Result<(), JsValue> {
    #[cfg(feature = "development")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    wasm_logger::init(wasm_logger::Config::default());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("ドキュメントが見つかりません"))?;

    let root = panel_root(&document)?;
    yew::Renderer::<app::App>::with_root(root).render();
    log::info!("操作パネルを起動しました v{}", robot_panel_common::VERSION);

    Ok(())
}

/// 描画先の要素（無ければbodyの末尾に作る）
fn panel_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(root) = document.get_element_by_id(ROOT_ID) {
        return Ok(root);
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("bodyが見つかりません"))?;
    let root = document.create_element("div")?;
    root.set_id(ROOT_ID);
    root.set_class_name("robot-panel-app");
    body.append_child(&root)?;

    log::debug!("#{} を作成しました", ROOT_ID);
    Ok(root)
}
