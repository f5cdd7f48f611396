//! WebRTCアダプタのバインディング
//!
//! ページに読み込まれた `WebRTCAdaptor`（Ant Media）を wasm-bindgen 経由で操作します。
//! シグナリングやメディア処理はすべてJS側のライブラリが行います。

use js_sys::{Array, Object, Reflect};
use robot_panel_common::error::{PanelError, Result};
use robot_panel_common::{AdaptorConfig, StreamAdaptor};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = WebRTCAdaptor)]
    type JsWebRtcAdaptor;

    #[wasm_bindgen(constructor, js_class = "WebRTCAdaptor", catch)]
    fn new(options: &Object) -> std::result::Result<JsWebRtcAdaptor, JsValue>;

    #[wasm_bindgen(method, js_class = "WebRTCAdaptor")]
    fn play(this: &JsWebRtcAdaptor, stream_id: &str);

    #[wasm_bindgen(method, js_class = "WebRTCAdaptor")]
    fn stop(this: &JsWebRtcAdaptor, stream_id: &str);

    #[wasm_bindgen(method, js_class = "WebRTCAdaptor", js_name = closeWebSocket, catch)]
    fn close_websocket(this: &JsWebRtcAdaptor) -> std::result::Result<(), JsValue>;
}

/// WebRTCアダプタ
///
/// コールバックはJS側に所有を移す。WebSocketは破棄後に閉じるため、
/// `closed` などの通知はRust側のアダプタを解放した後にも届く。
pub struct WebRtcAdaptor {
    inner: JsWebRtcAdaptor,
}

impl WebRtcAdaptor {
    /// アダプタを生成
    pub fn new<I, E>(config: &AdaptorConfig, mut on_info: I, mut on_error: E) -> Result<Self>
    where
        I: FnMut(String) + 'static,
        E: FnMut(String, String) + 'static,
    {
        let on_info = Closure::wrap(Box::new(move |info: JsValue, _obj: JsValue| {
            on_info(js_to_string(&info));
        }) as Box<dyn FnMut(JsValue, JsValue)>)
        .into_js_value();

        let on_error = Closure::wrap(Box::new(move |error: JsValue, message: JsValue| {
            on_error(js_to_string(&error), js_to_string(&message));
        }) as Box<dyn FnMut(JsValue, JsValue)>)
        .into_js_value();

        let options = build_options(config, &on_info, &on_error)
            .map_err(|e| PanelError::AdaptorError(format!("設定の構築に失敗しました: {:?}", e)))?;

        let inner = JsWebRtcAdaptor::new(&options)
            .map_err(|e| PanelError::AdaptorError(format!("WebRTCAdaptorの生成に失敗しました: {:?}", e)))?;

        Ok(Self { inner })
    }
}

impl StreamAdaptor for WebRtcAdaptor {
    fn play(&mut self, stream_id: &str) {
        self.inner.play(stream_id);
    }

    fn stop(&mut self, stream_id: &str) {
        self.inner.stop(stream_id);
    }
}

impl Drop for WebRtcAdaptor {
    fn drop(&mut self) {
        if let Err(e) = self.inner.close_websocket() {
            log::debug!("WebSocketを閉じられませんでした: {:?}", e);
        }
    }
}

/// アダプタに渡す設定オブジェクトを構築
fn build_options(
    config: &AdaptorConfig,
    on_info: &JsValue,
    on_error: &JsValue,
) -> std::result::Result<Object, JsValue> {
    let media_constraints = Object::new();
    set(&media_constraints, "video", &config.media_constraints.video.into())?;
    set(&media_constraints, "audio", &config.media_constraints.audio.into())?;

    let ice_servers = Array::new();
    for url in &config.peer_connection.ice_servers {
        let server = Object::new();
        set(&server, "urls", &JsValue::from_str(url))?;
        ice_servers.push(&server);
    }
    let peer_connection = Object::new();
    if ice_servers.length() > 0 {
        set(&peer_connection, "iceServers", &ice_servers)?;
    }

    let sdp_constraints = Object::new();
    set(&sdp_constraints, "OfferToReceiveAudio", &config.sdp_constraints.offer_to_receive_audio.into())?;
    set(&sdp_constraints, "OfferToReceiveVideo", &config.sdp_constraints.offer_to_receive_video.into())?;

    let options = Object::new();
    set(&options, "websocket_url", &JsValue::from_str(&config.websocket_url))?;
    set(&options, "mediaConstraints", &media_constraints)?;
    set(&options, "peerconnection_config", &peer_connection)?;
    set(&options, "sdp_constraints", &sdp_constraints)?;
    set(&options, "remoteVideoId", &JsValue::from_str(&config.remote_video_id))?;
    set(&options, "callback", on_info)?;
    set(&options, "callbackError", on_error)?;

    Ok(options)
}

fn set(target: &Object, key: &str, value: &JsValue) -> std::result::Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

/// コールバック引数を文字列化（文字列以外はデバッグ表現）
fn js_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
