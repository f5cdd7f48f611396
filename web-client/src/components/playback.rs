//! 映像再生コンポーネント
//!
//! リモートの映像ストリームを表示するコンポーネントです。
//! アダプタの管理は [`PlaybackController`] に任せ、ここではDOMとの橋渡しだけを行います。

use std::rc::{Rc, Weak};

use robot_panel_common::playback::{
    DEFAULT_AUTOPLAY_STREAM, DEFAULT_REMOTE_VIDEO_ID, NOT_CONNECTED_TEXT,
};
use robot_panel_common::{
    AdaptorConfig, AdaptorEvent, ConnectionState, PlaybackController, PlaybackObserver,
    SharedPlayback, SignallingEndpoint,
};
use yew::prelude::*;

use crate::adaptor::WebRtcAdaptor;

type Shared = SharedPlayback<WebRtcAdaptor>;

/// 映像再生のプロパティ
#[derive(Properties, Clone, PartialEq)]
pub struct PlaybackProps {
    /// シグナリングエンドポイント
    pub endpoint: SignallingEndpoint,
    /// コンテナに追加するクラス
    #[prop_or_default]
    pub class: Classes,
    /// ICEサーバー
    #[prop_or_default]
    pub ice_servers: Vec<String>,
    /// 初期化後に自動再生するストリーム
    #[prop_or(Some(DEFAULT_AUTOPLAY_STREAM.to_string()))]
    pub autoplay_stream: Option<String>,
    /// 映像要素のID
    #[prop_or(DEFAULT_REMOTE_VIDEO_ID.to_string())]
    pub remote_video_id: String,
}

/// 接続状態の反映と警告表示
struct BrowserObserver {
    connected: UseStateSetter<bool>,
}

impl PlaybackObserver for BrowserObserver {
    fn connection_changed(&self, state: ConnectionState) {
        self.connected.set(state.is_connected());
    }

    fn alert(&self, message: &str) {
        gloo::dialogs::alert(message);
    }
}

/// 映像再生コンポーネント
#[function_component(Playback)]
pub fn playback(props: &PlaybackProps) -> Html {
    let connected = use_state(|| false);

    // コントローラはコンポーネントの寿命の間だけ保持する
    let shared = {
        let setter = connected.setter();
        let autoplay_stream = props.autoplay_stream.clone();
        use_memo(
            move |_| {
                let observer = BrowserObserver { connected: setter };
                SharedPlayback::new(PlaybackController::new(Box::new(observer)).with_autoplay(autoplay_stream))
            },
            (),
        )
    };

    // アダプタを生成（生成済みなら何もしない）
    {
        let shared = shared.clone();
        let ice_servers = props.ice_servers.clone();
        let remote_video_id = props.remote_video_id.clone();
        use_effect_with_deps(
            move |endpoint: &SignallingEndpoint| {
                match endpoint.to_url() {
                    Ok(url) => {
                        let config = AdaptorConfig::new(url)
                            .with_ice_servers(ice_servers)
                            .with_remote_video_id(remote_video_id);
                        mount_adaptor(&shared, config);
                    }
                    Err(e) => log::error!("シグナリングURLを構築できません: {}", e),
                }
                || ()
            },
            props.endpoint.clone(),
        );
    }

    // アンマウント時にアダプタを解放
    {
        let shared = shared.clone();
        use_effect_with_deps(
            move |_| move || shared.with(|controller| controller.unmount()),
            (),
        );
    }

    html! {
        <div class={classes!("playback", props.class.clone())}>
            if !*connected {
                <span class="playback-status">{ NOT_CONNECTED_TEXT }</span>
            }
            <video id={props.remote_video_id.clone()} muted={true} autoplay={true} playsinline={true} />
        </div>
    }
}

/// コールバックを結び付けてアダプタを生成
fn mount_adaptor(shared: &Rc<Shared>, config: AdaptorConfig) {
    let info_handle = Rc::downgrade(shared);
    let error_handle = Rc::downgrade(shared);

    let on_info = move |tag: String| deliver(&info_handle, AdaptorEvent::Info(tag));
    let on_error = move |kind: String, message: String| {
        deliver(&error_handle, AdaptorEvent::Error { kind, message });
    };

    match shared.mount(config, |config| WebRtcAdaptor::new(config, on_info, on_error)) {
        Ok(true) => log::info!("映像ウィジェットを初期化しました"),
        Ok(false) => log::debug!("アダプタは生成済みです"),
        Err(e) => log::error!("アダプタの生成に失敗しました: {}", e),
    }
}

/// アダプタのコールバックからイベントを届ける
fn deliver(handle: &Weak<Shared>, event: AdaptorEvent) {
    match handle.upgrade() {
        Some(shared) => shared.deliver(event),
        None => log::debug!("コンポーネントは破棄済みです: {:?}", event),
    }
}
