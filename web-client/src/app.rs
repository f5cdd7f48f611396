//! Webクライアントアプリケーション
//!
//! Yewを使用した操作パネルのメインアプリケーションを実装します。

use robot_panel_common::{Command, CommandDispatcher, PanelLayout};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{ControlPanel, Playback};
use crate::transport::FetchTransport;
use crate::utils::storage;

/// メインアプリケーション
#[function_component(App)]
pub fn app() -> Html {
    // 設定を読み込む
    let config = use_state(storage::load_config);

    // コマンド送信器
    let dispatcher = use_memo(
        |base_url: &String| CommandDispatcher::new(base_url.clone(), FetchTransport),
        config.command_base_url.clone(),
    );

    // コマンド送信ハンドラー（結果は待たない）
    let on_command = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |command: Command| {
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                dispatcher.dispatch(command).await;
            });
        })
    };

    html! {
        <div class="app-container">
            <ControlPanel layout={PanelLayout::standard()} {on_command}>
                <Playback
                    endpoint={config.signalling_endpoint()}
                    class={classes!("playback-main")}
                    ice_servers={config.ice_servers.clone()}
                    autoplay_stream={config.autoplay_stream.clone()}
                    remote_video_id={config.remote_video_id.clone()}
                />
            </ControlPanel>
        </div>
    }
}
