//! 映像再生コントローラ
//!
//! 外部のリアルタイム映像クライアント（アダプタ）のライフサイクルを管理します。
//! アダプタ本体のシグナリング・ICE・メディア処理はこのモジュールの範囲外で、
//! ここでは生成の一意性、接続状態、再生中ストリームの追跡のみを扱います。

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// 初期化完了を表す情報タグ
pub const INITIALIZED_TAG: &str = "initialized";
/// ストリームが存在しないことを表すエラー種別
pub const NO_STREAM_EXIST: &str = "no_stream_exist";
/// 未接続時に表示する文言
pub const NOT_CONNECTED_TEXT: &str = "Not connected";
/// 映像を描画する要素のID
pub const DEFAULT_REMOTE_VIDEO_ID: &str = "remoteVideo";
/// 初期化後に自動再生するストリームID
pub const DEFAULT_AUTOPLAY_STREAM: &str = "0";

/// メディア制約
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// 音声を要求
    pub audio: bool,
    /// 映像を要求
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// ピア接続設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConnectionConfig {
    /// STUN/TURNサーバーのURL（空なら指定しない）
    pub ice_servers: Vec<String>,
}

/// SDPネゴシエーション設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpConstraints {
    /// 音声の受信を提案
    pub offer_to_receive_audio: bool,
    /// 映像の受信を提案
    pub offer_to_receive_video: bool,
}

impl Default for SdpConstraints {
    fn default() -> Self {
        Self {
            offer_to_receive_audio: true,
            offer_to_receive_video: true,
        }
    }
}

/// アダプタ生成時の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptorConfig {
    /// シグナリングURL
    pub websocket_url: String,
    /// メディア制約
    pub media_constraints: MediaConstraints,
    /// ピア接続設定
    pub peer_connection: PeerConnectionConfig,
    /// SDP設定
    pub sdp_constraints: SdpConstraints,
    /// 映像要素のID
    pub remote_video_id: String,
}

impl AdaptorConfig {
    /// 既定値で設定を作成
    pub fn new(websocket_url: impl Into<String>) -> Self {
        Self {
            websocket_url: websocket_url.into(),
            media_constraints: MediaConstraints::default(),
            peer_connection: PeerConnectionConfig::default(),
            sdp_constraints: SdpConstraints::default(),
            remote_video_id: DEFAULT_REMOTE_VIDEO_ID.to_string(),
        }
    }

    /// ICEサーバーを設定
    pub fn with_ice_servers(mut self, ice_servers: Vec<String>) -> Self {
        self.peer_connection.ice_servers = ice_servers;
        self
    }

    /// 映像要素のIDを設定
    pub fn with_remote_video_id(mut self, id: impl Into<String>) -> Self {
        self.remote_video_id = id.into();
        self
    }
}

/// アダプタから通知される情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptorInfo {
    /// 初期化完了
    Initialized,
    /// その他
    Other(String),
}

impl AdaptorInfo {
    /// タグ文字列から変換
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            INITIALIZED_TAG => AdaptorInfo::Initialized,
            other => AdaptorInfo::Other(other.to_string()),
        }
    }
}

/// アダプタから通知されるエラー種別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptorError {
    /// 要求したストリームが存在しない
    NoStreamExist,
    /// その他
    Other(String),
}

impl AdaptorError {
    /// 種別文字列から変換
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            NO_STREAM_EXIST => AdaptorError::NoStreamExist,
            other => AdaptorError::Other(other.to_string()),
        }
    }

    /// 種別文字列を取得
    pub fn as_str(&self) -> &str {
        match self {
            AdaptorError::NoStreamExist => NO_STREAM_EXIST,
            AdaptorError::Other(kind) => kind,
        }
    }
}

/// アダプタから届いたイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptorEvent {
    /// 情報コールバック
    Info(String),
    /// エラーコールバック
    Error { kind: String, message: String },
}

/// 接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// 未接続
    #[default]
    Disconnected,
    /// 接続済み
    Connected,
}

impl ConnectionState {
    /// 接続済みかどうか
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// 外部映像クライアントの操作
pub trait StreamAdaptor {
    /// ストリームの再生を要求
    fn play(&mut self, stream_id: &str);
    /// ストリームの停止を要求
    fn stop(&mut self, stream_id: &str);
}

/// 再生状態の変化を受け取るUI側の処理
pub trait PlaybackObserver {
    /// 接続状態が変化した
    fn connection_changed(&self, state: ConnectionState);
    /// ユーザーに警告を表示
    fn alert(&self, message: &str);
}

/// 映像再生コントローラ
///
/// ウィジェット1つにつき1つ作られ、アダプタを高々1回だけ生成します。
pub struct PlaybackController<A> {
    /// 生成済みアダプタ
    adaptor: Option<A>,
    /// 生成時に使った設定
    config: Option<AdaptorConfig>,
    /// 接続状態
    state: ConnectionState,
    /// 再生中のストリームID
    playing_stream: Option<String>,
    /// 初期化後に自動再生するストリームID
    autoplay_stream: Option<String>,
    /// UI側の処理
    observer: Box<dyn PlaybackObserver>,
}

impl<A: StreamAdaptor> PlaybackController<A> {
    /// 新しいコントローラを作成
    pub fn new(observer: Box<dyn PlaybackObserver>) -> Self {
        Self {
            adaptor: None,
            config: None,
            state: ConnectionState::Disconnected,
            playing_stream: None,
            autoplay_stream: Some(DEFAULT_AUTOPLAY_STREAM.to_string()),
            observer,
        }
    }

    /// 自動再生するストリームを設定（`None` で無効）
    pub fn with_autoplay(mut self, stream_id: Option<String>) -> Self {
        self.autoplay_stream = stream_id;
        self
    }

    /// アダプタを生成する
    ///
    /// 既に生成済みなら何もせず `Ok(false)` を返す。設定が変わっていても作り直さない。
    pub fn mount<F>(&mut self, config: AdaptorConfig, factory: F) -> Result<bool>
    where
        F: FnOnce(&AdaptorConfig) -> Result<A>,
    {
        if self.adaptor.is_some() {
            if self.config.as_ref() != Some(&config) {
                log::debug!(
                    "アダプタは生成済みのため設定の変更は反映されません: {}",
                    config.websocket_url
                );
            }
            return Ok(false);
        }

        let adaptor = factory(&config)?;
        log::info!("映像アダプタを生成しました: {}", config.websocket_url);

        self.adaptor = Some(adaptor);
        self.config = Some(config);
        Ok(true)
    }

    /// アダプタを解放する
    pub fn unmount(&mut self) {
        if self.adaptor.take().is_some() {
            log::info!("映像アダプタを解放しました");
        }
        self.config = None;
        self.playing_stream = None;
    }

    /// 情報コールバック
    pub fn handle_info(&mut self, tag: &str) {
        match AdaptorInfo::from_tag(tag) {
            AdaptorInfo::Initialized => {
                if !self.state.is_connected() {
                    self.state = ConnectionState::Connected;
                    self.observer.connection_changed(self.state);
                    log::info!("シグナリングサーバーに接続しました");
                }

                if let Some(stream_id) = self.autoplay_stream.clone() {
                    if self.playing_stream.as_deref() != Some(stream_id.as_str()) {
                        if let Err(e) = self.play(&stream_id) {
                            log::warn!("自動再生に失敗しました: {}", e);
                        }
                    }
                }
            }
            AdaptorInfo::Other(tag) => {
                log::debug!("アダプタ情報: {}", tag);
            }
        }
    }

    /// エラーコールバック
    ///
    /// 接続状態は変更しない。
    pub fn handle_error(&mut self, kind: &str, message: &str) {
        log::warn!("アダプタエラー: {} {}", kind, message);

        if let AdaptorError::NoStreamExist = AdaptorError::from_kind(kind) {
            self.stop_playing();
            self.observer.alert(kind);
        }
    }

    /// イベントを対応するコールバック処理に振り分け
    pub fn handle_event(&mut self, event: AdaptorEvent) {
        match event {
            AdaptorEvent::Info(tag) => self.handle_info(&tag),
            AdaptorEvent::Error { kind, message } => self.handle_error(&kind, &message),
        }
    }

    /// ストリームを再生
    pub fn play(&mut self, stream_id: &str) -> Result<()> {
        let adaptor = self
            .adaptor
            .as_mut()
            .ok_or_else(|| PanelError::AdaptorError("アダプタが生成されていません".to_string()))?;

        adaptor.play(stream_id);
        self.playing_stream = Some(stream_id.to_string());
        log::info!("ストリームの再生を要求しました: {}", stream_id);
        Ok(())
    }

    /// 再生中のストリームを停止（再生していなければ何もしない）
    pub fn stop_playing(&mut self) {
        let Some(stream_id) = self.playing_stream.take() else {
            return;
        };

        match self.adaptor.as_mut() {
            Some(adaptor) => {
                adaptor.stop(&stream_id);
                log::info!("ストリームを停止しました: {}", stream_id);
            }
            None => log::debug!("アダプタが無いため停止要求を破棄しました: {}", stream_id),
        }
    }

    /// アダプタが生成済みかどうか
    pub fn is_mounted(&self) -> bool {
        self.adaptor.is_some()
    }

    /// 生成時の設定
    pub fn config(&self) -> Option<&AdaptorConfig> {
        self.config.as_ref()
    }

    /// 接続状態
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// 接続済みかどうか
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// 再生中のストリームID
    pub fn playing_stream(&self) -> Option<&str> {
        self.playing_stream.as_deref()
    }

    /// 表示するステータス文言（接続済みなら `None`）
    pub fn status_text(&self) -> Option<&'static str> {
        if self.state.is_connected() {
            None
        } else {
            Some(NOT_CONNECTED_TEXT)
        }
    }
}

/// コールバックと共有するコントローラ
///
/// アダプタの生成中、またはコントローラの使用中に届いたイベントは保留し、
/// コントローラが空いた時点で到着順に処理する。
pub struct SharedPlayback<A> {
    controller: RefCell<PlaybackController<A>>,
    pending: RefCell<VecDeque<AdaptorEvent>>,
    constructing: Cell<bool>,
}

impl<A: StreamAdaptor> SharedPlayback<A> {
    /// コントローラを包む
    pub fn new(controller: PlaybackController<A>) -> Self {
        Self {
            controller: RefCell::new(controller),
            pending: RefCell::new(VecDeque::new()),
            constructing: Cell::new(false),
        }
    }

    /// アダプタを生成する
    ///
    /// 生成処理はコントローラを借用せずに実行する。
    /// 生成中に同期的に届いたイベントは、アダプタを登録した後に処理する。
    pub fn mount<F>(&self, config: AdaptorConfig, factory: F) -> Result<bool>
    where
        F: FnOnce(&AdaptorConfig) -> Result<A>,
    {
        if self.controller.borrow().is_mounted() {
            return self.controller.borrow_mut().mount(config, factory);
        }

        self.constructing.set(true);
        let built = factory(&config);
        self.constructing.set(false);

        let result = built.and_then(|adaptor| {
            self.controller
                .borrow_mut()
                .mount(config, move |_| Ok(adaptor))
        });
        self.flush();
        result
    }

    /// イベントを届ける
    pub fn deliver(&self, event: AdaptorEvent) {
        self.pending.borrow_mut().push_back(event);
        if self.constructing.get() {
            log::debug!("アダプタの生成中のためイベントを保留しました");
            return;
        }
        self.flush();
    }

    /// コントローラを操作する
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaybackController<A>) -> R) -> R {
        let result = f(&mut self.controller.borrow_mut());
        self.flush();
        result
    }

    /// 保留中のイベント数
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn flush(&self) {
        loop {
            let Ok(mut controller) = self.controller.try_borrow_mut() else {
                // 使用中の呼び出し元が処理する
                return;
            };
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                return;
            };
            controller.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(String),
        Stop(String),
    }

    /// 呼び出しを記録するアダプタ
    struct MockAdaptor {
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl StreamAdaptor for MockAdaptor {
        fn play(&mut self, stream_id: &str) {
            self.calls.borrow_mut().push(Call::Play(stream_id.to_string()));
        }

        fn stop(&mut self, stream_id: &str) {
            self.calls.borrow_mut().push(Call::Stop(stream_id.to_string()));
        }
    }

    #[derive(Default)]
    struct Recorded {
        states: Vec<ConnectionState>,
        alerts: Vec<String>,
    }

    struct RecordingObserver(Rc<RefCell<Recorded>>);

    impl PlaybackObserver for RecordingObserver {
        fn connection_changed(&self, state: ConnectionState) {
            self.0.borrow_mut().states.push(state);
        }

        fn alert(&self, message: &str) {
            self.0.borrow_mut().alerts.push(message.to_string());
        }
    }

    struct Fixture {
        controller: PlaybackController<MockAdaptor>,
        calls: Rc<RefCell<Vec<Call>>>,
        recorded: Rc<RefCell<Recorded>>,
        constructed: Rc<Cell<usize>>,
    }

    impl Fixture {
        fn new() -> Self {
            let recorded = Rc::new(RefCell::new(Recorded::default()));
            Self {
                controller: PlaybackController::new(Box::new(RecordingObserver(recorded.clone()))),
                calls: Rc::new(RefCell::new(Vec::new())),
                recorded,
                constructed: Rc::new(Cell::new(0)),
            }
        }

        fn mount(&mut self, url: &str) -> Result<bool> {
            let calls = self.calls.clone();
            let constructed = self.constructed.clone();
            self.controller.mount(AdaptorConfig::new(url), move |_| {
                constructed.set(constructed.get() + 1);
                Ok(MockAdaptor { calls })
            })
        }
    }

    const URL: &str = "http://10.33.85.8:8083/stream/s1/channel/0/webrtc?uuid=s1&channel=0";

    #[test]
    fn test_adaptor_is_constructed_once() {
        let mut fixture = Fixture::new();

        assert!(fixture.mount(URL).unwrap());
        assert!(!fixture.mount(URL).unwrap());
        assert!(!fixture.mount(URL).unwrap());

        assert_eq!(fixture.constructed.get(), 1);
        assert!(fixture.controller.is_mounted());
    }

    #[test]
    fn test_changed_url_does_not_recreate_adaptor() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        fixture.mount("http://10.0.0.9:8083/stream/s2/channel/0/webrtc").unwrap();

        assert_eq!(fixture.constructed.get(), 1);
        assert_eq!(fixture.controller.config().unwrap().websocket_url, URL);
    }

    #[test]
    fn test_factory_failure_leaves_controller_unmounted() {
        let mut fixture = Fixture::new();
        let result = fixture.controller.mount(AdaptorConfig::new(URL), |_| {
            Err(PanelError::AdaptorError("WebRTCAdaptor is not defined".to_string()))
        });

        assert!(result.is_err());
        assert!(!fixture.controller.is_mounted());

        // 失敗後は再度生成を試みられる
        assert!(fixture.mount(URL).unwrap());
    }

    #[test]
    fn test_initialized_connects_and_autoplays() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        assert_eq!(fixture.controller.status_text(), Some(NOT_CONNECTED_TEXT));

        fixture.controller.handle_info("initialized");

        assert!(fixture.controller.is_connected());
        assert_eq!(fixture.controller.status_text(), None);
        assert_eq!(fixture.controller.playing_stream(), Some("0"));
        assert_eq!(*fixture.calls.borrow(), vec![Call::Play("0".to_string())]);
        assert_eq!(fixture.recorded.borrow().states, vec![ConnectionState::Connected]);

        // 二度目の初期化通知では状態も再生も変わらない
        fixture.controller.handle_info("initialized");
        assert_eq!(fixture.calls.borrow().len(), 1);
        assert_eq!(fixture.recorded.borrow().states.len(), 1);
    }

    #[test]
    fn test_other_info_tags_are_ignored() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();

        fixture.controller.handle_info("ice_connection_state_changed");

        assert!(!fixture.controller.is_connected());
        assert!(fixture.calls.borrow().is_empty());
    }

    #[test]
    fn test_autoplay_can_be_disabled() {
        let mut fixture = Fixture::new();
        fixture.controller = PlaybackController::new(Box::new(RecordingObserver(fixture.recorded.clone())))
            .with_autoplay(None);
        fixture.mount(URL).unwrap();

        fixture.controller.handle_info("initialized");

        assert!(fixture.controller.is_connected());
        assert!(fixture.calls.borrow().is_empty());
    }

    #[test]
    fn test_no_stream_exist_stops_and_alerts() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        fixture.controller.play("front").unwrap();

        fixture.controller.handle_error("no_stream_exist", "stream front not found");

        assert_eq!(
            *fixture.calls.borrow(),
            vec![Call::Play("front".to_string()), Call::Stop("front".to_string())]
        );
        assert_eq!(fixture.recorded.borrow().alerts, vec!["no_stream_exist".to_string()]);
        assert_eq!(fixture.controller.playing_stream(), None);
    }

    #[test]
    fn test_error_does_not_disconnect() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        fixture.controller.handle_info("initialized");

        fixture.controller.handle_error("no_stream_exist", "");

        assert!(fixture.controller.is_connected());
        assert_eq!(fixture.recorded.borrow().states, vec![ConnectionState::Connected]);
    }

    #[test]
    fn test_other_errors_are_only_logged() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        fixture.controller.play("0").unwrap();

        fixture.controller.handle_error("WebSocketNotConnected", "closed");

        assert_eq!(*fixture.calls.borrow(), vec![Call::Play("0".to_string())]);
        assert!(fixture.recorded.borrow().alerts.is_empty());
        assert_eq!(fixture.controller.playing_stream(), Some("0"));
    }

    #[test]
    fn test_stop_without_stream_is_noop() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();

        fixture.controller.stop_playing();
        fixture.controller.handle_error("no_stream_exist", "");

        assert!(fixture.calls.borrow().is_empty());
        // 警告は再生の有無に関わらず表示される
        assert_eq!(fixture.recorded.borrow().alerts.len(), 1);
    }

    #[test]
    fn test_play_requires_adaptor() {
        let mut fixture = Fixture::new();
        assert!(matches!(
            fixture.controller.play("0"),
            Err(PanelError::AdaptorError(_))
        ));
    }

    #[test]
    fn test_unmount_releases_adaptor() {
        let mut fixture = Fixture::new();
        fixture.mount(URL).unwrap();
        fixture.controller.play("0").unwrap();

        fixture.controller.unmount();

        assert!(!fixture.controller.is_mounted());
        assert_eq!(fixture.controller.playing_stream(), None);
        assert!(fixture.controller.config().is_none());
    }

    #[test]
    fn test_adaptor_config_defaults() {
        let config = AdaptorConfig::new(URL);
        assert!(config.media_constraints.audio && config.media_constraints.video);
        assert!(config.peer_connection.ice_servers.is_empty());
        assert!(config.sdp_constraints.offer_to_receive_audio);
        assert!(config.sdp_constraints.offer_to_receive_video);
        assert_eq!(config.remote_video_id, "remoteVideo");

        let config = config.with_ice_servers(vec!["stun:stun1.l.google.com:19302".to_string()]);
        assert_eq!(config.peer_connection.ice_servers.len(), 1);
    }

    fn shared(recorded: &Rc<RefCell<Recorded>>) -> Rc<SharedPlayback<MockAdaptor>> {
        let controller = PlaybackController::new(Box::new(RecordingObserver(recorded.clone())));
        Rc::new(SharedPlayback::new(controller))
    }

    #[test]
    fn test_events_during_construction_are_replayed() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let playback = shared(&recorded);

        // 生成中に同期的にコールバックが呼ばれる
        let handle = Rc::downgrade(&playback);
        let adaptor_calls = calls.clone();
        let mounted = playback
            .mount(AdaptorConfig::new(URL), move |_| {
                let playback = handle.upgrade().unwrap();
                playback.deliver(AdaptorEvent::Info("initialized".to_string()));
                playback.deliver(AdaptorEvent::Error {
                    kind: "no_stream_exist".to_string(),
                    message: "".to_string(),
                });
                assert_eq!(playback.pending_len(), 2);
                Ok(MockAdaptor { calls: adaptor_calls })
            })
            .unwrap();

        assert!(mounted);
        assert_eq!(playback.pending_len(), 0);
        assert!(playback.with(|controller| controller.is_connected()));
        assert_eq!(
            *calls.borrow(),
            vec![Call::Play("0".to_string()), Call::Stop("0".to_string())]
        );
        assert_eq!(recorded.borrow().alerts, vec!["no_stream_exist".to_string()]);
    }

    #[test]
    fn test_events_while_busy_are_handled_afterwards() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let playback = shared(&recorded);
        playback
            .mount(AdaptorConfig::new(URL), |_| Ok(MockAdaptor { calls: calls.clone() }))
            .unwrap();

        playback.with(|controller| {
            playback.deliver(AdaptorEvent::Info("initialized".to_string()));
            assert!(!controller.is_connected());
        });

        assert_eq!(playback.pending_len(), 0);
        assert!(playback.with(|controller| controller.is_connected()));
    }

    #[test]
    fn test_failed_construction_still_handles_events() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let playback = shared(&recorded);

        let handle = Rc::downgrade(&playback);
        let result = playback.mount(AdaptorConfig::new(URL), move |_| {
            handle.upgrade().unwrap().deliver(AdaptorEvent::Error {
                kind: "no_stream_exist".to_string(),
                message: "".to_string(),
            });
            Err(PanelError::AdaptorError("WebSocketNotSupported".to_string()))
        });

        assert!(result.is_err());
        assert!(!playback.with(|controller| controller.is_mounted()));
        assert_eq!(recorded.borrow().alerts.len(), 1);
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(AdaptorError::from_kind("no_stream_exist"), AdaptorError::NoStreamExist);
        assert_eq!(AdaptorError::from_kind("highResourceUsage").as_str(), "highResourceUsage");
        assert_eq!(AdaptorInfo::from_tag("initialized"), AdaptorInfo::Initialized);
    }
}
