//! コントロールパネルコンポーネント
//!
//! ロボットにコマンドを送るボタン群を表示するUIコンポーネントです。

use robot_panel_common::panel::{ButtonFace, PanelButton};
use robot_panel_common::{Command, PanelLayout};
use yew::prelude::*;

/// コントロールパネルのプロパティ
#[derive(Properties, Clone, PartialEq)]
pub struct ControlPanelProps {
    /// ボタン配置
    #[prop_or_default]
    pub layout: PanelLayout,
    /// コマンド送信ハンドラー
    pub on_command: Callback<Command>,
    /// 中央に表示する内容（映像など）
    #[prop_or_default]
    pub children: Children,
}

/// コントロールパネルコンポーネント
#[function_component(ControlPanel)]
pub fn control_panel(props: &ControlPanelProps) -> Html {
    let render = |buttons: &[PanelButton], class: &'static str| -> Html {
        buttons
            .iter()
            .map(|button| render_button(button, class, &props.on_command))
            .collect()
    };

    html! {
        <div class="control-panel">
            <div class="button-column left">
                { render(props.layout.left.as_slice(), "panel-button") }
            </div>

            <div class="button-column right">
                { render(props.layout.right.as_slice(), "panel-button") }
            </div>

            <div class="center">
                { for props.children.iter() }
                <div class="button-row bottom">
                    { render(props.layout.bottom.as_slice(), "panel-button secondary") }
                </div>
            </div>
        </div>
    }
}

/// ボタンを1つ描画
fn render_button(button: &PanelButton, class: &'static str, on_command: &Callback<Command>) -> Html {
    let onclick = {
        let command = button.press();
        let on_command = on_command.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(command) = command {
                on_command.emit(command);
            }
        })
    };

    let face = match button.face {
        ButtonFace::Icon(icon) => html! { <i class={icon.css_class()}></i> },
        ButtonFace::Label(label) => html! { { label } },
        ButtonFace::Blank => html! {},
    };

    html! {
        <button class={class} title={button.title()} {onclick}>
            { face }
        </button>
    }
}
