//! ボタン配置
//!
//! 操作パネルに並ぶボタンの並びと、押したときの動作を定義します。
//! 大半のボタンはまだ動作が割り当てられていません。

use crate::command::Command;

/// ボタンのアイコン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    BicepsFlexed,
    Grab,
    Angry,
    Smile,
    Radiation,
}

impl Icon {
    /// CSSクラス名
    pub fn css_class(&self) -> &'static str {
        match self {
            Icon::BicepsFlexed => "icon-biceps-flexed",
            Icon::Grab => "icon-grab",
            Icon::Angry => "icon-angry",
            Icon::Smile => "icon-smile",
            Icon::Radiation => "icon-radiation",
        }
    }
}

/// ボタンの表示内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonFace {
    /// アイコン
    Icon(Icon),
    /// 文字
    Label(&'static str),
    /// 空
    Blank,
}

/// ボタンを押したときの動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// コマンドを送信
    Dispatch(Command),
    /// 何もしない
    Inert,
}

/// パネル上のボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelButton {
    /// 表示内容
    pub face: ButtonFace,
    /// 動作
    pub action: ButtonAction,
}

impl PanelButton {
    /// コマンドを送信するボタン
    pub const fn command(face: ButtonFace, command: Command) -> Self {
        Self {
            face,
            action: ButtonAction::Dispatch(command),
        }
    }

    /// 動作の無いボタン
    pub const fn inert(face: ButtonFace) -> Self {
        Self {
            face,
            action: ButtonAction::Inert,
        }
    }

    /// 押したときに送信するコマンド
    pub fn press(&self) -> Option<Command> {
        match self.action {
            ButtonAction::Dispatch(command) => Some(command),
            ButtonAction::Inert => None,
        }
    }

    /// ボタンのタイトル（ツールチップ）
    pub fn title(&self) -> String {
        match self.action {
            ButtonAction::Dispatch(command) => command.name().to_string(),
            ButtonAction::Inert => "未割り当て".to_string(),
        }
    }
}

/// ボタン配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    /// 左列
    pub left: Vec<PanelButton>,
    /// 右列
    pub right: Vec<PanelButton>,
    /// 映像下の行
    pub bottom: Vec<PanelButton>,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl PanelLayout {
    /// 標準のボタン配置
    pub fn standard() -> Self {
        use ButtonFace::{Blank, Icon as I, Label};

        Self {
            left: vec![
                PanelButton::command(I(Icon::BicepsFlexed), Command::Muscles),
                PanelButton::command(I(Icon::Grab), Command::Dab),
                PanelButton::inert(I(Icon::Angry)),
                PanelButton::inert(I(Icon::Smile)),
                PanelButton::inert(I(Icon::BicepsFlexed)),
                PanelButton::inert(I(Icon::Radiation)),
            ],
            right: vec![
                PanelButton::inert(Label("Smile")),
                PanelButton::inert(Blank),
                PanelButton::inert(I(Icon::Smile)),
                PanelButton::inert(Label("Hi")),
                PanelButton::inert(Label("Hi")),
                PanelButton::inert(Label("Hi")),
            ],
            bottom: vec![PanelButton::inert(I(Icon::Smile)); 8],
        }
    }

    /// 全ボタン（左列・右列・下段の順）
    pub fn buttons(&self) -> impl Iterator<Item = &PanelButton> {
        self.left.iter().chain(self.right.iter()).chain(self.bottom.iter())
    }

    /// 指定したコマンドを送信するボタン
    pub fn button_for(&self, command: Command) -> Option<&PanelButton> {
        self.buttons().find(|button| button.press() == Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout_shape() {
        let layout = PanelLayout::standard();
        assert_eq!(layout.left.len(), 6);
        assert_eq!(layout.right.len(), 6);
        assert_eq!(layout.bottom.len(), 8);
        assert_eq!(layout.buttons().count(), 20);
    }

    #[test]
    fn test_every_command_has_exactly_one_button() {
        let layout = PanelLayout::standard();
        for command in Command::ALL {
            let count = layout
                .buttons()
                .filter(|button| button.press() == Some(command))
                .count();
            assert_eq!(count, 1, "{}", command);
        }

        assert_eq!(
            layout.button_for(Command::Muscles).unwrap().face,
            ButtonFace::Icon(Icon::BicepsFlexed)
        );
    }

    #[test]
    fn test_inert_buttons_do_nothing() {
        let layout = PanelLayout::standard();
        let inert = layout
            .buttons()
            .filter(|button| button.action == ButtonAction::Inert)
            .collect::<Vec<_>>();

        assert_eq!(inert.len(), 18);
        assert!(inert.iter().all(|button| button.press().is_none()));
    }
}
