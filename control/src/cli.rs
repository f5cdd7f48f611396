//! コマンドライン引数

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ロボット操作パネルのコマンドラインクライアント
#[derive(Debug, Parser)]
#[command(name = "robot-panel", version, about)]
pub struct Cli {
    /// 設定ファイル（.json / .toml）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// ログを詳細にする（-vv でさらに詳細）
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub action: Action,
}

/// サブコマンド
#[derive(Debug, Subcommand)]
pub enum Action {
    /// コマンドを1回送信する
    Send {
        /// コマンド名（muscles, dab）
        command: String,
        /// 送信先のベースURL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// 送信可能なコマンドを一覧表示
    Commands,
    /// 映像ウィジェットが使うシグナリングURLを表示
    SignallingUrl {
        /// ロボットのホスト
        #[arg(long)]
        host: Option<String>,
        /// ポート番号
        #[arg(long)]
        port: Option<u16>,
        /// ストリームキー
        #[arg(long)]
        stream: Option<String>,
        /// チャネル番号
        #[arg(long)]
        channel: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from(["robot-panel", "-v", "send", "dab", "--base-url", "http://robot:3000"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.action {
            Action::Send { command, base_url } => {
                assert_eq!(command, "dab");
                assert_eq!(base_url.as_deref(), Some("http://robot:3000"));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_parse_signalling_url_with_global_config() {
        let cli = Cli::try_parse_from([
            "robot-panel",
            "signalling-url",
            "--host",
            "10.0.0.5",
            "--channel",
            "2",
            "--config",
            "panel.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("panel.toml")));
        match cli.action {
            Action::SignallingUrl { host, port, stream, channel } => {
                assert_eq!(host.as_deref(), Some("10.0.0.5"));
                assert_eq!(port, None);
                assert_eq!(stream, None);
                assert_eq!(channel, Some(2));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_send_requires_command() {
        assert!(Cli::try_parse_from(["robot-panel", "send"]).is_err());
    }
}
