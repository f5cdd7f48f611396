//! ロボット操作パネル コマンドラインクライアント
//!
//! Webパネルと同じコマンド送信・シグナリングURL構築をターミナルから使うためのエントリポイント

mod cli;
mod transport;

use anyhow::{Context, Result};
use clap::Parser;
use robot_panel_common::utils::logging;
use robot_panel_common::{Command, CommandDispatcher, PanelConfig, SignallingEndpoint};
use std::path::PathBuf;

use cli::{Action, Cli};
use transport::HttpTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ロガーを初期化
    logging::init_logger(logging::filter_for_verbosity(cli.verbose));
    logging::set_panic_hook();

    let config = load_config(cli.config.as_ref())?;

    match cli.action {
        Action::Send { command, base_url } => {
            let command: Command = command.parse()?;
            let base_url = base_url.unwrap_or_else(|| config.command_base_url.clone());
            let dispatcher = CommandDispatcher::new(base_url, HttpTransport::new());

            log::info!("コマンドを送信します: {}", dispatcher.command_url(command));
            dispatcher.dispatch(command).await;
        }
        Action::Commands => {
            let dispatcher = CommandDispatcher::new(config.command_base_url.clone(), HttpTransport::new());
            for command in Command::ALL {
                println!("{:<10} POST {}", command, dispatcher.command_url(command));
            }
        }
        Action::SignallingUrl { host, port, stream, channel } => {
            let overridden = host.is_some() || port.is_some() || stream.is_some() || channel.is_some();
            let endpoint = if overridden {
                SignallingEndpoint::Components {
                    host: host.unwrap_or_else(|| config.robot_host.clone()),
                    port: port.unwrap_or(config.signalling.port),
                    stream_key: stream.unwrap_or_else(|| config.signalling.stream_key.clone()),
                    channel: channel.unwrap_or(config.signalling.channel),
                }
            } else {
                config.signalling_endpoint()
            };
            println!("{}", endpoint.to_url()?);
        }
    }

    Ok(())
}

/// 設定を読み込む
///
/// 指定が無ければ `<設定ディレクトリ>/robot-panel/config.toml` を探し、無ければ既定値を使う。
fn load_config(path: Option<&PathBuf>) -> Result<PanelConfig> {
    if let Some(path) = path {
        return PanelConfig::load(path)
            .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()));
    }

    match dirs::config_dir().map(|dir| dir.join("robot-panel").join("config.toml")) {
        Some(path) if path.exists() => PanelConfig::load(&path)
            .with_context(|| format!("設定ファイルを読み込めません: {}", path.display())),
        _ => {
            log::debug!("設定ファイルが無いため既定値を使用します");
            Ok(PanelConfig::default())
        }
    }
}
