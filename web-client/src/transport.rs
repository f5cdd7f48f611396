//! ブラウザのfetchによるコマンド転送

use async_trait::async_trait;
use gloo::net::http::Request;
use robot_panel_common::error::{PanelError, Result};
use robot_panel_common::CommandTransport;

/// fetch を使ったコマンド転送
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl CommandTransport for FetchTransport {
    async fn post(&self, url: &str) -> Result<()> {
        let response = Request::post(url)
            .send()
            .await
            .map_err(|e| PanelError::NetworkError(e.to_string()))?;

        if !response.ok() {
            return Err(PanelError::HttpStatus(response.status()));
        }

        Ok(())
    }
}
