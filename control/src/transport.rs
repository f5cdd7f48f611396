//! HTTPによるコマンド転送

use async_trait::async_trait;
use robot_panel_common::error::{PanelError, Result};
use robot_panel_common::CommandTransport;

/// reqwest を使ったコマンド転送
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// 新しい転送手段を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl CommandTransport for HttpTransport {
    async fn post(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| PanelError::NetworkError(e.to_string()))?;

        let status = response.status();
        log::debug!("コマンド応答: {} {}", url, status);

        if !status.is_success() {
            return Err(PanelError::HttpStatus(status.as_u16()));
        }

        Ok(())
    }
}
