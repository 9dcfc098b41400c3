use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches a tracker url, query string included. Any `Err` counts as the
/// tracker being unreachable.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpTransport, Transport};
    use std::time::Duration;

    #[tokio::test]
    async fn unreachable_is_an_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();

        // port 9 (discard) on loopback, nothing listens there
        assert!(transport.get("http://127.0.0.1:9/announce").await.is_err());
        assert!(transport.get("udp://127.0.0.1:9/announce").await.is_err());
    }
}
