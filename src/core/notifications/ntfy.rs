use anyhow::Result;

const NTFY_BASE_URL: &str = "https://ntfy.sh";

/// Push delivery over [ntfy](https://docs.ntfy.sh): the message text is the
/// request body, presentation goes in headers.
pub struct NtfyChannel {
    client: reqwest::Client,
    topic: String,
    token: Option<String>,
}

impl NtfyChannel {
    pub fn new(topic: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            topic,
            token,
        }
    }

    pub async fn send_success(&self, message: &str) -> Result<()> {
        self.send("Success", "white_check_mark", message).await
    }

    pub async fn send_failure(&self, message: &str) -> Result<()> {
        self.send("Failure", "rotating_light", message).await
    }

    async fn send(&self, title: &str, tags: &str, message: &str) -> Result<()> {
        let url = format!("{NTFY_BASE_URL}/{}", self.topic);
        let mut request = self
            .client
            .post(&url)
            .header("Title", title)
            .header("Priority", "default")
            .header("Tags", tags)
            .body(message.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}
