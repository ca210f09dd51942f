//! Storefront API calls made by the CLI.

use clap::Args;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, Args)]
pub(crate) struct ApiArgs {
    /// Base URL of the storefront JSON API
    #[arg(long, env = "FAIRWAY_API_URL", default_value = "http://localhost:8698")]
    pub(crate) api_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiArgs {
    /// POST `body` as JSON to `path` and decode the JSON reply.
    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, String>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.api_url.trim_end_matches('/'));

        let response = reqwest::Client::new()
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| format!("request to {url} failed: {error}"))?;

        let status = response.status();

        if status.is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|error| format!("unexpected response from {url}: {error}"));
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map_or_else(|_| status.to_string(), |body| body.error);

        Err(format!("{status}: {message}"))
    }
}
