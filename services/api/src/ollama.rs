//! Optional Ollama-backed text model. Enabled by setting `OLLAMA_URL`; every
//! call is bounded by a request timeout, and expiry surfaces as the calling
//! stage's failure path.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use workforce_ai::capabilities::{CapabilityError, TextModel};

const DEFAULT_MODEL: &str = "llama3.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) struct OllamaTextModel {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
}

impl OllamaTextModel {
    /// Build a client from `OLLAMA_URL` / `OLLAMA_MODEL`, or `None` when no
    /// endpoint is configured.
    pub(crate) fn from_env() -> Option<Self> {
        let endpoint = env::var("OLLAMA_URL").ok()?;
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        match reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
        {
            Ok(client) => {
                tracing::info!(%endpoint, %model, "using Ollama text model");
                Some(Self {
                    endpoint,
                    model,
                    client,
                })
            }
            Err(error) => {
                tracing::warn!(%error, "failed to build Ollama client, falling back");
                None
            }
        }
    }
}

impl TextModel for OllamaTextModel {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CapabilityError> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .map_err(|error| {
                if error.is_timeout() {
                    CapabilityError::Timeout
                } else {
                    CapabilityError::Backend(error.to_string())
                }
            })?
            .error_for_status()
            .map_err(|error| CapabilityError::Backend(error.to_string()))?;

        let reply: GenerateReply = response
            .json()
            .map_err(|error| CapabilityError::Backend(error.to_string()))?;
        Ok(reply.response)
    }
}
