//! The remote LaTeX compiler: a LaTeX-on-HTTP style JSON API.
//!
//! `POST {compiler, resources:[{main, path, content}, {path, file}]}` answers
//! with the PDF bytes on success and `{message, logs}` on failure.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::templates::PROFILE_IMAGE_PATH;

const MAIN_PATH: &str = "resume.tex";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// What one compile needs: the markup and, optionally, the profile image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub markup: String,
    /// Base64 payload uploaded as `profile.jpg`.
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileFailure {
    /// The compiler ran and rejected the source.
    #[error("{message}")]
    Compile { message: String, logs: String },

    #[error("Unable to reach the compilation server: {0}")]
    Transport(String),

    #[error("Invalid PDF response received")]
    InvalidDocument,
}

#[async_trait]
pub trait LatexCompiler: Send + Sync {
    async fn compile(&self, request: CompileRequest) -> Result<Bytes, CompileFailure>;
}

#[derive(Debug, Serialize)]
struct BuildRequest<'a> {
    compiler: &'a str,
    resources: Vec<Resource<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Resource<'a> {
    Main {
        main: bool,
        path: &'a str,
        content: &'a str,
    },
    File {
        path: &'a str,
        file: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct BuildError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    logs: String,
}

#[derive(Clone)]
pub struct HttpLatexCompiler {
    client: Client,
    url: String,
    compiler: String,
}

impl HttpLatexCompiler {
    pub fn new(url: String, compiler: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            url,
            compiler,
        })
    }
}

#[async_trait]
impl LatexCompiler for HttpLatexCompiler {
    async fn compile(&self, request: CompileRequest) -> Result<Bytes, CompileFailure> {
        let body = build_request(&self.compiler, &request);
        debug!(
            url = %self.url,
            resources = body.resources.len(),
            "submitting compile"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompileFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "compiler rejected the document");
            return Err(match serde_json::from_str::<BuildError>(&text) {
                Ok(err) => CompileFailure::Compile {
                    message: if err.message.is_empty() {
                        "Compilation failed".to_string()
                    } else {
                        err.message
                    },
                    logs: err.logs,
                },
                Err(_) => CompileFailure::Compile {
                    message: format!("HTTP {status}"),
                    logs: String::new(),
                },
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| CompileFailure::Transport(e.to_string()))
    }
}

fn build_request<'a>(compiler: &'a str, request: &'a CompileRequest) -> BuildRequest<'a> {
    let mut resources = vec![Resource::Main {
        main: true,
        path: MAIN_PATH,
        content: &request.markup,
    }];
    if let Some(image) = request.profile_image.as_deref() {
        resources.push(Resource::File {
            path: PROFILE_IMAGE_PATH,
            file: image,
        });
    }
    BuildRequest {
        compiler,
        resources,
    }
}
