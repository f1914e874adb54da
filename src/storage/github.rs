//! Remote store backed by the GitHub repository contents API.
//!
//! `GET /repos/{repo}/contents/{path}` returns the base64 payload plus its blob `sha`;
//! `PUT` on the same URL creates the file, or updates it when the current `sha` is supplied.

use std::{env, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{
    blocking::{Client, RequestBuilder},
    header::ACCEPT,
    StatusCode,
};
use serde::{Deserialize, Serialize};

use super::remote::{RemoteError, RemoteSnapshot, RemoteStore};
use crate::config::RemoteConfig;

const USER_AGENT: &str = concat!("budget_ledger/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

pub struct GitHubContentStore {
    client: Client,
    api_base: String,
    repository: String,
    path: String,
    branch: Option<String>,
    credential_env: String,
    commit_message: String,
}

impl GitHubContentStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            repository: config.repository.clone(),
            path: config.path.clone(),
            branch: config.branch.clone(),
            credential_env: config.credential_env.clone(),
            commit_message: config.commit_message.clone(),
        })
    }

    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.repository.trim_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// Reads the access token at call time so local-only operation works without one.
    fn credential(&self) -> Result<String, RemoteError> {
        env::var(&self.credential_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| RemoteError::MissingCredential(self.credential_env.clone()))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, RemoteError> {
        Ok(request
            .bearer_auth(self.credential()?)
            .header(ACCEPT, GITHUB_ACCEPT))
    }
}

impl RemoteStore for GitHubContentStore {
    fn fetch(&self) -> Result<RemoteSnapshot, RemoteError> {
        let mut request = self.authorized(self.client.get(self.contents_url()))?;
        if let Some(branch) = &self.branch {
            request = request.query(&[("ref", branch.as_str())]);
        }
        let response = request
            .send()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().unwrap_or_default()));
        }
        let body: ContentsResponse = response
            .json()
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        if let Some(encoding) = body.encoding.as_deref() {
            if encoding != "base64" {
                return Err(RemoteError::Decode(format!(
                    "unsupported content encoding `{encoding}`"
                )));
            }
        }
        Ok(RemoteSnapshot {
            content: decode_content(&body.content)?,
            revision: body.sha,
        })
    }

    fn push(&self, content: &[u8], revision: Option<&str>) -> Result<String, RemoteError> {
        let payload = PutRequest::new(
            &self.commit_message,
            content,
            revision,
            self.branch.as_deref(),
        );
        let response = self
            .authorized(self.client.put(self.contents_url()))?
            .json(&payload)
            .send()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().unwrap_or_default()));
        }
        let body: PutResponse = response
            .json()
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        Ok(body.content.sha)
    }

    fn location(&self) -> String {
        let path = self.path.trim_start_matches('/');
        match &self.branch {
            Some(branch) => format!("github:{}@{}/{}", self.repository, branch, path),
            None => format!("github:{}/{}", self.repository, path),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl<'a> PutRequest<'a> {
    fn new(
        message: &'a str,
        content: &[u8],
        sha: Option<&'a str>,
        branch: Option<&'a str>,
    ) -> Self {
        Self {
            message,
            content: STANDARD.encode(content),
            sha,
            branch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

/// GitHub wraps base64 payloads at 60 columns; strip whitespace before decoding.
fn decode_content(encoded: &str) -> Result<Vec<u8>, RemoteError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|err| RemoteError::Decode(err.to_string()))
}

fn status_error(status: StatusCode, body: String) -> RemoteError {
    match status.as_u16() {
        404 => RemoteError::NotFound,
        code @ (401 | 403) => RemoteError::Unauthorized(code),
        409 | 422 => RemoteError::Conflict(body),
        code => RemoteError::Status {
            status: code,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_config() -> RemoteConfig {
        RemoteConfig {
            repository: "octo/budget-data".into(),
            path: "/data/budget.json".into(),
            branch: Some("main".into()),
            credential_env: "BUDGET_LEDGER_TEST_TOKEN_UNSET".into(),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn contents_url_joins_segments_cleanly() {
        let store = GitHubContentStore::new(&remote_config()).expect("client");
        assert_eq!(
            store.contents_url(),
            "https://api.github.com/repos/octo/budget-data/contents/data/budget.json"
        );
        assert_eq!(store.location(), "github:octo/budget-data@main/data/budget.json");
    }

    #[test]
    fn missing_token_fails_before_any_request() {
        let store = GitHubContentStore::new(&remote_config()).expect("client");
        let err = store.fetch().expect_err("no credential");
        assert!(
            matches!(err, RemoteError::MissingCredential(ref var) if var == "BUDGET_LEDGER_TEST_TOKEN_UNSET")
        );
        let err = store.push(b"{}", None).expect_err("no credential");
        assert!(matches!(err, RemoteError::MissingCredential(_)));
    }

    #[test]
    fn decode_content_handles_wrapped_base64() {
        let wrapped = "eyAicmV2ZW51Ijog\nMTAwIH0=\n";
        let decoded = decode_content(wrapped).expect("decode");
        assert_eq!(decoded, br#"{ "revenu": 100 }"#);
    }

    #[test]
    fn decode_content_rejects_invalid_base64() {
        assert!(matches!(
            decode_content("***"),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn put_request_includes_sha_only_when_known() {
        let create = serde_json::to_value(PutRequest::new("msg", b"{}", None, None)).unwrap();
        assert_eq!(create["content"], "e30=");
        assert!(create.get("sha").is_none());
        assert!(create.get("branch").is_none());

        let update =
            serde_json::to_value(PutRequest::new("msg", b"{}", Some("abc123"), Some("main")))
                .unwrap();
        assert_eq!(update["sha"], "abc123");
        assert_eq!(update["branch"], "main");
    }

    #[test]
    fn status_codes_map_to_remote_errors() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, String::new()),
            RemoteError::NotFound
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            RemoteError::Unauthorized(401)
        ));
        assert!(matches!(
            status_error(StatusCode::CONFLICT, "sha mismatch".into()),
            RemoteError::Conflict(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, String::new()),
            RemoteError::Status { status: 502, .. }
        ));
    }
}
