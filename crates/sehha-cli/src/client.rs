//! Shared client utilities, error types, and request decoration for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use sehha_api_models::ApiProblem;
use sehha_i18n::LocaleCode;
use url::Url;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const LANG_QUERY_PARAM: &str = "lang";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Build the HTTP client shared by every request of one invocation.
pub(crate) fn build_client(timeout_secs: u64, request_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(request_id)
        .map_err(|_| CliError::failure(anyhow!("request identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) token: Option<String>,
}

impl AppContext {
    /// Absolute URL for an API path.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))
    }

    /// Attach the bearer token and the locale hint.
    pub(crate) fn decorate(
        &self,
        builder: RequestBuilder,
        locale: LocaleCode,
    ) -> CliResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or_else(|| {
            CliError::validation(
                "API token is required (pass --token, set SEHHA_API_TOKEN or run `sehha auth set`)",
            )
        })?;
        Ok(builder
            .bearer_auth(token)
            .header(ACCEPT_LANGUAGE, locale.code()))
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Classify an HTTP response into a CLI error.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let summary = serde_json::from_slice::<ApiProblem>(&bytes)
        .ok()
        .and_then(|problem| problem.summary());

    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        let message = summary.unwrap_or_else(|| {
            if body_text.is_empty() {
                format!("request rejected with status {status}")
            } else {
                body_text.clone()
            }
        });
        return CliError::validation(message);
    }

    let detail = match summary {
        Some(message) => format!("{message} (status {status})"),
        None if !body_text.is_empty() => format!("{body_text} (status {status})"),
        None => format!("request failed with status {status}"),
    };
    CliError::failure(anyhow!(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    fn context_with(server: &MockServer, token: Option<&str>) -> Result<AppContext> {
        Ok(AppContext {
            client: build_client(5, "req-1").map_err(|err| anyhow!(err.display_message()))?,
            base_url: server
                .base_url()
                .parse()
                .map_err(|_| anyhow!("valid URL"))?,
            token: token.map(str::to_string),
        })
    }

    #[test]
    fn exit_codes_distinguish_error_kinds() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::validation("bad").to_string(), "bad");
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://localhost:8000").is_ok());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn decorate_requires_a_token() -> Result<()> {
        let server = MockServer::start();
        let ctx = context_with(&server, None)?;
        let url = ctx
            .endpoint("/api/offers")
            .map_err(|err| anyhow!(err.display_message()))?;
        let builder = ctx.client.get(url);
        assert!(matches!(
            ctx.decorate(builder, LocaleCode::En),
            Err(CliError::Validation(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn decorated_requests_carry_token_locale_and_request_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/offers")
                .header("authorization", "Bearer secret")
                .header("accept-language", "ar")
                .header(HEADER_REQUEST_ID, "req-1");
            then.status(200);
        });

        let ctx = context_with(&server, Some("secret"))?;
        let url = ctx
            .endpoint("/api/offers")
            .map_err(|err| anyhow!(err.display_message()))?;
        let builder = ctx
            .decorate(ctx.client.get(url), LocaleCode::Ar)
            .map_err(|err| anyhow!(err.display_message()))?;
        builder.send().await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn validation_problems_keep_field_messages() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/offers");
            then.status(422).json_body(json!({
                "message": "The given data was invalid.",
                "errors": {"title": ["The title field is required."]}
            }));
        });

        let response = Client::new()
            .post(format!("{}/api/offers", server.base_url()))
            .send()
            .await?;
        match classify_problem(response).await {
            CliError::Validation(message) => assert_eq!(
                message,
                "The given data was invalid. (title: The title field is required.)"
            ),
            CliError::Failure(err) => panic!("expected validation error, got {err:#}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_become_failures() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/doctors");
            then.status(500).body("upstream down");
        });

        let response = Client::new()
            .get(format!("{}/api/doctors", server.base_url()))
            .send()
            .await?;
        let error = classify_problem(response).await;
        assert_eq!(error.exit_code(), 3);
        assert!(error.display_message().contains("upstream down"));
        Ok(())
    }
}
