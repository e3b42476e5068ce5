//! Paginated request client.
//!
//! Wraps one `reqwest::Client` with the upstream base URL and bearer
//! credential. A logical call may span several pages: list-shaped
//! responses are accumulated while the `Link` header carries a `next`
//! relation, object-shaped responses are returned as-is.
//!
//! # Failure model
//!
//! Any transport error, non-2xx status, or undecodable body on any page
//! ends the call with a [`RequestError`]. Pages already read are
//! discarded: a partial roster would corrupt downstream set logic.

use std::time::Duration;

use reqwest::header::{ACCEPT, LINK};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use roster_core::RosterConfig;

use crate::error::{RequestError, RequestResult};
use crate::link::next_link;

/// Query parameter carrying the page size on every request.
const PAGE_SIZE_PARAM: &str = "per_page";

/// Decoded body of one logical call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Concatenation of every page of a list resource, in page order.
    Collection(Vec<Value>),
    /// A single object (or `null` for an empty body).
    Scalar(Value),
}

impl Payload {
    /// Decode as a list. A scalar `null` decodes as an empty list.
    pub fn into_list<T: DeserializeOwned>(self, url: &str) -> RequestResult<Vec<T>> {
        match self {
            Payload::Collection(items) => items
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(|e| RequestError::decode(url, e)))
                .collect(),
            Payload::Scalar(Value::Null) => Ok(Vec::new()),
            Payload::Scalar(_) => Err(RequestError::decode(url, "expected a list, got an object")),
        }
    }

    /// Decode as a single record.
    pub fn into_record<T: DeserializeOwned>(self, url: &str) -> RequestResult<T> {
        match self {
            Payload::Scalar(value) => {
                serde_json::from_value(value).map_err(|e| RequestError::decode(url, e))
            }
            Payload::Collection(_) => Err(RequestError::decode(url, "expected an object, got a list")),
        }
    }

    /// Decode as a single record that the server may omit. An empty body
    /// (scalar `null`) is `None`.
    pub fn into_optional<T: DeserializeOwned>(self, url: &str) -> RequestResult<Option<T>> {
        match self {
            Payload::Scalar(Value::Null) => Ok(None),
            other => other.into_record(url).map(Some),
        }
    }
}

/// Handle for the upstream REST API.
///
/// Constructed once and passed to the gateway; cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    page_size: u32,
    max_pages: u32,
}

impl ApiClient {
    pub fn new(config: &RosterConfig) -> RequestResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RequestError::InvalidUrl {
                url: config.api_url.clone(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Build the first-page URL: base + path, page size, then caller params.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> RequestResult<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| RequestError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(PAGE_SIZE_PARAM, &self.page_size.to_string());
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Execute one logical call, following `next` links for list resources.
    ///
    /// `form` is sent form-encoded on the first request only; subsequent
    /// pages are plain requests to the exact `next` URL.
    pub async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
        method: Method,
        form: Option<&[(&str, &str)]>,
    ) -> RequestResult<Payload> {
        let first = self.endpoint(path, query)?;
        let result = self.drain(first, method.clone(), form).await;

        if let Err(e) = &result {
            warn!(%method, path, url = %e.url(), error = %e, "request failed");
        }
        result
    }

    async fn drain(
        &self,
        first: Url,
        method: Method,
        form: Option<&[(&str, &str)]>,
    ) -> RequestResult<Payload> {
        let mut accumulated: Vec<Value> = Vec::new();
        let mut url = first.to_string();
        let mut pages: u32 = 0;

        loop {
            pages += 1;
            let body = if pages == 1 { form } else { None };
            let (value, next) = self.send_page(&url, method.clone(), body).await?;

            let value = match value {
                Value::Array(items) => {
                    debug!(%url, page = pages, items = items.len(), "fetched page");
                    accumulated.extend(items);
                    None
                }
                other => Some(other),
            };

            // Object-shaped resources are never paged.
            if let Some(scalar) = value {
                return Ok(Payload::Scalar(scalar));
            }

            match next {
                Some(next_url) if pages > self.max_pages => {
                    return Err(RequestError::PageLimit {
                        url: next_url,
                        pages,
                    });
                }
                Some(next_url) => url = next_url,
                None => return Ok(Payload::Collection(accumulated)),
            }
        }
    }

    /// Send a single request and return its decoded body and `next` link.
    async fn send_page(
        &self,
        url: &str,
        method: Method,
        form: Option<&[(&str, &str)]>,
    ) -> RequestResult<(Value, Option<String>)> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");

        if let Some(fields) = form {
            request = request.form(fields);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::transport(url, e))?;

        let status = response.status();
        let next = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(next_link);

        let text = response
            .text()
            .await
            .map_err(|e| RequestError::transport(url, e))?;

        if !status.is_success() {
            return Err(RequestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| RequestError::decode(url, e))?
        };

        Ok((value, next))
    }

    /// GET every page of a list resource.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RequestResult<Vec<T>> {
        let payload = self.fetch(path, query, Method::GET, None).await?;
        payload.into_list(path)
    }

    /// GET a single object.
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RequestResult<T> {
        let payload = self.fetch(path, query, Method::GET, None).await?;
        payload.into_record(path)
    }

    /// POST form fields and decode the created object, if one was returned.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> RequestResult<Option<T>> {
        let payload = self.fetch(path, &[], Method::POST, Some(form)).await?;
        payload.into_optional(path)
    }

    /// DELETE and decode the returned object, if one was returned.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RequestResult<Option<T>> {
        let payload = self.fetch(path, query, Method::DELETE, None).await?;
        payload.into_optional(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(&RosterConfig::new("https://lms.example.edu/api/v1/", "t")).unwrap()
    }

    #[test]
    fn endpoint_appends_page_size_then_params() {
        let url = client()
            .endpoint("/courses/1/users", &[("include[]", "enrollments")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://lms.example.edu/api/v1/courses/1/users?per_page=100&include%5B%5D=enrollments"
        );
    }

    #[test]
    fn endpoint_escapes_values() {
        let url = client()
            .endpoint("courses/1/sections", &[("search_term", "Group A & B")])
            .unwrap();
        assert!(url.as_str().ends_with("search_term=Group+A+%26+B"));
    }

    #[test]
    fn null_scalar_decodes_as_empty_list() {
        let items: Vec<Value> = Payload::Scalar(Value::Null).into_list("x").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn object_is_not_a_list() {
        let err = Payload::Scalar(json!({"id": 1}))
            .into_list::<Value>("courses/1")
            .unwrap_err();
        assert!(matches!(err, RequestError::Decode { .. }));
    }

    #[test]
    fn null_scalar_is_an_absent_record() {
        let record: Option<Value> = Payload::Scalar(Value::Null).into_optional("x").unwrap();
        assert!(record.is_none());

        let record: Option<Value> = Payload::Scalar(json!({"id": 1}))
            .into_optional("x")
            .unwrap();
        assert_eq!(record, Some(json!({"id": 1})));
    }

    #[test]
    fn list_is_not_a_record() {
        let err = Payload::Collection(vec![json!({"id": 1})])
            .into_record::<Value>("courses/1")
            .unwrap_err();
        assert!(matches!(err, RequestError::Decode { .. }));
    }
}
