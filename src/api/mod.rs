pub mod options;
pub mod resources;

use std::time::Duration;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::error::ApiError;

/// One `{field, message}` entry of a server-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                message: self.message.unwrap_or_default(),
                errors: self.errors.unwrap_or_default(),
            })
        }
    }

    pub fn into_data(self) -> Result<T, ApiError> {
        self.into_result()?.ok_or(ApiError::MissingData)
    }
}

/// Query string pairs; empty values are skipped by `push_filter`.
pub type Query = Vec<(&'static str, String)>;

pub fn push_filter(query: &mut Query, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

/// Thin JSON wrapper over `reqwest`. Cheap to clone into tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("Falling back to default HTTP client: {}", err);
                Client::new()
            });
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Appends `path` to the base URL one segment at a time. Segments are
    /// percent-encoded, so ids containing `/`, `?` or `#` stay a single segment.
    fn url(&self, path: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{} ({})", self.base_url, err)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    fn request(&self, method: Method, path: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str::<Envelope<T>>(&body).map_err(|err| {
            debug!("Undecodable body (status {}): {}", status, err);
            if status.is_success() {
                ApiError::Decode(err.to_string())
            } else {
                ApiError::Rejected {
                    message: format!("Request failed ({})", status),
                    errors: vec![],
                }
            }
        })
    }

    pub async fn get_request<T: DeserializeOwned>(&self, path: &[&str], query: &[(&'static str, String)]) -> Result<Envelope<T>, ApiError> {
        debug!("query {:?}", query);
        Self::send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post_request<T, B>(&self, path: &[&str], body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Self::send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put_request<T, B>(&self, path: &[&str], body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Self::send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch_request<T: DeserializeOwned>(&self, path: &[&str]) -> Result<Envelope<T>, ApiError> {
        Self::send(self.request(Method::PATCH, path)?).await
    }

    pub async fn delete_request<T: DeserializeOwned>(&self, path: &[&str]) -> Result<Envelope<T>, ApiError> {
        Self::send(self.request(Method::DELETE, path)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn successful_envelope_yields_data() {
        let env: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success":true,"data":["India","Nepal"],"message":"ok"}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec!["India".to_string(), "Nepal".to_string()]);
    }

    #[test]
    fn failed_envelope_carries_field_errors() {
        let env: Envelope<Value> = serde_json::from_str(
            r#"{"success":false,"message":"Validation failed","errors":[{"field":"email","message":"Email already exists"}]}"#,
        )
        .unwrap();
        match env.into_data() {
            Err(ApiError::Rejected { message, errors }) => {
                assert_eq!(message, "Validation failed");
                assert_eq!(errors[0].field, "email");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn success_without_data_is_missing_data() {
        let env: Envelope<Value> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(env.into_result().unwrap().is_none());
        let env: Envelope<Value> = serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert_eq!(env.into_data(), Err(ApiError::MissingData));
    }

    #[test]
    fn push_filter_skips_blank_values() {
        let mut query = Query::new();
        push_filter(&mut query, "country", Some("India"));
        push_filter(&mut query, "state", Some("   "));
        push_filter(&mut query, "district", None);
        assert_eq!(query, vec![("country", "India".to_string())]);
    }

    #[test]
    fn base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:5000/api/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url(&["auth", "login"]).unwrap().as_str(), "http://localhost:5000/api/auth/login");
        let bare = ApiClient::new("http://localhost:5000", Duration::from_secs(5));
        assert_eq!(bare.url(&["auth", "login"]).unwrap().as_str(), "http://localhost:5000/auth/login");
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let client = ApiClient::new("http://localhost:5000/api", Duration::from_secs(5));
        let url = client.url(&["org", "students", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/org/students/a%2Fb%3Fc%23d");
        assert_eq!(url.path_segments().unwrap().count(), 4);
    }

    #[test]
    fn unusable_base_url_is_an_error() {
        let client = ApiClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(client.url(&["auth", "login"]), Err(ApiError::InvalidUrl(_))));
    }

    #[derive(Debug, Deserialize)]
    struct NoDefault {
        id: String,
    }

    #[test]
    fn envelope_payload_needs_no_default() {
        let env: Envelope<NoDefault> = serde_json::from_str(r#"{"success":true,"data":{"id":"d1"}}"#).unwrap();
        assert_eq!(env.into_data().unwrap().id, "d1");
        let env: Envelope<NoDefault> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(env.data.is_none() && env.message.is_none() && env.errors.is_none());
    }
}
