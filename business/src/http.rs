//! Small request builder over `reqwest`.
//!
//! Responses are read fully into memory so callers can decode them after the
//! connection is gone and move them across threads freely.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// `Authorization: Bearer <token>` when a token is present.
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("authorization", format!("Bearer {token}")),
            None => self,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Adds the pair only when `value` is present.
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Sends the request and collects status, headers and body.
    pub async fn send(self) -> HttpResult<Response> {
        let client = reqwest::Client::new();

        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Put => client.put(&self.url),
            Method::Delete => client.delete(&self.url),
        };
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        log::debug!("{:?} {}", self.method, self.url);
        let response = request.send().await.map_err(HttpError::from)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_lowercase(), value.to_owned()))
            })
            .collect();
        let body = response.bytes().await.map_err(HttpError::from)?.to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Entry point for building requests.
///
/// ```ignore
/// use portal_business::http::Client;
///
/// let response = Client::get("http://localhost:8080/v3/partnerPortal/users")
///     .bearer(Some("token"))
///     .query("page", 1)
///     .send()
///     .await?;
/// ```
pub struct Client;

impl Client {
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Delete, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &[u8]) -> Response {
        Response {
            status,
            headers: HashMap::from([(
                "content-type".to_owned(),
                "application/json".to_owned(),
            )]),
            body: body.to_vec(),
        }
    }

    #[test]
    fn success_covers_only_2xx() {
        assert!(response(200, b"").is_success());
        assert!(response(204, b"").is_success());
        assert!(!response(401, b"").is_success());
        assert!(!response(500, b"").is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = response(200, b"");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("accept"), None);
    }

    #[test]
    fn body_decodes_as_json() {
        #[derive(Debug, serde::Deserialize, PartialEq, Eq)]
        struct Message {
            message: String,
        }

        let response = response(400, br#"{"message": "Invalid phone"}"#);
        let decoded: Message = response.json().unwrap();
        assert_eq!(decoded.message, "Invalid phone");
        assert_eq!(response.text().unwrap(), r#"{"message": "Invalid phone"}"#);
    }

    #[test]
    fn bearer_is_skipped_without_token() {
        let anonymous = Client::get("http://localhost").bearer(None);
        assert!(anonymous.headers.is_empty());

        let signed = Client::get("http://localhost").bearer(Some("abc"));
        assert_eq!(
            signed.headers.get("authorization").map(String::as_str),
            Some("Bearer abc")
        );
    }

    #[test]
    fn optional_query_pairs_are_dropped() {
        let builder = Client::get("http://localhost/users")
            .query("page", 2)
            .query_opt("search", None::<&str>)
            .query_opt("status", Some("COMPLETED"));

        assert_eq!(
            builder.query,
            vec![
                ("page".to_owned(), "2".to_owned()),
                ("status".to_owned(), "COMPLETED".to_owned()),
            ]
        );
    }

    #[test]
    fn json_body_sets_content_type() {
        let builder = Client::post("http://localhost/notes")
            .json(&serde_json::json!({ "note": "Called back" }))
            .unwrap();

        assert_eq!(
            builder.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert!(builder.body.is_some());
    }
}
