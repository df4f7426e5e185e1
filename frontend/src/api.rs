//! HTTP access to the finance API.
//!
//! [`HttpTransport`] is the seam to the network: the browser build uses
//! [`GlooTransport`], tests substitute a scripted fake. [`ApiClient`] sits on
//! top and owns URL building, bearer-token attachment and JSON (de)coding.

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::storage::TokenStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// A fully resolved request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[async_trait(?Send)]
pub trait HttpTransport {
    /// Sends the request. Any non-2xx answer must come back as
    /// [`ApiError::Status`]; an empty success body decodes to `Value::Null`.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// `fetch`-backed transport for the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(
                request
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }

        let sent = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|err| ApiError::Encode(err.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|err| ApiError::Transport(err.to_string()))?;
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Authenticated JSON client shared by the session and resource stores.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<str>,
    transport: Rc<dyn HttpTransport>,
    tokens: Rc<dyn TokenStorage>,
}

impl ApiClient {
    pub fn new(
        config: &AppConfig,
        transport: Rc<dyn HttpTransport>,
        tokens: Rc<dyn TokenStorage>,
    ) -> Self {
        Self {
            base_url: Rc::from(config.api_base_url.as_str()),
            transport,
            tokens,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, Vec::new()).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let value = self.execute(Method::Get, path, query, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self
            .execute(Method::Post, path, Vec::new(), Some(encode(body)?))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let value = self
            .execute(Method::Patch, path, Vec::new(), Some(encode(body)?))
            .await?;
        serde_json::from_value::<IgnoredAny>(value)?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, Vec::new(), None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            bearer: self.tokens.load().filter(|token| !token.is_empty()),
            query,
            body,
        };
        self.transport.send(request).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryTokenStorage;
    use crate::test_support::{Reply, ScriptedTransport};

    fn client(transport: &Rc<ScriptedTransport>, tokens: Rc<MemoryTokenStorage>) -> ApiClient {
        ApiClient::new(
            &AppConfig::with_base_url("http://api.test/"),
            transport.clone(),
            tokens,
        )
    }

    #[test]
    fn bearer_is_attached_only_when_a_token_is_stored() {
        let transport = Rc::new(ScriptedTransport::default());
        transport.expect(Method::Get, "/categorias", Reply::json(json!([])));
        transport.expect(Method::Get, "/categorias", Reply::json(json!([])));
        let tokens = Rc::new(MemoryTokenStorage::default());
        let api = client(&transport, tokens.clone());

        block_on(api.get::<Vec<Value>>("/categorias")).unwrap();
        tokens.store("T").unwrap();
        block_on(api.get::<Vec<Value>>("/categorias")).unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://api.test/categorias");
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("T"));
    }

    #[test]
    fn query_and_body_are_forwarded() {
        let transport = Rc::new(ScriptedTransport::default());
        transport.expect(Method::Get, "/movimientos/resumen-mensual", Reply::json(json!({})));
        transport.expect(Method::Patch, "/presupuestos/3", Reply::empty());
        let api = client(&transport, Rc::new(MemoryTokenStorage::default()));

        block_on(api.get_with_query::<Value>(
            "/movimientos/resumen-mensual",
            vec![("month".into(), "10".into()), ("year".into(), "2026".into())],
        ))
        .unwrap();
        block_on(api.patch("/presupuestos/3", &json!({ "amount": 5 }))).unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].query,
            vec![("month".to_string(), "10".to_string()), ("year".to_string(), "2026".to_string())]
        );
        assert_eq!(requests[1].method, Method::Patch);
        assert_eq!(requests[1].body, Some(json!({ "amount": 5 })));
    }

    #[test]
    fn error_status_and_bad_bodies_surface_as_errors() {
        let transport = Rc::new(ScriptedTransport::default());
        transport.expect(Method::Get, "/auth/me", Reply::status(401));
        transport.expect(Method::Get, "/auth/me", Reply::json(json!("not a user")));
        let api = client(&transport, Rc::new(MemoryTokenStorage::default()));

        let unauthorized = block_on(api.get::<crate::models::User>("/auth/me")).unwrap_err();
        assert_eq!(unauthorized.status(), Some(401));

        let undecodable = block_on(api.get::<crate::models::User>("/auth/me")).unwrap_err();
        assert!(matches!(undecodable, ApiError::Decode(_)));
    }
}
