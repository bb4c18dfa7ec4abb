// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::api::{BatchApi, ColorAnalysisApi, ColorSubType, ImageSetApi, ResourceApi};
use crate::constants::*;
use crate::provide_credential::{DefaultCredentialProvider, ProvideCredential};
use crate::sign_request::{Form, RequestSigner};
use crate::{Config, Credential};
use bytes::Bytes;
use http::header::ACCEPT_LANGUAGE;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use log::{debug, warn};
use productai_core::{Body, Context, Error, FilePart, Multipart, RequestTimeout, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Client for the ProductAI api.
///
/// It is cheap to clone and safe to share between tasks. Each call is signed
/// with the current time and a fresh nonce, no other state is kept between
/// calls.
///
/// ```no_run
/// use productai::{Client, Credential, SearchQuery};
/// use productai_core::Context;
/// use productai_http_send_reqwest::ReqwestHttpSend;
///
/// # async fn example() -> productai_core::Result<()> {
/// let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
/// let client = Client::new(ctx, Credential::new("access-key-id", "access-key-secret"));
///
/// let resp = client
///     .get_image_search_api("_0000025")
///     .query(SearchQuery::new("https://example.com/dress.jpg").count(10))
///     .await?;
/// println!("{}", resp.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    credential: Arc<Credential>,
    endpoint: String,
    language: Option<String>,
    timeout: Duration,
    bulk_timeout: Duration,
    signer: RequestSigner,
}

impl Client {
    /// Create a client with default config.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self::with_config(ctx, &Config::default(), credential)
    }

    /// Create a client from `config` with an explicit credential.
    ///
    /// Credential fields inside `config` are ignored.
    pub fn with_config(ctx: Context, config: &Config, credential: Credential) -> Self {
        Self {
            ctx,
            credential: Arc::new(credential),
            endpoint: config.endpoint().to_string(),
            language: Some(config.language().to_string()),
            timeout: config.timeout,
            bulk_timeout: config.bulk_timeout,
            signer: RequestSigner::new(),
        }
    }

    /// Create a client loading the credential from `provider`.
    pub async fn load(
        ctx: Context,
        config: &Config,
        provider: &dyn ProvideCredential,
    ) -> Result<Self> {
        config.validate()?;
        let credential = provider
            .provide_credential(&ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no valid credential found"))?;
        if !credential.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret must not be empty",
            ));
        }

        Ok(Self::with_config(ctx, config, credential))
    }

    /// Create a client from `config`, credential taken from the config or env.
    pub async fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let provider = DefaultCredentialProvider::new(config.clone());
        Self::load(ctx, &config, &provider).await
    }

    /// Create a client entirely from environment variables.
    ///
    /// See [`Config`] for the variables in use.
    pub async fn from_env(ctx: Context) -> Result<Self> {
        let config = Config::default().from_env(&ctx);
        Self::from_config(ctx, config).await
    }

    /// Override the api endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Override `Accept-Language`, `None` stops sending the header.
    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.set_lang(language);
        self
    }

    /// Set `Accept-Language` in place.
    pub fn set_lang(&mut self, language: Option<&str>) {
        self.language = language.map(str::to_string);
    }

    /// Override timeout of regular calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override timeout of bulk uploads.
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// The context used by this client.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The api endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The current `Accept-Language` value.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Get a resource by type and id, for example `("classify", "_0000001")`.
    pub fn get_api(&self, resource_type: &str, resource_id: &str) -> ResourceApi {
        ResourceApi::new(self.clone(), resource_type, resource_id)
    }

    /// Get an image search resource.
    pub fn get_image_search_api(&self, resource_id: &str) -> ResourceApi {
        ResourceApi::new(self.clone(), SEARCH_TYPE, resource_id)
    }

    /// Get a color analysis resource by sub type name.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](productai_core::ErrorKind::InvalidArgument)
    /// for unknown sub types.
    pub fn get_color_analysis_api(&self, sub_type: &str) -> Result<ColorAnalysisApi> {
        let sub_type = sub_type.parse::<ColorSubType>()?;
        Ok(ColorAnalysisApi::new(self.clone(), sub_type))
    }

    /// Get the image set management resource.
    pub fn get_image_set_api(&self, image_set_id: &str) -> ImageSetApi {
        ImageSetApi::new(self.clone(), image_set_id)
    }

    /// Get the batch task resource.
    pub fn get_batch_api(&self) -> BatchApi {
        BatchApi::new(self.clone())
    }

    /// Sign and send a request.
    ///
    /// Non-success statuses are returned as
    /// [`ErrorKind::Remote`](productai_core::ErrorKind::Remote) errors.
    /// Nothing is retried.
    pub async fn send(&self, req: ApiRequest) -> Result<Response> {
        let ApiRequest {
            method,
            url,
            form,
            files,
            bulk,
        } = req;

        let auth = self.signer.sign(&self.credential, &form);
        let (uri, body) = if method == Method::GET {
            (url_with_query(&url, &form), Body::Empty)
        } else if !files.is_empty() {
            let fields = form.into_pairs();
            (url, Body::Multipart(Multipart { fields, files }))
        } else if form.is_empty() {
            (url, Body::Empty)
        } else {
            (url, Body::Form(form.into_pairs()))
        };

        let mut http_req = http::Request::builder()
            .method(method.clone())
            .uri(uri.as_str())
            .body(body)?;
        auth.apply(http_req.headers_mut())?;
        if let Some(lang) = &self.language {
            http_req
                .headers_mut()
                .insert(ACCEPT_LANGUAGE, HeaderValue::from_str(lang)?);
        }
        let timeout = if bulk { self.bulk_timeout } else { self.timeout };
        http_req.extensions_mut().insert(RequestTimeout(timeout));

        debug!("send request: {method} {uri}");
        let resp = self.ctx.http_send(http_req).await?;
        let (parts, body) = resp.into_parts();
        if !parts.status.is_success() {
            warn!("request {method} {uri} failed with status {}", parts.status);
            return Err(Error::remote(parts.status, body));
        }
        debug!("request {method} {uri} got status {}", parts.status);

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

fn url_with_query(url: &str, form: &Form) -> String {
    if form.is_empty() {
        return url.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter())
        .finish();
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

/// A request before signing.
///
/// Resource types turn their typed arguments into an `ApiRequest`, the
/// [`Client`] signs and sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// `POST` for most calls, `GET` for listings.
    pub method: Method,
    /// Full url without query.
    pub url: String,
    /// Signed fields: the body for `POST`, the query for `GET`.
    pub form: Form,
    /// File parts, sent as multipart together with `form`.
    pub files: Vec<FilePart>,
    /// Use the bulk timeout instead of the regular one.
    pub bulk: bool,
}

impl ApiRequest {
    /// Create a `POST` request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Create a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            form: Form::new(),
            files: Vec::new(),
            bulk: false,
        }
    }

    /// Replace the form.
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    /// Add a file part.
    pub fn with_file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// Mark as bulk upload.
    pub fn bulk(mut self) -> Self {
        self.bulk = true;
        self
    }
}

/// A successful response.
///
/// The payload is returned as is for the caller to interpret.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response body as text, invalid utf-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Decode response body as json.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Take the raw body.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_client, MockHttpSend};
    use pretty_assertions::assert_eq;
    use productai_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    const URL: &str = "https://api.productai.test/a";

    #[tokio::test]
    async fn test_send_post_form() -> Result<()> {
        let http = MockHttpSend::new();
        let client = test_client(&http);

        let form = Form::new().with("task_id", "t-1");
        client
            .send(
                ApiRequest::post("https://api.productai.test/batch/_1000001/task/apply")
                    .with_form(form),
            )
            .await?;

        let reqs = http.take_requests();
        assert_eq!(reqs.len(), 1);
        let req = &reqs[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://api.productai.test/batch/_1000001/task/apply"
        );
        assert_eq!(
            req.body(),
            &Body::Form(vec![("task_id".to_string(), "t-1".to_string())])
        );
        for name in [
            "x-ca-accesskeyid",
            "x-ca-version",
            "x-ca-timestamp",
            "x-ca-signaturenonce",
            "requestmethod",
            "x-ca-signature",
        ] {
            assert!(req.headers().contains_key(name), "missing header {name}");
        }
        assert_eq!(req.headers()["requestmethod"], "POST");
        assert_eq!(req.headers()[ACCEPT_LANGUAGE], "en-us");
        assert_eq!(
            req.extensions().get::<RequestTimeout>(),
            Some(&RequestTimeout(Duration::from_secs(30)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_signature_covers_form() -> Result<()> {
        let http = MockHttpSend::new();
        let client = test_client(&http);

        client
            .send(ApiRequest::post(URL).with_form(Form::new().with("k", "v1")))
            .await?;
        client
            .send(ApiRequest::post(URL).with_form(Form::new().with("k", "v2")))
            .await?;

        let reqs = http.take_requests();
        assert_ne!(
            reqs[0].headers()["x-ca-signature"],
            reqs[1].headers()["x-ca-signature"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_send_get_signs_query() -> Result<()> {
        let http = MockHttpSend::new();
        let client = test_client(&http);

        let form = Form::new().with("start", "2020-01-01").with("end", "2020-02-01");
        client
            .send(
                ApiRequest::get("https://api.productai.test/batch/_1000001/tasks")
                    .with_form(form.clone()),
            )
            .await?;

        let reqs = http.take_requests();
        let req = &reqs[0];
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://api.productai.test/batch/_1000001/tasks?end=2020-02-01&start=2020-01-01"
        );
        assert_eq!(req.body(), &Body::Empty);
        // GET calls are signed with the same method literal as POST calls.
        assert_eq!(req.headers()["requestmethod"], "POST");

        let expected = test_client(&MockHttpSend::new())
            .signer
            .sign(&Credential::new("test-ak", "test-sk"), &form);
        assert_eq!(
            req.headers()["x-ca-signature"],
            expected.signature().expect("must be signed")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_send_multipart_and_bulk_timeout() -> Result<()> {
        let http = MockHttpSend::new();
        let client = test_client(&http).with_bulk_timeout(Duration::from_secs(600));

        client
            .send(
                ApiRequest::post("https://api.productai.test/upload")
                    .with_form(Form::new().with("service_id", "20"))
                    .with_file(FilePart::new(
                        "urls",
                        Bytes::from_static(b"http://x.com/a.jpg\r\n"),
                    ))
                    .bulk(),
            )
            .await?;

        let reqs = http.take_requests();
        let body = reqs[0].body();
        assert_eq!(body.field("service_id"), Some("20"));
        assert_eq!(
            body.file("urls").map(|f| f.content.clone()),
            Some(Bytes::from_static(b"http://x.com/a.jpg\r\n"))
        );
        assert_eq!(
            reqs[0].extensions().get::<RequestTimeout>(),
            Some(&RequestTimeout(Duration::from_secs(600)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_send_without_language() -> Result<()> {
        let http = MockHttpSend::new();
        let client = test_client(&http).with_language(None);

        client.send(ApiRequest::post(URL)).await?;

        let reqs = http.take_requests();
        assert!(!reqs[0].headers().contains_key(ACCEPT_LANGUAGE));
        assert_eq!(reqs[0].body(), &Body::Empty);
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_failure() {
        let http = MockHttpSend::new();
        http.respond(StatusCode::FORBIDDEN, r#"{"message":"signature mismatch"}"#);
        let client = test_client(&http);

        let err = client
            .send(ApiRequest::post(URL))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(
            err.body(),
            Some(&Bytes::from_static(br#"{"message":"signature mismatch"}"#))
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let client = Client::new(Context::new(), Credential::new("ak", "sk"));

        let err = client
            .send(ApiRequest::post(URL))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_response_json() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"results":[{"score":0.9}]}"#);
        let client = test_client(&http);

        let resp = client.send(ApiRequest::post(URL)).await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = resp.json()?;
        assert_eq!(v["results"][0]["score"], 0.9);
        Ok(())
    }

    #[tokio::test]
    async fn test_from_env() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (PRODUCTAI_API_URL.to_string(), "http://localhost:8080/".to_string()),
                (PRODUCTAI_ACCESS_KEY_ID.to_string(), "env-ak".to_string()),
                (PRODUCTAI_ACCESS_KEY_SECRET.to_string(), "env-sk".to_string()),
                (PRODUCTAI_LANGUAGE.to_string(), "zh-cn".to_string()),
            ]),
        });

        let client = Client::from_env(ctx).await?;
        assert_eq!(client.endpoint(), "http://localhost:8080");
        assert_eq!(client.language(), Some("zh-cn"));
        assert_eq!(client.credential.access_key_id, "env-ak");
        Ok(())
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid_endpoint() {
        let config = Config {
            endpoint: Some("api.productai.cn".to_string()),
            access_key_id: Some("ak".to_string()),
            access_key_secret: Some("sk".to_string()),
            ..Default::default()
        };

        let err = Client::from_config(Context::new(), config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_from_env_without_credential() {
        let err = Client::from_env(Context::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_url_with_query() {
        assert_eq!(url_with_query("http://a/b", &Form::new()), "http://a/b");
        assert_eq!(
            url_with_query("http://a/b", &Form::new().with("q", "a b&c")),
            "http://a/b?q=a+b%26c"
        );
        assert_eq!(
            url_with_query("http://a/b?x=1", &Form::new().with("y", 2)),
            "http://a/b?x=1&y=2"
        );
    }
}
