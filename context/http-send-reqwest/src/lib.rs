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

//! Reqwest based transport for the ProductAI client.
//!
//! ```no_run
//! use productai_core::Context;
//! use productai_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! let client = reqwest::Client::builder()
//!     .pool_max_idle_per_host(50)
//!     .connect_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use productai_core::{Body, Error, HttpSend, Multipart, RequestTimeout, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// HttpSend implementation backed by a [`reqwest::Client`].
///
/// The client is cheap to clone and pools connections, share one instance.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();

        let mut builder = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers);
        if let Some(RequestTimeout(timeout)) = parts.extensions.get::<RequestTimeout>() {
            builder = builder.timeout(*timeout);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Form(fields) => builder.form(&fields),
            Body::Multipart(m) => builder.multipart(build_multipart(m)?),
        };

        let resp = builder.send().await.map_err(|e| {
            let msg = if e.is_timeout() {
                "request timed out"
            } else {
                "failed to send request"
            };
            Error::transport(msg).with_source(e)
        })?;
        debug!("transport got response with status {}", resp.status());

        let resp: http::Response<_> = resp.into();
        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

fn build_multipart(m: Multipart) -> Result<Form> {
    let mut form = Form::new();
    for (k, v) in m.fields {
        form = form.text(k, v);
    }
    for file in m.files {
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| Error::request_invalid("invalid multipart mime").with_source(e))?;
        form = form.part(file.name, part);
    }
    Ok(form)
}
