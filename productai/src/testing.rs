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

//! Test helpers shared by unit tests.

use crate::sign_request::RequestSigner;
use crate::{Client, Credential};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;
use http::StatusCode;
use productai_core::{Body, Context, HttpSend, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// HttpSend that records requests and replays canned responses.
///
/// Responds `200 {}` once the canned responses run out.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<http::Request<Body>>,
    responses: VecDeque<(StatusCode, Bytes)>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(&self, status: StatusCode, body: &str) {
        self.state
            .lock()
            .expect("lock must not be poisoned")
            .responses
            .push_back((status, Bytes::copy_from_slice(body.as_bytes())));
    }

    /// Take all requests received so far.
    pub fn take_requests(&self) -> Vec<http::Request<Body>> {
        std::mem::take(&mut self.state.lock().expect("lock must not be poisoned").requests)
    }

    pub fn request_count(&self) -> usize {
        self.state
            .lock()
            .expect("lock must not be poisoned")
            .requests
            .len()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        let mut state = self.state.lock().expect("lock must not be poisoned");
        state.requests.push(req);
        let (status, body) = state
            .responses
            .pop_front()
            .unwrap_or((StatusCode::OK, Bytes::from_static(b"{}")));

        let mut resp = http::Response::new(body);
        *resp.status_mut() = status;
        Ok(resp)
    }
}

/// Client sending to `https://api.productai.test` through `http`, signing
/// with a fixed time and nonce.
pub fn test_client(http: &MockHttpSend) -> Client {
    let signer = RequestSigner::new()
        .with_time(
            chrono::Utc
                .with_ymd_and_hms(2017, 2, 10, 0, 0, 0)
                .single()
                .expect("time must be valid"),
        )
        .with_nonce("abcdefghijklmnopqrstuvwxyz012345");

    Client::new(
        Context::new().with_http_send(http.clone()),
        Credential::new("test-ak", "test-sk"),
    )
    .with_endpoint("https://api.productai.test")
    .with_signer(signer)
}
