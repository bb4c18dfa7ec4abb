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

//! Core components for the ProductAI client.
//!
//! This crate provides the foundational types shared by the client crate and
//! the pluggable context crates.
//!
//! ## Overview
//!
//! - **Context**: holds implementations for HTTP sending, file reading and
//!   environment access. Nothing is process-wide; every client carries its own.
//! - **Body**: transport-level request body (form or multipart) so that
//!   transports and test fakes see exactly what the client sends.
//! - **Error**: one error type for local validation, transport and remote
//!   failures.
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use productai_core::{Body, Context, HttpSend, Result};
//!
//! #[derive(Debug)]
//! struct EchoHttpSend;
//!
//! #[async_trait::async_trait]
//! impl HttpSend for EchoHttpSend {
//!     async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
//!         let body = format!("{:?}", req.body().fields());
//!         Ok(http::Response::new(Bytes::from(body)))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_http_send(EchoHttpSend);
//! let resp = ctx.http_send(http::Request::new(Body::Empty)).await?;
//! assert!(resp.status().is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC-SHA1 and base64 helpers
//! - [`time`]: time and date formatting
//! - [`utils`]: data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};
mod error;
pub use error::{Error, ErrorKind, Result};
mod request;
pub use request::{Body, FilePart, Multipart, RequestTimeout};
