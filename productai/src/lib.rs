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

//! Client for the ProductAI image recognition service.
//!
//! This crate signs every call with the access key secret (HMAC-SHA1 over
//! the sorted auth headers and form fields) and exposes typed resources for
//! image search, image set management, color analysis and batch tasks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use productai::{Client, ImageRecord};
//! use productai_core::{Context, OsEnv, Result};
//! use productai_file_read_tokio::TokioFileRead;
//! use productai_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Credential is loaded from PRODUCTAI_ACCESS_KEY_ID and
//!     // PRODUCTAI_ACCESS_KEY_SECRET.
//!     let client = Client::from_env(ctx).await?;
//!
//!     let batch = client.get_batch_api();
//!     let task = batch
//!         .prepare("20", &[ImageRecord::new("https://example.com/a.jpg")])
//!         .await?;
//!     batch.apply(&task.task_id).await?;
//!
//!     let info = batch.get_task_info(&task.task_id).await?;
//!     println!("task {} is {:?}", task.task_id, info.status_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```bash
//! export PRODUCTAI_API_URL=https://api.productai.cn
//! export PRODUCTAI_ACCESS_KEY_ID=your-access-key-id
//! export PRODUCTAI_ACCESS_KEY_SECRET=your-access-key-secret
//! export PRODUCTAI_LANGUAGE=zh-cn
//! ```
//!
//! ## Resources
//!
//! - [`Client::get_image_search_api`] and [`Client::get_api`]: [`ResourceApi`]
//! - [`Client::get_color_analysis_api`]: [`ColorAnalysisApi`]
//! - [`Client::get_image_set_api`]: [`ImageSetApi`]
//! - [`Client::get_batch_api`]: [`BatchApi`]
//!
//! Failed calls are never retried.

#![warn(missing_docs)]

mod constants;

mod api;
pub use api::{
    BatchApi, BatchCall, BuildQuery, ColorAnalysisApi, ColorQuery, ColorSubType, Endpoint,
    Granularity, ImageSearchApi, ImageSetApi, ImageSetUpdate, PreparedTask, ResourceApi,
    ReturnType, SearchQuery, TaskInfo,
};

mod client;
pub use client::{ApiRequest, Client, Response};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod dates;
pub use dates::{date_str, DateFormat, DateInput};

mod image;
pub use image::{encode_records, ImageInput, ImageRecord, ImagesFile};

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{
    calc_signature, make_auth_headers, payload_to_sign, signature_nonce, AuthHeaders, Form,
    RequestSigner,
};

mod tags;
pub use tags::{TagExpr, Tags};

#[cfg(test)]
mod testing;
