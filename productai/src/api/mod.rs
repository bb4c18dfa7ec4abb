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

//! Resources exposed by the ProductAI api.
//!
//! Every resource turns its typed arguments into an [`ApiRequest`] through
//! [`BuildQuery`] and hands it to [`Client::send`].

use crate::client::ApiRequest;
use crate::constants::PATH_SEGMENT_ENCODE_SET;
use crate::image::ImageInput;
use crate::sign_request::Form;
use percent_encoding::utf8_percent_encode;
use productai_core::{Error, FilePart, Result};

mod search;
pub use search::{ImageSearchApi, ResourceApi, SearchQuery};

mod color;
pub use color::{ColorAnalysisApi, ColorQuery, ColorSubType, Granularity, ReturnType};

mod image_set;
pub use image_set::{ImageSetApi, ImageSetUpdate};

mod batch;
pub use batch::{BatchApi, BatchCall, PreparedTask, TaskInfo};

/// BuildQuery turns a typed query into a request ready to be signed.
///
/// Validation happens here, so a query that fails to build never reaches
/// the network.
pub trait BuildQuery {
    /// Arguments of the query.
    type Query;

    /// Build the request for `query`.
    fn build_query(&self, query: Self::Query) -> Result<ApiRequest>;
}

/// Endpoint of a resource: `{base_url}/{resource_type}/{resource_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    resource_type: String,
    resource_id: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(base_url: &str, resource_type: &str, resource_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
        }
    }

    /// Resource type, for example `search`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Resource id, for example `_0000025`.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Full url of the resource.
    pub fn url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url, self.resource_type, self.resource_id
        )
    }

    /// Url of a sub path under the resource.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url(), path.trim_start_matches('/'))
    }
}

/// Encode a caller supplied id as one path segment.
///
/// `.` and `..` are rejected since urls resolve them against the parent path.
fn path_segment(what: &str, id: &str) -> Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(Error::invalid_argument(format!(
            "{what} {id:?} is not a valid path segment"
        )));
    }
    Ok(utf8_percent_encode(id, &PATH_SEGMENT_ENCODE_SET).to_string())
}

/// Put `image` into the request: a url as form field `url_field`, content as
/// file part `file_field`.
fn attach_image(
    mut form: Form,
    image: ImageInput,
    url_field: &str,
    file_field: &str,
) -> Result<(Form, Option<FilePart>)> {
    image.check()?;

    match image {
        ImageInput::Url(url) => {
            form.insert(url_field, url);
            Ok((form, None))
        }
        ImageInput::Stream(content) => Ok((form, Some(FilePart::new(file_field, content)))),
    }
}

fn into_request(url: String, form: Form, file: Option<FilePart>) -> ApiRequest {
    let req = ApiRequest::post(url).with_form(form);
    match file {
        Some(file) => req.with_file(file),
        None => req,
    }
}
