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

use super::{attach_image, into_request, BuildQuery, Endpoint};
use crate::client::{ApiRequest, Client, Response};
use crate::constants::{DEFAULT_COUNT, DEFAULT_LOC};
use crate::image::ImageInput;
use crate::sign_request::Form;
use crate::tags::Tags;
use productai_core::{Error, Result};

/// Keys owned by the image itself, extra params can't use them.
const RESERVED_KEYS: [&str; 2] = ["url", "search"];

/// Arguments of a search or classify query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    image: ImageInput,
    loc: String,
    count: u32,
    tags: Option<Tags>,
    params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Create a query for `image` with default `loc` and `count`.
    pub fn new(image: impl Into<ImageInput>) -> Self {
        Self {
            image: image.into(),
            loc: DEFAULT_LOC.to_string(),
            count: DEFAULT_COUNT,
            tags: None,
            params: Vec::new(),
        }
    }

    /// Region of interest, `x-y-w-h` in relative units. Default `0-0-1-1`.
    pub fn loc(mut self, loc: &str) -> Self {
        self.loc = loc.to_string();
        self
    }

    /// Max results to return. Default `20`.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Filter results by tags.
    pub fn tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Add an extra parameter.
    ///
    /// `url` and `search` are reserved and fail the query.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }
}

/// Image search resource, a [`ResourceApi`] of type `search`.
pub type ImageSearchApi = ResourceApi;

/// A generic `{type}/{id}` resource, also used for image search.
#[derive(Debug, Clone)]
pub struct ResourceApi {
    client: Client,
    endpoint: Endpoint,
}

impl ResourceApi {
    pub(crate) fn new(client: Client, resource_type: &str, resource_id: &str) -> Self {
        let endpoint = Endpoint::new(client.endpoint(), resource_type, resource_id);
        Self { client, endpoint }
    }

    /// Endpoint of this resource.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send `query` to this resource.
    pub async fn query(&self, query: SearchQuery) -> Result<Response> {
        let req = self.build_query(query)?;
        self.client.send(req).await
    }
}

impl BuildQuery for ResourceApi {
    type Query = SearchQuery;

    fn build_query(&self, query: SearchQuery) -> Result<ApiRequest> {
        if let Some((key, _)) = query
            .params
            .iter()
            .find(|(k, _)| RESERVED_KEYS.contains(&k.as_str()))
        {
            return Err(Error::invalid_argument(format!(
                "param {key:?} is reserved for the image"
            )));
        }

        let mut form = Form::new().with("loc", query.loc).with("count", query.count);
        if let Some(tags) = &query.tags {
            form.insert("tags", tags.to_form_value());
        }
        for (k, v) in query.params {
            form.insert(k, v);
        }

        let (form, file) = attach_image(form, query.image, "url", "search")?;
        Ok(into_request(self.endpoint.url(), form, file))
    }
}
