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

use crate::constants::*;
use log::warn;
use productai_core::{Context, Error, Result};
use std::time::Duration;

/// Config carries all the configuration for the productai client.
#[derive(Clone, Debug)]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PRODUCTAI_API_URL`]
    /// - default to `https://api.productai.cn`
    pub endpoint: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PRODUCTAI_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PRODUCTAI_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `language` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`PRODUCTAI_LANGUAGE`]
    /// - default to `en-us`
    pub language: Option<String>,
    /// `timeout` will be loaded from
    ///
    /// - env value: [`PRODUCTAI_TIMEOUT`] in seconds
    /// - default to 30s
    pub timeout: Duration,
    /// Timeout for bulk uploads like batch prepare, default to 300s.
    pub bulk_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key_id: None,
            access_key_secret: None,
            language: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bulk_timeout: Duration::from_secs(DEFAULT_BULK_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(PRODUCTAI_API_URL) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(PRODUCTAI_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(PRODUCTAI_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(PRODUCTAI_LANGUAGE) {
            self.language.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(PRODUCTAI_TIMEOUT) {
            match v.parse::<u64>() {
                Ok(secs) => self.timeout = Duration::from_secs(secs),
                Err(_) => warn!("ignore invalid {PRODUCTAI_TIMEOUT}: {v:?}"),
            }
        }

        self
    }

    /// The api endpoint without trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    /// The value of `Accept-Language`.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Check that the config can be used to build a client.
    ///
    /// The endpoint must be an absolute `http` or `https` url and both
    /// timeouts must be non-zero.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint();
        let uri = endpoint.parse::<http::Uri>().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint:?} is not a valid url"))
                .with_source(e)
        })?;
        if !matches!(uri.scheme_str(), Some("http" | "https")) || uri.host().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint:?} must be an absolute http or https url"
            )));
        }
        if self.timeout.is_zero() || self.bulk_timeout.is_zero() {
            return Err(Error::config_invalid("timeouts must be non-zero"));
        }
        Ok(())
    }
}
