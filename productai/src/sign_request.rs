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

//! Request signing.
//!
//! Every call carries a set of `x-ca-*` headers plus `requestmethod`. The
//! signature is the base64 encoded HMAC-SHA1 of the string to sign, keyed by
//! the access key secret. The string to sign is built from all headers except
//! the signature itself plus every form field:
//!
//! ```text
//! key1=value1&key2=value2&...
//! ```
//!
//! Keys are sorted in byte order, form fields replace headers with the same
//! name and values are trimmed. Files in multipart bodies are not signed.

use crate::constants::*;
use crate::Credential;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use log::debug;
use productai_core::hash::base64_hmac_sha1;
use productai_core::time::{format_unix_timestamp, now, DateTime};
use productai_core::Result;
use rand::Rng;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Form fields of a request.
///
/// Values are stored as text, anything else goes through [`ToString`] on
/// insertion. A missing value is stored as the empty string so the key is
/// still signed as `key=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form(BTreeMap<String, String>);

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    /// Insert a field that may be missing, `None` becomes the empty string.
    pub fn insert_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        self.0.insert(key.into(), value);
    }

    /// Builder style [`Form::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Get field value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check if the field exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the form has no field.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Take all fields out as pairs in key order.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Form {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut form = Form::new();
        for (k, v) in iter {
            form.insert(k, v);
        }
        form
    }
}

impl IntoIterator for Form {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Authentication headers of a single call.
///
/// Built by [`make_auth_headers`], completed by [`RequestSigner::sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders(BTreeMap<String, String>);

impl AuthHeaders {
    /// Get header value by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The computed signature, `None` until signed.
    pub fn signature(&self) -> Option<&str> {
        self.get(X_CA_SIGNATURE)
    }

    /// Iterate headers in name order, signature included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    /// Write all headers into a header map.
    ///
    /// The signature is marked as sensitive so that it stays out of debug output.
    pub fn apply(self, headers: &mut HeaderMap) -> Result<()> {
        for (k, v) in self.0 {
            let mut value = HeaderValue::from_str(&v)?;
            if k == X_CA_SIGNATURE {
                value.set_sensitive(true);
            }
            headers.insert(HeaderName::from_bytes(k.as_bytes())?, value);
        }
        Ok(())
    }
}

/// Build unsigned auth headers for `access_key_id` with current time and a
/// fresh nonce.
pub fn make_auth_headers(access_key_id: &str, method: &str) -> AuthHeaders {
    build_auth_headers(access_key_id, method, now(), &signature_nonce())
}

fn build_auth_headers(
    access_key_id: &str,
    method: &str,
    time: DateTime,
    nonce: &str,
) -> AuthHeaders {
    AuthHeaders(BTreeMap::from([
        (X_CA_ACCESSKEYID.to_string(), access_key_id.to_string()),
        (X_CA_VERSION.to_string(), API_VERSION.to_string()),
        (X_CA_TIMESTAMP.to_string(), format_unix_timestamp(time)),
        (X_CA_SIGNATURENONCE.to_string(), nonce.to_string()),
        (REQUESTMETHOD.to_string(), method.to_string()),
    ]))
}

/// Generate a random nonce of lowercase letters and digits.
pub fn signature_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..SIGNATURE_NONCE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SIGNATURE_NONCE_CHARSET.len());
            SIGNATURE_NONCE_CHARSET[idx] as char
        })
        .collect()
}

/// Build the string to sign from headers and form fields.
///
/// The signature header is skipped if present. Form fields override headers
/// with the same name.
pub fn payload_to_sign<'a>(
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    form: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut payload: BTreeMap<&str, &str> = headers
        .into_iter()
        .filter(|(k, _)| *k != X_CA_SIGNATURE)
        .collect();
    payload.extend(form);

    let mut s = String::with_capacity(256);
    for (idx, (k, v)) in payload.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(trim_value(v));
    }
    s
}

/// Trim ascii whitespace around a signed value.
///
/// Vertical tab counts as whitespace here, unlike `str::trim_ascii`.
fn trim_value(v: &str) -> &str {
    v.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'))
}

/// Calculate the base64 encoded HMAC-SHA1 signature.
pub fn calc_signature<'a>(
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    form: impl IntoIterator<Item = (&'a str, &'a str)>,
    secret: &[u8],
) -> String {
    let string_to_sign = payload_to_sign(headers, form);
    debug!("calculated string to sign: {string_to_sign}");

    base64_hmac_sha1(secret, string_to_sign.as_bytes())
}

/// RequestSigner produces signed auth headers for every call.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the signing nonce.
    ///
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = Some(nonce.to_string());
        self
    }

    /// Build auth headers for `form` and sign them.
    pub fn sign(&self, cred: &Credential, form: &Form) -> AuthHeaders {
        let time = self.time.unwrap_or_else(now);
        let nonce = self.nonce.clone().unwrap_or_else(signature_nonce);

        let mut headers = build_auth_headers(&cred.access_key_id, SIGNING_METHOD, time, &nonce);
        let signature = calc_signature(headers.iter(), form.iter(), cred.secret());
        headers.insert(X_CA_SIGNATURE, signature);
        headers
    }
}
