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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used by the productai client.
pub const PRODUCTAI_API_URL: &str = "PRODUCTAI_API_URL";
pub const PRODUCTAI_ACCESS_KEY_ID: &str = "PRODUCTAI_ACCESS_KEY_ID";
pub const PRODUCTAI_ACCESS_KEY_SECRET: &str = "PRODUCTAI_ACCESS_KEY_SECRET";
pub const PRODUCTAI_LANGUAGE: &str = "PRODUCTAI_LANGUAGE";
pub const PRODUCTAI_TIMEOUT: &str = "PRODUCTAI_TIMEOUT";

pub const DEFAULT_API_URL: &str = "https://api.productai.cn";
pub const DEFAULT_LANGUAGE: &str = "en-us";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BULK_TIMEOUT_SECS: u64 = 300;

// Signing protocol constants.
pub const API_VERSION: &str = "1";
pub const SIGNING_METHOD: &str = "POST";
pub const SIGNATURE_NONCE_LEN: usize = 32;
pub const SIGNATURE_NONCE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// Headers used in signing.
pub const X_CA_ACCESSKEYID: &str = "x-ca-accesskeyid";
pub const X_CA_VERSION: &str = "x-ca-version";
pub const X_CA_TIMESTAMP: &str = "x-ca-timestamp";
pub const X_CA_SIGNATURENONCE: &str = "x-ca-signaturenonce";
pub const X_CA_SIGNATURE: &str = "x-ca-signature";
pub const REQUESTMETHOD: &str = "requestmethod";

// Fixed resources.
pub const BATCH_TYPE: &str = "batch";
pub const BATCH_ID: &str = "_1000001";
pub const IMAGE_SETS_TYPE: &str = "image_sets";
pub const IMAGE_SETS_ID: &str = "_0000014";
pub const SEARCH_TYPE: &str = "search";
pub const COLOR_TYPE: &str = "color";

// Query defaults.
pub const DEFAULT_LOC: &str = "0-0-1-1";
pub const DEFAULT_COUNT: u32 = 20;

/// AsciiSet for ids used as a single path segment.
///
/// Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
