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

use productai_core::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key id and secret.
///
/// It is fixed for the lifetime of a [`Client`](crate::Client) and is never
/// serialized. `Debug` output redacts both fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id, sent in `x-ca-accesskeyid`.
    pub access_key_id: String,
    /// Access key secret, used as the HMAC key and never sent.
    pub access_key_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
        }
    }

    /// Check if both parts of the credential are present.
    pub fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.access_key_secret.is_empty()
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.access_key_secret.as_bytes()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field(
                "access_key_secret",
                &Redact::secret(&self.access_key_secret),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_leaks_secret() {
        let cred = Credential::new("AKIDproductai0001", "s3cr3t-s3cr3t-s3cr3t");
        let output = format!("{cred:?}");

        assert!(output.contains("AKI***001"));
        assert!(!output.contains("s3cr3t"));
    }

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("ak", "sk").is_valid());
        assert!(!Credential::new("", "sk").is_valid());
        assert!(!Credential::new("ak", "").is_valid());
    }
}
