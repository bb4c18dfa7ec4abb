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

//! Utility functions and types.

use std::fmt::Debug;

/// Redact keeps credentials out of `Debug` output.
///
/// Access key ids keep their first and last three characters when they are at
/// least 12 characters long so different keys stay distinguishable in logs.
/// Secrets built with [`Redact::secret`] never reveal any character.
pub struct Redact<'a> {
    value: &'a str,
    reveal_edges: bool,
}

impl<'a> Redact<'a> {
    /// Redact a value that must never be revealed, not even partially.
    pub fn secret(value: &'a str) -> Self {
        Self {
            value,
            reveal_edges: false,
        }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Self {
            value,
            reveal_edges: true,
        }
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::from(value.as_str())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.value.len();
        if length == 0 {
            return f.write_str("EMPTY");
        }
        if !self.reveal_edges || length < 12 || !self.value.is_ascii() {
            return f.write_str("***");
        }

        f.write_str(&self.value[..3])?;
        f.write_str("***")?;
        f.write_str(&self.value[length - 3..])
    }
}
