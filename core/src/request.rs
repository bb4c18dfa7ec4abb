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

use std::time::Duration;

use bytes::Bytes;

/// Body of a request handed to [`HttpSend`](crate::HttpSend).
///
/// Transports own the wire encoding: form bodies become
/// `application/x-www-form-urlencoded`, multipart bodies become
/// `multipart/form-data` with a boundary of the transport's choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body at all.
    #[default]
    Empty,
    /// Url encoded form fields.
    Form(Vec<(String, String)>),
    /// Multipart form with text fields and file parts.
    Multipart(Multipart),
}

impl Body {
    /// Text fields carried by this body, in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        match self {
            Body::Empty => &[],
            Body::Form(fields) => fields,
            Body::Multipart(m) => &m.fields,
        }
    }

    /// Get text field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// File parts carried by this body.
    pub fn files(&self) -> &[FilePart] {
        match self {
            Body::Multipart(m) => &m.files,
            _ => &[],
        }
    }

    /// Get file part by field name.
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files().iter().find(|f| f.name == name)
    }
}

/// Multipart form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipart {
    /// Text fields.
    pub fields: Vec<(String, String)>,
    /// File parts.
    pub files: Vec<FilePart>,
}

/// A named file inside a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name, for example `search` or `urls`.
    pub name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// Raw file content.
    pub content: Bytes,
}

impl FilePart {
    /// Create a new file part, the file name defaults to the field name.
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let name = name.into();
        Self {
            file_name: name.clone(),
            name,
            content: content.into(),
        }
    }

    /// Set the file name reported to the server.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Per request timeout, carried in `http::Request::extensions`.
///
/// Transports should apply it on top of their own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);
