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

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Tags filter of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tags {
    /// A single tag or an already encoded filter, sent unchanged.
    Single(String),
    /// Match any of these tags, sent joined with `|`.
    List(Vec<String>),
    /// Boolean tag expression, sent as JSON text.
    Expr(TagExpr),
}

impl Tags {
    /// Encode tags as the form value.
    pub fn to_form_value(&self) -> String {
        match self {
            Tags::Single(s) => s.clone(),
            Tags::List(list) => list.join("|"),
            Tags::Expr(expr) => expr.to_json(),
        }
    }
}

impl From<&str> for Tags {
    fn from(s: &str) -> Self {
        Tags::Single(s.to_string())
    }
}

impl From<String> for Tags {
    fn from(s: String) -> Self {
        Tags::Single(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for Tags {
    fn from(list: Vec<S>) -> Self {
        Tags::List(list.into_iter().map(Into::into).collect())
    }
}

impl From<TagExpr> for Tags {
    fn from(expr: TagExpr) -> Self {
        Tags::Expr(expr)
    }
}

/// Boolean expression tree over tags.
///
/// ```
/// use productai::TagExpr;
///
/// let expr = TagExpr::or(["1", "2"]);
/// assert_eq!(expr.to_json(), r#"{"or":["1","2"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagExpr {
    /// A single tag.
    Tag(String),
    /// All of the sub expressions must match.
    And(Vec<TagExpr>),
    /// Any of the sub expressions must match.
    Or(Vec<TagExpr>),
}

impl TagExpr {
    /// Build an `and` node from tags or sub expressions.
    pub fn and<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagExpr>,
    {
        TagExpr::And(items.into_iter().map(Into::into).collect())
    }

    /// Build an `or` node from tags or sub expressions.
    pub fn or<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagExpr>,
    {
        TagExpr::Or(items.into_iter().map(Into::into).collect())
    }

    /// Encode as compact JSON text.
    pub fn to_json(&self) -> String {
        // Serializing strings, sequences and string-keyed maps cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&str> for TagExpr {
    fn from(s: &str) -> Self {
        TagExpr::Tag(s.to_string())
    }
}

impl From<String> for TagExpr {
    fn from(s: String) -> Self {
        TagExpr::Tag(s)
    }
}

impl Serialize for TagExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagExpr::Tag(tag) => serializer.serialize_str(tag),
            TagExpr::And(items) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", items)?;
                map.end()
            }
            TagExpr::Or(items) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", items)?;
                map.end()
            }
        }
    }
}
