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
use crate::constants::{COLOR_TYPE, DEFAULT_LOC};
use crate::image::ImageInput;
use crate::sign_request::Form;
use productai_core::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Implement `as_str`, `Display` and `FromStr` for a closed set of names.
macro_rules! named_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Name used on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(Error::invalid_argument(format!(
                        concat!("unknown ", $what, " {:?}, expect one of {:?}"),
                        s,
                        [$($name),+]
                    ))),
                }
            }
        }
    };
}

/// Color analysis service, each one served under its own resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSubType {
    /// Colors of the whole image.
    Everything,
    /// Colors of the person in the image.
    Person,
    /// Colors of the outfit worn by the person.
    PersonOutfit,
}

named_enum!(ColorSubType, "color analysis sub type", {
    Everything => "everything",
    Person => "person",
    PersonOutfit => "person_outfit",
});

impl ColorSubType {
    /// Resource id serving this sub type.
    pub fn resource_id(&self) -> &'static str {
        match self {
            ColorSubType::Everything => "_0000072",
            ColorSubType::Person => "_0000073",
            ColorSubType::PersonOutfit => "_0000074",
        }
    }
}

/// How fine the returned color list is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Major colors only.
    Major,
    /// All detected colors.
    Detailed,
    /// The single dominant color.
    Dominant,
}

named_enum!(Granularity, "granularity", {
    Major => "major",
    Detailed => "detailed",
    Dominant => "dominant",
});

/// Color naming system of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// Basic color names.
    Basic,
    /// W3C color keywords.
    W3c,
    /// Natural Color System notation.
    Ncs,
    /// Chinese NCS names.
    Cncs,
}

named_enum!(ReturnType, "return type", {
    Basic => "basic",
    W3c => "w3c",
    Ncs => "ncs",
    Cncs => "cncs",
});

/// Arguments of a color analysis query.
///
/// `granularity` and `return_type` accept both the typed enums and plain
/// names. Names are checked when the query is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorQuery {
    image: ImageInput,
    loc: String,
    granularity: String,
    return_type: String,
}

impl ColorQuery {
    /// Create a color query.
    pub fn new(
        image: impl Into<ImageInput>,
        granularity: impl ToString,
        return_type: impl ToString,
    ) -> Self {
        Self {
            image: image.into(),
            loc: DEFAULT_LOC.to_string(),
            granularity: granularity.to_string(),
            return_type: return_type.to_string(),
        }
    }

    /// Region of interest. Default `0-0-1-1`.
    pub fn loc(mut self, loc: &str) -> Self {
        self.loc = loc.to_string();
        self
    }
}

/// Color analysis resource.
#[derive(Debug, Clone)]
pub struct ColorAnalysisApi {
    client: Client,
    sub_type: ColorSubType,
    endpoint: Endpoint,
}

impl ColorAnalysisApi {
    pub(crate) fn new(client: Client, sub_type: ColorSubType) -> Self {
        let endpoint = Endpoint::new(client.endpoint(), COLOR_TYPE, sub_type.resource_id());
        Self {
            client,
            sub_type,
            endpoint,
        }
    }

    /// Sub type of this resource.
    pub fn sub_type(&self) -> ColorSubType {
        self.sub_type
    }

    /// Endpoint of this resource.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Analyze colors of an image.
    pub async fn query(&self, query: ColorQuery) -> Result<Response> {
        let req = self.build_query(query)?;
        self.client.send(req).await
    }
}

impl BuildQuery for ColorAnalysisApi {
    type Query = ColorQuery;

    fn build_query(&self, query: ColorQuery) -> Result<ApiRequest> {
        let granularity = query.granularity.parse::<Granularity>()?;
        let return_type = query.return_type.parse::<ReturnType>()?;

        let form = Form::new()
            .with("loc", query.loc)
            .with("granularity", granularity)
            .with("return_type", return_type);
        let (form, file) = attach_image(form, query.image, "url", "search")?;
        Ok(into_request(self.endpoint.url(), form, file))
    }
}
