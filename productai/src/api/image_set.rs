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

use super::{attach_image, into_request, path_segment, BuildQuery, Endpoint};
use crate::client::{ApiRequest, Client, Response};
use crate::constants::{IMAGE_SETS_ID, IMAGE_SETS_TYPE};
use crate::image::{ImageInput, ImagesFile};
use crate::sign_request::Form;
use crate::tags::Tags;
use bytes::Bytes;
use productai_core::{FilePart, Result};

/// A change applied to an image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSetUpdate {
    /// Add every row of an encoded listing, uploaded as `urls_to_add`.
    AddInBulk(Bytes),
    /// Delete every row of an encoded listing, uploaded as `urls_to_delete`.
    DeleteInBulk(Bytes),
    /// Add a single image.
    AddImage {
        /// Url or content of the image.
        image: ImageInput,
        /// Free form metadata stored with the image.
        meta: Option<String>,
        /// Tags stored with the image.
        tags: Option<Tags>,
    },
}

/// Image set management at `image_sets/_0000014/{image_set_id}`.
#[derive(Debug, Clone)]
pub struct ImageSetApi {
    client: Client,
    endpoint: Endpoint,
    image_set_id: String,
}

impl ImageSetApi {
    pub(crate) fn new(client: Client, image_set_id: &str) -> Self {
        let endpoint = Endpoint::new(client.endpoint(), IMAGE_SETS_TYPE, IMAGE_SETS_ID);
        Self {
            client,
            endpoint,
            image_set_id: image_set_id.to_string(),
        }
    }

    /// Id of the image set.
    pub fn image_set_id(&self) -> &str {
        &self.image_set_id
    }

    /// Url of the image set, the id is percent-encoded as one path segment.
    pub fn url(&self) -> Result<String> {
        let id = path_segment("image set id", &self.image_set_id)?;
        Ok(self.endpoint.join(&id))
    }

    /// Add images listed in `images`.
    pub async fn add_images_in_bulk(&self, images: impl Into<ImagesFile>) -> Result<Response> {
        let content = images.into().load(self.client.context()).await?;
        self.send(ImageSetUpdate::AddInBulk(content)).await
    }

    /// Delete images listed in `images`.
    pub async fn delete_images_in_bulk(&self, images: impl Into<ImagesFile>) -> Result<Response> {
        let content = images.into().load(self.client.context()).await?;
        self.send(ImageSetUpdate::DeleteInBulk(content)).await
    }

    /// Add a single image with optional metadata and tags.
    pub async fn add_image(
        &self,
        image: impl Into<ImageInput>,
        meta: Option<&str>,
        tags: Option<Tags>,
    ) -> Result<Response> {
        self.send(ImageSetUpdate::AddImage {
            image: image.into(),
            meta: meta.map(str::to_string),
            tags,
        })
        .await
    }

    /// Delete images listed in an existing listing file.
    ///
    /// Same upload as [`ImageSetApi::delete_images_in_bulk`].
    pub async fn delete_images(&self, images: impl Into<ImagesFile>) -> Result<Response> {
        self.delete_images_in_bulk(images).await
    }

    async fn send(&self, update: ImageSetUpdate) -> Result<Response> {
        let req = self.build_query(update)?;
        self.client.send(req).await
    }
}

impl BuildQuery for ImageSetApi {
    type Query = ImageSetUpdate;

    fn build_query(&self, update: ImageSetUpdate) -> Result<ApiRequest> {
        let url = self.url()?;
        let req = match update {
            ImageSetUpdate::AddInBulk(content) => ApiRequest::post(url)
                .with_file(FilePart::new("urls_to_add", content))
                .bulk(),
            ImageSetUpdate::DeleteInBulk(content) => ApiRequest::post(url)
                .with_file(FilePart::new("urls_to_delete", content))
                .bulk(),
            ImageSetUpdate::AddImage { image, meta, tags } => {
                let mut form = Form::new();
                form.insert_opt("meta", meta);
                form.insert_opt("tags", tags.map(|t| t.to_form_value()));
                let (form, file) = attach_image(form, image, "image_url", "image")?;
                into_request(url, form, file)
            }
        };
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageRecord;
    use crate::testing::{test_client, MockHttpSend};
    use http::Method;
    use pretty_assertions::assert_eq;
    use productai_core::{Body, ErrorKind};

    #[test]
    fn test_url() -> Result<()> {
        let client = test_client(&MockHttpSend::new());
        assert_eq!(
            client.get_image_set_api("set-1").url()?,
            "https://api.productai.test/image_sets/_0000014/set-1"
        );
        assert_eq!(
            client.get_image_set_api("a/b").url()?,
            "https://api.productai.test/image_sets/_0000014/a%2Fb"
        );
        Ok(())
    }

    #[test]
    fn test_add_image_by_url() -> Result<()> {
        let api = test_client(&MockHttpSend::new()).get_image_set_api("set-1");

        let req = api.build_query(ImageSetUpdate::AddImage {
            image: "http://x.com/a.jpg".into(),
            meta: Some("sku-1".to_string()),
            tags: Some(vec!["red", "dress"].into()),
        })?;
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.form.iter().collect::<Vec<_>>(),
            vec![
                ("image_url", "http://x.com/a.jpg"),
                ("meta", "sku-1"),
                ("tags", "red|dress"),
            ]
        );
        assert!(req.files.is_empty());
        Ok(())
    }

    #[test]
    fn test_add_image_without_meta() -> Result<()> {
        let api = test_client(&MockHttpSend::new()).get_image_set_api("set-1");

        let req = api.build_query(ImageSetUpdate::AddImage {
            image: Bytes::from_static(b"jpeg").into(),
            meta: None,
            tags: None,
        })?;
        assert_eq!(
            req.form.iter().collect::<Vec<_>>(),
            vec![("meta", ""), ("tags", "")]
        );
        assert_eq!(req.files[0].name, "image");
        Ok(())
    }

    #[test]
    fn test_empty_image_set_id() {
        let api = test_client(&MockHttpSend::new()).get_image_set_api("");
        let err = api
            .build_query(ImageSetUpdate::DeleteInBulk(Bytes::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_add_images_in_bulk() -> Result<()> {
        let http = MockHttpSend::new();
        let api = test_client(&http).get_image_set_api("set-1");

        api.add_images_in_bulk(vec![
            ImageRecord::new("http://x.com/a.jpg").with_meta("sku-1"),
            ImageRecord::new("http://x.com/b.jpg"),
        ])
        .await?;

        let reqs = http.take_requests();
        let Body::Multipart(body) = reqs[0].body() else {
            panic!("expect multipart body, got {:?}", reqs[0].body());
        };
        assert!(body.fields.is_empty());
        assert_eq!(body.files[0].name, "urls_to_add");
        assert_eq!(
            body.files[0].content,
            Bytes::from_static(b"http://x.com/a.jpg,sku-1\r\nhttp://x.com/b.jpg\r\n")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_images() -> Result<()> {
        let http = MockHttpSend::new();
        let api = test_client(&http).get_image_set_api("set-1");

        api.delete_images(Bytes::from_static(b"http://x.com/a.jpg\n"))
            .await?;

        let reqs = http.take_requests();
        let file = reqs[0].body().file("urls_to_delete").expect("file must be sent");
        assert_eq!(file.content, Bytes::from_static(b"http://x.com/a.jpg\n"));
        Ok(())
    }
}
