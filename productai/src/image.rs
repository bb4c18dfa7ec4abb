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

use bytes::Bytes;
use csv_async::{AsyncWriterBuilder, Terminator};
use productai_core::{Context, Error, Result};

/// Image sent to a query.
///
/// Exactly one of the two is sent per call: a url goes into the form field
/// `url`, a stream goes into the multipart file field `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Publicly reachable image url.
    Url(String),
    /// Raw image content.
    Stream(Bytes),
}

impl ImageInput {
    /// Load image content from a local file.
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let content = ctx.file_read(path).await?;
        Ok(ImageInput::Stream(Bytes::from(content)))
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self {
            ImageInput::Url(url) if url.trim().is_empty() => {
                Err(Error::invalid_argument("image url must not be empty"))
            }
            ImageInput::Stream(bs) if bs.is_empty() => {
                Err(Error::invalid_argument("image content must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl From<&str> for ImageInput {
    fn from(url: &str) -> Self {
        ImageInput::Url(url.to_string())
    }
}

impl From<String> for ImageInput {
    fn from(url: String) -> Self {
        ImageInput::Url(url)
    }
}

impl From<Bytes> for ImageInput {
    fn from(content: Bytes) -> Self {
        ImageInput::Stream(content)
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(content: Vec<u8>) -> Self {
        ImageInput::Stream(Bytes::from(content))
    }
}

impl From<&'static [u8]> for ImageInput {
    fn from(content: &'static [u8]) -> Self {
        ImageInput::Stream(Bytes::from_static(content))
    }
}

/// One row of a bulk image listing: `url[,meta...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRecord {
    /// Image url.
    pub url: String,
    /// Extra columns, for example a product id and tags.
    pub meta: Vec<String>,
}

impl ImageRecord {
    /// Create a record with only the url column.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            meta: Vec::new(),
        }
    }

    /// Append a metadata column.
    pub fn with_meta(mut self, value: impl Into<String>) -> Self {
        self.meta.push(value.into());
        self
    }

    fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.url.as_str()).chain(self.meta.iter().map(String::as_str))
    }
}

impl<S: Into<String>> FromIterator<S> for ImageRecord {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut it = iter.into_iter();
        let url = it.next().map(Into::into).unwrap_or_default();
        Self {
            url,
            meta: it.map(Into::into).collect(),
        }
    }
}

/// Source of a bulk image listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagesFile {
    /// Path of a CSV file on local disk, read with the context's file reader.
    Path(String),
    /// Records to encode as CSV.
    Records(Vec<ImageRecord>),
    /// Already encoded CSV content, sent as is.
    Content(Bytes),
}

impl ImagesFile {
    /// Resolve the listing into the bytes to upload.
    pub async fn load(self, ctx: &Context) -> Result<Bytes> {
        match self {
            ImagesFile::Path(path) => Ok(Bytes::from(ctx.file_read(&path).await?)),
            ImagesFile::Records(records) => encode_records(&records).await,
            ImagesFile::Content(bs) => Ok(bs),
        }
    }
}

impl From<Vec<ImageRecord>> for ImagesFile {
    fn from(records: Vec<ImageRecord>) -> Self {
        ImagesFile::Records(records)
    }
}

impl From<Bytes> for ImagesFile {
    fn from(content: Bytes) -> Self {
        ImagesFile::Content(content)
    }
}

/// Encode records as CSV, one row per record.
///
/// Rows may have different column counts. Fields containing commas, quotes
/// or line breaks are quoted.
pub async fn encode_records(records: &[ImageRecord]) -> Result<Bytes> {
    let mut writer = AsyncWriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .create_writer(Vec::new());

    for record in records {
        writer
            .write_record(record.fields())
            .await
            .map_err(|e| Error::unexpected("failed to write csv record").with_source(e))?;
    }
    writer
        .flush()
        .await
        .map_err(|e| Error::unexpected("failed to flush csv").with_source(e))?;

    let buf = writer
        .into_inner()
        .await
        .map_err(|_| Error::unexpected("failed to finish csv"))?;
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use productai_core::ErrorKind;

    #[tokio::test]
    async fn test_encode_records() -> Result<()> {
        let records = vec![
            ImageRecord::from_iter(["http://x.com/a.jpg", "12", "good"]),
            ImageRecord::from_iter(["http://x.com/b.jpg", "13", "bad"]),
        ];

        let bs = encode_records(&records).await?;
        assert_eq!(
            String::from_utf8_lossy(&bs),
            "http://x.com/a.jpg,12,good\r\nhttp://x.com/b.jpg,13,bad\r\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_encode_records_quotes_and_ragged_rows() -> Result<()> {
        let records = vec![
            ImageRecord::new("http://x.com/a.jpg").with_meta("red, large"),
            ImageRecord::new("http://x.com/b.jpg"),
        ];

        let bs = encode_records(&records).await?;
        assert_eq!(
            String::from_utf8_lossy(&bs),
            "http://x.com/a.jpg,\"red, large\"\r\nhttp://x.com/b.jpg\r\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_images_file_content_passthrough() -> Result<()> {
        let content = Bytes::from_static(b"http://x.com/a.jpg,12,good");
        let loaded = ImagesFile::from(content.clone()).load(&Context::new()).await?;
        assert_eq!(loaded, content);
        Ok(())
    }

    #[tokio::test]
    async fn test_images_file_path_needs_file_reader() {
        let err = ImagesFile::Path("bulk1.csv".to_string())
            .load(&Context::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_image_input_check() {
        assert!(ImageInput::from("http://x.com/a.jpg").check().is_ok());
        assert!(ImageInput::from(b"jpeg".as_slice()).check().is_ok());

        let err = ImageInput::from("  ").check().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = ImageInput::from(Vec::<u8>::new()).check().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
