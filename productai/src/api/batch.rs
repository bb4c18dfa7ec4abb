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

use super::{path_segment, BuildQuery, Endpoint};
use crate::client::{ApiRequest, Client};
use crate::constants::{BATCH_ID, BATCH_TYPE};
use crate::dates::{date_str, DateFormat, DateInput};
use crate::image::{encode_records, ImageRecord, ImagesFile};
use crate::sign_request::Form;
use bytes::Bytes;
use log::debug;
use productai_core::{Error, FilePart, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A call to the batch resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCall {
    /// Upload an encoded listing for `service_id`.
    Prepare {
        /// Service that will process the images.
        service_id: String,
        /// CSV content, uploaded as `urls`.
        urls: Bytes,
    },
    /// Start a prepared task.
    Apply(String),
    /// Fetch the state of a task.
    TaskInfo(String),
    /// Cancel a task.
    Revoke(String),
    /// List tasks created between optional bounds.
    Tasks {
        /// Lower bound.
        start: Option<DateInput>,
        /// Upper bound.
        end: Option<DateInput>,
    },
    /// List services available for batch tasks.
    Services,
}

/// Task created by [`BatchApi::prepare`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreparedTask {
    /// Server assigned task id.
    #[serde(deserialize_with = "deserialize_task_id")]
    pub task_id: String,
    /// Other fields returned by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State of a batch task as reported by the server.
///
/// `status` is passed through unchanged, whatever its json type. The client
/// never infers state transitions on its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskInfo {
    /// Task status, usually a string like `waiting`, `processing` or
    /// `finished`.
    #[serde(default)]
    pub status: Option<Value>,
    /// Other fields returned by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskInfo {
    /// Status as text: strings as is, other values in their json form.
    pub fn status_text(&self) -> Option<String> {
        match self.status.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            v => Some(v.to_string()),
        }
    }
}

fn deserialize_task_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        v => Err(D::Error::custom(format!("invalid task id: {v}"))),
    }
}

/// Batch task manager at `batch/_1000001`.
///
/// A task goes through `prepare`, `apply`, then is polled with
/// `get_task_info` until the server reports it done. `revoke` cancels it.
#[derive(Debug, Clone)]
pub struct BatchApi {
    client: Client,
    endpoint: Endpoint,
    date_format: DateFormat,
}

impl BatchApi {
    pub(crate) fn new(client: Client) -> Self {
        let endpoint = Endpoint::new(client.endpoint(), BATCH_TYPE, BATCH_ID);
        Self {
            client,
            endpoint,
            date_format: DateFormat::default(),
        }
    }

    /// Set the date format of `get_tasks` bounds.
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Endpoint of the batch resource.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Create a task over `rows` for `service_id`.
    pub async fn prepare(&self, service_id: &str, rows: &[ImageRecord]) -> Result<PreparedTask> {
        let urls = encode_records(rows).await?;
        self.do_prepare(service_id, urls).await
    }

    /// Create a task over an existing listing for `service_id`.
    pub async fn prepare_by_file(
        &self,
        service_id: &str,
        images: impl Into<ImagesFile>,
    ) -> Result<PreparedTask> {
        let urls = images.into().load(self.client.context()).await?;
        self.do_prepare(service_id, urls).await
    }

    async fn do_prepare(&self, service_id: &str, urls: Bytes) -> Result<PreparedTask> {
        let task: PreparedTask = self
            .call(BatchCall::Prepare {
                service_id: service_id.to_string(),
                urls,
            })
            .await?;
        debug!("batch task {} prepared", task.task_id);
        Ok(task)
    }

    /// Start a prepared task.
    pub async fn apply(&self, task_id: &str) -> Result<Value> {
        self.call(BatchCall::Apply(task_id.to_string())).await
    }

    /// Fetch the state of a task.
    pub async fn get_task_info(&self, task_id: &str) -> Result<TaskInfo> {
        self.call(BatchCall::TaskInfo(task_id.to_string())).await
    }

    /// Cancel a task.
    pub async fn revoke(&self, task_id: &str) -> Result<Value> {
        self.call(BatchCall::Revoke(task_id.to_string())).await
    }

    /// List tasks, optionally bounded by `start` and `end`.
    ///
    /// Bounds are validated before anything is sent.
    pub async fn get_tasks(
        &self,
        start: Option<DateInput>,
        end: Option<DateInput>,
    ) -> Result<Value> {
        self.call(BatchCall::Tasks { start, end }).await
    }

    /// List services available for batch tasks.
    pub async fn get_services(&self) -> Result<Value> {
        self.call(BatchCall::Services).await
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, call: BatchCall) -> Result<T> {
        let req = self.build_query(call)?;
        self.client.send(req).await?.json()
    }
}

impl BuildQuery for BatchApi {
    type Query = BatchCall;

    fn build_query(&self, call: BatchCall) -> Result<ApiRequest> {
        let req = match call {
            BatchCall::Prepare { service_id, urls } => {
                ApiRequest::post(self.endpoint.join("task/prepare"))
                    .with_form(Form::new().with("service_id", service_id))
                    .with_file(FilePart::new("urls", urls))
                    .bulk()
            }
            BatchCall::Apply(task_id) => {
                if task_id.is_empty() {
                    return Err(Error::invalid_argument("task id must not be empty"));
                }
                ApiRequest::post(self.endpoint.join("task/apply"))
                    .with_form(Form::new().with("task_id", task_id))
            }
            BatchCall::TaskInfo(task_id) => {
                let task_id = path_segment("task id", &task_id)?;
                ApiRequest::get(self.endpoint.join(&format!("task/info/{task_id}")))
            }
            BatchCall::Revoke(task_id) => {
                let task_id = path_segment("task id", &task_id)?;
                ApiRequest::post(self.endpoint.join(&format!("task/revoke/{task_id}")))
            }
            BatchCall::Tasks { start, end } => {
                let mut form = Form::new();
                if let Some(start) = start {
                    form.insert("start", date_str(start, self.date_format)?);
                }
                if let Some(end) = end {
                    form.insert("end", date_str(end, self.date_format)?);
                }
                ApiRequest::get(self.endpoint.join("tasks")).with_form(form)
            }
            BatchCall::Services => ApiRequest::get(self.endpoint.join("services")),
        };
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_client, MockHttpSend};
    use chrono::NaiveDate;
    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use productai_core::{Body, ErrorKind, RequestTimeout};
    use std::time::Duration;

    fn batch(http: &MockHttpSend) -> BatchApi {
        test_client(http).get_batch_api()
    }

    #[tokio::test]
    async fn test_prepare() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"task_id":"t-1","urls_count":2}"#);

        let task = batch(&http)
            .prepare(
                "20",
                &[
                    ImageRecord::new("http://x.com/a.jpg"),
                    ImageRecord::new("http://x.com/b.jpg").with_meta("red, large"),
                ],
            )
            .await?;
        assert_eq!(task.task_id, "t-1");
        assert_eq!(task.extra["urls_count"], 2);

        let reqs = http.take_requests();
        let req = &reqs[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://api.productai.test/batch/_1000001/task/prepare"
        );
        assert_eq!(req.body().field("service_id"), Some("20"));
        assert_eq!(
            req.body().file("urls").map(|f| f.content.clone()),
            Some(Bytes::from_static(
                b"http://x.com/a.jpg\r\nhttp://x.com/b.jpg,\"red, large\"\r\n"
            ))
        );
        assert_eq!(
            req.extensions().get::<RequestTimeout>(),
            Some(&RequestTimeout(Duration::from_secs(300)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_prepare_numeric_task_id() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"task_id":42}"#);

        let task = batch(&http)
            .prepare_by_file("20", Bytes::from_static(b"http://x.com/a.jpg\n"))
            .await?;
        assert_eq!(task.task_id, "42");
        Ok(())
    }

    #[tokio::test]
    async fn test_task_lifecycle() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"task_id":"t-1"}"#);
        http.respond(StatusCode::OK, r#"{"status":"processing","progress":0.5}"#);
        http.respond(StatusCode::OK, r#"{"status":"revoked"}"#);
        let api = batch(&http);

        api.apply("t-1").await?;
        let info = api.get_task_info("t-1").await?;
        assert_eq!(info.status_text().as_deref(), Some("processing"));
        assert_eq!(info.extra["progress"], 0.5);
        let revoked = api.revoke("t-1").await?;
        assert_eq!(revoked["status"], "revoked");

        let reqs = http.take_requests();
        let calls: Vec<_> = reqs
            .iter()
            .map(|r| (r.method().clone(), r.uri().path().to_string()))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::POST, "/batch/_1000001/task/apply".to_string()),
                (Method::GET, "/batch/_1000001/task/info/t-1".to_string()),
                (Method::POST, "/batch/_1000001/task/revoke/t-1".to_string()),
            ]
        );
        assert_eq!(
            reqs[0].body(),
            &Body::Form(vec![("task_id".to_string(), "t-1".to_string())])
        );
        assert_eq!(reqs[2].body(), &Body::Empty);
        Ok(())
    }

    #[tokio::test]
    async fn test_task_info_keeps_non_string_status() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"status":2,"task_id":"t-1"}"#);
        http.respond(StatusCode::OK, r#"{"task_id":"t-1"}"#);
        let api = batch(&http);

        let info = api.get_task_info("t-1").await?;
        assert_eq!(info.status, Some(Value::from(2)));
        assert_eq!(info.status_text().as_deref(), Some("2"));
        assert_eq!(info.extra["task_id"], "t-1");

        let info = api.get_task_info("t-1").await?;
        assert_eq!(info.status, None);
        assert_eq!(info.status_text(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_tasks_with_bounds() -> Result<()> {
        let http = MockHttpSend::new();
        batch(&http)
            .get_tasks(Some("2020-01-01".into()), Some("2020-02-01".into()))
            .await?;

        let reqs = http.take_requests();
        assert_eq!(reqs[0].method(), Method::GET);
        assert_eq!(
            reqs[0].uri().to_string(),
            "https://api.productai.test/batch/_1000001/tasks?end=2020-02-01&start=2020-01-01"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_tasks_without_bounds() -> Result<()> {
        let http = MockHttpSend::new();
        batch(&http).get_tasks(None, None).await?;

        let reqs = http.take_requests();
        assert_eq!(
            reqs[0].uri().to_string(),
            "https://api.productai.test/batch/_1000001/tasks"
        );
        Ok(())
    }

    #[test]
    fn test_get_tasks_iso8601() -> Result<()> {
        let api = batch(&MockHttpSend::new()).with_date_format(DateFormat::Iso8601);

        let req = api.build_query(BatchCall::Tasks {
            start: Some(NaiveDate::from_ymd_opt(2017, 2, 10).expect("date must be valid").into()),
            end: None,
        })?;
        assert_eq!(req.form.get("start"), Some("2017-02-10T00:00:00Z"));
        assert!(!req.form.contains_key("end"));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_tasks_invalid_date_is_not_sent() {
        let http = MockHttpSend::new();
        let err = batch(&http)
            .get_tasks(Some("2020-01-01".into()), Some("not-a-date".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_get_services() -> Result<()> {
        let http = MockHttpSend::new();
        http.respond(StatusCode::OK, r#"{"results":[{"service_id":"20"}]}"#);

        let services = batch(&http).get_services().await?;
        assert_eq!(services["results"][0]["service_id"], "20");
        assert_eq!(
            http.take_requests()[0].uri().path(),
            "/batch/_1000001/services"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_error() {
        let http = MockHttpSend::new();
        http.respond(StatusCode::NOT_FOUND, r#"{"message":"task not found"}"#);

        let err = batch(&http).get_task_info("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_task_id_is_one_path_segment() -> Result<()> {
        let http = MockHttpSend::new();
        let api = batch(&http);

        api.get_task_info("a/b?c=1").await?;
        api.revoke("../services").await?;

        let reqs = http.take_requests();
        assert_eq!(
            reqs[0].uri().to_string(),
            "https://api.productai.test/batch/_1000001/task/info/a%2Fb%3Fc%3D1"
        );
        assert_eq!(reqs[0].uri().query(), None);
        assert_eq!(
            reqs[1].uri().path(),
            "/batch/_1000001/task/revoke/..%2Fservices"
        );

        let err = api.get_task_info("..").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(http.request_count(), 0);
        Ok(())
    }

    #[test]
    fn test_empty_task_id() {
        let api = batch(&MockHttpSend::new());
        for call in [
            BatchCall::Apply(String::new()),
            BatchCall::TaskInfo(String::new()),
            BatchCall::Revoke(String::new()),
        ] {
            let err = api.build_query(call).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }
}
