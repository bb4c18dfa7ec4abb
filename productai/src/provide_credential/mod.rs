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

//! Credential providers.
//!
//! A client takes its [`Credential`](crate::Credential) once at construction
//! time. Providers decide where that credential comes from.

use crate::Credential;
use async_trait::async_trait;
use productai_core::{Context, Result};
use std::fmt::Debug;

/// ProvideCredential loads a credential from some source.
///
/// Returns `Ok(None)` when the source has nothing to offer so that chains
/// can move on to the next provider.
#[async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Load credential from current context.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>>;
}

mod chain;
pub use chain::ProvideCredentialChain;

mod config;
pub use config::ConfigCredentialProvider;

mod default;
pub use default::DefaultCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;

mod r#static;
pub use r#static::StaticCredentialProvider;
