// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use thiserror::Error;

/// Failure modes of a [`crate::lookup::SignatureLookup`] catalog call.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no signature on file for {0}")]
    NotFound(String),

    #[error("rate limited by catalog service at {0}")]
    RateLimited(String),

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

/// Failure modes of an [`crate::lookup::AbiLoader`] fetch.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no verified source found for {0}")]
    NotFound(String),

    #[error("rate limited by {0}")]
    RateLimited(String),

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}
