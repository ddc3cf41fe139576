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
use crate::lookup::error::LookupError;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;

/// Resolves 4-byte function selectors and 32-byte event topics back to
/// human-readable text signatures via a public signature catalog.
///
/// Catalogs are append-only and crowd-sourced: a selector can have
/// zero, one, or several candidate signatures on file, since the hash
/// doesn't uniquely determine the text it was derived from.
#[async_trait]
pub trait SignatureLookup: Send + Sync {
    async fn load_functions(&self, selector: &str) -> Result<Vec<String>, LookupError>;
    async fn load_events(&self, topic_hash: &str) -> Result<Vec<String>, LookupError>;
}

/// `sig.eth.samczsun.com`'s aggregated signature database.
pub struct SamczsunSignatureLookup {
    client: reqwest::Client,
    base_url: String,
}

impl SamczsunSignatureLookup {
    const DEFAULT_BASE_URL: &'static str = "https://sig.eth.samczsun.com/api/v1/signatures";

    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the catalog's base URL, e.g. to point at a local mock
    /// server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, kind: &str, key: &str) -> Result<serde_json::Value, LookupError> {
        let url = format!("{}?{}={}", self.base_url, kind, key);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Network { url: url.clone(), source })?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimited(url));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|source| LookupError::Network { url: url.clone(), source })?;

        body.get("result")
            .cloned()
            .ok_or_else(|| LookupError::MalformedResponse {
                url,
                reason: "missing \"result\" field".to_string(),
            })
    }
}

impl Default for SamczsunSignatureLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignatureLookup for SamczsunSignatureLookup {
    async fn load_functions(&self, selector: &str) -> Result<Vec<String>, LookupError> {
        let result = self.fetch("function", selector).await?;
        Ok(result
            .get("function")
            .and_then(|f| f.get(selector))
            .and_then(|v| v.as_array())
            .map(|candidates| {
                candidates
                    .iter()
                    .filter_map(|c| c.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn load_events(&self, topic_hash: &str) -> Result<Vec<String>, LookupError> {
        let result = self.fetch("event", topic_hash).await?;
        Ok(result
            .get("event")
            .and_then(|e| e.get(topic_hash))
            .and_then(|v| v.as_array())
            .map(|candidates| {
                candidates
                    .iter()
                    .filter_map(|c| c.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// `4byte.directory`'s community-submitted signature database.
pub struct FourByteSignatureLookup {
    client: reqwest::Client,
    function_base_url: String,
    event_base_url: String,
}

impl FourByteSignatureLookup {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            function_base_url: "https://www.4byte.directory/api/v1/signatures/".to_string(),
            event_base_url: "https://www.4byte.directory/api/v1/event-signatures/".to_string(),
        }
    }

    /// Override the catalog's base URL, e.g. to point at a local mock
    /// server in tests. Both the function-signature and
    /// event-signature endpoints are rebased under it, mirroring the
    /// `/signatures/` and `/event-signatures/` suffixes of the real
    /// 4byte.directory API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.function_base_url = format!("{}/signatures/", base_url);
        self.event_base_url = format!("{}/event-signatures/", base_url);
        self
    }

    async fn fetch(&self, base_url: &str, hex_signature: &str) -> Result<Vec<serde_json::Value>, LookupError> {
        let url = format!("{}?hex_signature={}", base_url, hex_signature);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Network { url: url.clone(), source })?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimited(url));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|source| LookupError::Network { url: url.clone(), source })?;

        body.get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .ok_or_else(|| LookupError::MalformedResponse {
                url,
                reason: "missing \"results\" field".to_string(),
            })
    }
}

impl Default for FourByteSignatureLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignatureLookup for FourByteSignatureLookup {
    async fn load_functions(&self, selector: &str) -> Result<Vec<String>, LookupError> {
        let results = self.fetch(&self.function_base_url, selector).await?;
        Ok(results
            .iter()
            .filter_map(|r| r.get("text_signature").and_then(|s| s.as_str()))
            .map(str::to_string)
            .collect())
    }

    async fn load_events(&self, topic_hash: &str) -> Result<Vec<String>, LookupError> {
        let results = self.fetch(&self.event_base_url, topic_hash).await?;
        Ok(results
            .iter()
            .filter_map(|r| r.get("text_signature").and_then(|s| s.as_str()))
            .map(str::to_string)
            .collect())
    }
}

/// Fans a lookup out across several catalogs concurrently and unions
/// the candidate signatures. A catalog that errors contributes no
/// candidates rather than failing the whole lookup — different
/// catalogs rate-limit and go down independently, and one dead source
/// shouldn't blank out ones that answered. Only when *every* peer
/// errors does the composite itself fail, with the last-seen error.
pub struct CompositeSignatureLookup {
    lookups: Vec<Box<dyn SignatureLookup>>,
}

impl CompositeSignatureLookup {
    pub fn new(lookups: Vec<Box<dyn SignatureLookup>>) -> Self {
        Self { lookups }
    }
}

#[async_trait]
impl SignatureLookup for CompositeSignatureLookup {
    async fn load_functions(&self, selector: &str) -> Result<Vec<String>, LookupError> {
        let results = join_all(self.lookups.iter().map(|l| l.load_functions(selector))).await;
        union_results(results)
    }

    async fn load_events(&self, topic_hash: &str) -> Result<Vec<String>, LookupError> {
        let results = join_all(self.lookups.iter().map(|l| l.load_events(topic_hash))).await;
        union_results(results)
    }
}

fn union_results(
    results: Vec<Result<Vec<String>, LookupError>>,
) -> Result<Vec<String>, LookupError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut any_ok = false;
    let mut last_err = None;
    for result in results {
        match result {
            Ok(signatures) => {
                any_ok = true;
                for signature in signatures {
                    if seen.insert(signature.clone()) {
                        out.push(signature);
                    }
                }
            }
            Err(err) => last_err = Some(err),
        }
    }
    if any_ok || last_err.is_none() {
        Ok(out)
    } else {
        Err(last_err.unwrap())
    }
}
