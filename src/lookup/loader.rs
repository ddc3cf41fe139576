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
use crate::lookup::error::LoaderError;
use async_trait::async_trait;

/// Fetches a deployed contract's full, verified ABI by address, when
/// the source has been published to a contract-verification service.
/// Unlike [`crate::lookup::SignatureLookup`], this yields a complete
/// ABI description rather than a candidate list, but only succeeds for
/// contracts whose author chose to verify.
#[async_trait]
pub trait AbiLoader: Send + Sync {
    async fn load_abi(&self, address: &str) -> Result<serde_json::Value, LoaderError>;
}

/// Etherscan's `getabi` endpoint.
pub struct EtherscanAbiLoader {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EtherscanAbiLoader {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.etherscan.io/api".to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl AbiLoader for EtherscanAbiLoader {
    async fn load_abi(&self, address: &str) -> Result<serde_json::Value, LoaderError> {
        let url = format!(
            "{}?module=contract&action=getabi&address={}&apikey={}",
            self.base_url, address, self.api_key
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoaderError::Network { url: url.clone(), source })?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LoaderError::RateLimited(url));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|source| LoaderError::Network { url: url.clone(), source })?;

        let raw_abi = body
            .get("result")
            .and_then(|r| r.as_str())
            .ok_or_else(|| LoaderError::MalformedResponse {
                url: url.clone(),
                reason: "missing \"result\" field".to_string(),
            })?;

        serde_json::from_str(raw_abi).map_err(|_| LoaderError::NotFound(address.to_string()))
    }
}

/// Sourcify's partial-match metadata repository.
pub struct SourcifyAbiLoader {
    client: reqwest::Client,
    base_url: String,
    chain_id: u64,
}

impl SourcifyAbiLoader {
    pub fn new(chain_id: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://repo.sourcify.dev/contracts/partial_match".to_string(),
            chain_id,
        }
    }

    /// Override the repository's base URL, e.g. to point at a local
    /// mock server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl AbiLoader for SourcifyAbiLoader {
    async fn load_abi(&self, address: &str) -> Result<serde_json::Value, LoaderError> {
        let url = format!(
            "{}/{}/{}/metadata.json",
            self.base_url, self.chain_id, address
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoaderError::Network { url: url.clone(), source })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LoaderError::NotFound(address.to_string()));
        }
        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LoaderError::RateLimited(url));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|source| LoaderError::Network { url: url.clone(), source })?;

        body.get("output")
            .and_then(|o| o.get("abi"))
            .cloned()
            .ok_or_else(|| LoaderError::MalformedResponse {
                url,
                reason: "missing \"output.abi\" field".to_string(),
            })
    }
}
