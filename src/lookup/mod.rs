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

//! Optional network-backed enrichment: turning the bare selectors and
//! topic hashes recovered from bytecode into candidate text
//! signatures ([`SignatureLookup`]), or fetching a contract's verified
//! ABI outright ([`AbiLoader`]). Everything in this module talks to
//! external catalog services and is independent of the core
//! extraction in [`crate::abi`] and [`crate::bytecode`].
mod error;
mod loader;
mod signature;

pub use error::{LoaderError, LookupError};
pub use loader::{AbiLoader, EtherscanAbiLoader, SourcifyAbiLoader};
pub use signature::{
    CompositeSignatureLookup, FourByteSignatureLookup, SamczsunSignatureLookup, SignatureLookup,
};
