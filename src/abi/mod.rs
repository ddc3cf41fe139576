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

//! Recovery of a partial ABI description from deployed EVM bytecode:
//! the [`AbiEntry`] skeleton produced by [`abi_from_bytecode`], and the
//! convenience [`projection`] views built on top of it.
mod entry;
mod extractor;
pub mod projection;

pub use entry::AbiEntry;
pub use extractor::abi_from_bytecode;
pub use projection::{events_from_bytecode, selectors_from_abi, selectors_from_bytecode};
