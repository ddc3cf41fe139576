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

//! Recovers a partial ABI description directly from deployed EVM
//! bytecode, with no access to source or debug metadata.
//!
//! [`bytecode`] disassembles raw bytes behind a small lookbehind
//! cursor; [`abi`] recognises the compiler-idiomatic selector-dispatch
//! and event-emission patterns in that stream and distils them into
//! [`abi::AbiEntry`] values; [`lookup`] optionally resolves the bare
//! selectors and topic hashes that fall out of that process into
//! candidate human-readable signatures, or fetches a verified ABI
//! outright, via public catalog services.
pub mod abi;
pub mod bytecode;
pub mod lookup;
pub mod util;
