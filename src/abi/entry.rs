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

/// A single partial ABI element recovered from bytecode.  Unlike a
/// full ABI description, neither variant carries a name or argument
/// types — those are not recoverable from bytecode alone (see the
/// crate's non-goals).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiEntry {
    /// A callable entry point reached via the selector dispatch
    /// table.
    Function {
        /// `0x`-prefixed, 4-byte (8 hex digit) function selector.
        selector: String,
        /// False if the dispatch target is guarded by a
        /// `CALLVALUE DUP1 ISZERO` non-payable preamble.
        payable: bool,
    },
    /// An event observed immediately before a `LOG1..LOG4`.
    Event {
        /// `0x`-prefixed, 32-byte (64 hex digit) topic hash.
        topic_hash: String,
    },
}
