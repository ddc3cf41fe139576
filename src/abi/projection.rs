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
use crate::abi::{abi_from_bytecode, AbiEntry};
use crate::util::hex::{self, IntoBytecode};
use sha3::{Digest, Keccak256};
use std::collections::{HashMap, HashSet};

/// Ordered, unique list of 4-byte function selectors recovered from
/// `code`'s dispatch table. Empty if nothing was recognised.
pub fn selectors_from_bytecode<T: IntoBytecode>(code: T) -> Result<Vec<String>, hex::Error> {
    let entries = abi_from_bytecode(code)?;
    Ok(dedup_in_order(entries.into_iter().filter_map(|e| match e {
        AbiEntry::Function { selector, .. } => Some(selector),
        AbiEntry::Event { .. } => None,
    })))
}

/// Ordered, unique list of 32-byte event topic hashes recovered from
/// `code`. Empty if nothing was recognised.
pub fn events_from_bytecode<T: IntoBytecode>(code: T) -> Result<Vec<String>, hex::Error> {
    let entries = abi_from_bytecode(code)?;
    Ok(dedup_in_order(entries.into_iter().filter_map(|e| match e {
        AbiEntry::Event { topic_hash } => Some(topic_hash),
        AbiEntry::Function { .. } => None,
    })))
}

fn dedup_in_order<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Compute, for every `function` description in an externally
/// supplied ABI, its 4-byte selector from `name(canonical_input_types)`
/// hashed with keccak-256. Tuple input types are recursively collapsed
/// to their component type list in parentheses. Returns a map from
/// selector to canonical signature string.
pub fn selectors_from_abi(abi: &serde_json::Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let descriptions = match abi.as_array() {
        Some(a) => a,
        None => return out,
    };
    for description in descriptions {
        if description.get("type").and_then(|t| t.as_str()) != Some("function") {
            continue;
        }
        let signature = canonical_signature(description);
        let selector = keccak_selector(&signature);
        out.insert(selector, signature);
    }
    out
}

fn canonical_signature(description: &serde_json::Value) -> String {
    let name = description.get("name").and_then(|n| n.as_str()).unwrap_or("");
    let empty = Vec::new();
    let inputs = description
        .get("inputs")
        .and_then(|i| i.as_array())
        .unwrap_or(&empty);
    let types: Vec<String> = inputs.iter().map(canonical_type).collect();
    format!("{}({})", name, types.join(","))
}

/// Collapse a single ABI input's type, recursively expanding tuples
/// into their component type list, e.g. a `tuple` input with
/// components `[uint256, address]` collapses to `(uint256,address)`,
/// and a `tuple[]` collapses to `(uint256,address)[]`.
fn canonical_type(input: &serde_json::Value) -> String {
    let ty = input.get("type").and_then(|t| t.as_str()).unwrap_or("");
    match ty.strip_prefix("tuple") {
        Some(array_suffix) => {
            let empty = Vec::new();
            let components = input
                .get("components")
                .and_then(|c| c.as_array())
                .unwrap_or(&empty);
            let inner: Vec<String> = components.iter().map(canonical_type).collect();
            format!("({}){}", inner.join(","), array_suffix)
        }
        None => ty.to_string(),
    }
}

fn keccak_selector(signature: &str) -> String {
    let digest = Keccak256::digest(signature.as_bytes());
    hex::hexlify(&digest[0..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selectors_from_bytecode_empty_input() {
        assert_eq!(selectors_from_bytecode("").unwrap(), Vec::<String>::new());
        assert_eq!(selectors_from_bytecode("0x").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn events_from_bytecode_dedups_repeated_topic() {
        let topic32 = "22".repeat(32);
        let code = format!("7f{}a1a2", topic32);
        let events = events_from_bytecode(code).unwrap();
        assert_eq!(events, vec![format!("0x{}", topic32)]);
    }

    #[test]
    fn selectors_from_abi_matches_known_selector() {
        // getOrderStatus(bytes32) -> 0x46423aa7, per the catalog fixture
        // referenced throughout this crate's tests.
        let abi = json!([
            {
                "type": "function",
                "name": "getOrderStatus",
                "inputs": [{"name": "orderHash", "type": "bytes32"}]
            }
        ]);
        let selectors = selectors_from_abi(&abi);
        assert_eq!(
            selectors.get("0x46423aa7").map(|s| s.as_str()),
            Some("getOrderStatus(bytes32)")
        );
    }

    #[test]
    fn selectors_from_abi_ignores_non_function_entries() {
        let abi = json!([
            {"type": "event", "name": "Transfer", "inputs": []},
            {"type": "constructor", "inputs": []},
        ]);
        assert!(selectors_from_abi(&abi).is_empty());
    }

    #[test]
    fn selectors_from_abi_collapses_tuple_inputs() {
        let abi = json!([
            {
                "type": "function",
                "name": "fill",
                "inputs": [
                    {
                        "name": "order",
                        "type": "tuple",
                        "components": [
                            {"name": "maker", "type": "address"},
                            {"name": "amount", "type": "uint256"}
                        ]
                    }
                ]
            }
        ]);
        let selectors = selectors_from_abi(&abi);
        let sigs: Vec<&String> = selectors.values().collect();
        assert_eq!(sigs, vec!["fill((address,uint256))"]);
    }

    #[test]
    fn selectors_from_abi_collapses_tuple_array_inputs() {
        let abi = json!([
            {
                "type": "function",
                "name": "fillMany",
                "inputs": [
                    {
                        "name": "orders",
                        "type": "tuple[]",
                        "components": [
                            {"name": "maker", "type": "address"}
                        ]
                    }
                ]
            }
        ]);
        let selectors = selectors_from_abi(&abi);
        let sigs: Vec<&String> = selectors.values().collect();
        assert_eq!(sigs, vec!["fillMany((address)[])"]);
    }
}
