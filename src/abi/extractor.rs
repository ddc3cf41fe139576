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
use crate::abi::AbiEntry;
use crate::bytecode::{opcode, Cursor};
use crate::util::hex::{self, IntoBytecode};
use std::collections::{HashMap, HashSet};

/// Longest lookbehind used by the selector-dispatch pattern below
/// (`PUSH EQ PUSH JUMPI`).
const DISPATCH_WINDOW: usize = 4;

/// Disassemble `bytecode` once, recognising the standard-compiler
/// selector-dispatch and event-emission idioms, and distil them into
/// an ordered list of [`AbiEntry`] values.
///
/// Event entries appear in the order they are observed during the
/// single pass; function entries follow, in the order their selector
/// was first recorded in the dispatch table. Unrecognised code shapes
/// are silently ignored — this is a heuristic extractor, not a full
/// disassembler, and it must never abort on unfamiliar bytecode.
pub fn abi_from_bytecode<T: IntoBytecode>(bytecode: T) -> Result<Vec<AbiEntry>, hex::Error> {
    let bytes = hex::arrayify(bytecode)?;
    let mut cursor = Cursor::new(&bytes, DISPATCH_WINDOW);

    // selector -> jump destination, in first-seen order.
    let mut jump_order: Vec<String> = Vec::new();
    let mut jumps: HashMap<String, u128> = HashMap::new();
    // byte offset -> instruction step, for every observed JUMPDEST.
    let mut dests: HashMap<usize, usize> = HashMap::new();
    // byte offsets of JUMPDESTs guarded by a non-payable preamble.
    let mut not_payable: HashSet<usize> = HashSet::new();

    let mut last_push32: Option<Vec<u8>> = None;
    let mut in_jump_table = true;
    let mut events: Vec<AbiEntry> = Vec::new();

    while cursor.has_more() {
        let op = cursor.next();
        let pos = cursor.pos() as usize;

        if op == opcode::PUSH32 {
            last_push32 = Some(cursor.value().unwrap_or(&[]).to_vec());
            continue;
        }

        if opcode::is_log(op) {
            if let Some(topic) = &last_push32 {
                events.push(AbiEntry::Event {
                    topic_hash: hex::hexlify(topic),
                });
            }
            continue;
        }

        if op == opcode::JUMPDEST {
            let step = cursor.step() as usize;
            dests.insert(pos, step);

            if at_is(&cursor, pos, 1, opcode::CALLVALUE)
                && at_is(&cursor, pos, 2, opcode::DUP1)
                && at_is(&cursor, pos, 3, opcode::ISZERO)
            {
                not_payable.insert(pos);
            }

            if in_jump_table && at_is(&cursor, pos, 1, opcode::CALLDATASIZE) {
                in_jump_table = false;
            }
            continue;
        }

        if !in_jump_table {
            continue;
        }

        if op != opcode::JUMPI {
            continue;
        }

        // PUSH EQ PUSH JUMPI: a standard dispatch-table cell. Only
        // this primary pattern needs `at(-4)`; the fallback pattern
        // below is checked independently of whether it resolves, so a
        // fallback cell within the first three yielded instructions
        // (before the lookbehind window holds four entries) is still
        // recognised.
        let op_m3 = cursor.at(-3).ok();
        let op_m2 = cursor.at(-2).ok();
        if let (Some(m3), Some(m2)) = (op_m3, op_m2) {
            if m3 == opcode::EQ && opcode::is_push(m2) {
                if let Ok(m4) = cursor.at(-4) {
                    if opcode::is_push(m4) {
                        let value = cursor.value_at(-4).unwrap_or(&[]);
                        let padded = if value.len() < 4 {
                            hex::zero_pad(value, 4).unwrap_or_else(|_| value.to_vec())
                        } else {
                            value.to_vec()
                        };
                        let selector = hex::hexlify(&padded);
                        let offset_dest = hex::bytes_to_int(cursor.value_at(-2).unwrap_or(&[]));
                        record_jump(&mut jumps, &mut jump_order, selector, offset_dest);
                    }
                }
            } else if m3 == opcode::ISZERO && opcode::is_push(m2) {
                // ISZERO PUSH JUMPI: the implicit fallback selector.
                let offset_dest = hex::bytes_to_int(cursor.value_at(-2).unwrap_or(&[]));
                record_jump(
                    &mut jumps,
                    &mut jump_order,
                    "0x00000000".to_string(),
                    offset_dest,
                );
            }
        }
    }

    let mut entries = events;
    for selector in jump_order {
        let offset = jumps[&selector];
        if dests.contains_key(&(offset as usize)) {
            entries.push(AbiEntry::Function {
                payable: !not_payable.contains(&(offset as usize)),
                selector,
            });
        }
    }
    Ok(entries)
}

fn at_is(cursor: &Cursor, pos: usize, delta: isize, expect: u8) -> bool {
    cursor.at(pos as isize + delta).ok() == Some(expect)
}

fn record_jump(
    jumps: &mut HashMap<String, u128>,
    order: &mut Vec<String>,
    selector: String,
    offset: u128,
) {
    if !jumps.contains_key(&selector) {
        order.push(selector.clone());
    }
    jumps.insert(selector, offset);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexcode(parts: &[&str]) -> String {
        parts.concat()
    }

    #[test]
    fn empty_bytecode_yields_empty_skeleton() {
        assert_eq!(abi_from_bytecode("").unwrap(), vec![]);
        assert_eq!(abi_from_bytecode("0x").unwrap(), vec![]);
    }

    #[test]
    fn malformed_hex_is_an_error() {
        assert!(abi_from_bytecode("0xzz").is_err());
    }

    #[test]
    fn minimal_dispatch_yields_one_non_payable_function() {
        // DUP1 PUSH4 0x12345678 EQ PUSH1 <dest> JUMPI JUMPDEST CALLVALUE DUP1 ISZERO
        let code = hexcode(&[
            "80",       // DUP1 (not part of the matched window)
            "6312345678", // PUSH4 0x12345678
            "14",       // EQ
            "600a",     // PUSH1 0x0a (dest == JUMPDEST's offset below)
            "57",       // JUMPI
            "5b",       // JUMPDEST @ 0x0a
            "34",       // CALLVALUE
            "80",       // DUP1
            "15",       // ISZERO
        ]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Function {
                selector: "0x12345678".to_string(),
                payable: false,
            }]
        );
    }

    #[test]
    fn dispatch_without_guard_is_payable() {
        let code = hexcode(&[
            "80",
            "6312345678",
            "14",
            "600a",
            "57",
            "5b", // JUMPDEST @ 0x0a, no guard follows
            "00",
        ]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Function {
                selector: "0x12345678".to_string(),
                payable: true,
            }]
        );
    }

    #[test]
    fn fallback_pattern_yields_zero_selector() {
        // DUP1 ISZERO PUSH1 <dest> JUMPI JUMPDEST
        let code = hexcode(&["80", "15", "6005", "57", "5b", "00"]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Function {
                selector: "0x00000000".to_string(),
                payable: true,
            }]
        );
    }

    #[test]
    fn fallback_pattern_as_the_first_three_instructions_is_still_detected() {
        // ISZERO PUSH1 <dest> JUMPI JUMPDEST — the JUMPI fires as only
        // the third instruction in the stream, so the lookbehind
        // window holds fewer than four entries and at(-4) underruns.
        // The fallback must still match on at(-3)/at(-2) alone.
        let code = hexcode(&["15", "6004", "57", "5b", "00"]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Function {
                selector: "0x00000000".to_string(),
                payable: true,
            }]
        );
    }

    #[test]
    fn unresolved_destination_is_dropped() {
        // Dispatch cell whose destination is never a JUMPDEST.
        let code = hexcode(&["80", "6312345678", "14", "6063", "57", "00"]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(entries, vec![]);
    }

    #[test]
    fn push32_then_log_emits_event() {
        let topic32 = "11".repeat(32);
        let code = hexcode(&["7f", &topic32, "a1"]); // PUSH32 <topic> LOG1
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Event {
                topic_hash: format!("0x{}", topic32),
            }]
        );
    }

    #[test]
    fn last_push32_not_cleared_between_logs() {
        let topic32 = "22".repeat(32);
        // PUSH32 <topic> LOG1 LOG2 — both LOGs see the same retained topic.
        let code = hexcode(&["7f", &topic32, "a1", "a2"]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|e| e == &AbiEntry::Event { topic_hash: format!("0x{}", topic32) }));
    }

    #[test]
    fn leading_0x_and_case_do_not_affect_output() {
        let lower = "6312345678146009575b348015";
        let a = abi_from_bytecode(lower).unwrap();
        let b = abi_from_bytecode(format!("0x{}", lower.to_uppercase())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn extraction_is_deterministic() {
        let code = "6312345678146009575b348015";
        assert_eq!(abi_from_bytecode(code).unwrap(), abi_from_bytecode(code).unwrap());
    }

    #[test]
    fn short_selector_push_is_left_zero_padded() {
        // DUP1 PUSH1 0x01 EQ PUSH1 <dest> JUMPI JUMPDEST
        let code = hexcode(&["80", "6001", "14", "6007", "57", "5b", "00"]);
        let entries = abi_from_bytecode(code).unwrap();
        assert_eq!(
            entries,
            vec![AbiEntry::Function {
                selector: "0x00000001".to_string(),
                payable: true,
            }]
        );
    }
}
