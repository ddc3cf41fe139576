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

//! Opcode constants for the small subset of the EVM instruction set
//! this crate's extractor pattern-matches against.  This is
//! deliberately not a complete opcode table (c.f. a full disassembler)
//! — only opcodes which participate in the dispatch-table or
//! event-emission idioms are named here.

pub const STOP: u8 = 0x00;
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
pub const CALLVALUE: u8 = 0x34;
pub const CALLDATASIZE: u8 = 0x36;
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;
pub const PUSH1: u8 = 0x60;
pub const PUSH32: u8 = 0x7f;
pub const DUP1: u8 = 0x80;
pub const LOG1: u8 = 0xa1;
pub const LOG4: u8 = 0xa4;

/// Width, in bytes, of the immediate operand following `op` in the
/// bytecode stream.  Zero for every opcode except `PUSH1..PUSH32`.
pub fn push_width(op: u8) -> usize {
    if (PUSH1..=PUSH32).contains(&op) {
        (op - PUSH1 + 1) as usize
    } else {
        0
    }
}

pub fn is_push(op: u8) -> bool {
    (PUSH1..=PUSH32).contains(&op)
}

pub fn is_log(op: u8) -> bool {
    (LOG1..=LOG4).contains(&op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_width_covers_push1_to_push32() {
        assert_eq!(push_width(PUSH1), 1);
        assert_eq!(push_width(PUSH32), 32);
        assert_eq!(push_width(0x63), 4); // PUSH4
    }

    #[test]
    fn push_width_zero_outside_range() {
        assert_eq!(push_width(STOP), 0);
        assert_eq!(push_width(JUMPDEST), 0);
        assert_eq!(push_width(DUP1), 0);
    }

    #[test]
    fn is_log_covers_log1_to_log4_only() {
        assert!(is_log(LOG1));
        assert!(is_log(LOG4));
        assert!(!is_log(0xa0)); // LOG0
        assert!(!is_log(0xa5));
    }
}
