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
use crate::bytecode::opcode;
use std::collections::VecDeque;
use std::fmt;

// ============================================================================
// Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A lookbehind (`at`/`value_at` with a negative index) reached
    /// further back than the cursor's buffered window.  Indicates a
    /// programmer error in the caller's pattern, not malformed input.
    BufferUnderrun,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BufferUnderrun => write!(f, "lookbehind exceeds buffered window"),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Cursor
// ============================================================================

/// A forward-only iterator over an EVM bytecode sequence which
/// advances by instruction width (accounting for `PUSH1..PUSH32`
/// immediates) and remembers the byte offsets of the last `K`
/// instructions it yielded, where `K` is fixed at construction.
///
/// The cursor borrows its input; it never copies the bytecode.
pub struct Cursor<'a> {
    bytecode: &'a [u8],
    next_pos: usize,
    next_step: usize,
    pos_buffer: VecDeque<usize>,
    buffer_size: usize,
}

impl<'a> Cursor<'a> {
    /// Construct a new cursor over `bytecode`, remembering the last
    /// `buffer_size` instruction offsets it has yielded.  `buffer_size`
    /// must be at least 1.
    pub fn new(bytecode: &'a [u8], buffer_size: usize) -> Self {
        assert!(buffer_size >= 1, "buffer_size must be at least 1");
        Cursor {
            bytecode,
            next_pos: 0,
            next_step: 0,
            pos_buffer: VecDeque::with_capacity(buffer_size),
            buffer_size,
        }
    }

    /// True iff there is at least one more instruction to yield.
    pub fn has_more(&self) -> bool {
        self.next_pos < self.bytecode.len()
    }

    /// Yield the next opcode in the stream, advancing past its
    /// immediate operand (if any).  Returns `STOP` without advancing
    /// state once the bytecode is exhausted, mirroring EVM semantics
    /// for execution running off the end of code.
    pub fn next(&mut self) -> u8 {
        if !self.has_more() {
            return opcode::STOP;
        }
        let pos = self.next_pos;
        if self.pos_buffer.len() >= self.buffer_size {
            self.pos_buffer.pop_front();
        }
        self.pos_buffer.push_back(pos);

        let op = self.bytecode[pos];
        let width = opcode::push_width(op);
        self.next_pos = pos + 1 + width;
        self.next_step += 1;
        op
    }

    /// Number of instructions already yielded, minus one; `-1` before
    /// the first call to [`Cursor::next`].
    pub fn step(&self) -> isize {
        self.next_step as isize - 1
    }

    /// Byte offset of the last-yielded instruction; `-1` before the
    /// first call to [`Cursor::next`].
    pub fn pos(&self) -> isize {
        match self.pos_buffer.back() {
            Some(&p) => p as isize,
            None => -1,
        }
    }

    /// Look up the opcode at an absolute byte offset (`p >= 0`), or at
    /// a relative step offset into the buffered window (`p < 0`,
    /// where `-1` is the current instruction, `-2` the previous, and
    /// so on). Absolute offsets past the end of the bytecode return
    /// `STOP`. A relative offset deeper than the buffered window
    /// fails with [`Error::BufferUnderrun`].
    pub fn at(&self, p: isize) -> Result<u8, Error> {
        let pos = self.resolve(p)?;
        Ok(self.byte_at(pos))
    }

    /// Immediate operand bytes of the most recently yielded
    /// instruction. Equivalent to `value_at(-1)`.
    pub fn value(&self) -> Result<&'a [u8], Error> {
        self.value_at(-1)
    }

    /// Immediate operand bytes of the instruction at the given
    /// absolute or relative position (see [`Cursor::at`]). Empty for
    /// any non-`PUSH` instruction.
    pub fn value_at(&self, p: isize) -> Result<&'a [u8], Error> {
        let pos = self.resolve(p)?;
        let op = self.byte_at(pos);
        let width = opcode::push_width(op);
        if width == 0 {
            return Ok(&[]);
        }
        let start = pos + 1;
        let end = (start + width).min(self.bytecode.len());
        if start >= self.bytecode.len() {
            Ok(&[])
        } else {
            Ok(&self.bytecode[start..end])
        }
    }

    fn byte_at(&self, pos: usize) -> u8 {
        if pos < self.bytecode.len() {
            self.bytecode[pos]
        } else {
            opcode::STOP
        }
    }

    /// Resolve an absolute-or-relative position into an absolute byte
    /// offset, consulting the buffered window for relative (negative)
    /// positions.
    fn resolve(&self, p: isize) -> Result<usize, Error> {
        if p >= 0 {
            return Ok(p as usize);
        }
        let index = self.pos_buffer.len() as isize + p;
        if index < 0 {
            return Err(Error::BufferUnderrun);
        }
        Ok(self.pos_buffer[index as usize])
    }
}
