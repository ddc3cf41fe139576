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
use std::fmt;
use std::fmt::Write;

// ============================================================================
// Errors
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input had an odd number of hex digits, or contained a
    /// character outside `[0-9a-fA-F]`.
    MalformedHex,
    /// A `zero_pad` target length was smaller than the input.
    Overflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedHex => write!(f, "malformed hex string"),
            Error::Overflow => write!(f, "value exceeds target length"),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Bytes <-> Hex
// ============================================================================

/// Anything which can be interpreted as either raw bytes or a hex
/// string.  Allows callers of [`arrayify`] to pass either without an
/// explicit conversion at the call site.
pub trait IntoBytecode {
    fn into_bytecode(self) -> Result<Vec<u8>, Error>;
}

impl IntoBytecode for &[u8] {
    fn into_bytecode(self) -> Result<Vec<u8>, Error> {
        Ok(self.to_vec())
    }
}

impl IntoBytecode for Vec<u8> {
    fn into_bytecode(self) -> Result<Vec<u8>, Error> {
        Ok(self)
    }
}

impl IntoBytecode for &str {
    fn into_bytecode(self) -> Result<Vec<u8>, Error> {
        arrayify_str(self)
    }
}

impl IntoBytecode for String {
    fn into_bytecode(self) -> Result<Vec<u8>, Error> {
        arrayify_str(&self)
    }
}

impl IntoBytecode for &String {
    fn into_bytecode(self) -> Result<Vec<u8>, Error> {
        arrayify_str(self)
    }
}

/// Decode a raw byte sequence or hex string (optionally `0x`-prefixed,
/// case-insensitive) into its raw bytes.
pub fn arrayify<T: IntoBytecode>(input: T) -> Result<Vec<u8>, Error> {
    input.into_bytecode()
}

fn arrayify_str(s: &str) -> Result<Vec<u8>, Error> {
    let slice = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if slice.len() % 2 != 0 {
        return Err(Error::MalformedHex);
    }
    let mut bytes = Vec::with_capacity(slice.len() / 2);
    let digits = slice.as_bytes();
    for i in (0..digits.len()).step_by(2) {
        let hi = hex_digit(digits[i])?;
        let lo = hex_digit(digits[i + 1])?;
        bytes.push((hi << 4) | lo);
    }
    Ok(bytes)
}

fn hex_digit(c: u8) -> Result<u8, Error> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::MalformedHex),
    }
}

/// Encode a byte sequence as a `0x`-prefixed lowercase hex string.
pub fn hexlify(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + 2 * bytes.len());
    s.push_str("0x");
    for b in bytes {
        write!(s, "{:02x}", b).unwrap();
    }
    s
}

/// Left-pad `bytes` with zeroes until it is exactly `length` bytes
/// long.  Fails if `bytes` is already longer than `length`.
pub fn zero_pad(bytes: &[u8], length: usize) -> Result<Vec<u8>, Error> {
    if bytes.len() > length {
        return Err(Error::Overflow);
    }
    let mut padded = vec![0u8; length - bytes.len()];
    padded.extend_from_slice(bytes);
    Ok(padded)
}

/// Interpret a byte sequence as a big-endian unsigned integer.  Empty
/// input decodes to zero.  Saturates (rather than panics) should the
/// value exceed `u128`, which in practice cannot occur for the
/// bytecode offsets this is used to decode.
pub fn bytes_to_int(bytes: &[u8]) -> u128 {
    let mut val: u128 = 0;
    for &b in bytes {
        val = (val << 8) | (b as u128);
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrayify_accepts_prefixed_and_bare() {
        assert_eq!(arrayify("0x1234").unwrap(), vec![0x12, 0x34]);
        assert_eq!(arrayify("1234").unwrap(), vec![0x12, 0x34]);
    }

    #[test]
    fn arrayify_is_case_insensitive() {
        assert_eq!(arrayify("0xAaFf").unwrap(), arrayify("0xaaff").unwrap());
    }

    #[test]
    fn arrayify_rejects_odd_length() {
        assert_eq!(arrayify("0x123").unwrap_err(), Error::MalformedHex);
    }

    #[test]
    fn arrayify_rejects_non_hex() {
        assert_eq!(arrayify("0x12zz").unwrap_err(), Error::MalformedHex);
    }

    #[test]
    fn arrayify_accepts_owned_and_borrowed_string() {
        let owned = String::from("0x1234");
        assert_eq!(arrayify(&owned).unwrap(), arrayify(owned).unwrap());
    }

    #[test]
    fn arrayify_empty_string_is_empty() {
        assert_eq!(arrayify("").unwrap(), Vec::<u8>::new());
        assert_eq!(arrayify("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hexlify_roundtrips_arrayify() {
        let s = "0xdeadbeef";
        assert_eq!(hexlify(&arrayify(s).unwrap()), s);
    }

    #[test]
    fn zero_pad_extends_on_the_left() {
        assert_eq!(zero_pad(&[0x12], 4).unwrap(), vec![0, 0, 0, 0x12]);
    }

    #[test]
    fn zero_pad_exact_length_is_noop() {
        assert_eq!(zero_pad(&[1, 2, 3, 4], 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn zero_pad_overflow_errors() {
        assert_eq!(zero_pad(&[1, 2, 3, 4, 5], 4).unwrap_err(), Error::Overflow);
    }

    #[test]
    fn bytes_to_int_empty_is_zero() {
        assert_eq!(bytes_to_int(&[]), 0);
    }

    #[test]
    fn bytes_to_int_big_endian() {
        assert_eq!(bytes_to_int(&[0x01, 0x00]), 256);
        assert_eq!(bytes_to_int(&[0x00, 0x10]), 16);
    }
}
