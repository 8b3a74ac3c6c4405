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
use std::io::{self, Read, Write};

use crate::vm::error::VmError;

/// Returns true for the whitespace bytes recognised by the `read`/
/// `reads` tokeniser: space, tab, CR, LF, vertical tab, form feed.
fn is_ascii_whitespace_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

/// Reads one byte from `input`, returning `Ok(None)` cleanly at
/// end-of-stream and `Err` on any other I/O failure.
fn read_byte<R: Read>(input: &mut R) -> Result<Option<u8>, VmError> {
    let mut buf = [0u8; 1];
    match input.read(&mut buf) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(buf[0])),
        Err(e) => Err(VmError::InputFailure(e.to_string())),
    }
}

/// Reads the next whitespace-delimited decimal token from `input`,
/// one byte at a time, per §4.3's `read`/`reads` protocol. Leading
/// whitespace is discarded; the token runs until the next whitespace
/// byte or end-of-stream. Only the token bytes are consumed: the
/// whitespace (or lack of it) that ends the token is left unread, so a
/// subsequent call starts from exactly where this one stopped.
fn read_token<R: Read>(input: &mut R) -> Result<String, VmError> {
    loop {
        match read_byte(input)? {
            None => return Err(VmError::InputFailure("unexpected end of input".to_string())),
            Some(b) if is_ascii_whitespace_byte(b) => continue,
            Some(b) => {
                let mut token = String::new();
                token.push(b as char);
                loop {
                    match read_byte(input)? {
                        None => break,
                        Some(b) if is_ascii_whitespace_byte(b) => break,
                        Some(b) => token.push(b as char),
                    }
                }
                return Ok(token);
            }
        }
    }
}

/// Implements the `read (0xfa)` instruction: an unsigned decimal
/// token with no leading sign.
pub fn read_unsigned<R: Read>(input: &mut R) -> Result<u64, VmError> {
    let token = read_token(input)?;
    if token.is_empty() || token.starts_with('-') || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VmError::InputFailure(format!("'{}' is not a valid unsigned integer", token)));
    }
    token
        .parse::<u64>()
        .map_err(|_| VmError::InputFailure(format!("'{}' is out of range for an unsigned 64-bit value", token)))
}

/// Implements the `reads (0xfb)` instruction: a signed decimal token
/// with an optional leading `-`.
pub fn read_signed<R: Read>(input: &mut R) -> Result<i64, VmError> {
    let token = read_token(input)?;
    let digits = token.strip_prefix('-').unwrap_or(&token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VmError::InputFailure(format!("'{}' is not a valid signed integer", token)));
    }
    token
        .parse::<i64>()
        .map_err(|_| VmError::InputFailure(format!("'{}' is out of range for a signed 64-bit value", token)))
}

/// Implements `print (0xfc)`: unsigned decimal followed by `0x0a`.
pub fn print_unsigned<W: Write>(output: &mut W, value: u64) -> Result<(), VmError> {
    writeln!(output, "{}", value).map_err(|e| VmError::OutputFailure(e.to_string()))
}

/// Implements `prints (0xfd)`: signed decimal followed by `0x0a`.
pub fn print_signed<W: Write>(output: &mut W, value: i64) -> Result<(), VmError> {
    writeln!(output, "{}", value).map_err(|e| VmError::OutputFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_single_unsigned_token() {
        let mut input = Cursor::new(b"  42\n".to_vec());
        assert_eq!(read_unsigned(&mut input).unwrap(), 42);
    }

    #[test]
    fn reads_two_tokens_in_sequence() {
        let mut input = Cursor::new(b"1 2\n".to_vec());
        assert_eq!(read_unsigned(&mut input).unwrap(), 1);
        assert_eq!(read_unsigned(&mut input).unwrap(), 2);
    }

    #[test]
    fn unsigned_rejects_leading_minus() {
        let mut input = Cursor::new(b"-1\n".to_vec());
        assert!(read_unsigned(&mut input).is_err());
    }

    #[test]
    fn signed_accepts_leading_minus() {
        let mut input = Cursor::new(b"-7\n".to_vec());
        assert_eq!(read_signed(&mut input).unwrap(), -7);
    }

    #[test]
    fn empty_stream_is_an_error() {
        let mut input = Cursor::new(Vec::new());
        assert!(read_unsigned(&mut input).is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        let mut input = Cursor::new(b"99999999999999999999\n".to_vec());
        assert!(read_unsigned(&mut input).is_err());
    }

    #[test]
    fn print_formats_decimal_with_trailing_newline() {
        let mut out = Vec::new();
        print_unsigned(&mut out, 5).unwrap();
        assert_eq!(out, b"5\n");
        let mut out = Vec::new();
        print_signed(&mut out, -1).unwrap();
        assert_eq!(out, b"-1\n");
    }
}
