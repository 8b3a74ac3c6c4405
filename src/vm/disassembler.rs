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
use crate::vm::instruction::{DecodeError, Instruction};

/// A pure, non-executing walk over a program: decodes one instruction
/// at a time without simulating the stack or variables. Stops (and
/// reports) at the first truncated literal; otherwise returns one
/// `(pc, instruction)` pair per decoded instruction, including
/// reserved opcodes.
pub fn disassemble(bytes: &[u8]) -> (Vec<(usize, Instruction)>, Option<DecodeError>) {
    let mut listing = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        match Instruction::decode(bytes, offset) {
            Ok((insn, next)) => {
                listing.push((offset, insn));
                offset = next;
            }
            Err(e) => return (listing, Some(e)),
        }
    }
    (listing, None)
}

/// Render a disassembly listing the way the CLI's `disasm` subcommand
/// prints it: one `pc: mnemonic operand` line per instruction.
pub fn format_listing(listing: &[(usize, Instruction)]) -> String {
    let mut out = String::new();
    for (pc, insn) in listing {
        out.push_str(&format!("{:#06x}: {}\n", pc, insn));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::opcode::*;

    #[test]
    fn disassembles_a_well_formed_program() {
        let program = [PUSH8, 0x2a, PRINT, HALT];
        let (listing, err) = disassemble(&program);
        assert!(err.is_none());
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0], (0, Instruction::Push8(0x2a)));
        assert_eq!(listing[1], (2, Instruction::Print));
        assert_eq!(listing[2], (3, Instruction::Halt));
    }

    #[test]
    fn stops_at_truncated_literal() {
        let program = [PUSH32, 0x01];
        let (listing, err) = disassemble(&program);
        assert!(listing.is_empty());
        assert!(matches!(err, Some(DecodeError::TruncatedLiteral { .. })));
    }

    #[test]
    fn reserved_opcodes_appear_in_the_listing() {
        let program = [0x07, HALT];
        let (listing, err) = disassemble(&program);
        assert!(err.is_none());
        assert_eq!(listing[0], (0, Instruction::Reserved(0x07)));
    }
}
