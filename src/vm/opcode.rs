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

// 10s: Local Variables
pub const VARST: u8 = 0x18;
pub const VARLD: u8 = 0x1a;
pub const VARRES: u8 = 0x1c;
pub const VARDISC: u8 = 0x1d;
pub const NUMVARS: u8 = 0x1e;
// 20s & 30s: Push Operations
pub const PUSH8: u8 = 0x28;
pub const PUSH8S: u8 = 0x29;
pub const PUSH16: u8 = 0x2a;
pub const PUSH16S: u8 = 0x2b;
pub const PUSH32: u8 = 0x2c;
pub const PUSH32S: u8 = 0x2d;
pub const PUSH64: u8 = 0x2e;
// 30s: Stack Operations
pub const DUP0: u8 = 0x30;
pub const DUP1: u8 = 0x31;
pub const DUP2: u8 = 0x32;
pub const DUP3: u8 = 0x33;
pub const POP: u8 = 0x34;
pub const SWAP: u8 = 0x35;
// 30s: Arithmetic Operations
pub const ADD: u8 = 0x38;
pub const SUB: u8 = 0x39;
pub const MUL: u8 = 0x3a;
pub const MOD: u8 = 0x3b;
pub const DIV: u8 = 0x3c;
pub const DIVS: u8 = 0x3d;
// 50s: Comparison & Bitwise Logic Operations
pub const GT: u8 = 0x50;
pub const GTS: u8 = 0x51;
pub const LT: u8 = 0x52;
pub const LTS: u8 = 0x53;
pub const GE: u8 = 0x54;
pub const GES: u8 = 0x55;
pub const LE: u8 = 0x56;
pub const LES: u8 = 0x57;
pub const EQ: u8 = 0x58;
pub const AND: u8 = 0x59;
pub const OR: u8 = 0x5a;
pub const XOR: u8 = 0x5b;
pub const NOT: u8 = 0x5c;
pub const INV: u8 = 0x5d;
// 60s: Control Flow
pub const JUMP: u8 = 0x60;
pub const JCOND: u8 = 0x61;
// f0s: I/O
pub const READ: u8 = 0xfa;
pub const READS: u8 = 0xfb;
pub const PRINT: u8 = 0xfc;
pub const PRINTS: u8 = 0xfd;
// ff: Halt
pub const HALT: u8 = 0xff;

/// Returns the mnemonic for a given opcode, or `None` if the byte is
/// a reserved (unassigned) opcode.
pub fn mnemonic(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        VARST => "varst",
        VARLD => "varld",
        VARRES => "varres",
        VARDISC => "vardisc",
        NUMVARS => "numvars",
        PUSH8 => "push8",
        PUSH8S => "push8s",
        PUSH16 => "push16",
        PUSH16S => "push16s",
        PUSH32 => "push32",
        PUSH32S => "push32s",
        PUSH64 => "push64",
        DUP0 => "dup0",
        DUP1 => "dup1",
        DUP2 => "dup2",
        DUP3 => "dup3",
        POP => "pop",
        SWAP => "swap",
        ADD => "add",
        SUB => "sub",
        MUL => "mul",
        MOD => "mod",
        DIV => "div",
        DIVS => "divs",
        GT => "gt",
        GTS => "gts",
        LT => "lt",
        LTS => "lts",
        GE => "ge",
        GES => "ges",
        LE => "le",
        LES => "les",
        EQ => "eq",
        AND => "and",
        OR => "or",
        XOR => "xor",
        NOT => "not",
        INV => "inv",
        JUMP => "jump",
        JCOND => "jcond",
        READ => "read",
        READS => "reads",
        PRINT => "print",
        PRINTS => "prints",
        HALT => "halt",
        _ => return None,
    };
    Some(name)
}

/// Width (in bytes) of the inline literal carried by a `pushN[s]`
/// opcode. Every other opcode carries none.
pub fn literal_width(opcode: u8) -> usize {
    match opcode {
        PUSH8 | PUSH8S => 1,
        PUSH16 | PUSH16S => 2,
        PUSH32 | PUSH32S => 4,
        PUSH64 => 8,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_opcode_has_no_mnemonic() {
        assert_eq!(mnemonic(0x07), None);
        assert_eq!(mnemonic(0x00), None);
    }

    #[test]
    fn assigned_opcode_has_mnemonic() {
        assert_eq!(mnemonic(HALT), Some("halt"));
        assert_eq!(mnemonic(PUSH32S), Some("push32s"));
    }

    #[test]
    fn literal_widths_match_table() {
        assert_eq!(literal_width(PUSH8), 1);
        assert_eq!(literal_width(PUSH8S), 1);
        assert_eq!(literal_width(PUSH16S), 2);
        assert_eq!(literal_width(PUSH32), 4);
        assert_eq!(literal_width(PUSH64), 8);
        assert_eq!(literal_width(ADD), 0);
    }
}
