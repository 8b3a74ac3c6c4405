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

use crate::vm::opcode::*;

// ============================================================================
// Decoding Error
// ============================================================================

/// An error arising when decoding a single instruction from a byte
/// slice fails. This is distinct from a runtime [`crate::vm::VmError`]:
/// it arises purely from the shape of the bytes, independent of any
/// VM state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A `pushN[s]` opcode was encountered with fewer trailing bytes
    /// than its literal requires.
    TruncatedLiteral { opcode: u8, offset: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::TruncatedLiteral { opcode, offset } => {
                write!(f, "truncated literal for opcode {:#04x} at offset {}", opcode, offset)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

// ============================================================================
// Instructions
// ============================================================================

/// A single decoded instruction, together with any inline literal it
/// carries. Reserved opcodes decode to `Reserved` rather than failing,
/// so that tooling (e.g. a disassembler) can still walk past them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    VarSt,
    VarLd,
    VarRes,
    VarDisc,
    NumVars,
    Push8(u8),
    Push8S(u8),
    Push16(u16),
    Push16S(u16),
    Push32(u32),
    Push32S(u32),
    Push64(u64),
    Dup0,
    Dup1,
    Dup2,
    Dup3,
    Pop,
    Swap,
    Add,
    Sub,
    Mul,
    Mod,
    Div,
    DivS,
    Gt,
    GtS,
    Lt,
    LtS,
    Ge,
    GeS,
    Le,
    LeS,
    Eq,
    And,
    Or,
    Xor,
    Not,
    Inv,
    Jump,
    JCond,
    Read,
    Reads,
    Print,
    Prints,
    Halt,
    /// An opcode byte not assigned a semantic. Executes as a no-op.
    Reserved(u8),
}

impl Instruction {
    /// Decode a single instruction starting at `offset` in `bytes`.
    /// Returns the instruction together with the offset of the byte
    /// immediately following it (opcode plus any inline literal).
    ///
    /// Callers are expected to treat `offset == bytes.len()` as the
    /// normal end-of-program signal rather than calling this function;
    /// it is only defined for `offset < bytes.len()`.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Instruction, usize), DecodeError> {
        let opcode = bytes[offset];
        let width = literal_width(opcode);
        if bytes.len() < offset + 1 + width {
            return Err(DecodeError::TruncatedLiteral { opcode, offset });
        }
        let lit = &bytes[offset + 1..offset + 1 + width];
        let insn = match opcode {
            VARST => Instruction::VarSt,
            VARLD => Instruction::VarLd,
            VARRES => Instruction::VarRes,
            VARDISC => Instruction::VarDisc,
            NUMVARS => Instruction::NumVars,
            PUSH8 => Instruction::Push8(lit[0]),
            PUSH8S => Instruction::Push8S(lit[0]),
            PUSH16 => Instruction::Push16(u16::from_be_bytes(lit.try_into().unwrap())),
            PUSH16S => Instruction::Push16S(u16::from_be_bytes(lit.try_into().unwrap())),
            PUSH32 => Instruction::Push32(u32::from_be_bytes(lit.try_into().unwrap())),
            PUSH32S => Instruction::Push32S(u32::from_be_bytes(lit.try_into().unwrap())),
            PUSH64 => Instruction::Push64(u64::from_be_bytes(lit.try_into().unwrap())),
            DUP0 => Instruction::Dup0,
            DUP1 => Instruction::Dup1,
            DUP2 => Instruction::Dup2,
            DUP3 => Instruction::Dup3,
            POP => Instruction::Pop,
            SWAP => Instruction::Swap,
            ADD => Instruction::Add,
            SUB => Instruction::Sub,
            MUL => Instruction::Mul,
            MOD => Instruction::Mod,
            DIV => Instruction::Div,
            DIVS => Instruction::DivS,
            GT => Instruction::Gt,
            GTS => Instruction::GtS,
            LT => Instruction::Lt,
            LTS => Instruction::LtS,
            GE => Instruction::Ge,
            GES => Instruction::GeS,
            LE => Instruction::Le,
            LES => Instruction::LeS,
            EQ => Instruction::Eq,
            AND => Instruction::And,
            OR => Instruction::Or,
            XOR => Instruction::Xor,
            NOT => Instruction::Not,
            INV => Instruction::Inv,
            JUMP => Instruction::Jump,
            JCOND => Instruction::JCond,
            READ => Instruction::Read,
            READS => Instruction::Reads,
            PRINT => Instruction::Print,
            PRINTS => Instruction::Prints,
            HALT => Instruction::Halt,
            other => Instruction::Reserved(other),
        };
        Ok((insn, offset + 1 + width))
    }

    /// Encode this instruction as its opcode byte plus any inline
    /// literal, appending the result to `bytes`.
    pub fn encode(&self, bytes: &mut Vec<u8>) {
        match self {
            Instruction::VarSt => bytes.push(VARST),
            Instruction::VarLd => bytes.push(VARLD),
            Instruction::VarRes => bytes.push(VARRES),
            Instruction::VarDisc => bytes.push(VARDISC),
            Instruction::NumVars => bytes.push(NUMVARS),
            Instruction::Push8(v) => {
                bytes.push(PUSH8);
                bytes.push(*v);
            }
            Instruction::Push8S(v) => {
                bytes.push(PUSH8S);
                bytes.push(*v);
            }
            Instruction::Push16(v) => {
                bytes.push(PUSH16);
                bytes.extend_from_slice(&v.to_be_bytes());
            }
            Instruction::Push16S(v) => {
                bytes.push(PUSH16S);
                bytes.extend_from_slice(&v.to_be_bytes());
            }
            Instruction::Push32(v) => {
                bytes.push(PUSH32);
                bytes.extend_from_slice(&v.to_be_bytes());
            }
            Instruction::Push32S(v) => {
                bytes.push(PUSH32S);
                bytes.extend_from_slice(&v.to_be_bytes());
            }
            Instruction::Push64(v) => {
                bytes.push(PUSH64);
                bytes.extend_from_slice(&v.to_be_bytes());
            }
            Instruction::Dup0 => bytes.push(DUP0),
            Instruction::Dup1 => bytes.push(DUP1),
            Instruction::Dup2 => bytes.push(DUP2),
            Instruction::Dup3 => bytes.push(DUP3),
            Instruction::Pop => bytes.push(POP),
            Instruction::Swap => bytes.push(SWAP),
            Instruction::Add => bytes.push(ADD),
            Instruction::Sub => bytes.push(SUB),
            Instruction::Mul => bytes.push(MUL),
            Instruction::Mod => bytes.push(MOD),
            Instruction::Div => bytes.push(DIV),
            Instruction::DivS => bytes.push(DIVS),
            Instruction::Gt => bytes.push(GT),
            Instruction::GtS => bytes.push(GTS),
            Instruction::Lt => bytes.push(LT),
            Instruction::LtS => bytes.push(LTS),
            Instruction::Ge => bytes.push(GE),
            Instruction::GeS => bytes.push(GES),
            Instruction::Le => bytes.push(LE),
            Instruction::LeS => bytes.push(LES),
            Instruction::Eq => bytes.push(EQ),
            Instruction::And => bytes.push(AND),
            Instruction::Or => bytes.push(OR),
            Instruction::Xor => bytes.push(XOR),
            Instruction::Not => bytes.push(NOT),
            Instruction::Inv => bytes.push(INV),
            Instruction::Jump => bytes.push(JUMP),
            Instruction::JCond => bytes.push(JCOND),
            Instruction::Read => bytes.push(READ),
            Instruction::Reads => bytes.push(READS),
            Instruction::Print => bytes.push(PRINT),
            Instruction::Prints => bytes.push(PRINTS),
            Instruction::Halt => bytes.push(HALT),
            Instruction::Reserved(op) => bytes.push(*op),
        }
    }

    /// Number of bytes this instruction occupies (opcode plus any
    /// inline literal).
    pub fn len(&self) -> usize {
        match self {
            Instruction::Push8(_) | Instruction::Push8S(_) => 2,
            Instruction::Push16(_) | Instruction::Push16S(_) => 3,
            Instruction::Push32(_) | Instruction::Push32S(_) => 5,
            Instruction::Push64(_) => 9,
            _ => 1,
        }
    }

    /// The opcode byte for this instruction.
    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::VarSt => VARST,
            Instruction::VarLd => VARLD,
            Instruction::VarRes => VARRES,
            Instruction::VarDisc => VARDISC,
            Instruction::NumVars => NUMVARS,
            Instruction::Push8(_) => PUSH8,
            Instruction::Push8S(_) => PUSH8S,
            Instruction::Push16(_) => PUSH16,
            Instruction::Push16S(_) => PUSH16S,
            Instruction::Push32(_) => PUSH32,
            Instruction::Push32S(_) => PUSH32S,
            Instruction::Push64(_) => PUSH64,
            Instruction::Dup0 => DUP0,
            Instruction::Dup1 => DUP1,
            Instruction::Dup2 => DUP2,
            Instruction::Dup3 => DUP3,
            Instruction::Pop => POP,
            Instruction::Swap => SWAP,
            Instruction::Add => ADD,
            Instruction::Sub => SUB,
            Instruction::Mul => MUL,
            Instruction::Mod => MOD,
            Instruction::Div => DIV,
            Instruction::DivS => DIVS,
            Instruction::Gt => GT,
            Instruction::GtS => GTS,
            Instruction::Lt => LT,
            Instruction::LtS => LTS,
            Instruction::Ge => GE,
            Instruction::GeS => GES,
            Instruction::Le => LE,
            Instruction::LeS => LES,
            Instruction::Eq => EQ,
            Instruction::And => AND,
            Instruction::Or => OR,
            Instruction::Xor => XOR,
            Instruction::Not => NOT,
            Instruction::Inv => INV,
            Instruction::Jump => JUMP,
            Instruction::JCond => JCOND,
            Instruction::Read => READ,
            Instruction::Reads => READS,
            Instruction::Print => PRINT,
            Instruction::Prints => PRINTS,
            Instruction::Halt => HALT,
            Instruction::Reserved(op) => *op,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Push8(v) => write!(f, "push8 {:#04x}", v),
            Instruction::Push8S(v) => write!(f, "push8s {:#04x}", v),
            Instruction::Push16(v) => write!(f, "push16 {:#06x}", v),
            Instruction::Push16S(v) => write!(f, "push16s {:#06x}", v),
            Instruction::Push32(v) => write!(f, "push32 {:#010x}", v),
            Instruction::Push32S(v) => write!(f, "push32s {:#010x}", v),
            Instruction::Push64(v) => write!(f, "push64 {:#018x}", v),
            Instruction::Reserved(op) => write!(f, "reserved {:#04x}", op),
            _ => write!(f, "{}", mnemonic(self.opcode()).unwrap_or("reserved")),
        }
    }
}
