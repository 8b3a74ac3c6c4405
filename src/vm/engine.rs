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
use std::io::{Read, Write};

use log::{trace, warn};

use crate::vm::error::{Fault, VmError};
use crate::vm::instruction::Instruction;
use crate::vm::io;
use crate::vm::state::{Locals, Stack};

/// The outcome of a single [`Vm::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Execution should continue; the program counter is positioned
    /// at the next instruction.
    Running,
    /// `halt` was executed, or the program counter fell off (or
    /// landed exactly on) the end of the program.
    Halted,
}

/// A stack-based bytecode virtual machine, parameterised over its
/// input and output byte streams.
///
/// Constructed via [`Vm::new`] from an immutable program, then driven
/// to completion with [`Vm::run`], or one instruction at a time with
/// [`Vm::step`]. The stack and variable array are inspectable via
/// [`Vm::stack`] and [`Vm::locals`] for testing.
pub struct Vm<'a, R, W> {
    program: &'a [u8],
    pc: usize,
    stack: Stack,
    vars: Locals,
    input: R,
    output: W,
    halted: bool,
}

impl<'a, R: Read, W: Write> Vm<'a, R, W> {
    pub fn new(program: &'a [u8], input: R, output: W) -> Self {
        Vm {
            program,
            pc: 0,
            stack: Stack::new(),
            vars: Locals::new(),
            input,
            output,
            halted: false,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn locals(&self) -> &Locals {
        &self.vars
    }

    /// Run to completion: execute instructions until `halt`, until the
    /// program counter exits the program, or until a runtime error
    /// occurs.
    pub fn run(&mut self) -> Result<(), Fault> {
        loop {
            match self.step()? {
                Step::Running => continue,
                Step::Halted => return Ok(()),
            }
        }
    }

    /// Execute exactly one instruction (or, if the program counter is
    /// already at or past the end of the program, report a clean
    /// halt without touching any state).
    pub fn step(&mut self) -> Result<Step, Fault> {
        if self.halted || self.pc >= self.program.len() {
            self.halted = true;
            return Ok(Step::Halted);
        }
        let pc = self.pc;
        let (insn, next) = Instruction::decode(self.program, pc).map_err(|e| Fault { pc, error: VmError::from(e) })?;
        trace!("pc={:#x} insn={}", pc, insn);
        match self.execute(insn, next) {
            Ok(step) => Ok(step),
            Err(error) => Err(Fault { pc, error }),
        }
    }

    fn execute(&mut self, insn: Instruction, next: usize) -> Result<Step, VmError> {
        use Instruction::*;
        match insn {
            Reserved(op) => {
                warn!("reserved opcode {:#04x} at pc={:#x} executed as no-op", op, self.pc);
                self.pc = next;
            }
            VarSt => {
                let n = self.stack.pop()?;
                let x = self.stack.pop()?;
                self.vars.store(n, x)?;
                self.pc = next;
            }
            VarLd => {
                let n = self.stack.pop()?;
                let x = self.vars.load(n)?;
                self.stack.push(x);
                self.pc = next;
            }
            VarRes => {
                let n = self.stack.pop()?;
                self.vars.reserve(n)?;
                self.pc = next;
            }
            VarDisc => {
                let n = self.stack.pop()?;
                self.vars.discard(n);
                self.pc = next;
            }
            NumVars => {
                self.stack.push(self.vars.len() as u64);
                self.pc = next;
            }
            Push8(v) => {
                self.stack.push(v as u64);
                self.pc = next;
            }
            Push8S(v) => {
                self.stack.push(v as i8 as i64 as u64);
                self.pc = next;
            }
            Push16(v) => {
                self.stack.push(v as u64);
                self.pc = next;
            }
            Push16S(v) => {
                self.stack.push(v as i16 as i64 as u64);
                self.pc = next;
            }
            Push32(v) => {
                self.stack.push(v as u64);
                self.pc = next;
            }
            Push32S(v) => {
                self.stack.push(v as i32 as i64 as u64);
                self.pc = next;
            }
            Push64(v) => {
                self.stack.push(v);
                self.pc = next;
            }
            Dup0 => {
                self.stack.push(self.stack.peek(0)?);
                self.pc = next;
            }
            Dup1 => {
                self.stack.push(self.stack.peek(1)?);
                self.pc = next;
            }
            Dup2 => {
                self.stack.push(self.stack.peek(2)?);
                self.pc = next;
            }
            Dup3 => {
                self.stack.push(self.stack.peek(3)?);
                self.pc = next;
            }
            Pop => {
                self.stack.pop()?;
                self.pc = next;
            }
            Swap => {
                self.stack.swap_top()?;
                self.pc = next;
            }
            Add => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a.wrapping_add(b));
                self.pc = next;
            }
            Sub => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a.wrapping_sub(b));
                self.pc = next;
            }
            Mul => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a.wrapping_mul(b));
                self.pc = next;
            }
            Mod => {
                let (a, b) = self.pop_pair()?;
                if b == 0 {
                    return Err(VmError::DivisionByZero);
                }
                self.stack.push(a % b);
                self.pc = next;
            }
            Div => {
                let (a, b) = self.pop_pair()?;
                if b == 0 {
                    return Err(VmError::DivisionByZero);
                }
                self.stack.push(a / b);
                self.pc = next;
            }
            DivS => {
                let (a, b) = self.pop_pair()?;
                let (a, b) = (a as i64, b as i64);
                if b == 0 {
                    return Err(VmError::DivisionByZero);
                }
                self.stack.push(a.wrapping_div(b) as u64);
                self.pc = next;
            }
            Gt => {
                let (a, b) = self.pop_pair()?;
                self.stack.push((a > b) as u64);
                self.pc = next;
            }
            GtS => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(((a as i64) > (b as i64)) as u64);
                self.pc = next;
            }
            Lt => {
                let (a, b) = self.pop_pair()?;
                self.stack.push((a < b) as u64);
                self.pc = next;
            }
            LtS => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(((a as i64) < (b as i64)) as u64);
                self.pc = next;
            }
            Ge => {
                let (a, b) = self.pop_pair()?;
                self.stack.push((a >= b) as u64);
                self.pc = next;
            }
            GeS => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(((a as i64) >= (b as i64)) as u64);
                self.pc = next;
            }
            Le => {
                let (a, b) = self.pop_pair()?;
                self.stack.push((a <= b) as u64);
                self.pc = next;
            }
            LeS => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(((a as i64) <= (b as i64)) as u64);
                self.pc = next;
            }
            Eq => {
                let (a, b) = self.pop_pair()?;
                self.stack.push((a == b) as u64);
                self.pc = next;
            }
            And => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a & b);
                self.pc = next;
            }
            Or => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a | b);
                self.pc = next;
            }
            Xor => {
                let (a, b) = self.pop_pair()?;
                self.stack.push(a ^ b);
                self.pc = next;
            }
            Not => {
                let a = self.stack.pop()?;
                self.stack.push((a == 0) as u64);
                self.pc = next;
            }
            Inv => {
                let a = self.stack.pop()?;
                self.stack.push(!a);
                self.pc = next;
            }
            Jump => {
                let offset = self.stack.pop()? as i64;
                self.pc = self.jump_target(self.pc, offset)?;
            }
            JCond => {
                let offset = self.stack.pop()? as i64;
                let cond = self.stack.pop()?;
                self.pc = if cond != 0 { self.jump_target(self.pc, offset)? } else { next };
            }
            Read => {
                let v = io::read_unsigned(&mut self.input)?;
                self.stack.push(v);
                self.pc = next;
            }
            Reads => {
                let v = io::read_signed(&mut self.input)?;
                self.stack.push(v as u64);
                self.pc = next;
            }
            Print => {
                let v = self.stack.pop()?;
                io::print_unsigned(&mut self.output, v)?;
                self.pc = next;
            }
            Prints => {
                let v = self.stack.pop()? as i64;
                io::print_signed(&mut self.output, v)?;
                self.pc = next;
            }
            Halt => {
                self.halted = true;
                return Ok(Step::Halted);
            }
        }
        if self.pc >= self.program.len() {
            self.halted = true;
            Ok(Step::Halted)
        } else {
            Ok(Step::Running)
        }
    }

    /// Pop B (top) then A, as required by every two-operand
    /// instruction's stack layout `[..., A, B]`.
    fn pop_pair(&mut self) -> Result<(u64, u64), VmError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        Ok((a, b))
    }

    /// Resolve a `jump`/`jcond` target from the address of the opcode
    /// byte (`at`) and a signed offset, validating it lands within
    /// `[0, program_len]`.
    fn jump_target(&self, at: usize, offset: i64) -> Result<usize, VmError> {
        let base = at as i128 + 1 + offset as i128;
        if base < 0 || base > self.program.len() as i128 {
            return Err(VmError::JumpOutOfBounds { target: base });
        }
        Ok(base as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::opcode::*;
    use std::io::Cursor;

    fn run_program(program: &[u8]) -> (Result<(), Fault>, Vec<u8>) {
        let mut output = Vec::new();
        let mut vm = Vm::new(program, Cursor::new(Vec::new()), &mut output);
        let result = vm.run();
        (result, output)
    }

    #[test]
    fn add_two_literals_and_print() {
        let program = [PUSH8, 0x02, PUSH8, 0x03, ADD, PRINT, HALT];
        let (result, output) = run_program(&program);
        result.unwrap();
        assert_eq!(output, b"5\n");
    }

    #[test]
    fn signed_print_of_negative_one() {
        let program = [PUSH8S, 0xff, PRINTS, HALT];
        let (result, output) = run_program(&program);
        result.unwrap();
        assert_eq!(output, b"-1\n");
    }

    #[test]
    fn division_by_zero_is_fatal_at_the_dividing_instruction() {
        let program = [PUSH8, 0x05, PUSH8, 0x00, DIV, HALT];
        let (result, output) = run_program(&program);
        let fault = result.unwrap_err();
        assert_eq!(fault.pc, 4);
        assert_eq!(fault.error, VmError::DivisionByZero);
        assert!(output.is_empty());
    }

    #[test]
    fn jump_past_end_of_program_halts_cleanly() {
        // offset 0: (pc_of_jump + 1) + 0 == program_len (3), a clean halt.
        let program = [PUSH8, 0x00, JUMP];
        let (result, _) = run_program(&program);
        result.unwrap();
    }

    #[test]
    fn jump_beyond_end_of_program_errors() {
        // offset 1: (pc_of_jump + 1) + 1 == program_len + 1, out of bounds.
        let program = [PUSH8, 0x01, JUMP];
        let (result, _) = run_program(&program);
        let fault = result.unwrap_err();
        assert!(matches!(fault.error, VmError::JumpOutOfBounds { .. }));
    }

    #[test]
    fn reserved_opcode_is_a_no_op() {
        let program = [0x07, PUSH8, 0x2a, PRINT, HALT];
        let (result, output) = run_program(&program);
        result.unwrap();
        assert_eq!(output, b"42\n");
    }

    #[test]
    fn divs_of_int_min_by_minus_one_wraps() {
        let mut program = vec![PUSH64];
        program.extend_from_slice(&i64::MIN.to_be_bytes());
        program.push(PUSH8S);
        program.push(0xff); // -1
        program.push(DIVS);
        program.push(PRINTS);
        program.push(HALT);
        let (result, output) = run_program(&program);
        result.unwrap();
        assert_eq!(output, format!("{}\n", i64::MIN).into_bytes());
    }

    #[test]
    fn loop_printing_0_through_2() {
        // vars[0] is the loop counter.
        let mut program = Vec::new();
        program.push(PUSH8);
        program.push(0x01);
        program.push(VARRES); // varres 1
        program.push(PUSH8);
        program.push(0x00);
        program.push(PUSH8);
        program.push(0x00);
        program.push(VARST); // vars[0] = 0

        let loop_start = program.len();
        program.push(PUSH8);
        program.push(0x00);
        program.push(VARLD); // push vars[0]
        program.push(PRINT);

        program.push(PUSH8);
        program.push(0x00);
        program.push(VARLD); // push vars[0]
        program.push(PUSH8);
        program.push(0x01);
        program.push(ADD); // vars[0] + 1
        program.push(PUSH8);
        program.push(0x00);
        program.push(VARST); // vars[0] = vars[0] + 1

        program.push(PUSH8);
        program.push(0x00);
        program.push(VARLD); // push vars[0]
        program.push(PUSH8);
        program.push(0x03);
        program.push(LT); // vars[0] < 3

        // jcond pops the offset (top) then the condition; push the
        // offset (as a push64 literal, 9 bytes) right before jcond.
        let jcond_pc = program.len() + 9; // address of the jcond opcode byte itself
        let back_offset = (loop_start as i64) - (jcond_pc as i64 + 1);
        push_i64(&mut program, back_offset);
        program.push(JCOND);

        program.push(HALT);

        let (result, output) = run_program(&program);
        result.unwrap();
        assert_eq!(output, b"0\n1\n2\n");
    }

    fn push_i64(program: &mut Vec<u8>, v: i64) {
        program.push(PUSH64);
        program.extend_from_slice(&(v as u64).to_be_bytes());
    }
}
