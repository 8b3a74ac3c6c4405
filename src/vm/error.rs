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

use crate::vm::instruction::DecodeError;

/// The set of ways execution of a program can fail. Every variant is
/// fatal: the VM does not attempt recovery, it reports the kind
/// together with the program counter of the faulting instruction (see
/// [`crate::vm::Fault`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VmError {
    /// An instruction demanded more operands than were on the stack.
    StackUnderflow { wanted: usize, available: usize },
    /// `varst`/`varld` addressed a variable slot that does not exist.
    VariableOutOfRange { index: u64, len: usize },
    /// `div`, `divs` or `mod` was executed with a zero divisor.
    DivisionByZero,
    /// A `jump`/`jcond` target fell outside `[0, program_len]`.
    JumpOutOfBounds { target: i128 },
    /// The bytecode itself could not be decoded at the current `pc`.
    Decode(DecodeError),
    /// `read`/`reads` failed: the underlying reader errored, the
    /// token was empty, the token was not a valid decimal integer, or
    /// the value was out of range for the requested width/signedness.
    InputFailure(String),
    /// `print`/`prints` failed to write to the output stream.
    OutputFailure(String),
    /// `varres` could not grow the variable array.
    AllocationFailure,
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VmError::StackUnderflow { wanted, available } => {
                write!(f, "stack underflow: wanted {} operand(s), found {}", wanted, available)
            }
            VmError::VariableOutOfRange { index, len } => {
                write!(f, "variable index {} out of range (have {} variable(s))", index, len)
            }
            VmError::DivisionByZero => write!(f, "division by zero"),
            VmError::JumpOutOfBounds { target } => write!(f, "jump target {} out of bounds", target),
            VmError::Decode(e) => write!(f, "{}", e),
            VmError::InputFailure(msg) => write!(f, "input read failure: {}", msg),
            VmError::OutputFailure(msg) => write!(f, "output write failure: {}", msg),
            VmError::AllocationFailure => write!(f, "failed to grow variable array"),
        }
    }
}

impl std::error::Error for VmError {}

impl From<DecodeError> for VmError {
    fn from(e: DecodeError) -> Self {
        VmError::Decode(e)
    }
}

/// A [`VmError`] paired with the program counter of the instruction
/// that raised it, as returned from [`crate::vm::Vm::run`] and
/// [`crate::vm::Vm::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    pub pc: usize,
    pub error: VmError,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (at pc={:#x})", self.error, self.pc)
    }
}

impl std::error::Error for Fault {}
