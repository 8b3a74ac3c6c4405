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

/// Decode-only walk over a program, for tooling such as the CLI's
/// `disasm` subcommand.
pub mod disassembler;
/// The fatal error kinds a running VM can raise, paired with the
/// faulting program counter.
pub mod error;
/// The fetch/decode/dispatch loop and per-opcode semantics.
pub mod engine;
/// The bytecode codec: decoding and encoding single instructions.
pub mod instruction;
/// The `read`/`reads`/`print`/`prints` I/O protocol.
pub mod io;
/// Opcode constants and their mnemonics.
pub mod opcode;
/// The operand stack and local variable array.
pub mod state;

pub use disassembler::{disassemble, format_listing};
pub use error::{Fault, VmError};
pub use engine::{Step, Vm};
pub use instruction::{DecodeError, Instruction};
pub use state::{Locals, Stack};
