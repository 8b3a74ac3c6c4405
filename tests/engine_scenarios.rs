use std::io::Cursor;

use slotvm::vm::opcode::*;
use slotvm::vm::{Vm, VmError};

fn run(program: &[u8], input: &[u8]) -> (Result<(), slotvm::vm::Fault>, Vec<u8>) {
    let mut output = Vec::new();
    let mut vm = Vm::new(program, Cursor::new(input.to_vec()), &mut output);
    let result = vm.run();
    (result, output)
}

#[test]
fn add_two_literals_and_print() {
    let program = [PUSH8, 0x02, PUSH8, 0x03, ADD, PRINT, HALT];
    let (result, output) = run(&program, b"");
    result.unwrap();
    assert_eq!(output, b"5\n");
}

#[test]
fn signed_print_of_negative_one() {
    let program = [PUSH8S, 0xff, PRINTS, HALT];
    let (result, output) = run(&program, b"");
    result.unwrap();
    assert_eq!(output, b"-1\n");
}

#[test]
fn division_by_zero_reports_the_faulting_pc() {
    let program = [PUSH8, 0x05, PUSH8, 0x00, DIV, HALT];
    let (result, output) = run(&program, b"");
    let fault = result.unwrap_err();
    assert_eq!(fault.pc, 4);
    assert_eq!(fault.error, VmError::DivisionByZero);
    assert!(output.is_empty());
}

#[test]
fn reserved_opcode_between_valid_instructions_is_invisible() {
    let program = [0x07, PUSH8, 0x2a, PRINT, HALT];
    let (result, output) = run(&program, b"");
    result.unwrap();
    assert_eq!(output, b"42\n");
}

#[test]
fn read_then_echo_via_reads_and_prints() {
    let program = [READS, PRINTS, HALT];
    let (result, output) = run(&program, b"-17\n");
    result.unwrap();
    assert_eq!(output, b"-17\n");
}

#[test]
fn read_rejects_negative_tokens() {
    let program = [READ, HALT];
    let (result, _) = run(&program, b"-3\n");
    assert!(result.is_err());
}

#[test]
fn unsigned_mod_errors_on_zero_divisor() {
    let program = [PUSH8, 0x09, PUSH8, 0x00, MOD, HALT];
    let (result, _) = run(&program, b"");
    assert_eq!(result.unwrap_err().error, VmError::DivisionByZero);
}

#[test]
fn two_nots_canonicalize_any_nonzero_value_to_one() {
    let program = [PUSH8, 0x2a, NOT, NOT, PRINT, HALT];
    let (result, output) = run(&program, b"");
    result.unwrap();
    assert_eq!(output, b"1\n");
}

#[test]
fn pushes_then_equal_count_of_pops_restores_the_stack() {
    use slotvm::vm::Stack;

    let mut stack = Stack::new();
    for v in 0..5u64 {
        stack.push(v);
    }
    for _ in 0..5 {
        stack.pop().unwrap();
    }
    assert_eq!(stack.depth(), 0);
}

#[test]
fn variable_out_of_range_errors_cleanly() {
    let program = [PUSH8, 0x00, VARLD, HALT];
    let (result, _) = run(&program, b"");
    assert!(matches!(result.unwrap_err().error, VmError::VariableOutOfRange { .. }));
}
