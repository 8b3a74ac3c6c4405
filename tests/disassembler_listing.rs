use slotvm::vm::opcode::*;
use slotvm::vm::{disassemble, format_listing};

#[test]
fn listing_includes_pc_mnemonic_and_operand() {
    let program = [PUSH8, 0x2a, PRINT, HALT];
    let (listing, err) = disassemble(&program);
    assert!(err.is_none());
    let text = format_listing(&listing);
    assert!(text.contains("push8 0x2a"));
    assert!(text.contains("print"));
    assert!(text.contains("halt"));
}

#[test]
fn disassembly_does_not_execute_anything() {
    // A divide-by-zero that would fault at runtime disassembles cleanly,
    // since disassembly never simulates the stack.
    let program = [PUSH8, 0x05, PUSH8, 0x00, DIV, HALT];
    let (listing, err) = disassemble(&program);
    assert!(err.is_none());
    assert_eq!(listing.len(), 5);
}
