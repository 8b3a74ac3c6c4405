/// The stack-based bytecode virtual machine: its instruction codec,
/// execution engine, and runtime error taxonomy.
pub mod vm;
