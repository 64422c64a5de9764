//! `version` command.

pub fn execute() {
    println!("cdl-cli {}", crate::VERSION);
    println!("cdl-core {}", cdl_core::VERSION);
}
