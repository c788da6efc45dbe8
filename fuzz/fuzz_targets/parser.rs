#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    // Any accepted line must read back into a value without panicking
    if let Ok(node) = lispy::parse(input) {
        let _ = lispy::read(&node).to_string();
    }
});
