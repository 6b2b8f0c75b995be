//! Fuzz target: console byte stream → `LineAssembler` → `parse_command`
//!
//! Feeds arbitrary bytes through the line assembler and parses every
//! completed line.  Neither stage may panic, and an accepted setter
//! must carry the integer that appears on the line.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use irrigation::adapters::serial::LineAssembler;
use irrigation::app::commands::{parse_command, AppCommand};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut assembler: LineAssembler = LineAssembler::new();

    for &byte in data {
        let Some(Ok(line)) = assembler.push(byte) else {
            continue;
        };
        match parse_command(&line) {
            Ok(
                AppCommand::SetHumidityThreshold(v)
                | AppCommand::SetWaterLevelThreshold(v)
                | AppCommand::SetTempMax(v),
            ) => {
                let arg = line.split_whitespace().nth(1);
                assert_eq!(arg.and_then(|w| w.parse::<i32>().ok()), Some(v));
            }
            Ok(_) | Err(_) => {}
        }
    }

    assert!(assembler.pending() <= irrigation::adapters::serial::LINE_CAP);
});
