#![no_main]

use libfuzzer_sys::fuzz_target;
use sad::clipboard::{paste, parse_block};
use sad::table::Table;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and pasting must not panic for any clipboard text
        if let Ok(block) = parse_block(input) {
            if let Ok(mut table) = Table::new(4, 4) {
                let _ = paste(&mut table, &block, 1, 1, false);
                let _ = paste(&mut table, &block, 1, 1, true);
                let _ = paste(&mut table, &block, usize::MAX, 1, true);
                let _ = Table::from_tsv(&table.to_tsv());
            }
        }
    }
});
