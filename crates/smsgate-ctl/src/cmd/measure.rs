//! Local split preview. Does not talk to the daemon.

use anyhow::Result;

use smsgate_core::{split, weighted_length};

pub fn cmd_measure(text: &str) -> Result<()> {
    println!("═══════════════════════════════════════");
    println!("  Weighted length : {} septets", weighted_length(text));

    let segments = split("preview", "0", text)?;
    println!("  Segments        : {}", segments.len());
    println!("═══════════════════════════════════════");

    for (i, s) in segments.iter().enumerate() {
        println!("  ┌─ part {}", i + 1);
        if let Some(udh) = s.udh() {
            println!("  │  udh    : {}", udh);
        }
        println!("  │  length : {}", weighted_length(&s.body));
        println!("  └─ {}", s.body);
    }

    Ok(())
}
