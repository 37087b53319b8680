use std::io::Write;

use anyhow::Result;

pub fn render<W: Write>(out: &mut W, taps: u32) -> Result<()> {
    writeln!(out, "=== memtodo ===")?;
    writeln!(out, "Taps: {}", taps)?;
    writeln!(out, "Type 'list' to open your todos, 'info' for a summary, 'help' for all commands.")?;
    Ok(())
}
