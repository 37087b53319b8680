use std::io::Write;

use anyhow::{Context, Result};
use memtodo_core::TodoItem;

pub fn render<W: Write>(out: &mut W, items: &[TodoItem], show_ids: bool) -> Result<()> {
    writeln!(out, "=== Todos ({}) ===", items.len())?;
    if items.is_empty() {
        writeln!(out, "Nothing to do. Add one with: add <title> | <description>")?;
        return Ok(());
    }

    for item in items {
        let line = match (show_ids, item.description.is_empty()) {
            (true, true) => format!("[{}] {}", item.id, item.title),
            (true, false) => format!("[{}] {} - {}", item.id, item.title, item.description),
            (false, true) => item.title.clone(),
            (false, false) => format!("{} - {}", item.title, item.description),
        };
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn render_json<W: Write>(out: &mut W, items: &[TodoItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).context("Failed to serialize todos")?;
    writeln!(out, "{}", json)?;
    Ok(())
}
