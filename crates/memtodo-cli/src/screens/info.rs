use std::io::Write;

use anyhow::Result;

/// Summary line shown on the info screen.
pub fn message(count: usize) -> String {
    if count > 0 {
        format!("You have {} todo(s) waiting in the previous screen!", count)
    } else {
        "No todos yet. Go back and create some!".to_string()
    }
}

pub fn render<W: Write>(out: &mut W, count: usize) -> Result<()> {
    writeln!(out, "=== General ===")?;
    writeln!(out, "{}", message(count))?;
    writeln!(out)?;
    writeln!(out, "State is kept in memory only.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_empty() {
        assert_eq!(message(0), "No todos yet. Go back and create some!");
    }

    #[test]
    fn test_message_counts() {
        assert_eq!(
            message(3),
            "You have 3 todo(s) waiting in the previous screen!"
        );
    }
}
