use changeset::ChangeKind;
use colored::{ColoredString, Colorize};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Colored marker for a change kind
pub fn kind_symbol(kind: ChangeKind) -> ColoredString {
    match kind {
        ChangeKind::Add => kind.symbol().green(),
        ChangeKind::Remove => kind.symbol().red(),
        ChangeKind::Change | ChangeKind::RemovePolicy => kind.symbol().yellow(),
    }
}

/// Format a count with a singular or plural noun
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Tests
// ============================================================================
