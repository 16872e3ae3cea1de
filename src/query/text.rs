//! Text normalisation and XPath string quoting.

// ============================================================================
// Normalisation
// ============================================================================

/// Characters XPath `normalize-space()` treats as whitespace.
const XML_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Collapses whitespace runs to a single space and trims both ends.
///
/// Only space, tab, newline and carriage return count, as in XPath
/// `normalize-space()`; a no-break space is kept as text.
///
/// # Example
///
/// ```
/// use label_locator::query::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  First\n\t Name *"), "First Name *");
/// ```
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split(XML_WHITESPACE).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

// ============================================================================
// XPath Quoting
// ============================================================================

/// Renders `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so a value containing both quote
/// characters is split and rebuilt with `concat()`.
///
/// # Example
///
/// ```
/// use label_locator::query::xpath_literal;
///
/// assert_eq!(xpath_literal("Email"), "'Email'");
/// assert_eq!(xpath_literal("Driver's licence"), "\"Driver's licence\"");
/// assert_eq!(
///     xpath_literal(r#"It's "ok""#),
///     r#"concat('It', "'", 's "ok"')"#
/// );
/// ```
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

// ============================================================================
// Tests
// ============================================================================
