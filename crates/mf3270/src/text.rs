//! Text transforms applied before typing or matching screen contents

use regex::Regex;

/// Escape `text` the way Python's `unicode_escape` codec does.
///
/// Printable ASCII passes through; backslashes, control characters and
/// everything outside ASCII become `\t`, `\xNN`, `\uNNNN` or `\UNNNNNNNN`.
pub fn unicode_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            ' '..='~' => escaped.push(ch),
            c if (c as u32) < 0x100 => escaped.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    escaped
}

/// Compile a glob into a regex that must match the whole text.
///
/// `*` matches any run of characters, `?` a single one, and `[...]` /
/// `[!...]` a character set. Everything else is literal.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::from("(?s)^");
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' && !class.is_empty() {
                        closed = true;
                        break;
                    }
                    class.push(inner);
                }
                if closed {
                    source.push('[');
                    if let Some(rest) = class.strip_prefix('!') {
                        source.push('^');
                        source.push_str(&escape_class(rest));
                    } else {
                        source.push_str(&escape_class(&class));
                    }
                    source.push(']');
                } else {
                    source.push_str(&regex::escape(&format!("[{class}")));
                }
            }
            c => source.push_str(&regex::escape(&c.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source)
}

fn escape_class(class: &str) -> String {
    class
        .chars()
        .map(|c| match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => format!("\\{c}"),
            c => c.to_string(),
        })
        .collect()
}

/// `['a', 'b']`
pub fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}
