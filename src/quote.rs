/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Double-quoted encoding used for every value written by the editor.

use std::fmt::Write;

/// Wraps `value` in double quotes, backslash-escaping quotes, backslashes
/// and characters that are not printable.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (c as u32) < 0x10000 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }

    out.push('"');
    out
}

/// Renders a record line in the canonical `KEY="VALUE"` form.
pub fn record(key: &str, value: &str) -> String {
    format!("{key}={}", quote(value))
}

// ASCII space is the only whitespace that passes through unescaped.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !ch.is_control() && !ch.is_whitespace() && !is_format_char(ch)
}

fn is_format_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}
