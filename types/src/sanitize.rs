//! Strip terminal control sequences from server-supplied text.
//!
//! Bike names, reasons, chat replies and error bodies all come from the
//! backend (and, behind it, a language model). None of it may reach the
//! terminal with escape sequences intact.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    /// Just saw ESC.
    Escape,
    /// ESC followed by a charset designator: swallow one more char.
    Designator,
    /// Inside `ESC [ ...` or C1 CSI until a final byte.
    Csi,
    /// Inside an OSC/DCS/APC/PM string until BEL or `ESC \`.
    String { after_esc: bool },
}

fn is_dropped_control(c: char) -> bool {
    (c <= '\x1f' && !matches!(c, '\n' | '\t' | '\r'))
        || c == '\x7f'
        || ('\u{80}'..='\u{9f}').contains(&c)
}

/// Remove escape sequences and control characters, keeping `\n`, `\t`, `\r`.
///
/// Clean input is returned borrowed.
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| c == ESC || is_dropped_control(c)) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Text;

    for c in input.chars() {
        state = match state {
            Scan::Text => match c {
                ESC => Scan::Escape,
                C1_CSI => Scan::Csi,
                c if is_dropped_control(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Escape => match c {
                '[' => Scan::Csi,
                ']' | 'P' | '^' | '_' => Scan::String { after_esc: false },
                '(' | ')' | '*' | '+' | '#' | ' ' => Scan::Designator,
                ESC => Scan::Escape,
                c if c.is_ascii_graphic() => Scan::Text,
                c => {
                    if !is_dropped_control(c) {
                        out.push(c);
                    }
                    Scan::Text
                }
            },
            Scan::Designator => Scan::Text,
            Scan::Csi => match c {
                '\x40'..='\x7e' => Scan::Text,
                '\x20'..='\x3f' => Scan::Csi,
                c => {
                    if !is_dropped_control(c) && c != ESC {
                        out.push(c);
                    }
                    if c == ESC { Scan::Escape } else { Scan::Text }
                }
            },
            Scan::String { after_esc } => match c {
                BEL => Scan::Text,
                '\\' if after_esc => Scan::Text,
                ESC => Scan::String { after_esc: true },
                _ => Scan::String { after_esc: false },
            },
        };
    }

    Cow::Owned(out)
}

/// Sanitize and flatten to one line: runs of whitespace become one space.
#[must_use]
pub fn single_line(input: &str) -> String {
    sanitize_terminal_text(input)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
