// SPDX-FileCopyrightText: 2026 TransLanda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MarkdownV2 escaping for Telegram Bot API.
//!
//! Telegram's MarkdownV2 parse mode requires escaping 18 special characters
//! outside of code blocks. Characters inside inline code (`` ` ``) or fenced
//! code blocks (`` ``` ``) must NOT be escaped.

/// Characters that must be escaped in MarkdownV2 outside code blocks.
const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes text for Telegram MarkdownV2 parse mode.
///
/// Splits the input into code and non-code segments, escaping only the
/// non-code segments. Fenced code blocks (`` ``` ``) and inline code (`` ` ``)
/// are preserved without internal escaping.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '`' {
            if SPECIAL_CHARS.contains(&ch) {
                result.push('\\');
            }
            result.push(ch);
            continue;
        }

        let mut backticks = 1;
        while chars.next_if_eq(&'`').is_some() {
            backticks += 1;
        }

        match backticks {
            1 => {
                // Inline code runs to the next backtick, or to the end if unclosed.
                result.push('`');
                for c in chars.by_ref() {
                    result.push(c);
                    if c == '`' {
                        break;
                    }
                }
            }
            2 => result.push_str("\\`\\`"),
            n => {
                result.extend(std::iter::repeat_n('`', n));
                let mut closing = 0;
                for c in chars.by_ref() {
                    result.push(c);
                    if c == '`' {
                        closing += 1;
                        if closing == 3 {
                            break;
                        }
                    } else {
                        closing = 0;
                    }
                }
            }
        }
    }

    result
}

/// Escapes the contents of a code span or block: only `` ` `` and `\`.
pub fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '`' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Formats free model output for Telegram.
pub fn format_for_telegram(text: &str) -> String {
    escape_markdown_v2(text)
}

/// Text composed piecewise into a MarkdownV2 rendering and a plain one.
///
/// The plain rendering is what gets sent when Telegram rejects the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    markdown: String,
    plain: String,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinary text, escaped.
    pub fn text(mut self, s: &str) -> Self {
        for ch in s.chars() {
            if SPECIAL_CHARS.contains(&ch) {
                self.markdown.push('\\');
            }
            self.markdown.push(ch);
        }
        self.plain.push_str(s);
        self
    }

    pub fn bold(mut self, s: &str) -> Self {
        self.markdown.push('*');
        self = self.text(s);
        self.markdown.push('*');
        self
    }

    /// Inline code span.
    pub fn code(mut self, s: &str) -> Self {
        self.markdown.push('`');
        self.markdown.push_str(&escape_code(s));
        self.markdown.push('`');
        self.plain.push_str(s);
        self
    }

    /// Fenced pre-formatted block on its own lines.
    pub fn pre(mut self, s: &str) -> Self {
        self.markdown.push_str("```\n");
        self.markdown.push_str(&escape_code(s));
        self.markdown.push_str("\n```");
        self.plain.push_str(s);
        self
    }

    pub fn line(self) -> Self {
        self.text("\n")
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn plain(&self) -> &str {
        &self.plain
    }
}
