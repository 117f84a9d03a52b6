//! The lexer.
//!
//! [`Scanner`] walks the input text as a set of mutually-transitioning scan
//! states and produces one [`Token`] per pull. It resolves scalar content
//! (folding, chomping, escapes) but no document structure: nesting is
//! reconstructed later from the indentation column each token carries.
//!
//! When a line turns out to be less indented than the scalar block being
//! accumulated, the block is closed and scanning restarts from the beginning
//! of that line. This dedent re-lex keeps the scanner free of any
//! indentation stack.

use std::borrow::Cow;
use std::fmt;

use crate::accumulator::{Chomping, LineAccumulator, Rendering};
use crate::char_traits::{is_eol, is_hex, is_whitespace, is_whitespace_or_eol};

/// The location of a token or error in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marker {
    index: usize,
    line: usize,
    col: usize,
}

impl Marker {
    /// Create a new [`Marker`] at the given position.
    #[must_use]
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        Self { index, line, col }
    }

    /// The byte offset from the start of the input.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line of the position, starting at 1.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The column of the position, starting at 1.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }
}

/// A fatal parse error and the position at which it was detected.
///
/// Every failure in the scanner and in document construction is reported
/// through this type; there is no recovery or partial-result mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    mark: Marker,
    info: String,
}

impl ScanError {
    /// Create a new error at the given position.
    #[must_use]
    pub fn new(mark: Marker, info: impl Into<String>) -> Self {
        Self {
            mark,
            info: info.into(),
        }
    }

    /// The position at which the error was detected.
    #[must_use]
    pub fn marker(&self) -> Marker {
        self.mark
    }

    /// The error message, without the position.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }
}

impl std::error::Error for ScanError {}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at (Ln {}, Col {}).",
            self.info, self.mark.line, self.mark.col
        )
    }
}

/// What a [`Token`] denotes, along with its payload.
///
/// `indent` is the zero-based column at which the token's content begins,
/// after any leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'input> {
    /// A `#` comment, trimmed.
    Comment(&'input str),
    /// A scalar value.
    Scalar {
        /// The assembled content; `None` denotes an explicitly empty node.
        value: Option<Cow<'input, str>>,
        /// Indentation of the scalar block.
        indent: usize,
    },
    /// A mapping key: text followed by `:` and whitespace.
    MappingKey {
        /// The key text.
        key: Cow<'input, str>,
        /// Indentation of the key.
        indent: usize,
    },
    /// A `-` sequence entry indicator.
    SequenceEntry {
        /// Indentation of the `-` indicator.
        indent: usize,
    },
}

/// A single token produced by the [`Scanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'input> {
    /// What the token is.
    pub kind: TokenKind<'input>,
    /// Where the token begins.
    pub mark: Marker,
}

/// Scan states. Each carries the offset at which scanning resumes and the
/// position that tokens produced by the state report.
#[derive(Debug, Clone)]
enum State {
    /// Entry state: plain scalars and the indicators that leave them.
    Plain {
        start: usize,
        expected_indent: Option<usize>,
        mark: Marker,
    },
    SingleQuoted {
        start: usize,
        indent: usize,
        mark: Marker,
    },
    DoubleQuoted {
        start: usize,
        indent: usize,
        mark: Marker,
    },
    Literal {
        start: usize,
        block_indent: usize,
        mark: Marker,
    },
    Folded {
        start: usize,
        block_indent: usize,
        mark: Marker,
    },
    Comment {
        start: usize,
        mark: Marker,
    },
    Done,
}

/// Outcome of stepping the state machine once.
enum Step<'input> {
    Emit(Token<'input>),
    Continue,
    Done,
}

/// A pull-based lexer over a text input.
///
/// Call [`Scanner::next_token`] to advance, or drive it through its
/// [`Iterator`] implementation. The token sequence is finite and
/// non-restartable: once `None` (or an error) has been produced, nothing
/// further is.
#[derive(Debug)]
pub struct Scanner<'input> {
    text: &'input str,
    state: State,
}

impl<'input> Scanner<'input> {
    /// Create a scanner over the given text.
    #[must_use]
    pub fn new(text: &'input str) -> Self {
        Self {
            text,
            state: State::Plain {
                start: 0,
                expected_indent: None,
                mark: Marker::new(0, 1, 1),
            },
        }
    }

    /// Produce the next token, or `Ok(None)` at the end of the sequence.
    ///
    /// # Errors
    /// Returns a [`ScanError`] on malformed input. The scanner is left in
    /// its terminal state afterwards.
    pub fn next_token(&mut self) -> Result<Option<Token<'input>>, ScanError> {
        loop {
            match self.step()? {
                Step::Emit(token) => return Ok(Some(token)),
                Step::Continue => {}
                Step::Done => return Ok(None),
            }
        }
    }

    fn step(&mut self) -> Result<Step<'input>, ScanError> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Plain {
                start,
                expected_indent,
                mark,
            } => Ok(self.scan_plain(start, expected_indent, mark)),
            State::SingleQuoted {
                start,
                indent,
                mark,
            } => self.scan_single_quoted(start, indent, mark),
            State::DoubleQuoted {
                start,
                indent,
                mark,
            } => self.scan_double_quoted(start, indent, mark),
            State::Literal {
                start,
                block_indent,
                mark,
            } => self.scan_block(start, block_indent, false, mark),
            State::Folded {
                start,
                block_indent,
                mark,
            } => self.scan_block(start, block_indent, true, mark),
            State::Comment { start, mark } => Ok(self.scan_comment(start, mark)),
            State::Done => Ok(Step::Done),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn scan_plain(
        &mut self,
        start: usize,
        expected_indent: Option<usize>,
        mark: Marker,
    ) -> Step<'input> {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = text.len();
        let mut acc = LineAccumulator::new();

        let mut index = start;
        let mut line = mark.line();
        let mut column = mark.col();
        let mut block_indent = expected_indent;
        let mut first_line = true;

        'lines: while index < len {
            let line_begin = index;
            while is_whitespace(at(bytes, index)) {
                index += 1;
            }
            if index >= len {
                break;
            }

            let padding = index - line_begin;
            let indent = if first_line {
                expected_indent.unwrap_or(0) + padding
            } else {
                padding
            };
            // The first content line fixes the block indentation unless it
            // was imposed by the construct that led here.
            let block = *block_indent.get_or_insert(indent);
            let code = at(bytes, index);

            // A less indented line closes the accumulation; it is re-lexed
            // from its beginning as a fresh top-of-block construct.
            if indent < block && !is_eol(code) {
                self.state = State::Plain {
                    start: line_begin,
                    expected_indent: None,
                    mark: Marker::new(line_begin, line, 1),
                };
                return Step::Emit(Token {
                    kind: TokenKind::Scalar {
                        value: fold_plain(acc),
                        indent: block,
                    },
                    mark,
                });
            }

            // Indicators only matter before any scalar text has been
            // accumulated; afterwards they are plain content.
            if acc.is_empty() {
                match code {
                    Some('-')
                        if index + 1 >= len || is_whitespace_or_eol(at(bytes, index + 1)) =>
                    {
                        let entry_mark = Marker::new(index, line, column + padding);
                        self.state = State::Plain {
                            start: index + 1,
                            expected_indent: Some(indent + 1),
                            mark: Marker::new(index + 1, line, column + padding + 1),
                        };
                        return Step::Emit(Token {
                            kind: TokenKind::SequenceEntry { indent },
                            mark: entry_mark,
                        });
                    }
                    // A `-` glued to content starts a plain scalar.
                    Some('-') => index += 1,
                    Some('\'') => {
                        self.state = State::SingleQuoted {
                            start: index + 1,
                            indent,
                            mark: Marker::new(index, line, column + padding),
                        };
                        return Step::Continue;
                    }
                    Some('"') => {
                        self.state = State::DoubleQuoted {
                            start: index + 1,
                            indent,
                            mark: Marker::new(index, line, column + padding),
                        };
                        return Step::Continue;
                    }
                    Some('|') => {
                        self.state = State::Literal {
                            start: index + 1,
                            block_indent: indent,
                            mark: Marker::new(index, line, column + padding),
                        };
                        return Step::Continue;
                    }
                    Some('>') => {
                        self.state = State::Folded {
                            start: index + 1,
                            block_indent: indent,
                            mark: Marker::new(index, line, column + padding),
                        };
                        return Step::Continue;
                    }
                    _ => {}
                }
            }

            while index < len {
                match bytes[index] {
                    b'\r' | b'\n' => {
                        let span = text[line_begin..index].trim();
                        if !span.is_empty() || !acc.is_empty() {
                            acc.append_line(span);
                        }
                        if bytes[index] == b'\r' && at(bytes, index + 1) == Some('\n') {
                            index += 1;
                        }
                        index += 1;
                        line += 1;
                        column = 1;
                        first_line = false;
                        continue 'lines;
                    }
                    b':' if index + 1 >= len
                        || is_whitespace_or_eol(at(bytes, index + 1)) =>
                    {
                        if acc.is_empty() {
                            let key = text[line_begin..index].trim();
                            let key_mark =
                                Marker::new(line_begin + padding, line, column + padding);
                            self.state = State::Plain {
                                start: index + 1,
                                expected_indent: Some(indent + 1),
                                mark: Marker::new(
                                    index + 1,
                                    line,
                                    column + (index - line_begin) + 1,
                                ),
                            };
                            return Step::Emit(Token {
                                kind: TokenKind::MappingKey {
                                    key: Cow::Borrowed(key),
                                    indent,
                                },
                                mark: key_mark,
                            });
                        }
                        self.state = State::Plain {
                            start: line_begin,
                            expected_indent: None,
                            mark: Marker::new(line_begin, line, 1),
                        };
                        return Step::Emit(Token {
                            kind: TokenKind::Scalar {
                                value: fold_plain(acc),
                                indent: block,
                            },
                            mark,
                        });
                    }
                    b'#' if index == 0 || is_whitespace_or_eol(at(bytes, index - 1)) => {
                        let comment_mark =
                            Marker::new(index, line, column + (index - line_begin));
                        let span = text[line_begin..index].trim();
                        if acc.is_empty() && span.is_empty() {
                            self.state = State::Comment {
                                start: index + 1,
                                mark: comment_mark,
                            };
                            return Step::Continue;
                        }
                        // Flush the scalar first; the comment is picked up
                        // on the next pull.
                        acc.append(span);
                        self.state = State::Comment {
                            start: index + 1,
                            mark: comment_mark,
                        };
                        return Step::Emit(Token {
                            kind: TokenKind::Scalar {
                                value: fold_plain(acc),
                                indent: block,
                            },
                            mark,
                        });
                    }
                    _ => {}
                }
                index += 1;
            }

            acc.append(text[line_begin..index].trim());
            break;
        }

        self.state = State::Done;
        let value = fold_plain(acc);
        if value.is_none() && expected_indent.is_none() {
            // Only presentation whitespace was scanned and no value was
            // required at this position: not even a null token is due.
            return Step::Done;
        }
        Step::Emit(Token {
            kind: TokenKind::Scalar {
                value,
                indent: expected_indent.unwrap_or(0),
            },
            mark,
        })
    }

    fn scan_single_quoted(
        &mut self,
        start: usize,
        indent: usize,
        mark: Marker,
    ) -> Result<Step<'input>, ScanError> {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = text.len();
        let mut acc = LineAccumulator::new();
        let mut index = start;
        let mut span_start = start;
        let mut line = mark.line();

        while index < len {
            match bytes[index] {
                // `''` is a literal quote, the only escape in this style.
                b'\'' if at(bytes, index + 1) == Some('\'') => {
                    acc.append(&text[span_start..=index]);
                    index += 2;
                    span_start = index;
                }
                b'\'' => {
                    acc.append(&text[span_start..index]);
                    return Ok(self.close_quoted(acc, index, indent, line, mark));
                }
                b'\r' | b'\n' => {
                    acc.append_line(&text[span_start..index]);
                    if bytes[index] == b'\r' && at(bytes, index + 1) == Some('\n') {
                        index += 1;
                    }
                    index += 1;
                    line += 1;
                    // Continuation lines drop their leading whitespace.
                    while is_whitespace(at(bytes, index)) {
                        index += 1;
                    }
                    span_start = index;
                }
                _ => index += 1,
            }
        }

        Err(ScanError::new(
            mark,
            "Unexpected end of character sequence within single-quoted scalar",
        ))
    }

    fn scan_double_quoted(
        &mut self,
        start: usize,
        indent: usize,
        mark: Marker,
    ) -> Result<Step<'input>, ScanError> {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = text.len();
        let mut acc = LineAccumulator::new();
        let mut index = start;
        let mut span_start = start;
        let mut line = mark.line();

        while index < len {
            match bytes[index] {
                b'"' => {
                    acc.append(&text[span_start..index]);
                    return Ok(self.close_quoted(acc, index, indent, line, mark));
                }
                b'\\' => {
                    acc.append(&text[span_start..index]);
                    let Some((unescaped, consumed)) = parse_escape(text, index + 1) else {
                        return Err(ScanError::new(
                            Marker::new(index, line, mark.col()),
                            "Invalid escape sequence",
                        ));
                    };
                    acc.append(unescaped.to_string());
                    index += consumed + 1;
                    span_start = index;
                }
                b'\r' | b'\n' => {
                    acc.append_line(&text[span_start..index]);
                    if bytes[index] == b'\r' && at(bytes, index + 1) == Some('\n') {
                        index += 1;
                    }
                    index += 1;
                    line += 1;
                    while is_whitespace(at(bytes, index)) {
                        index += 1;
                    }
                    span_start = index;
                }
                _ => index += 1,
            }
        }

        Err(ScanError::new(
            mark,
            "Unexpected end of character sequence within double-quoted scalar",
        ))
    }

    /// Close a quoted scalar ending at `quote_index`. A quote followed on
    /// its opening line by optional whitespace, `:` and whitespace or the
    /// end of input closes a mapping key instead of a scalar.
    fn close_quoted(
        &mut self,
        acc: LineAccumulator<'input>,
        quote_index: usize,
        indent: usize,
        line: usize,
        mark: Marker,
    ) -> Step<'input> {
        let bytes = self.text.as_bytes();
        let len = self.text.len();

        if line == mark.line() {
            let mut index = quote_index + 1;
            while is_whitespace(at(bytes, index)) {
                index += 1;
            }
            if at(bytes, index) == Some(':')
                && (index + 1 >= len || is_whitespace_or_eol(at(bytes, index + 1)))
            {
                self.state = State::Plain {
                    start: index + 1,
                    expected_indent: Some(indent + 1),
                    mark: Marker::new(index + 1, line, mark.col() + (index + 1 - mark.index())),
                };
                return Step::Emit(Token {
                    kind: TokenKind::MappingKey {
                        key: acc.render(Rendering::Fold),
                        indent,
                    },
                    mark,
                });
            }
        }

        self.state = State::Plain {
            start: quote_index + 1,
            expected_indent: None,
            mark: Marker::new(quote_index + 1, line, mark.col()),
        };
        Step::Emit(Token {
            kind: TokenKind::Scalar {
                value: Some(acc.render(Rendering::Fold)),
                indent,
            },
            mark,
        })
    }

    #[allow(clippy::too_many_lines)]
    fn scan_block(
        &mut self,
        start: usize,
        block_indent: usize,
        folded: bool,
        mark: Marker,
    ) -> Result<Step<'input>, ScanError> {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = text.len();
        let invalid = move || {
            ScanError::new(
                mark,
                if folded {
                    "Invalid folded block scalar"
                } else {
                    "Invalid literal block scalar"
                },
            )
        };

        let mut index = start;
        let mut content_indent: Option<usize> = None;
        let mut chomping: Option<Chomping> = None;

        // Header: indentation digit and chomping indicator, either order.
        if let Some(digit) = header_digit(at(bytes, index)) {
            content_indent = Some(block_indent + digit);
            index += 1;
        }
        match at(bytes, index) {
            Some('+') => {
                chomping = Some(Chomping::Keep);
                index += 1;
            }
            Some('-') => {
                chomping = Some(Chomping::Strip);
                index += 1;
            }
            _ => {}
        }
        if content_indent.is_none() {
            if let Some(digit) = header_digit(at(bytes, index)) {
                content_indent = Some(block_indent + digit);
                index += 1;
            }
        }

        // An optional one-line comment may follow the indicators.
        let ws_start = index;
        while is_whitespace(at(bytes, index)) {
            index += 1;
        }
        if index > ws_start && at(bytes, index) == Some('#') {
            index += 1;
            while index < len && !is_eol(at(bytes, index)) {
                index += 1;
            }
        }

        if index >= len {
            self.state = State::Done;
            return Ok(Step::Emit(Token {
                kind: TokenKind::Scalar {
                    value: None,
                    indent: block_indent,
                },
                mark,
            }));
        }

        match bytes[index] {
            b'\r' => {
                index += 1;
                if at(bytes, index) == Some('\n') {
                    index += 1;
                }
            }
            b'\n' => index += 1,
            _ => return Err(invalid()),
        }

        let chomping = chomping.unwrap_or_default();
        let rendering = if folded {
            Rendering::Folded(chomping)
        } else {
            Rendering::Literal(chomping)
        };
        let mut acc = LineAccumulator::new();
        let mut line = mark.line() + 1;
        let mut max_blank_indent = 0;

        while index < len {
            let line_begin = index;

            if let Some(ci) = content_indent {
                // Only the content indentation is consumed; anything deeper
                // is content.
                let limit = (line_begin + ci).min(len);
                while index < limit && is_whitespace(at(bytes, index)) {
                    index += 1;
                }
                let padding = index - line_begin;
                if !is_eol(at(bytes, index)) {
                    if padding < block_indent {
                        // A dedent below the block ends it; re-lex from the
                        // start of this line.
                        self.state = State::Plain {
                            start: line_begin,
                            expected_indent: None,
                            mark: Marker::new(line_begin, line, 1),
                        };
                        return Ok(Step::Emit(Token {
                            kind: TokenKind::Scalar {
                                value: non_empty(acc.render(rendering)),
                                indent: block_indent,
                            },
                            mark,
                        }));
                    }
                    if padding < ci && index < len {
                        return Err(invalid());
                    }
                }
            } else {
                while index < len && is_whitespace(at(bytes, index)) {
                    index += 1;
                }
                let padding = index - line_begin;
                if is_eol(at(bytes, index)) {
                    max_blank_indent = max_blank_indent.max(padding);
                } else {
                    if padding < block_indent {
                        self.state = State::Plain {
                            start: line_begin,
                            expected_indent: None,
                            mark: Marker::new(line_begin, line, 1),
                        };
                        return Ok(Step::Emit(Token {
                            kind: TokenKind::Scalar {
                                value: None,
                                indent: block_indent,
                            },
                            mark,
                        }));
                    }
                    if padding < max_blank_indent {
                        // A leading empty line may not be more indented
                        // than the first content line.
                        return Err(invalid());
                    }
                    content_indent = Some(padding);
                }
            }

            let span_start = index;
            while index < len && !matches!(bytes[index], b'\r' | b'\n') {
                index += 1;
            }
            let span = &text[span_start..index];
            if index < len {
                if bytes[index] == b'\r' && at(bytes, index + 1) == Some('\n') {
                    index += 1;
                }
                index += 1;
            }
            acc.append_line(span);
            line += 1;
        }

        self.state = State::Plain {
            start: index,
            expected_indent: None,
            mark: Marker::new(index, line, 1),
        };
        Ok(Step::Emit(Token {
            kind: TokenKind::Scalar {
                value: non_empty(acc.render(rendering)),
                indent: block_indent,
            },
            mark,
        }))
    }

    fn scan_comment(&mut self, start: usize, mark: Marker) -> Step<'input> {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = text.len();
        let mut index = start;
        while index < len && !is_eol(at(bytes, index)) {
            index += 1;
        }
        self.state = State::Plain {
            start: index + 1,
            expected_indent: None,
            mark: Marker::new(index + 1, mark.line() + 1, 1),
        };
        Step::Emit(Token {
            kind: TokenKind::Comment(text[start..index].trim()),
            mark,
        })
    }
}

impl<'input> Iterator for Scanner<'input> {
    type Item = Result<Token<'input>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

/// The byte at `index`, widened to a `char`. Every character the scanner
/// dispatches on is ASCII, so a raw byte compares correctly; bytes of a
/// multi-byte UTF-8 sequence never match an indicator.
fn at(bytes: &[u8], index: usize) -> Option<char> {
    bytes.get(index).map(|&b| b as char)
}

/// Render a plain-scalar accumulation: folded, trimmed, and `None` when
/// nothing meaningful was captured.
fn fold_plain(acc: LineAccumulator<'_>) -> Option<Cow<'_, str>> {
    let value = trim_cow(acc.render(Rendering::Fold));
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn trim_cow(value: Cow<'_, str>) -> Cow<'_, str> {
    match value {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Cow::Owned(s)
            } else {
                Cow::Owned(trimmed.to_string())
            }
        }
    }
}

fn non_empty(value: Cow<'_, str>) -> Option<Cow<'_, str>> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A block-scalar content indentation digit (`1`-`9`).
fn header_digit(c: Option<char>) -> Option<usize> {
    match c {
        Some(c @ '1'..='9') => Some(c as usize - '0' as usize),
        _ => None,
    }
}

/// Decode the escape starting after a backslash at `index`. Returns the
/// decoded character and the number of input characters consumed.
fn parse_escape(text: &str, index: usize) -> Option<(char, usize)> {
    let single = |c| Some((c, 1));
    match text.as_bytes().get(index)? {
        b'0' => single('\0'),
        b'a' => single('\x07'),
        b'b' => single('\x08'),
        b't' => single('\t'),
        b'n' => single('\n'),
        b'v' => single('\x0b'),
        b'f' => single('\x0c'),
        b'r' => single('\r'),
        b'e' => single('\x1b'),
        b'"' => single('"'),
        b'/' => single('/'),
        b'\\' => single('\\'),
        b'N' => single('\u{85}'),
        b'_' => single('\u{a0}'),
        b'L' => single('\u{2028}'),
        b'P' => single('\u{2029}'),
        b'x' => parse_hex(text, index + 1, 2),
        b'u' => parse_hex(text, index + 1, 4),
        b'U' => parse_hex(text, index + 1, 8),
        _ => None,
    }
}

fn parse_hex(text: &str, index: usize, digits: usize) -> Option<(char, usize)> {
    let sequence = text.get(index..index + digits)?;
    if !sequence.chars().all(|c| is_hex(Some(c))) {
        return None;
    }
    let code = u32::from_str_radix(sequence, 16).ok()?;
    char::from_u32(code).map(|c| (c, digits + 1))
}
