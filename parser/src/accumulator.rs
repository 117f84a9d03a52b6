//! Line-oriented accumulation of scalar content.
//!
//! Scalar text is gathered as spans interleaved with explicit line-break
//! markers rather than `\n` characters. Keeping breaks out of band lets a
//! literal `\n` produced by an escape sequence survive folding untouched,
//! and lets one accumulation be rendered under any folding or chomping
//! policy once scanning is done.

use std::borrow::Cow;

/// Chomping indicator of a block scalar: what happens to trailing breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chomping {
    /// `-`: the final line break and any trailing empty lines are dropped.
    Strip,
    /// Default: exactly one trailing break is kept when there is content.
    #[default]
    Clip,
    /// `+`: every trailing break is kept verbatim.
    Keep,
}

/// Policy under which accumulated lines render into scalar content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// Flow-scalar line folding: an isolated break becomes a single space
    /// and a run of N breaks becomes N-1 newlines, at the edges as well.
    Fold,
    /// Literal block content: every break is a newline, chomping trims the
    /// tail.
    Literal(Chomping),
    /// Folded block content: like [`Rendering::Fold`], except breaks next
    /// to a more-indented line stay literal and chomping trims the tail.
    Folded(Chomping),
}

#[derive(Debug, Clone)]
enum Piece<'input> {
    Span(Cow<'input, str>),
    Break,
}

/// Accumulates the text spans and line breaks of one scalar.
#[derive(Debug, Clone, Default)]
pub struct LineAccumulator<'input> {
    pieces: Vec<Piece<'input>>,
}

impl<'input> LineAccumulator<'input> {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    /// Whether nothing has been appended yet. Break markers count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Append a text span. Empty spans are ignored.
    pub fn append(&mut self, span: impl Into<Cow<'input, str>>) {
        let span = span.into();
        if !span.is_empty() {
            self.pieces.push(Piece::Span(span));
        }
    }

    /// Append a text span followed by a line-break marker.
    pub fn append_line(&mut self, span: impl Into<Cow<'input, str>>) {
        self.append(span);
        self.pieces.push(Piece::Break);
    }

    /// Render the accumulated content under the given policy.
    #[must_use]
    pub fn render(self, rendering: Rendering) -> Cow<'input, str> {
        match rendering {
            Rendering::Fold => self.fold(),
            Rendering::Literal(chomping) => Cow::Owned(self.literal(chomping)),
            Rendering::Folded(chomping) => Cow::Owned(self.folded(chomping)),
        }
    }

    fn fold(mut self) -> Cow<'input, str> {
        // Single-span scalars borrow straight from the input.
        if let [Piece::Span(_)] = self.pieces.as_slice() {
            if let Some(Piece::Span(span)) = self.pieces.pop() {
                return span;
            }
        }

        let mut out = String::new();
        let mut breaks = 0;
        for piece in &self.pieces {
            match piece {
                Piece::Break => breaks += 1,
                Piece::Span(span) => {
                    fold_breaks(&mut out, breaks);
                    breaks = 0;
                    out.push_str(span);
                }
            }
        }
        fold_breaks(&mut out, breaks);
        Cow::Owned(out)
    }

    fn literal(&self, chomping: Chomping) -> String {
        let mut len = self.pieces.len();
        if chomping != Chomping::Keep {
            while len > 0 && matches!(self.pieces[len - 1], Piece::Break) {
                len -= 1;
            }
        }

        let mut out = String::new();
        for piece in &self.pieces[..len] {
            match piece {
                Piece::Span(span) => out.push_str(span),
                Piece::Break => out.push('\n'),
            }
        }
        if chomping == Chomping::Clip && !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn folded(&self, chomping: Chomping) -> String {
        let mut len = self.pieces.len();
        let mut trailing = 0;
        while len > 0 && matches!(self.pieces[len - 1], Piece::Break) {
            len -= 1;
            trailing += 1;
        }

        let mut out = String::new();
        let mut breaks = 0;
        let mut seen_content = false;
        let mut prev_indented = false;
        for piece in &self.pieces[..len] {
            match piece {
                Piece::Break => breaks += 1,
                Piece::Span(span) => {
                    let indented = matches!(span.as_bytes().first(), Some(b' ' | b'\t'));
                    if !seen_content || prev_indented || indented {
                        // Leading empty lines and breaks adjoining a
                        // more-indented line are content, not folded.
                        for _ in 0..breaks {
                            out.push('\n');
                        }
                    } else {
                        fold_breaks(&mut out, breaks);
                    }
                    breaks = 0;
                    seen_content = true;
                    prev_indented = indented;
                    out.push_str(span);
                }
            }
        }
        match chomping {
            Chomping::Strip => {}
            Chomping::Clip => {
                if !out.is_empty() {
                    out.push('\n');
                }
            }
            Chomping::Keep => {
                for _ in 0..trailing {
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Fold a run of breaks: one break is a joining space, a run of N keeps
/// N-1 literal newlines (the first break of the run is discarded).
fn fold_breaks(out: &mut String, breaks: usize) {
    if breaks == 1 {
        out.push(' ');
    } else {
        for _ in 1..breaks {
            out.push('\n');
        }
    }
}
