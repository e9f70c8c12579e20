use std::fmt::Display;
use std::ops::Range;

/// A byte offset somewhere in the source code
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BytePos(usize);

impl BytePos {
    pub fn new(pos: usize) -> Self {
        BytePos(pos)
    }

    pub fn shift(self, ch: char) -> Self {
        BytePos(self.0 + ch.len_utf8())
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

impl Display for BytePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A human-facing location: 1-based line and 1-based column (counted in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl LineCol {
    pub const fn new(line: usize, column: usize) -> Self {
        LineCol { line, column }
    }

    /// The location of the very first character of a source text.
    pub const fn start() -> Self {
        LineCol { line: 1, column: 1 }
    }

    /// The location right after `ch`.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            LineCol {
                line: self.line + 1,
                column: 1,
            }
        } else {
            LineCol {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for LineCol {
    fn default() -> Self {
        LineCol::start()
    }
}

impl Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A subsection of the source code.
///
/// `start`/`end` are byte offsets (end exclusive), `location` is where `start` sits
/// in line/column terms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: BytePos,
    end: BytePos,
    location: LineCol,
}

impl Span {
    pub fn new(start: BytePos, end: BytePos, location: LineCol) -> Span {
        Span {
            start,
            end,
            location,
        }
    }

    pub fn empty() -> Span {
        Span::default()
    }

    pub fn start(&self) -> BytePos {
        self.start
    }

    pub fn end(&self) -> BytePos {
        self.end
    }

    pub fn location(&self) -> LineCol {
        self.location
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn range(&self) -> Range<usize> {
        self.start.offset()..self.end.offset()
    }

    /// The slice of `source` this span covers (empty if the span does not belong to `source`).
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }

    /// A span from the start of `self` to the end of `other`.
    pub fn to(&self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            location: self.location,
        }
    }

    /// Convert the given span to the "(at 1:1)" format
    pub fn at_str(&self) -> String {
        format!("(at {})", self)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, span: Span) -> WithSpan<T> {
        WithSpan { value, span }
    }
}

impl<T> WithSpan<T>
where
    T: Display,
{
    /// Convert the given WithSpan to the "value (at 1:1)" format
    /// See Span::at_str() for detail
    pub fn at_str(&self) -> String {
        format!("{} {}", self.value, self.span.at_str())
    }
}
