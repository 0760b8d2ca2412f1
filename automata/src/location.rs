
use std::fmt;

/*
 * A position in a source text: the byte offset, and the 1-based
 * line and column (columns count characters, not bytes).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

struct CountingIter<'a> {
    chars: std::str::CharIndices<'a>,
    line: usize,
    column: usize,
}

impl<'a> CountingIter<'a> {
    fn new(s: &'a str) -> CountingIter<'a> {
        CountingIter {
            chars: s.char_indices(),
            line: 1,
            column: 1,
        }
    }
}

impl Iterator for CountingIter<'_> {
    type Item = (char, Location);

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, c) = self.chars.next()?;
        let res = (c, Location { offset, line: self.line, column: self.column });

        // Prepare the position of the next character.
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(res)
    }
}

/*
 * Locates a byte offset in `input`. Offsets past the end (such as the
 * position of an end-of-input token) land just after the last character.
 */
pub fn locate(input: &str, offset: usize) -> Location {
    let mut last = Location { offset: 0, line: 1, column: 1 };

    for (c, loc) in CountingIter::new(input) {
        if loc.offset >= offset {
            return loc
        }
        last = if c == '\n' {
            Location { offset: loc.offset + 1, line: loc.line + 1, column: 1 }
        } else {
            Location { offset: loc.offset + c.len_utf8(), line: loc.line, column: loc.column + 1 }
        };
    }

    last
}
