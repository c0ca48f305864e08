//! Compiled path patterns.
//!
//! Ignore rules, comparators and alignment selectors all address the tree
//! with the same glob-like syntax:
//!
//! | Syntax      | Matches                                   |
//! |-------------|-------------------------------------------|
//! | `name`      | the mapping key `name`                    |
//! | `["a.b"]`   | a key that is not a plain identifier      |
//! | `[3]`       | sequence index 3                          |
//! | `[*]`       | any sequence index                        |
//! | `*`         | any single segment, key or index          |
//! | `**`        | any run of segments, including none       |
//!
//! Segments are joined with `.`; bracket segments attach directly, so
//! `threads[*].frames[*].offset` is five segments.

use crate::errors::DiffError;
use crashdiff_core_types::{Path, PathSegment};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Key(String),
    Index(usize),
    AnyIndex,
    AnySegment,
    AnyRun,
}

impl PatternSegment {
    fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (PatternSegment::Key(k), PathSegment::Key(actual)) => k == actual,
            (PatternSegment::Index(n), PathSegment::Index(actual)) => n == actual,
            (PatternSegment::AnyIndex, PathSegment::Index(_)) => true,
            (PatternSegment::AnySegment, _) => true,
            _ => false,
        }
    }
}

/// A path pattern compiled from its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for empty patterns, empty segments, partial
    /// wildcards such as `a*` or `***`, bad indices and unterminated
    /// brackets or quotes.
    pub fn compile(source: &str) -> Result<Self, DiffError> {
        let segments = Parser::new(source).parse()?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.matches_segments(path.segments())
    }

    /// True if the pattern matches `path` or any of its ancestors.
    pub fn matches_within(&self, path: &Path) -> bool {
        path.prefixes().any(|prefix| self.matches_segments(prefix))
    }

    /// Wildcard match with single-point backtracking on `**`.
    pub fn matches_segments(&self, path: &[PathSegment]) -> bool {
        let pat = &self.segments;
        let (mut p, mut s) = (0usize, 0usize);
        let mut resume: Option<(usize, usize)> = None;

        while s < path.len() {
            match pat.get(p) {
                Some(PatternSegment::AnyRun) => {
                    resume = Some((p, s));
                    p += 1;
                }
                Some(seg) if seg.matches(&path[s]) => {
                    p += 1;
                    s += 1;
                }
                _ => match resume {
                    // Let the last `**` swallow one more segment
                    Some((star_p, star_s)) => {
                        p = star_p + 1;
                        s = star_s + 1;
                        resume = Some((star_p, star_s + 1));
                    }
                    None => return false,
                },
            }
        }
        pat[p..].iter().all(|seg| *seg == PatternSegment::AnyRun)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for PathPattern {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathPattern::compile(s)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> DiffError {
        DiffError::InvalidPattern {
            pattern: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Vec<PatternSegment>, DiffError> {
        if self.source.trim().is_empty() {
            return Err(self.error("pattern is empty"));
        }

        let mut segments = Vec::new();
        // A dotted segment is required at the start and after every '.'
        let mut expect_name = true;
        loop {
            match self.chars.peek().copied() {
                None => {
                    if expect_name && !segments.is_empty() {
                        return Err(self.error("pattern ends with '.'"));
                    }
                    break;
                }
                Some((_, '[')) => {
                    if expect_name && !segments.is_empty() {
                        return Err(self.error("'.' must be followed by a name"));
                    }
                    self.chars.next();
                    segments.push(self.bracket()?);
                    expect_name = false;
                }
                Some((pos, '.')) => {
                    if expect_name {
                        return Err(self.error(format!("empty segment at offset {}", pos)));
                    }
                    self.chars.next();
                    expect_name = true;
                }
                Some((pos, c)) => {
                    if !expect_name {
                        return Err(self.error(format!(
                            "unexpected '{}' at offset {}; segments are joined with '.'",
                            c, pos
                        )));
                    }
                    segments.push(self.name()?);
                    expect_name = false;
                }
            }
        }

        // Adjacent `**` are equivalent to one
        segments.dedup_by(|a, b| *a == PatternSegment::AnyRun && *b == PatternSegment::AnyRun);
        Ok(segments)
    }

    fn name(&mut self) -> Result<PatternSegment, DiffError> {
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '.' || c == '[' {
                break;
            }
            if c == ']' || c == '"' {
                return Err(self.error(format!("'{}' is only valid inside brackets", c)));
            }
            name.push(c);
            self.chars.next();
        }
        match name.as_str() {
            "*" => Ok(PatternSegment::AnySegment),
            "**" => Ok(PatternSegment::AnyRun),
            n if n.contains('*') => Err(self.error(format!(
                "wildcard in `{}` must be a whole segment (`*` or `**`)",
                n
            ))),
            _ => Ok(PatternSegment::Key(name)),
        }
    }

    fn bracket(&mut self) -> Result<PatternSegment, DiffError> {
        let segment = match self.chars.next() {
            Some((_, '*')) => PatternSegment::AnyIndex,
            Some((_, '"')) => PatternSegment::Key(self.quoted()?),
            Some((_, c)) if c.is_ascii_digit() => {
                let mut digits = String::from(c);
                while let Some(&(_, d)) = self.chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    self.chars.next();
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|e| self.error(format!("bad index `{}`: {}", digits, e)))?;
                PatternSegment::Index(index)
            }
            Some((pos, c)) => {
                return Err(self.error(format!(
                    "expected index, '*' or quoted key after '[' but found '{}' at offset {}",
                    c, pos
                )))
            }
            None => return Err(self.error("unterminated '['")),
        };
        match self.chars.next() {
            Some((_, ']')) => Ok(segment),
            Some((pos, c)) => Err(self.error(format!("expected ']' at offset {}, found '{}'", pos, c))),
            None => Err(self.error("unterminated '['")),
        }
    }

    fn quoted(&mut self) -> Result<String, DiffError> {
        let mut key = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(key),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c @ ('"' | '\\'))) => key.push(c),
                    Some((pos, c)) => {
                        return Err(self.error(format!("unknown escape '\\{}' at offset {}", c, pos)))
                    }
                    None => return Err(self.error("unterminated quoted key")),
                },
                Some((_, c)) => key.push(c),
                None => return Err(self.error("unterminated quoted key")),
            }
        }
    }
}
