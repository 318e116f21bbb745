// Dweve TMDL - Tabular Model Definition Language Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Line segmentation for TMDL.
//!
//! Splits raw text into logical lines, each carrying its indentation depth,
//! trimmed content, and verbatim raw text. A declaration whose content ends
//! with `=` opens a multi-line expression body: following physical lines
//! indented at least two units deeper than the declaration are folded into
//! the declaration's logical line (raw text and extracted body) rather than
//! becoming lines of their own. Blank lines are kept as explicit records —
//! they are separators the serializer must reproduce.

use crate::error::{TmdlError, TmdlResult};
use crate::limits::Limits;
use memchr::{memchr, memchr_iter};

/// Newline style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
}

impl Newline {
    /// The line terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Indentation unit of a document: one tab, or a fixed run of spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Tabs,
    Spaces(usize),
}

impl IndentUnit {
    /// Indentation text for the given depth.
    pub fn prefix(&self, depth: usize) -> String {
        match self {
            Self::Tabs => "\t".repeat(depth),
            Self::Spaces(n) => " ".repeat(n * depth),
        }
    }
}

/// One logical line of input.
#[derive(Debug, Clone)]
pub struct Segment {
    /// 1-based physical line number where this logical line starts.
    pub line: usize,
    /// Indentation depth in units (0 for blank lines).
    pub depth: usize,
    /// Trimmed content (empty for blank lines).
    pub content: String,
    /// Verbatim physical text; continuation lines joined with `\n`.
    pub raw: String,
    /// Extracted multi-line expression body, base indentation stripped.
    pub body: Option<String>,
    /// Whether this is a blank separator line.
    pub blank: bool,
}

impl Segment {
    fn blank_line(line: usize, raw: &str) -> Self {
        Self {
            line,
            depth: 0,
            content: String::new(),
            raw: raw.to_string(),
            body: None,
            blank: true,
        }
    }
}

/// Output of [`segment`]: logical lines plus detected document conventions.
#[derive(Debug, Clone)]
pub struct Segmented {
    pub segments: Vec<Segment>,
    pub newline: Newline,
    pub indent: IndentUnit,
    pub trailing_newline: bool,
}

/// Split text into physical lines, stripping line terminators.
///
/// The final line is included whether or not the text ends with a newline.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    for nl in memchr_iter(b'\n', bytes) {
        let mut end = nl;
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(&text[start..end]);
        start = nl + 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Detect the indentation unit from the first indented line.
///
/// `divisor` is the depth the line is expected to sit at; for spaces the
/// leading run must divide evenly by it. All-tab indentation is unambiguous.
fn detect_unit(ws: &str, divisor: usize, line: usize) -> TmdlResult<IndentUnit> {
    let has_tab = ws.contains('\t');
    let has_space = ws.contains(' ');
    if has_tab && has_space {
        return Err(TmdlError::indentation(
            "mixed tabs and spaces in indentation",
            line,
        ));
    }
    if has_tab {
        return Ok(IndentUnit::Tabs);
    }
    let n = ws.len();
    if divisor > 0 && n % divisor == 0 {
        return Ok(IndentUnit::Spaces(n / divisor));
    }
    // Fall back to one unit shallower (a property line rather than an
    // expression body directly under an `=` declaration).
    if divisor > 1 && n % (divisor - 1) == 0 {
        return Ok(IndentUnit::Spaces(n / (divisor - 1)));
    }
    Err(TmdlError::indentation(
        format!("indentation of {} spaces does not fit any indent unit", n),
        line,
    ))
}

/// Depth of a leading-whitespace run, in units.
fn depth_of(ws: &str, unit: IndentUnit, line: usize) -> TmdlResult<usize> {
    match unit {
        IndentUnit::Tabs => {
            if ws.bytes().any(|b| b != b'\t') {
                return Err(TmdlError::indentation(
                    "expected tab indentation, found spaces",
                    line,
                ));
            }
            Ok(ws.len())
        }
        IndentUnit::Spaces(n) => {
            if ws.bytes().any(|b| b != b' ') {
                return Err(TmdlError::indentation(
                    "expected space indentation, found tabs",
                    line,
                ));
            }
            if ws.len() % n != 0 {
                return Err(TmdlError::indentation(
                    format!(
                        "indentation of {} spaces is not a whole number of {}-space units",
                        ws.len(),
                        n
                    ),
                    line,
                ));
            }
            Ok(ws.len() / n)
        }
    }
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Segment raw text into logical lines.
pub fn segment(text: &str, limits: &Limits) -> TmdlResult<Segmented> {
    if text.len() > limits.max_file_size {
        return Err(TmdlError::security(
            format!(
                "input size {} exceeds limit {}",
                text.len(),
                limits.max_file_size
            ),
            0,
        ));
    }

    let newline = match memchr(b'\n', text.as_bytes()) {
        Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => Newline::CrLf,
        _ => Newline::Lf,
    };
    let trailing_newline = text.ends_with('\n');

    let lines = split_lines(text);
    let mut segments: Vec<Segment> = Vec::new();
    let mut unit: Option<IndentUnit> = None;
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        let line_num = i + 1;
        if line.len() > limits.max_line_length {
            return Err(TmdlError::security(
                format!(
                    "line length {} exceeds limit {}",
                    line.len(),
                    limits.max_line_length
                ),
                line_num,
            ));
        }

        if line.trim().is_empty() {
            segments.push(Segment::blank_line(line_num, line));
            i += 1;
            continue;
        }

        let ws = leading_whitespace(line);
        let depth = if ws.is_empty() {
            0
        } else {
            if unit.is_none() {
                let prev_depth = segments
                    .iter()
                    .rev()
                    .find(|s| !s.blank)
                    .map(|s| s.depth)
                    .ok_or_else(|| {
                        TmdlError::indentation("unexpected indentation at start of file", line_num)
                    })?;
                unit = Some(detect_unit(ws, prev_depth + 1, line_num)?);
            }
            depth_of(ws, unit.unwrap(), line_num)?
        };
        if depth > limits.max_indent_depth {
            return Err(TmdlError::security(
                format!(
                    "indent depth {} exceeds limit {}",
                    depth, limits.max_indent_depth
                ),
                line_num,
            ));
        }

        let content = line.trim().to_string();
        let mut raw = line.to_string();
        let mut body: Option<String> = None;
        i += 1;

        // An `=`-terminated declaration folds its expression body (lines at
        // least two units deeper) into this logical line.
        if content.ends_with('=') {
            let mut body_lines: Vec<String> = Vec::new();
            let mut pending_blanks: Vec<&str> = Vec::new();
            let mut j = i;
            while j < lines.len() {
                let l = lines[j];
                if l.len() > limits.max_line_length {
                    return Err(TmdlError::security(
                        format!(
                            "line length {} exceeds limit {}",
                            l.len(),
                            limits.max_line_length
                        ),
                        j + 1,
                    ));
                }
                if l.trim().is_empty() {
                    pending_blanks.push(l);
                    j += 1;
                    continue;
                }
                let lw = leading_whitespace(l);
                if unit.is_none() && !lw.is_empty() {
                    unit = Some(detect_unit(lw, depth + 2, j + 1)?);
                }
                let prefix = unit.map(|u| u.prefix(depth + 2)).unwrap_or_default();
                if !prefix.is_empty() && l.starts_with(prefix.as_str()) {
                    for b in pending_blanks.drain(..) {
                        raw.push('\n');
                        raw.push_str(b);
                        body_lines.push(String::new());
                    }
                    raw.push('\n');
                    raw.push_str(l);
                    body_lines.push(l[prefix.len()..].to_string());
                    j += 1;
                    i = j;
                } else {
                    break;
                }
            }
            if !body_lines.is_empty() {
                body = Some(body_lines.join("\n").trim().to_string());
            }
        }

        segments.push(Segment {
            line: line_num,
            depth,
            content,
            raw,
            body,
            blank: false,
        });
    }

    Ok(Segmented {
        segments,
        newline,
        indent: unit.unwrap_or(IndentUnit::Tabs),
        trailing_newline,
    })
}
