// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Control file reading and line validation
//!
//! A control file holds one record operation per line:
//!
//! ```text
//! 84.151.10.in-addr.arpa. 244
//! 84.151.10.in-addr.arpa. 242 PTR mail.example.net.
//! example.com.  www  A 192.0.2.80
//! example.net.  @    mx 10 mail.example.com.
//! ```
//!
//! Zone, owner and type are single tokens. Everything after the type is the
//! record data and may contain whitespace.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::records::{AdditionRecord, DeletionKey};
use crate::types::SkipReason;

/// Fields a line is split into; the last one holds the unsplit remainder
pub const MAX_FIELDS: usize = 5;

/// Fields a record addition needs
pub const ADD_FIELDS: usize = 4;

/// What to do with the records of a control file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Remove,
}

/// One physical line of the control file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLine {
    /// 1-based line number
    pub number: usize,
    pub fields: Vec<String>,
}

/// Split a line on whitespace into at most [`MAX_FIELDS`] fields
///
/// The last field is the rest of the line with its inner whitespace intact.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(MAX_FIELDS);
    let mut rest = line.trim();

    while !rest.is_empty() {
        if fields.len() == MAX_FIELDS - 1 {
            fields.push(rest.to_string());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest.to_string());
                break;
            }
        }
    }

    fields
}

/// Path the control file is opened from
///
/// The path given on the command line is lowercased as a whole.
pub fn control_file_path(arg: &str) -> String {
    arg.to_lowercase()
}

/// Single-pass reader yielding numbered, split control lines
pub struct ControlFileReader<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: AsyncBufRead + Unpin> ControlFileReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    /// Read the next line, or `None` at end of file
    pub async fn next_line(&mut self) -> std::io::Result<Option<ControlLine>> {
        let Some(line) = self.lines.next_line().await? else {
            return Ok(None);
        };
        self.number += 1;

        Ok(Some(ControlLine {
            number: self.number,
            fields: split_fields(&line),
        }))
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> usize {
        self.number
    }
}

/// A validated control line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOp {
    Add(AdditionRecord),
    Remove(DeletionKey),
}

impl LineOp {
    /// Validate a control line for the given mode
    ///
    /// Add mode needs zone, owner, type and data. Remove mode takes either
    /// zone and owner alone, or all four.
    pub fn parse(line: &ControlLine, mode: Mode) -> Result<LineOp, SkipReason> {
        let fields = &line.fields;
        match fields.len() {
            0 => return Err(SkipReason::Blank),
            1 => return Err(SkipReason::TooFewFields { got: 1 }),
            _ => {}
        }

        match mode {
            Mode::Add => {
                if fields.len() < ADD_FIELDS {
                    return Err(SkipReason::NotEnoughForAddition {
                        expected: ADD_FIELDS,
                        got: fields.len(),
                    });
                }
                let rdata = fields[3..].join(" ");
                AdditionRecord::new(&fields[0], &fields[1], &fields[2], &rdata)
                    .map(LineOp::Add)
                    .map_err(SkipReason::InvalidName)
            }
            Mode::Remove => {
                let key = match fields.len() {
                    2 => DeletionKey::owner(&fields[0], &fields[1]),
                    3 => return Err(SkipReason::AmbiguousRemoval),
                    _ => {
                        let rdata = fields[3..].join(" ");
                        DeletionKey::new(&fields[0], &fields[1], &fields[2], &rdata)
                    }
                };
                key.map(LineOp::Remove).map_err(SkipReason::InvalidName)
            }
        }
    }
}
