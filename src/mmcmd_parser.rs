// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! mmcmd reply parser
//!
//! This module parses the line-oriented replies of the Men & Mice `mmcmd`
//! tool using nom.
//!
//! # Examples
//!
//! ```rust
//! use mmbatch::mmcmd_parser::parse_record_line;
//!
//! let record = parse_record_line("1: 244\t3600\tIN\tPTR\twww.example.com.").unwrap();
//! assert_eq!(record.index, "1");
//! assert_eq!(record.owner, "244");
//! assert_eq!(record.rtype, "PTR");
//! ```

use crate::records::BackendRecord;
use nom::{
    bytes::complete::{take_until, take_while},
    character::complete::char,
    combinator::rest,
    sequence::{separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;
use tracing::warn;

/// mmcmd reply parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyParseError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing record index in '{0}'")]
    MissingIndex(String),

    #[error("Missing owner name in '{0}'")]
    MissingOwner(String),
}

pub type ParseResult<T> = Result<T, ReplyParseError>;

// ========== Parser Primitives ==========

/// Parse one tab-delimited column (possibly empty)
fn column(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c != '\t')(input)
}

/// Parse one column and the tab that ends it
fn tab_column(input: &str) -> IResult<&str, &str> {
    terminated(column, char('\t'))(input)
}

/// Parse the leading "<index>: <owner>" column, splitting on the first colon
pub(crate) fn index_owner(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_until(":"), char(':'), rest)(input)
}

/// Collapse every run of whitespace to a single space
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ========== Reply Parsers ==========

/// Parse the reply of the `zones` command
///
/// The zone name is the first whitespace-delimited token of each line; blank
/// lines are ignored.
pub fn parse_zone_list(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Parse one line of a `print -l <zone>` reply
///
/// Format: `<index>: <owner>\t<ttl>\t<class>\t<type>\t<rdata>`. The record
/// data is everything after the fourth tab with its whitespace collapsed.
pub fn parse_record_line(line: &str) -> ParseResult<BackendRecord> {
    let parsed: IResult<&str, (&str, &str, &str, &str)> =
        tuple((tab_column, tab_column, tab_column, tab_column))(line);

    let (rdata, (head, ttl, class, rtype)) =
        parsed.map_err(|e| ReplyParseError::ParseError(format!("{}: '{}'", e, line)))?;

    let (_, (index, owner)) = index_owner(head)
        .map_err(|_| ReplyParseError::MissingIndex(head.to_string()))?;

    let index = index.trim();
    let owner = owner.trim();
    if index.is_empty() {
        return Err(ReplyParseError::MissingIndex(head.to_string()));
    }
    if owner.is_empty() {
        return Err(ReplyParseError::MissingOwner(head.to_string()));
    }

    Ok(BackendRecord {
        index: index.to_string(),
        owner: owner.to_string(),
        ttl: ttl.trim().to_string(),
        class: class.trim().to_string(),
        rtype: rtype.trim().to_string(),
        rdata: collapse_whitespace(rdata),
    })
}

/// Parse a full `print -l <zone>` reply
///
/// Lines that do not parse are logged and dropped rather than failing the
/// whole listing.
pub fn parse_record_list(reply: &str) -> Vec<BackendRecord> {
    reply
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_record_line(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unparsable record line from mmcmd: {}", e);
                None
            }
        })
        .collect()
}
