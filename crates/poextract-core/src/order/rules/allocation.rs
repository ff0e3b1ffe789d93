//! Budgetary allocation blocks.
//!
//! A block follows the `Imputation budgétaire` anchor and is made of six
//! whitespace-separated tokens in fixed order. Each token kind is a
//! [`TokenShape`]; the scanner only knows how to walk the sequence.

use regex::Regex;
use tracing::trace;

use super::patterns::{
    ALLOCATION_ANCHOR, BUDGET_ACCOUNT, DESTINATION_CODE, ELEMENT_CODE, HEADING_CODE,
    ORG_STRUCTURE, PROGRAM_AUTHORIZATION,
};
use crate::models::record::AllocationBlock;

/// Shape of one token of an allocation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    /// At least three digits, a hyphen, then a non-space run (`611-2281`).
    BudgetAccount,
    /// `P` followed by digits (`P45`).
    HeadingCode,
    /// Exactly two digits.
    OrgStructure,
    /// Exactly seven digits.
    ProgramAuthorization,
    /// Exactly ten digits.
    DestinationCode,
    /// `A` followed by digits (`A99`); trailing characters are ignored.
    ElementCode,
}

impl TokenShape {
    /// Token order inside a block.
    pub const SEQUENCE: [TokenShape; 6] = [
        TokenShape::BudgetAccount,
        TokenShape::HeadingCode,
        TokenShape::OrgStructure,
        TokenShape::ProgramAuthorization,
        TokenShape::DestinationCode,
        TokenShape::ElementCode,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            TokenShape::BudgetAccount => &*BUDGET_ACCOUNT,
            TokenShape::HeadingCode => &*HEADING_CODE,
            TokenShape::OrgStructure => &*ORG_STRUCTURE,
            TokenShape::ProgramAuthorization => &*PROGRAM_AUTHORIZATION,
            TokenShape::DestinationCode => &*DESTINATION_CODE,
            TokenShape::ElementCode => &*ELEMENT_CODE,
        }
    }

    /// Whether the shape has to cover the whole whitespace-delimited token.
    fn whole_token(&self) -> bool {
        matches!(
            self,
            TokenShape::HeadingCode
                | TokenShape::OrgStructure
                | TokenShape::ProgramAuthorization
                | TokenShape::DestinationCode
        )
    }

    /// Length in bytes of the value this shape reads at the start of `input`.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        if self.whole_token() {
            let token = input.split(char::is_whitespace).next().unwrap_or("");
            self.pattern().is_match(token).then_some(token.len())
        } else {
            self.pattern().find(input).map(|m| m.end())
        }
    }

    /// Check a standalone value against this shape.
    pub fn matches(&self, value: &str) -> bool {
        self.match_len(value) == Some(value.len())
    }
}

/// Read a full block starting exactly at `start`.
///
/// Returns the block and the byte offset right after its last token.
pub fn match_block_at(text: &str, start: usize) -> Option<(AllocationBlock, usize)> {
    let mut pos = start;
    let mut values: Vec<&str> = Vec::with_capacity(TokenShape::SEQUENCE.len());

    for (i, shape) in TokenShape::SEQUENCE.iter().enumerate() {
        if i > 0 {
            let rest = &text[pos..];
            let skipped = rest.len() - rest.trim_start().len();
            if skipped == 0 {
                return None;
            }
            pos += skipped;
        }

        let len = shape.match_len(&text[pos..])?;
        values.push(&text[pos..pos + len]);
        pos += len;
    }

    let block = AllocationBlock {
        budget_account: values[0].to_string(),
        heading_code: values[1].to_string(),
        organizational_structure: values[2].to_string(),
        program_authorization: values[3].to_string(),
        destination_code: values[4].to_string(),
        element_code: values[5].to_string(),
    };
    Some((block, pos))
}

/// Find the block belonging to an anchor ending at `anchor_end`.
///
/// The block may start right after the anchor. When the anchor ends its line,
/// any intervening lines are skipped and the earliest position that reads a
/// full block wins.
fn find_block_after(text: &str, anchor_end: usize) -> Option<(AllocationBlock, usize)> {
    if let Some(hit) = match_block_at(text, anchor_end) {
        return Some(hit);
    }

    let tail = &text[anchor_end..];
    if !tail.starts_with('\n') {
        return None;
    }

    tail.char_indices()
        .skip(1)
        .find_map(|(offset, _)| match_block_at(text, anchor_end + offset))
}

/// Scan `text` for every allocation block, in document order.
///
/// Anchors lying inside an already consumed block are ignored, so each block
/// is reported once.
pub fn scan_allocations(text: &str) -> Vec<AllocationBlock> {
    let mut blocks = Vec::new();
    let mut consumed = 0;

    for (index, anchor) in text.match_indices(ALLOCATION_ANCHOR) {
        let anchor_end = index + anchor.len();
        if anchor_end < consumed {
            continue;
        }

        match find_block_after(text, anchor_end) {
            Some((block, end)) => {
                trace!("Allocation block at {}..{}: {:?}", anchor_end, end, block);
                blocks.push(block);
                consumed = end;
            }
            None => trace!("No allocation block after anchor at {}", index),
        }
    }

    blocks
}
