//! Decoding of word-aligned contract call results.
//!
//! Some registries are only reachable through a raw contract call that
//! returns ABI-encoded data. Responses are split into 32-byte words:
//!
//! ```text
//! word 0   done flag (non-zero = last page)
//! word 1   cursor for the next page
//! word 2   reserved (dynamic array offset, ignored)
//! word 3   item count
//! word 4.. items, one word each
//! ```
//!
//! A record response is a flat struct of words from which a single field is
//! read at a fixed word index.

use naka_core::constants::{PAGE_HEADER_WORDS, WORD_SIZE};
use naka_core::error::DecodeError;
use naka_core::types::Weight;
use naka_stake::normalize_word;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use tracing::warn;

/// One 32-byte ABI word.
pub type Word = [u8; WORD_SIZE];

const DONE_WORD: usize = 0;
const CURSOR_WORD: usize = 1;
const COUNT_WORD: usize = 3;

/// A decoded page of an enumeration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Items in the order the contract returned them.
    pub items: Vec<Word>,
    /// Cursor to pass to the next call.
    pub next_cursor: Word,
    /// Whether this was the last page.
    pub done: bool,
}

/// Encode an unsigned integer as a zero-padded big-endian word.
pub fn word_from_u64(value: u64) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word[WORD_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Build calldata: `0x` + 4-byte selector + one word argument.
pub fn encode_call(selector: &str, arg: &Word) -> String {
    let selector = selector.trim_start_matches("0x");
    format!("0x{selector}{}", hex::encode(arg))
}

/// Decode a `0x`-prefixed (or bare) hex string into bytes.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(body).map_err(|e| DecodeError::InvalidHex(e.to_string()))
}

fn word_at(buf: &[u8], index: usize) -> Result<Word, DecodeError> {
    let start = index * WORD_SIZE;
    let end = start + WORD_SIZE;
    buf.get(start..end)
        .and_then(|slice| Word::try_from(slice).ok())
        .ok_or(DecodeError::TruncatedBuffer {
            needed: end,
            got: buf.len(),
        })
}

/// Decode one enumeration page.
///
/// Fails with [`DecodeError::TruncatedBuffer`] if the four header words are
/// not all present. If the buffer ends before `count` items, the items that
/// are present are returned and the shortfall is logged.
pub fn decode_page(buf: &[u8]) -> Result<Page, DecodeError> {
    let header_len = PAGE_HEADER_WORDS * WORD_SIZE;
    if buf.len() < header_len {
        return Err(DecodeError::TruncatedBuffer {
            needed: header_len,
            got: buf.len(),
        });
    }

    let done = word_at(buf, DONE_WORD)?.iter().any(|b| *b != 0);
    let next_cursor = word_at(buf, CURSOR_WORD)?;
    let declared = BigUint::from_bytes_be(&word_at(buf, COUNT_WORD)?)
        .to_usize()
        .unwrap_or(usize::MAX);

    let available = (buf.len() - header_len) / WORD_SIZE;
    if available < declared {
        warn!(
            declared,
            available,
            "truncated page: buffer ends before all items, keeping partial result"
        );
    }

    let items = (0..declared.min(available))
        .map(|i| word_at(buf, PAGE_HEADER_WORDS + i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        items,
        next_cursor,
        done,
    })
}

/// Read the word at `word_index` of a single-record buffer as an unsigned
/// big-endian integer.
pub fn extract_field(buf: &[u8], word_index: usize) -> Result<Weight, DecodeError> {
    word_at(buf, word_index).map(|word| normalize_word(&word))
}
