//! Fixtures shared by the unit tests here and by the integration test crate.

use async_trait::async_trait;
use naka_core::constants::{PAGE_HEADER_WORDS, WORD_SIZE};
use naka_core::error::AdapterError;
use naka_core::traits::RawCallTransport;
use parking_lot::Mutex;

use crate::abi::word_from_u64;

/// Paged enumeration response: done flag, next cursor, reserved, count, items.
pub fn page_bytes(done: bool, next: u64, items: &[u64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity((PAGE_HEADER_WORDS + items.len()) * WORD_SIZE);
    buf.extend_from_slice(&word_from_u64(done as u64));
    buf.extend_from_slice(&word_from_u64(next));
    buf.extend_from_slice(&word_from_u64(0));
    buf.extend_from_slice(&word_from_u64(items.len() as u64));
    for item in items {
        buf.extend_from_slice(&word_from_u64(*item));
    }
    buf
}

/// Eight-word validator record with `stake` at `stake_word`.
pub fn record_bytes(stake_word: usize, stake: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 8 * WORD_SIZE];
    let start = stake_word * WORD_SIZE;
    buf[start..start + WORD_SIZE].copy_from_slice(&word_from_u64(stake));
    buf
}

pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

type Handler = Box<dyn Fn(&str, &str) -> Result<String, AdapterError> + Send + Sync>;

/// In-memory [`RawCallTransport`] answering from a closure and recording calldata.
pub struct ScriptedTransport {
    handler: Handler,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, AdapterError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RawCallTransport for ScriptedTransport {
    async fn call(&self, to: &str, data: &str) -> Result<String, AdapterError> {
        self.calls.lock().push(data.to_string());
        (self.handler)(to, data)
    }
}
