//! Paginated validator registry read through raw contract calls.
//!
//! Drives the enumeration protocol described in [`crate::abi`]: starting from
//! cursor 0, call the enumerate selector, append the page items, follow the
//! returned cursor and stop on the done flag. Every enumerated id is then
//! looked up with the record selector and its stake word decoded.

use std::sync::Arc;
use std::time::Duration;

use naka_core::error::{AdapterError, DecodeError};
use naka_core::network::NetworkId;
use naka_core::traits::RawCallTransport;
use naka_core::types::{StakeDistribution, Weight};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info, warn};

use crate::abi::{decode_hex, decode_page, encode_call, extract_field, Word};

/// Where a registry lives and how its responses are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLayout {
    /// Contract (or precompile) address.
    pub contract: String,
    /// Selector of the paged "list validators" call.
    pub enumerate_selector: String,
    /// Selector of the "get validator record" call.
    pub record_selector: String,
    /// Word index of the stake field within a record.
    pub stake_word: usize,
}

/// Reader for a paged on-chain validator registry.
pub struct PagedRegistry {
    transport: Arc<dyn RawCallTransport>,
    layout: RegistryLayout,
    max_pages: usize,
    page_delay: Duration,
}

impl PagedRegistry {
    pub fn new(
        transport: Arc<dyn RawCallTransport>,
        layout: RegistryLayout,
        max_pages: usize,
        page_delay: Duration,
    ) -> Self {
        Self {
            transport,
            layout,
            max_pages,
            page_delay,
        }
    }

    pub fn layout(&self) -> &RegistryLayout {
        &self.layout
    }

    /// Collect every item id across all pages, in the order received.
    ///
    /// Fails with [`DecodeError::PaginationLimitExceeded`] if the endpoint is
    /// still not done after `max_pages` pages.
    pub async fn enumerate(&self) -> Result<Vec<Word>, AdapterError> {
        let mut cursor: Word = [0u8; 32];
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.max_pages {
                return Err(DecodeError::PaginationLimitExceeded {
                    max_pages: self.max_pages,
                }
                .into());
            }
            if pages > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let data = encode_call(&self.layout.enumerate_selector, &cursor);
            let raw = self.transport.call(&self.layout.contract, &data).await?;
            let page = decode_page(&decode_hex(&raw)?)?;
            pages += 1;

            debug!(page = pages, items = page.items.len(), done = page.done, "registry page");
            items.extend(page.items);

            if page.done {
                return Ok(items);
            }
            cursor = page.next_cursor;
        }
    }

    /// Fetch one record and decode its stake field.
    pub async fn record_weight(&self, id: &Word) -> Result<Weight, AdapterError> {
        let data = encode_call(&self.layout.record_selector, id);
        let raw = self.transport.call(&self.layout.contract, &data).await?;
        let stake = extract_field(&decode_hex(&raw)?, self.layout.stake_word)?;
        Ok(stake)
    }

    /// Enumerate the registry and build the stake distribution.
    ///
    /// A record that cannot be fetched or decoded is logged and skipped;
    /// records with zero stake are left out.
    pub async fn distribution(&self, network: NetworkId) -> Result<StakeDistribution, AdapterError> {
        let ids = self.enumerate().await?;
        info!(%network, validators = ids.len(), "enumerated validator registry");

        let mut weights = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.record_weight(id).await {
                Ok(stake) if stake.is_zero() => {
                    debug!(%network, validator = %BigUint::from_bytes_be(id), "skipping zero stake");
                }
                Ok(stake) => weights.push(stake),
                Err(e) => warn!(
                    %network,
                    validator = %BigUint::from_bytes_be(id),
                    error = %e,
                    "failed to fetch validator stake"
                ),
            }
        }

        Ok(StakeDistribution::from_weights(weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::word_from_u64;
    use crate::testing::{page_bytes, record_bytes, to_hex, ScriptedTransport};

    const ENUM: &str = "aaaaaaaa";
    const RECORD: &str = "bbbbbbbb";

    fn layout() -> RegistryLayout {
        RegistryLayout {
            contract: "0x0000000000000000000000000000000000001000".into(),
            enumerate_selector: ENUM.into(),
            record_selector: RECORD.into(),
            stake_word: 6,
        }
    }

    fn registry(transport: Arc<ScriptedTransport>, max_pages: usize) -> PagedRegistry {
        PagedRegistry::new(transport, layout(), max_pages, Duration::ZERO)
    }

    fn cursor_of(data: &str) -> u64 {
        u64::from_str_radix(&data[data.len() - 16..], 16).unwrap()
    }

    #[tokio::test]
    async fn two_page_enumeration_preserves_order() {
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            assert!(data.starts_with(&format!("0x{ENUM}")));
            match cursor_of(data) {
                0 => Ok(to_hex(&page_bytes(false, 1, &[0xA, 0xB]))),
                1 => Ok(to_hex(&page_bytes(true, 99, &[0xC]))),
                other => panic!("unexpected cursor {other}"),
            }
        }));
        let items = registry(transport.clone(), 10).enumerate().await.unwrap();

        assert_eq!(
            items,
            vec![word_from_u64(0xA), word_from_u64(0xB), word_from_u64(0xC)]
        );
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn endless_pagination_is_capped() {
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            let next = cursor_of(data) + 1;
            Ok(to_hex(&page_bytes(false, next, &[next])))
        }));
        let err = registry(transport.clone(), 5).enumerate().await.unwrap_err();

        assert_eq!(
            err,
            AdapterError::Decode(DecodeError::PaginationLimitExceeded { max_pages: 5 })
        );
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test]
    async fn truncated_header_aborts_enumeration() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| Ok(to_hex(&[0u8; 96]))));
        let err = registry(transport, 10).enumerate().await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Decode(DecodeError::TruncatedBuffer { needed: 128, got: 96 })
        ));
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| {
            Err(AdapterError::SourceUnreachable("connection refused".into()))
        }));
        let err = registry(transport, 10).enumerate().await.unwrap_err();
        assert!(matches!(err, AdapterError::SourceUnreachable(_)));
    }

    #[tokio::test]
    async fn distribution_skips_zero_and_failed_records() {
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            if data.starts_with(&format!("0x{ENUM}")) {
                return Ok(to_hex(&page_bytes(true, 0, &[1, 2, 3, 4])));
            }
            match cursor_of(data) {
                1 => Ok(to_hex(&record_bytes(6, 500))),
                2 => Ok(to_hex(&record_bytes(6, 0))),
                3 => Err(AdapterError::SourceError("rpc error: reverted".into())),
                4 => Ok(to_hex(&record_bytes(6, 300))),
                other => panic!("unexpected id {other}"),
            }
        }));
        let dist = registry(transport.clone(), 10)
            .distribution(NetworkId::Mon)
            .await
            .unwrap();

        assert_eq!(dist.weights(), &[Weight::from(500u64), Weight::from(300u64)]);
        assert_eq!(dist.total(), &Weight::from(800u64));
        // One enumerate call plus four record lookups.
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test]
    async fn short_record_is_skipped() {
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            if data.starts_with(&format!("0x{ENUM}")) {
                return Ok(to_hex(&page_bytes(true, 0, &[1, 2])));
            }
            match cursor_of(data) {
                1 => Ok(to_hex(&[0u8; 6 * 32])),
                _ => Ok(to_hex(&record_bytes(6, 42))),
            }
        }));
        let dist = registry(transport, 10).distribution(NetworkId::Mon).await.unwrap();
        assert_eq!(dist.weights(), &[Weight::from(42u64)]);
    }

    #[tokio::test]
    async fn record_call_targets_contract() {
        let transport = Arc::new(ScriptedTransport::new(|to, _| {
            assert_eq!(to, "0x0000000000000000000000000000000000001000");
            Ok(to_hex(&record_bytes(6, 7)))
        }));
        let stake = registry(transport.clone(), 10)
            .record_weight(&word_from_u64(9))
            .await
            .unwrap();
        assert_eq!(stake, Weight::from(7u64));
        let calls = transport.calls();
        assert_eq!(calls[0], format!("0x{RECORD}{:064x}", 9));
    }
}
