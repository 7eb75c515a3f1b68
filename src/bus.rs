pub mod i2c;

use async_trait::async_trait;
use thiserror::Error;

/// Categorical fault from a single bus transaction attempt.
#[derive(Error, Debug)]
pub enum BusFault {
    #[error("bus error: {0}")]
    Bus(String),

    #[error("bus timeout")]
    Timeout,

    #[error("device did not acknowledge")]
    Nack,
}

/// One write-then-optional-read cycle against a device address.
///
/// `command` is written first (skipped when empty), then `response_len`
/// bytes are read back and assembled big-endian into the returned raw
/// value. Raw readings are at most 4 bytes wide. Implementations are
/// expected to complete within a bounded time; the callers never hold
/// the bus across device conversion delays.
#[async_trait]
pub trait Bus: Send {
    async fn transact(
        &mut self,
        address: u8,
        command: &[u8],
        response_len: usize,
    ) -> Result<u32, BusFault>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::{Bus, BusFault};
    use async_trait::async_trait;
    use std::collections::VecDeque;

    /// One recorded call against the mock bus.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Transaction {
        pub address: u8,
        pub command: Vec<u8>,
        pub response_len: usize,
    }

    /// Scripted in-memory bus. Each transaction pops the next scripted
    /// result; an empty script answers `Ok(0)`.
    pub(crate) struct MockBus {
        pub transactions: Vec<Transaction>,
        pub script: VecDeque<Result<u32, BusFault>>,
    }

    impl MockBus {
        pub fn new() -> Self {
            Self {
                transactions: Vec::new(),
                script: VecDeque::new(),
            }
        }

        pub fn push_ok(&mut self, raw: u32) {
            self.script.push_back(Ok(raw));
        }

        pub fn push_fault(&mut self, fault: BusFault) {
            self.script.push_back(Err(fault));
        }
    }

    #[async_trait]
    impl Bus for MockBus {
        async fn transact(
            &mut self,
            address: u8,
            command: &[u8],
            response_len: usize,
        ) -> Result<u32, BusFault> {
            self.transactions.push(Transaction {
                address,
                command: command.to_vec(),
                response_len,
            });
            match self.script.pop_front() {
                Some(result) => result,
                None => Ok(0),
            }
        }
    }
}
