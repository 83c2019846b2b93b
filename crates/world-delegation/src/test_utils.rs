//! Test doubles for the capabilities consumed by the delegation layer.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, RwLock,
};

use alloy_primitives::{map::HashMap, Address, Bytes, Selector, B256};
use alloy_sol_types::SolCall;
use world_contracts::IStoreRead;

use crate::{
    CacheKey, ContractReader, SelectorMapper, SystemFunction, WorldCall, WorldWriter,
    FUNCTION_SELECTORS_TABLE_ID,
};

/// Errors raised by the test doubles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// Reads were configured to fail
    #[error("mock transport failure")]
    Transport,
    /// The mapper has no entry for the selector
    #[error("no system function for selector {0}")]
    UnknownSelector(Selector),
    /// The read is not a `FunctionSelectors` record read
    #[error("unexpected call input")]
    UnexpectedInput,
}

/// An in-memory World client.
///
/// Reads answer `getRecord` calls on the `FunctionSelectors` table from the registered records;
/// unregistered selectors read as zeroed records, like an empty store slot. Reads can be made to
/// fail or to yield before answering. Writes are recorded
/// in submission order, and each returns its index.
#[derive(Debug, Clone, Default)]
pub struct MockWorldClient {
    records: Arc<RwLock<HashMap<CacheKey, SystemFunction>>>,
    reads: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    yield_reads: Arc<AtomicBool>,
    writes: Arc<Mutex<Vec<WorldCall>>>,
}

impl MockWorldClient {
    /// Creates a client without records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `system_function` for `world_function_selector` on the World at `world`.
    pub fn with_record(
        self,
        world: Address,
        world_function_selector: Selector,
        system_function: SystemFunction,
    ) -> Self {
        self.records
            .write()
            .expect("RwLock poisoned")
            .insert(CacheKey::new(world, world_function_selector), system_function);
        self
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent reads yield to the runtime once before answering, so that concurrent
    /// reads interleave.
    pub fn set_yield_reads(&self, yield_reads: bool) {
        self.yield_reads.store(yield_reads, Ordering::SeqCst);
    }

    /// The number of reads issued so far, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// The calls submitted so far.
    pub fn writes(&self) -> Vec<WorldCall> {
        self.writes.lock().expect("Mutex poisoned").clone()
    }
}

impl ContractReader for MockWorldClient {
    type Error = MockError;

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, Self::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MockError::Transport);
        }
        if self.yield_reads.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        let request = IStoreRead::getRecordCall::abi_decode(&input, true)
            .map_err(|_| MockError::UnexpectedInput)?;
        if request.tableId != FUNCTION_SELECTORS_TABLE_ID {
            return Err(MockError::UnexpectedInput);
        }
        let key = request.keyTuple.first().ok_or(MockError::UnexpectedInput)?;
        let selector = Selector::from_slice(&key[..Selector::len_bytes()]);

        let record = self
            .records
            .read()
            .expect("RwLock poisoned")
            .get(&CacheKey::new(to, selector))
            .copied()
            .unwrap_or(SystemFunction::new(B256::ZERO, Selector::ZERO));
        let static_data: Bytes =
            [record.system_id.as_slice(), record.system_function_selector.as_slice()]
                .concat()
                .into();

        Ok(IStoreRead::getRecordCall::abi_encode_returns(&(static_data, B256::ZERO, Bytes::new()))
            .into())
    }
}

impl WorldWriter for MockWorldClient {
    type Output = usize;
    type Error = MockError;

    async fn write_contract(&self, call: WorldCall) -> Result<Self::Output, Self::Error> {
        let mut writes = self.writes.lock().expect("Mutex poisoned");
        writes.push(call);
        Ok(writes.len() - 1)
    }
}

/// A [`SelectorMapper`] backed by a fixed table, counting how often it is asked.
#[derive(Debug, Clone, Default)]
pub struct StaticMapper {
    entries: HashMap<Selector, SystemFunction>,
    calls: Arc<AtomicUsize>,
}

impl StaticMapper {
    /// Creates a mapper without entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `world_function_selector` to `system_function`.
    pub fn with_entry(
        mut self,
        world_function_selector: Selector,
        system_function: SystemFunction,
    ) -> Self {
        self.entries.insert(world_function_selector, system_function);
        self
    }

    /// The number of mappings requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SelectorMapper for StaticMapper {
    type Error = MockError;

    async fn system_function(
        &self,
        world_function_selector: Selector,
    ) -> Result<SystemFunction, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(&world_function_selector)
            .copied()
            .ok_or(MockError::UnknownSelector(world_function_selector))
    }
}
