//! Resolution of World function selectors to System functions.

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Selector, B256};
use alloy_sol_types::SolCall;
use tracing::{debug, trace};
use world_contracts::IStoreRead;

use crate::{
    decode_record, encode_key_tuple, CacheKey, ContractReader, DelegationError, ResolutionCache,
    Result, SelectorMapper, SystemFunction, FUNCTION_SELECTORS_TABLE_ID,
    FUNCTION_SELECTORS_VALUE_SCHEMA,
};

/// Where a cache miss is resolved.
#[derive(Debug)]
pub enum ResolutionStrategy<'a, M, R> {
    /// Ask a caller supplied mapper. A mapping to the zero System id counts as unregistered.
    Mapper(&'a M),
    /// Read the World's `FunctionSelectors` table.
    OnChain(&'a R),
}

impl<M, R> Clone for ResolutionStrategy<'_, M, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, R> Copy for ResolutionStrategy<'_, M, R> {}

/// Resolves World function selectors through a [`ResolutionCache`].
#[derive(Debug, Clone)]
pub struct SelectorResolver {
    cache: Arc<ResolutionCache>,
}

impl Default for SelectorResolver {
    fn default() -> Self {
        Self::new(ResolutionCache::shared())
    }
}

impl SelectorResolver {
    /// Creates a resolver backed by `cache`.
    pub const fn new(cache: Arc<ResolutionCache>) -> Self {
        Self { cache }
    }

    /// The cache of this resolver.
    pub const fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Returns the System function implementing `world_function_selector` on the World at
    /// `world_address`.
    ///
    /// A cached resolution is returned without I/O. Otherwise `strategy` is awaited and its result
    /// cached. A failed resolution leaves the cache untouched, so the next call tries again.
    pub async fn resolve<M, R>(
        &self,
        world_address: Address,
        world_function_selector: Selector,
        strategy: ResolutionStrategy<'_, M, R>,
    ) -> Result<SystemFunction>
    where
        M: SelectorMapper,
        R: ContractReader,
    {
        let key = CacheKey::new(world_address, world_function_selector);
        if let Some(system_function) = self.cache.get(&key) {
            trace!(
                world = %world_address,
                selector = %world_function_selector,
                "Resolution cache hit"
            );
            return Ok(system_function);
        }

        let system_function = match strategy {
            ResolutionStrategy::Mapper(mapper) => {
                let system_function = mapper
                    .system_function(world_function_selector)
                    .await
                    .map_err(|err| DelegationError::Mapping(Box::new(err)))?;
                if system_function.system_id.is_zero() {
                    return Err(DelegationError::UnregisteredSelector {
                        world: world_address,
                        selector: world_function_selector,
                    });
                }
                system_function
            }
            ResolutionStrategy::OnChain(reader) => {
                read_system_function(reader, world_address, world_function_selector).await?
            }
        };

        debug!(
            world = %world_address,
            selector = %world_function_selector,
            system_id = %system_function.system_id,
            system_selector = %system_function.system_function_selector,
            "Resolved world function"
        );
        Ok(self.cache.insert(key, system_function))
    }
}

/// Reads the System function registered for `world_function_selector` from the World's
/// `FunctionSelectors` table.
pub async fn read_system_function<R: ContractReader>(
    reader: &R,
    world_address: Address,
    world_function_selector: Selector,
) -> Result<SystemFunction> {
    let mut selector_word = B256::ZERO;
    selector_word[..Selector::len_bytes()].copy_from_slice(world_function_selector.as_slice());
    let key_tuple =
        encode_key_tuple(&[DynSolValue::FixedBytes(selector_word, Selector::len_bytes())])?;

    let input =
        IStoreRead::getRecordCall { tableId: FUNCTION_SELECTORS_TABLE_ID, keyTuple: key_tuple }
            .abi_encode();
    trace!(
        world = %world_address,
        selector = %world_function_selector,
        "Reading function selector record"
    );
    let output = reader
        .call(world_address, input.into())
        .await
        .map_err(|err| DelegationError::Read(Box::new(err)))?;

    let record = IStoreRead::getRecordCall::abi_decode_returns(&output, true)?;
    let fields = decode_record(
        FUNCTION_SELECTORS_VALUE_SCHEMA,
        &record.staticData,
        record.encodedLengths.into(),
        &record.dynamicData,
    )?;
    let system_function = SystemFunction::new(
        B256::from_slice(&fields.static_fields[0]),
        Selector::from_slice(&fields.static_fields[1]),
    );

    if system_function.system_id.is_zero() {
        return Err(DelegationError::UnregisteredSelector {
            world: world_address,
            selector: world_function_selector,
        });
    }
    Ok(system_function)
}
