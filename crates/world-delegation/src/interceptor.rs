//! Automatic delegation of World writes.
//!
//! [`CallFrom`] wraps a client and makes every write to the World on behalf of a delegator.
//! Writes to the World are rewritten into `callFrom(delegator, systemId, systemCalldata)`, where
//! the System and its function selector are resolved from the World function selector of the
//! original call. The resolution is cached, so a World function is resolved at most once per
//! cache.
//!
//! Selectors are resolved with a caller supplied [`SelectorMapper`] if one is configured, which
//! lets callers use their own client-side data for the lookup. Otherwise the `FunctionSelectors`
//! table of the World is read through the configured [`ContractReader`], which defaults to the
//! wrapped client itself. A client that can only write is wrapped with [`CallFrom::writer_only`]
//! and needs a mapper or an explicit reader.

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use world_contracts::{BATCH_CALL_FROM, CALL_FROM, WORLD_CALL_ABI};

use crate::{
    arguments,
    call::{batch_system_calls, system_call_from_value},
    rewrite, selector, CallShape, ContractReader, DelegationError, NoMapper, NoReader,
    ResolutionCache, ResolutionStrategy, Result, SelectorMapper, SelectorResolver, WorldCall,
    WorldWriter,
};

/// The addresses an interceptor works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFromConfig {
    /// The World whose writes are delegated.
    pub world_address: Address,
    /// The account the writes are made on behalf of.
    pub delegator_address: Address,
}

impl CallFromConfig {
    /// Creates a new [`CallFromConfig`].
    pub const fn new(world_address: Address, delegator_address: Address) -> Self {
        Self { world_address, delegator_address }
    }
}

/// A client wrapper that submits World writes on behalf of a delegator.
#[derive(derive_more::Debug)]
pub struct CallFrom<C, M = NoMapper, R = C> {
    client: C,
    config: CallFromConfig,
    #[debug(ignore)]
    mapper: Option<M>,
    #[debug(ignore)]
    reader: Option<R>,
    resolver: SelectorResolver,
}

impl<C: Clone> CallFrom<C> {
    /// Wraps `client`. Selectors are resolved on-chain through `client` and cached in the
    /// process-wide [`ResolutionCache`].
    pub fn new(client: C, config: CallFromConfig) -> Self {
        Self {
            reader: Some(client.clone()),
            client,
            config,
            mapper: None,
            resolver: SelectorResolver::default(),
        }
    }
}

impl<C> CallFrom<C, NoMapper, NoReader> {
    /// Wraps a `client` that cannot read. Selectors resolve only once a mapper
    /// ([`Self::with_mapper`]) or a reader ([`Self::with_reader`]) is configured.
    pub fn writer_only(client: C, config: CallFromConfig) -> Self {
        Self { client, config, mapper: None, reader: None, resolver: SelectorResolver::default() }
    }
}

impl<C, M, R> CallFrom<C, M, R> {
    /// Resolves selectors with `mapper` instead of reading the World.
    pub fn with_mapper<M2: SelectorMapper>(self, mapper: M2) -> CallFrom<C, M2, R> {
        CallFrom {
            client: self.client,
            config: self.config,
            mapper: Some(mapper),
            reader: self.reader,
            resolver: self.resolver,
        }
    }

    /// Reads the World through `reader` instead of the wrapped client.
    pub fn with_reader<R2: ContractReader>(self, reader: R2) -> CallFrom<C, M, R2> {
        CallFrom {
            client: self.client,
            config: self.config,
            mapper: self.mapper,
            reader: Some(reader),
            resolver: self.resolver,
        }
    }

    /// Caches resolutions in `cache` instead of the process-wide cache.
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.resolver = SelectorResolver::new(cache);
        self
    }

    /// The configuration of this interceptor.
    pub const fn config(&self) -> &CallFromConfig {
        &self.config
    }

    /// The wrapped client.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The cache resolutions are stored in.
    pub const fn cache(&self) -> &Arc<ResolutionCache> {
        self.resolver.cache()
    }
}

impl<C, M, R> CallFrom<C, M, R>
where
    M: SelectorMapper,
    R: ContractReader,
{
    /// Returns the call that is submitted in place of `call`.
    ///
    /// Calls to other contracts and calls to the delegation primitives are returned as they
    /// are. A `batchCall` becomes a `batchCallFrom` with the delegator as `from` of every system
    /// call. Any other World call becomes a `callFrom` to the System implementing it.
    pub async fn delegate(&self, call: WorldCall) -> Result<WorldCall> {
        match CallShape::classify(&call, self.config.world_address) {
            CallShape::Passthrough => {
                trace!(
                    address = %call.address,
                    function = %call.function_name,
                    "Passing call through"
                );
                Ok(call)
            }
            CallShape::Batch => {
                let system_calls = batch_system_calls(&call.args)?;
                if system_calls.is_empty() {
                    return Err(DelegationError::EmptyBatch);
                }
                debug!(calls = system_calls.len(), "Wrapping batch call with delegator");
                let system_calls = system_calls
                    .iter()
                    .map(|system_call| {
                        system_call_from_value(
                            self.config.delegator_address,
                            system_call.systemId,
                            &system_call.callData,
                        )
                    })
                    .collect();
                Ok(WorldCall::new(
                    call.address,
                    BATCH_CALL_FROM,
                    WORLD_CALL_ABI.clone(),
                    vec![DynSolValue::Array(system_calls)],
                ))
            }
            CallShape::Generic => {
                let world_calldata = call.encode()?;
                let world_function_selector = selector(&world_calldata);

                let strategy = match (&self.mapper, &self.reader) {
                    (Some(mapper), _) => ResolutionStrategy::Mapper(mapper),
                    (None, Some(reader)) => ResolutionStrategy::OnChain(reader),
                    (None, None) => {
                        return Err(DelegationError::NoResolver(world_function_selector))
                    }
                };
                let system_function = self
                    .resolver
                    .resolve(self.config.world_address, world_function_selector, strategy)
                    .await?;

                let system_calldata =
                    rewrite(system_function.system_function_selector, arguments(&world_calldata));
                debug!(
                    function = %call.function_name,
                    system_id = %system_function.system_id,
                    "Delegating world call through callFrom"
                );
                Ok(WorldCall::new(
                    call.address,
                    CALL_FROM,
                    WORLD_CALL_ABI.clone(),
                    vec![
                        DynSolValue::Address(self.config.delegator_address),
                        DynSolValue::FixedBytes(system_function.system_id, 32),
                        DynSolValue::Bytes(system_calldata.to_vec()),
                    ],
                ))
            }
        }
    }
}

impl<C, M, R> CallFrom<C, M, R>
where
    C: WorldWriter,
    M: SelectorMapper,
    R: ContractReader,
{
    /// Submits `call` through the wrapped client, delegated as described in
    /// [`Self::delegate`]. Exactly one write is submitted, and nothing is submitted if the
    /// delegation fails.
    pub async fn write_contract(&self, call: WorldCall) -> Result<C::Output> {
        let call = self.delegate(call).await?;
        self.client.write_contract(call).await.map_err(|err| DelegationError::Write(Box::new(err)))
    }
}
