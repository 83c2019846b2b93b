//! Capabilities the delegation layer consumes.
//!
//! Reading from a contract, submitting a write and mapping World selectors are provided by the
//! embedding application. Implementations are expected to be cheap to share across concurrent
//! calls.

use core::{convert::Infallible, future::Future};

use alloy_primitives::{Address, Bytes, Selector};

use crate::{SystemFunction, WorldCall};

/// Executes read-only contract calls.
pub trait ContractReader: Send + Sync {
    /// The error returned by the transport.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Executes a read-only call of `input` against the contract at `to` and returns the raw
    /// return data.
    fn call(
        &self,
        to: Address,
        input: Bytes,
    ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

/// Submits contract writes.
pub trait WorldWriter: Send + Sync {
    /// What a submission returns, typically a transaction hash or a pending transaction handle.
    type Output;

    /// The error returned by the submission.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Submits `call` and returns its handle unchanged.
    fn write_contract(
        &self,
        call: WorldCall,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Maps a World function selector to the System function that implements it.
///
/// This lets callers resolve selectors from their own data (for example a synced client store)
/// instead of reading the World. Any `Fn(Selector) -> impl Future<Output = Result<SystemFunction,
/// E>>` is a mapper.
pub trait SelectorMapper: Send + Sync {
    /// The error returned by the mapping.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Returns the System function implementing `world_function_selector`.
    fn system_function(
        &self,
        world_function_selector: Selector,
    ) -> impl Future<Output = Result<SystemFunction, Self::Error>> + Send;
}

impl<F, Fut, E> SelectorMapper for F
where
    F: Fn(Selector) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SystemFunction, E>> + Send,
    E: core::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn system_function(
        &self,
        world_function_selector: Selector,
    ) -> impl Future<Output = Result<SystemFunction, Self::Error>> + Send {
        self(world_function_selector)
    }
}

/// The mapper of an interceptor that resolves selectors on-chain. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMapper {}

impl SelectorMapper for NoMapper {
    type Error = Infallible;

    async fn system_function(&self, _: Selector) -> Result<SystemFunction, Self::Error> {
        match *self {}
    }
}

/// The reader of an interceptor that only writes. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoReader {}

impl ContractReader for NoReader {
    type Error = Infallible;

    async fn call(&self, _: Address, _: Bytes) -> Result<Bytes, Self::Error> {
        match *self {}
    }
}
