//! Delegated World calls.
//!
//! This crate submits writes to a World contract on behalf of a delegator. A write to a World
//! function is rewritten into `callFrom(delegator, systemId, systemCalldata)` after resolving
//! which System implements the function, so callers keep using the World ABI they already have.
//!
//! The entry point is [`CallFrom`]. The building blocks are usable on their own: the selector
//! codec ([`selector`], [`arguments`], [`rewrite`]), the [`ResolutionCache`], the
//! [`SelectorResolver`] and the store record codec used for on-chain lookups.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use world_contracts;

mod cache;
pub use cache::*;

mod call;
pub use call::{CallShape, WorldCall};

mod client;
pub use client::*;

pub mod deploy;
pub use deploy::{logs_to_world_deploy, DeployError, WorldDeploy};

mod error;
pub use error::*;

mod interceptor;
pub use interceptor::*;

mod resolver;
pub use resolver::*;

mod selector;
pub use selector::*;

pub mod store;
pub use store::{
    decode_record, encode_key_tuple, DecodedRecord, EncodedLengths, ResourceId, StoreDecodeError,
    ValueSchema, FUNCTION_SELECTORS_TABLE_ID, FUNCTION_SELECTORS_VALUE_SCHEMA,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;
