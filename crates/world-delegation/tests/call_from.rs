//! Tests for delegating World writes through `callFrom`.

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{address, b256, bytes, fixed_bytes, Address, Bytes, Selector, B256, U256};
use alloy_sol_types::SolCall;
use rstest::rstest;
use world_delegation::{
    test_utils::{MockError, MockWorldClient, StaticMapper},
    world_contracts::{IWorldCall, WORLD_CALL_ABI, WORLD_CALL_SIGNATURES},
    CallFrom, CallFromConfig, DelegationError, ResolutionCache, SystemFunction, WorldCall,
    WorldWriter,
};

const WORLD: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const DELEGATOR: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
const OTHER_CONTRACT: Address = address!("0xcccccccccccccccccccccccccccccccccccccccc");
const SYSTEM_ID: B256 = b256!("0x7379617070000000000000000000000043756e74657253797374656d00000000");

/// Selector of `increment()`.
const INCREMENT: Selector = fixed_bytes!("d09de08a");
const SYSTEM_SELECTOR: Selector = fixed_bytes!("1234abcd");

/// A World ABI with two app functions next to the delegation primitives.
fn world_abi() -> Arc<JsonAbi> {
    let signatures = ["function increment()", "function setValue(uint256 value)"]
        .into_iter()
        .chain(WORLD_CALL_SIGNATURES.iter().copied());
    Arc::new(JsonAbi::parse(signatures).unwrap())
}

fn increment_call() -> WorldCall {
    WorldCall::new(WORLD, "increment", world_abi(), vec![])
}

fn system_function() -> SystemFunction {
    SystemFunction::new(SYSTEM_ID, SYSTEM_SELECTOR)
}

/// An interceptor over `client` with its own cache, resolving on-chain.
fn call_from(client: &MockWorldClient) -> CallFrom<MockWorldClient> {
    CallFrom::new(client.clone(), CallFromConfig::new(WORLD, DELEGATOR))
        .with_cache(Arc::new(ResolutionCache::new()))
}

fn call_from_args(system_id: B256, call_data: Bytes) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Address(DELEGATOR),
        DynSolValue::FixedBytes(system_id, 32),
        DynSolValue::Bytes(call_data.to_vec()),
    ]
}

#[tokio::test]
async fn test_increment_is_delegated_with_mapper() {
    let client = MockWorldClient::new();
    let mapper = StaticMapper::new().with_entry(INCREMENT, system_function());
    let call_from = call_from(&client).with_mapper(mapper.clone());

    let index = call_from.write_contract(increment_call()).await.unwrap();

    assert_eq!(index, 0);
    assert_eq!(mapper.calls(), 1);
    assert_eq!(client.reads(), 0);
    assert_eq!(
        client.writes(),
        vec![WorldCall::new(
            WORLD,
            "callFrom",
            WORLD_CALL_ABI.clone(),
            call_from_args(SYSTEM_ID, bytes!("1234abcd")),
        )]
    );

    let expected = IWorldCall::callFromCall {
        delegator: DELEGATOR,
        systemId: SYSTEM_ID,
        callData: bytes!("1234abcd"),
    }
    .abi_encode();
    assert_eq!(client.writes()[0].encode().unwrap(), Bytes::from(expected));
}

#[tokio::test]
async fn test_arguments_are_kept() {
    let set_value = fixed_bytes!("55241077");
    let client = MockWorldClient::new();
    let call_from = call_from(&client)
        .with_mapper(StaticMapper::new().with_entry(set_value, system_function()));

    let call = WorldCall::new(
        WORLD,
        "setValue",
        world_abi(),
        vec![DynSolValue::Uint(U256::from(42), 256)],
    );
    let world_calldata = call.encode().unwrap();
    assert_eq!(&world_calldata[..4], set_value.as_slice());

    let delegated = call_from.delegate(call).await.unwrap();

    let mut system_calldata = SYSTEM_SELECTOR.to_vec();
    system_calldata.extend_from_slice(&world_calldata[4..]);
    assert_eq!(delegated.function_name, "callFrom");
    assert_eq!(delegated.args, call_from_args(SYSTEM_ID, system_calldata.into()));
}

#[rstest]
#[case("call")]
#[case("callFrom")]
#[case("batchCallFrom")]
#[case("callWithSignature")]
#[tokio::test]
async fn test_delegation_primitives_pass_through(#[case] function_name: &str) {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let call = WorldCall::new(WORLD, function_name, world_abi(), vec![DynSolValue::Bool(true)]);

    call_from.write_contract(call.clone()).await.unwrap();

    assert_eq!(client.writes(), vec![call]);
    assert_eq!(client.reads(), 0);
    assert!(call_from.cache().is_empty());
}

#[tokio::test]
async fn test_other_contract_passes_through() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let call = WorldCall::new(OTHER_CONTRACT, "increment", world_abi(), vec![]);

    call_from.write_contract(call.clone()).await.unwrap();

    assert_eq!(client.writes(), vec![call]);
    assert_eq!(client.reads(), 0);
    assert!(call_from.cache().is_empty());
}

#[tokio::test]
async fn test_empty_batch_call_is_rejected() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let call = WorldCall::new(WORLD, "batchCall", world_abi(), vec![DynSolValue::Array(vec![])]);

    let err = call_from.write_contract(call).await.unwrap_err();

    assert!(matches!(err, DelegationError::EmptyBatch));
    assert_eq!(err.to_string(), "`batchCall` should have at least one system call");
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn test_batch_call_is_wrapped_with_delegator() {
    let other_system = b256!("0x7379617070000000000000000000000042616e6b53797374656d000000000000");
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let system_call = |system_id: B256, call_data: &[u8]| {
        DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(system_id, 32),
            DynSolValue::Bytes(call_data.to_vec()),
        ])
    };
    let call = WorldCall::new(
        WORLD,
        "batchCall",
        world_abi(),
        vec![DynSolValue::Array(vec![
            system_call(SYSTEM_ID, &[0xd0, 0x9d, 0xe0, 0x8a]),
            system_call(other_system, &[0x12, 0x34]),
        ])],
    );

    call_from.write_contract(call).await.unwrap();

    let writes = client.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].function_name, "batchCallFrom");
    assert_eq!(client.reads(), 0);

    let expected = IWorldCall::batchCallFromCall {
        systemCalls: vec![
            IWorldCall::SystemCallFromData {
                from: DELEGATOR,
                systemId: SYSTEM_ID,
                callData: bytes!("d09de08a"),
            },
            IWorldCall::SystemCallFromData {
                from: DELEGATOR,
                systemId: other_system,
                callData: bytes!("1234"),
            },
        ],
    }
    .abi_encode();
    assert_eq!(writes[0].encode().unwrap(), Bytes::from(expected));
}

#[tokio::test]
async fn test_on_chain_resolution_is_cached() {
    let client = MockWorldClient::new().with_record(WORLD, INCREMENT, system_function());
    let call_from = call_from(&client);

    call_from.write_contract(increment_call()).await.unwrap();
    call_from.write_contract(increment_call()).await.unwrap();

    assert_eq!(client.reads(), 1);
    assert_eq!(client.writes().len(), 2);
    assert_eq!(client.writes()[0], client.writes()[1]);
    assert_eq!(client.writes()[0].args, call_from_args(SYSTEM_ID, bytes!("1234abcd")));
}

#[tokio::test]
async fn test_configured_reader_is_used() {
    let client = MockWorldClient::new();
    let reader = MockWorldClient::new().with_record(WORLD, INCREMENT, system_function());
    let call_from = call_from(&client).with_reader(reader.clone());

    call_from.write_contract(increment_call()).await.unwrap();

    assert_eq!(reader.reads(), 1);
    assert_eq!(client.reads(), 0);
    assert_eq!(client.writes().len(), 1);
}

#[tokio::test]
async fn test_failed_read_is_not_cached() {
    let client = MockWorldClient::new().with_record(WORLD, INCREMENT, system_function());
    let call_from = call_from(&client);

    client.set_fail_reads(true);
    let err = call_from.write_contract(increment_call()).await.unwrap_err();
    assert!(matches!(err, DelegationError::Read(_)));
    assert!(client.writes().is_empty());
    assert!(call_from.cache().is_empty());

    client.set_fail_reads(false);
    call_from.write_contract(increment_call()).await.unwrap();
    assert_eq!(client.reads(), 2);
    assert_eq!(client.writes().len(), 1);
}

#[tokio::test]
async fn test_unregistered_selector_is_an_error() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);

    let err = call_from.write_contract(increment_call()).await.unwrap_err();

    assert!(matches!(
        err,
        DelegationError::UnregisteredSelector { world, selector }
            if world == WORLD && selector == INCREMENT
    ));
    assert!(client.writes().is_empty());
    assert!(call_from.cache().is_empty());
}

#[tokio::test]
async fn test_mapper_error_propagates() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client).with_mapper(StaticMapper::new());

    let err = call_from.write_contract(increment_call()).await.unwrap_err();

    let DelegationError::Mapping(source) = err else { panic!("expected a mapping error") };
    assert_eq!(source.downcast_ref::<MockError>(), Some(&MockError::UnknownSelector(INCREMENT)));
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn test_closure_mapper() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client).with_mapper(|selector: Selector| async move {
        assert_eq!(selector, INCREMENT);
        Ok::<_, MockError>(system_function())
    });

    call_from.write_contract(increment_call()).await.unwrap();

    assert_eq!(client.writes()[0].args, call_from_args(SYSTEM_ID, bytes!("1234abcd")));
}

#[tokio::test]
async fn test_unknown_function_is_not_submitted() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let call = WorldCall::new(WORLD, "decrement", world_abi(), vec![]);

    let err = call_from.write_contract(call).await.unwrap_err();

    assert!(matches!(err, DelegationError::UnknownFunction(name) if name == "decrement"));
    assert!(client.writes().is_empty());
    assert_eq!(client.reads(), 0);
}

#[tokio::test]
async fn test_worlds_are_cached_independently() {
    let cache = Arc::new(ResolutionCache::new());
    let other_system = b256!("0x7379617070000000000000000000000042616e6b53797374656d000000000000");
    let client = MockWorldClient::new()
        .with_record(WORLD, INCREMENT, system_function())
        .with_record(OTHER_CONTRACT, INCREMENT, SystemFunction::new(other_system, SYSTEM_SELECTOR));

    let first = CallFrom::new(client.clone(), CallFromConfig::new(WORLD, DELEGATOR))
        .with_cache(cache.clone());
    let second = CallFrom::new(client.clone(), CallFromConfig::new(OTHER_CONTRACT, DELEGATOR))
        .with_cache(cache.clone());

    first.write_contract(increment_call()).await.unwrap();
    second
        .write_contract(WorldCall::new(OTHER_CONTRACT, "increment", world_abi(), vec![]))
        .await
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(client.reads(), 2);
    assert_eq!(client.writes()[0].args, call_from_args(SYSTEM_ID, bytes!("1234abcd")));
    assert_eq!(client.writes()[1].args, call_from_args(other_system, bytes!("1234abcd")));
}

#[tokio::test]
async fn test_concurrent_misses_on_same_selector() {
    let client = MockWorldClient::new().with_record(WORLD, INCREMENT, system_function());
    client.set_yield_reads(true);
    let call_from = call_from(&client);

    let (first, second) = tokio::join!(
        call_from.write_contract(increment_call()),
        call_from.write_contract(increment_call())
    );

    let mut indices = [first.unwrap(), second.unwrap()];
    indices.sort_unstable();
    assert_eq!(indices, [0, 1]);
    // Both calls missed the cache and read the World; the second insert is a no-op.
    assert_eq!(client.reads(), 2);
    assert_eq!(call_from.cache().len(), 1);
    let writes = client.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
    assert_eq!(writes[0].args, call_from_args(SYSTEM_ID, bytes!("1234abcd")));
}

/// A client that can submit writes but cannot read.
#[derive(Debug, Clone, Default)]
struct WriteOnlyClient {
    writes: Arc<Mutex<Vec<WorldCall>>>,
}

impl WorldWriter for WriteOnlyClient {
    type Output = ();
    type Error = Infallible;

    async fn write_contract(&self, call: WorldCall) -> Result<(), Self::Error> {
        self.writes.lock().unwrap().push(call);
        Ok(())
    }
}

#[tokio::test]
async fn test_write_only_client_with_mapper() {
    let client = WriteOnlyClient::default();
    let mapper = StaticMapper::new().with_entry(INCREMENT, system_function());
    let call_from = CallFrom::writer_only(client.clone(), CallFromConfig::new(WORLD, DELEGATOR))
        .with_cache(Arc::new(ResolutionCache::new()))
        .with_mapper(mapper);

    call_from.write_contract(increment_call()).await.unwrap();

    let writes = client.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].function_name, "callFrom");
    assert_eq!(writes[0].args, call_from_args(SYSTEM_ID, bytes!("1234abcd")));
}

#[tokio::test]
async fn test_write_only_client_without_mapper() {
    let client = WriteOnlyClient::default();
    let call_from = CallFrom::writer_only(client.clone(), CallFromConfig::new(WORLD, DELEGATOR))
        .with_cache(Arc::new(ResolutionCache::new()));

    let err = call_from.write_contract(increment_call()).await.unwrap_err();

    assert!(matches!(err, DelegationError::NoResolver(selector) if selector == INCREMENT));
    assert!(client.writes.lock().unwrap().is_empty());

    // Passthrough calls need no resolution.
    let call = WorldCall::new(OTHER_CONTRACT, "increment", world_abi(), vec![]);
    call_from.write_contract(call).await.unwrap();
    assert_eq!(client.writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_batch_call_is_rejected() {
    let client = MockWorldClient::new();
    let call_from = call_from(&client);
    let call = WorldCall::new(
        WORLD,
        "batchCall",
        world_abi(),
        vec![DynSolValue::Array(vec![DynSolValue::Bool(true)])],
    );

    let err = call_from.write_contract(call).await.unwrap_err();

    assert!(matches!(err, DelegationError::InvalidBatchArguments));
    assert!(client.writes().is_empty());
    assert_eq!(client.reads(), 0);
}
