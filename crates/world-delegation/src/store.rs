//! Store record codec.
//!
//! World tables are read with `getRecord`, which returns a record split into three parts: the
//! packed static fields, a packed counter of dynamic field lengths (`encodedLengths`) and the
//! concatenated dynamic fields. This module builds the table ids and key tuples for such reads
//! and decodes the returned parts against a value schema.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{b256, Bytes, B256};

/// The resource id of the `world:FunctionSelectors` table.
///
/// The table maps a World function selector to the System id and System function selector that
/// implement it.
pub const FUNCTION_SELECTORS_TABLE_ID: B256 =
    b256!("0x7462776f726c6400000000000000000046756e6374696f6e53656c6563746f72");

/// Value schema of the `world:FunctionSelectors` table: `(bytes32 systemId, bytes4
/// systemFunctionSelector)`.
pub const FUNCTION_SELECTORS_VALUE_SCHEMA: ValueSchema<'static> =
    ValueSchema { static_fields: &[32, 4], dynamic_fields: 0 };

/// The maximum number of dynamic fields a record can have.
pub const MAX_DYNAMIC_FIELDS: usize = 5;

const RESOURCE_TYPE_LEN: usize = 2;
const NAMESPACE_LEN: usize = 14;
const NAME_LEN: usize = 16;
const TOTAL_LENGTH_BYTES: usize = 7;
const FIELD_LENGTH_BYTES: usize = 5;

/// Errors raised while encoding store keys or decoding store records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreDecodeError {
    /// The static data does not have the length required by the schema
    #[error("static data is {actual} bytes, schema requires {expected}")]
    StaticDataLength {
        /// Sum of the static field sizes
        expected: usize,
        /// Length of the returned static data
        actual: usize,
    },
    /// The schema has more dynamic fields than the packed counter can hold
    #[error("schema has {0} dynamic fields, at most {MAX_DYNAMIC_FIELDS} are supported")]
    TooManyDynamicFields(usize),
    /// The total in the packed counter does not match the sum of the field lengths
    #[error("encoded lengths total {total} does not match the sum of field lengths {sum}")]
    EncodedLengthsMismatch {
        /// Total stored in the counter
        total: u64,
        /// Sum of the individual field lengths
        sum: u64,
    },
    /// The dynamic data does not have the length announced by the packed counter
    #[error("dynamic data is {actual} bytes, encoded lengths announce {expected}")]
    DynamicDataLength {
        /// Total stored in the counter
        expected: u64,
        /// Length of the returned dynamic data
        actual: usize,
    },
    /// A length does not fit into its slot of the packed counter
    #[error("length {length} does not fit into {bytes} bytes")]
    LengthOverflow {
        /// The length
        length: u64,
        /// Width of the slot in bytes
        bytes: usize,
    },
    /// A key value does not encode into a single word
    #[error("key field of type {0} does not fit into a single word")]
    NonStaticKey(String),
}

/// A 32-byte resource id: a 2-byte resource type, a 14-byte namespace and a 16-byte name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::From, derive_more::Into)]
pub struct ResourceId(B256);

impl ResourceId {
    /// Resource type of on-chain tables.
    pub const TABLE: [u8; RESOURCE_TYPE_LEN] = *b"tb";

    /// Resource type of Systems.
    pub const SYSTEM: [u8; RESOURCE_TYPE_LEN] = *b"sy";

    /// Creates a resource id. The namespace and name are truncated to 14 and 16 bytes.
    pub fn new(resource_type: [u8; RESOURCE_TYPE_LEN], namespace: &str, name: &str) -> Self {
        let mut id = B256::ZERO;
        id[..RESOURCE_TYPE_LEN].copy_from_slice(&resource_type);
        copy_truncated(&mut id[RESOURCE_TYPE_LEN..RESOURCE_TYPE_LEN + NAMESPACE_LEN], namespace);
        copy_truncated(&mut id[RESOURCE_TYPE_LEN + NAMESPACE_LEN..], name);
        Self(id)
    }

    /// Creates the resource id of an on-chain table.
    pub fn table(namespace: &str, name: &str) -> Self {
        Self::new(Self::TABLE, namespace, name)
    }

    /// Creates the resource id of a System.
    pub fn system(namespace: &str, name: &str) -> Self {
        Self::new(Self::SYSTEM, namespace, name)
    }

    /// The resource type tag.
    pub fn resource_type(&self) -> [u8; RESOURCE_TYPE_LEN] {
        [self.0[0], self.0[1]]
    }

    /// The namespace, without trailing zero bytes.
    pub fn namespace(&self) -> String {
        trimmed_string(&self.0[RESOURCE_TYPE_LEN..RESOURCE_TYPE_LEN + NAMESPACE_LEN])
    }

    /// The name, without trailing zero bytes.
    pub fn name(&self) -> String {
        trimmed_string(&self.0[RESOURCE_TYPE_LEN + NAMESPACE_LEN..])
    }

    /// The raw 32-byte id.
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

fn copy_truncated(dst: &mut [u8], src: &str) {
    let len = src.len().min(dst.len());
    dst[..len].copy_from_slice(&src.as_bytes()[..len]);
}

fn trimmed_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string()
}

/// Encodes key fields into a key tuple. Each field is ABI-encoded into exactly one word, so
/// `bytesN` values end up left-aligned and integers and addresses right-aligned.
pub fn encode_key_tuple(keys: &[DynSolValue]) -> Result<Vec<B256>, StoreDecodeError> {
    keys.iter()
        .map(|key| {
            let encoded = key.abi_encode();
            if encoded.len() == B256::len_bytes() {
                Ok(B256::from_slice(&encoded))
            } else {
                let ty = key.as_type().map(|ty| ty.to_string()).unwrap_or_default();
                Err(StoreDecodeError::NonStaticKey(ty))
            }
        })
        .collect()
}

/// The packed counter of dynamic field lengths of a record.
///
/// The least significant 7 bytes hold the total length, followed (towards the most significant
/// end) by one 5-byte length per dynamic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::From)]
pub struct EncodedLengths(B256);

impl EncodedLengths {
    /// Packs `lengths` into a counter. Each length must fit into 5 bytes.
    pub fn pack(lengths: &[u64]) -> Result<Self, StoreDecodeError> {
        if lengths.len() > MAX_DYNAMIC_FIELDS {
            return Err(StoreDecodeError::TooManyDynamicFields(lengths.len()));
        }
        let mut word = B256::ZERO;
        for (index, length) in lengths.iter().enumerate() {
            check_width(*length, FIELD_LENGTH_BYTES)?;
            let (start, end) = field_range(index);
            write_be(&mut word[start..end], *length);
        }
        // Five 40-bit lengths always sum to less than 7 bytes.
        write_be(&mut word[B256::len_bytes() - TOTAL_LENGTH_BYTES..], lengths.iter().sum());
        Ok(Self(word))
    }

    /// The total length of all dynamic fields.
    pub fn total(&self) -> u64 {
        read_be(&self.0[B256::len_bytes() - TOTAL_LENGTH_BYTES..])
    }

    /// The length of the dynamic field at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_DYNAMIC_FIELDS`].
    pub fn field(&self, index: usize) -> u64 {
        let (start, end) = field_range(index);
        read_be(&self.0[start..end])
    }

    /// The raw packed word.
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

fn field_range(index: usize) -> (usize, usize) {
    assert!(index < MAX_DYNAMIC_FIELDS, "dynamic field index {index} out of range");
    let end = B256::len_bytes() - TOTAL_LENGTH_BYTES - index * FIELD_LENGTH_BYTES;
    (end - FIELD_LENGTH_BYTES, end)
}

fn check_width(length: u64, bytes: usize) -> Result<(), StoreDecodeError> {
    if length >> (8 * bytes) != 0 {
        return Err(StoreDecodeError::LengthOverflow { length, bytes });
    }
    Ok(())
}

fn read_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn write_be(dst: &mut [u8], mut value: u64) {
    for byte in dst.iter_mut().rev() {
        *byte = value as u8;
        value >>= 8;
    }
}

/// The layout of a table's value: the byte size of each static field, in order, and the number
/// of dynamic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSchema<'a> {
    /// Byte sizes of the static fields.
    pub static_fields: &'a [usize],
    /// Number of dynamic fields.
    pub dynamic_fields: usize,
}

impl ValueSchema<'_> {
    /// The length of the packed static data.
    pub fn static_length(&self) -> usize {
        self.static_fields.iter().sum()
    }
}

/// A record split into its raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedRecord {
    /// Static fields, in schema order.
    pub static_fields: Vec<Bytes>,
    /// Dynamic fields, in schema order.
    pub dynamic_fields: Vec<Bytes>,
}

/// Splits a record returned by `getRecord` into its fields according to `schema`.
pub fn decode_record(
    schema: ValueSchema<'_>,
    static_data: &[u8],
    encoded_lengths: EncodedLengths,
    dynamic_data: &[u8],
) -> Result<DecodedRecord, StoreDecodeError> {
    if static_data.len() != schema.static_length() {
        return Err(StoreDecodeError::StaticDataLength {
            expected: schema.static_length(),
            actual: static_data.len(),
        });
    }
    if schema.dynamic_fields > MAX_DYNAMIC_FIELDS {
        return Err(StoreDecodeError::TooManyDynamicFields(schema.dynamic_fields));
    }

    let mut offset = 0;
    let static_fields = schema
        .static_fields
        .iter()
        .map(|size| {
            let field = Bytes::copy_from_slice(&static_data[offset..offset + size]);
            offset += size;
            field
        })
        .collect();

    if schema.dynamic_fields == 0 {
        return Ok(DecodedRecord { static_fields, dynamic_fields: Vec::new() });
    }

    let lengths: Vec<u64> = (0..schema.dynamic_fields).map(|i| encoded_lengths.field(i)).collect();
    let sum = lengths.iter().sum();
    if encoded_lengths.total() != sum {
        return Err(StoreDecodeError::EncodedLengthsMismatch {
            total: encoded_lengths.total(),
            sum,
        });
    }
    if dynamic_data.len() as u64 != sum {
        return Err(StoreDecodeError::DynamicDataLength {
            expected: sum,
            actual: dynamic_data.len(),
        });
    }

    let mut offset = 0;
    let dynamic_fields = lengths
        .into_iter()
        .map(|length| {
            let length = length as usize;
            let field = Bytes::copy_from_slice(&dynamic_data[offset..offset + length]);
            offset += length;
            field
        })
        .collect();

    Ok(DecodedRecord { static_fields, dynamic_fields })
}
