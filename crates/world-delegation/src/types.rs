use alloy_primitives::{Selector, B256};
use serde::{Deserialize, Serialize};

/// A resource id of a System registered in the World.
pub type SystemId = B256;

/// The System function that implements a World function.
///
/// A World function call is redirected to `system_id` with its selector replaced by
/// `system_function_selector`; the encoded arguments stay the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemFunction {
    /// The resource id of the System.
    pub system_id: SystemId,
    /// The selector of the function on the System.
    pub system_function_selector: Selector,
}

impl SystemFunction {
    /// Creates a new [`SystemFunction`].
    pub const fn new(system_id: SystemId, system_function_selector: Selector) -> Self {
        Self { system_id, system_function_selector }
    }
}
