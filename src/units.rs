//! Token amount helpers.

use alloy::primitives::U256;

/// Scale a whole-token amount to an 18-decimal base-unit amount.
pub fn expand_to_18_decimals(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}
