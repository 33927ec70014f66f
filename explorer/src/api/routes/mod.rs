pub mod blocks;
pub mod notifications;
pub mod transactions;
pub mod wallets;

use crate::error::ApiErrorCode;
use crate::models::Address;

/// A missing `address` query parameter is reported the same as a malformed one.
pub(crate) fn require_address(raw: Option<&str>) -> Result<Address, ApiErrorCode> {
    raw.ok_or(ApiErrorCode::InvalidAddress).and_then(Address::parse)
}
