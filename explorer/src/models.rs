//! Data models for the explorer

use serde::{Deserialize, Serialize};
use crate::error::ApiErrorCode;

pub const ADDRESS_LEN: usize = 40;
pub const TX_HASH_LEN: usize = 64;

fn is_hex_of_len(raw: &str, len: usize) -> bool {
    raw.len() == len && hex::decode(raw).is_ok()
}

/// Account identifier: 40 hex characters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, ApiErrorCode> {
        if is_hex_of_len(raw, ADDRESS_LEN) {
            Ok(Address(raw.to_ascii_uppercase()))
        } else {
            Err(ApiErrorCode::InvalidAddress)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = ApiErrorCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction hash: 64 hex characters, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(raw: &str) -> Result<Self, ApiErrorCode> {
        if is_hex_of_len(raw, TX_HASH_LEN) {
            Ok(TxHash(raw.to_ascii_uppercase()))
        } else {
            Err(ApiErrorCode::InvalidTxHash)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse a block height path segment. Valid heights are `1..=i64::MAX`.
pub fn parse_block_height(raw: &str) -> Result<i64, ApiErrorCode> {
    match raw.trim().parse::<i64>() {
        Ok(height) if height >= 1 => Ok(height),
        _ => Err(ApiErrorCode::MustBeIntegerExcept0),
    }
}

fn parse_positive_integer_str(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return (n > 0).then_some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= 1.0 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Requested page number; anything that is not a positive integer means page 1.
pub fn normalize_page(raw: Option<&str>) -> i64 {
    raw.and_then(parse_positive_integer_str).unwrap_or(1)
}

/// Accepts a JSON number or a numeric string holding a positive integer.
pub fn parse_positive_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => (i > 0).then_some(i),
            None => n.as_f64().and_then(|f| parse_positive_integer_str(&f.to_string())),
        },
        serde_json::Value::String(s) => parse_positive_integer_str(s),
        _ => None,
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

pub fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Event carried by the database `events` channel after a notification row is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<i64>,
    pub from_acc_addr: Address,
    pub to_acc_addr: Address,
    pub tx_hash: String,
    pub amount: i64,
    pub timestamp: String,
}

impl NotificationEvent {
    pub fn from_payload(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub tx_hash: String,
    pub timestamp: String,
    pub amount: i64,
    pub status: Vec<String>,
    pub from_acc_id: Option<i64>,
    pub to_acc_id: Option<i64>,
    pub from_acc_addr: String,
    pub to_acc_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
    pub total: i64,
    pub total_page: i64,
    pub current_page: i64,
    pub txs: Vec<NotificationRow>,
}

impl NotificationPage {
    /// An address with no notifications always reports page 1, whatever
    /// page was asked for.
    pub fn empty() -> Self {
        Self {
            total: 0,
            total_page: 0,
            current_page: 1,
            txs: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unreadable_notification: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkReadResult {
    pub command: String,
    pub row_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlockInfo {
    pub block_id: i64,
    pub block_hash: String,
    pub timestamp: String,
    pub num_txs: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionInfo {
    pub tx_hash: String,
    pub block_id: i64,
    pub timestamp: String,
    pub tx_type: String,
    pub from_acc_addr: Option<String>,
    pub to_acc_addr: Option<String>,
    pub amount: i64,
    pub fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    pub total: i64,
    pub total_page: i64,
    pub current_page: i64,
    pub txs: Vec<TransactionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountInfo {
    pub address: String,
    pub balance: i64,
    pub public_key: Option<String>,
    pub sequence: i64,
    pub permission: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOWER: &str = "c7c85764cafbbd97e4abefcc61b3ef2a5d54cd15";

    #[test]
    fn test_empty_notification_page_reports_first_page() {
        let page = serde_json::to_value(NotificationPage::empty()).unwrap();
        assert_eq!(page, json!({ "total": 0, "total_page": 0, "current_page": 1, "txs": [] }));
    }

    #[test]
    fn test_address_is_normalized_to_uppercase() {
        let addr = Address::parse(LOWER).unwrap();
        assert_eq!(addr.as_str(), LOWER.to_ascii_uppercase());
        assert_eq!(addr, Address::parse(&LOWER.to_ascii_uppercase()).unwrap());
    }

    #[test]
    fn test_malformed_addresses_are_rejected() {
        let too_short = &LOWER[..39];
        let too_long = format!("{}0", LOWER);
        let non_hex = format!("{}g", &LOWER[..39]);
        for raw in ["", too_short, too_long.as_str(), non_hex.as_str(), " c7c85764cafbbd97e4abefcc61b3ef2a5d54cd1"] {
            assert_eq!(Address::parse(raw), Err(ApiErrorCode::InvalidAddress), "{raw:?}");
        }
    }

    #[test]
    fn test_tx_hash_requires_64_hex() {
        let hash = "5947c0afd12faca70389c889d285e836c7e4a70aef7337a52840ccb252c3750f";
        assert_eq!(TxHash::parse(hash).unwrap().as_str(), hash.to_ascii_uppercase());
        assert_eq!(TxHash::parse(&hash[1..]), Err(ApiErrorCode::InvalidTxHash));
    }

    #[test]
    fn test_block_height_bounds() {
        assert_eq!(parse_block_height("1100"), Ok(1100));
        assert_eq!(parse_block_height("9223372036854775807"), Ok(i64::MAX));
        for raw in ["0", "-5", "9a*", "", "9223372036854775808", "1.5"] {
            assert_eq!(parse_block_height(raw), Err(ApiErrorCode::MustBeIntegerExcept0), "{raw:?}");
        }
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some("0")), 1);
        assert_eq!(normalize_page(Some("-1")), 1);
        assert_eq!(normalize_page(Some("abc")), 1);
        assert_eq!(normalize_page(Some("1.5")), 1);
        assert_eq!(normalize_page(Some("")), 1);
        assert_eq!(normalize_page(Some("3")), 3);
        assert_eq!(normalize_page(Some("2.0")), 2);
    }

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(&json!(4)), Some(4));
        assert_eq!(parse_positive_id(&json!("4")), Some(4));
        assert_eq!(parse_positive_id(&json!(0)), None);
        assert_eq!(parse_positive_id(&json!(-2)), None);
        assert_eq!(parse_positive_id(&json!(1.5)), None);
        assert_eq!(parse_positive_id(&json!("x")), None);
        assert_eq!(parse_positive_id(&json!(null)), None);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(12, 10), 2);
        for total in 0..200i64 {
            for limit in 1..25i64 {
                let expected = (total as f64 / limit as f64).ceil() as i64;
                assert_eq!(total_pages(total, limit), expected);
            }
        }
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn test_event_payload_parsing() {
        let payload = json!({
            "from_acc_addr": LOWER,
            "to_acc_addr": "FA867390ABEFF1B3586127E2845632BCF3F2512B",
            "tx_hash": "5947C0AFD12FACA70389C889D285E836C7E4A70AEF7337A52840CCB252C3750F",
            "amount": 1000000,
            "timestamp": "2019-11-14T03:34:44.800982043Z",
            "from_acc_id": 5
        })
        .to_string();

        let event = NotificationEvent::from_payload(&payload).unwrap();
        assert_eq!(event.from_acc_addr.as_str(), LOWER.to_ascii_uppercase());
        assert_eq!(event.amount, 1_000_000);
        assert_eq!(event.notification_id, None);
    }

    #[test]
    fn test_event_payload_with_bad_address_fails() {
        let payload = json!({
            "from_acc_addr": "nope",
            "to_acc_addr": "FA867390ABEFF1B3586127E2845632BCF3F2512B",
            "tx_hash": "AA",
            "amount": 1,
            "timestamp": "t"
        })
        .to_string();
        assert!(NotificationEvent::from_payload(&payload).is_err());
        assert!(NotificationEvent::from_payload("{not json").is_err());
    }
}
