//! Database schema definitions
//!
//! The indexer owns these tables in production; the explorer only reads them,
//! appends to `notifications.status`, and relies on the trigger below to
//! publish new notification rows on the `events` channel.

pub const CREATE_BLOCKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blocks (
    height BIGINT PRIMARY KEY,
    hash VARCHAR(64) NOT NULL,
    timestamp TEXT NOT NULL,
    num_txs INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_blocks_hash ON blocks(hash);
"#;

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id BIGSERIAL PRIMARY KEY,
    address VARCHAR(40) NOT NULL UNIQUE,
    balance BIGINT NOT NULL DEFAULT 0,
    public_key TEXT,
    sequence BIGINT NOT NULL DEFAULT 0,
    permission TEXT
);
"#;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    hash VARCHAR(64) PRIMARY KEY,
    block_height BIGINT NOT NULL,
    timestamp TEXT NOT NULL,
    tx_type TEXT NOT NULL,
    from_acc_addr VARCHAR(40),
    to_acc_addr VARCHAR(40),
    amount BIGINT NOT NULL DEFAULT 0,
    fee BIGINT NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_transactions_from ON transactions(from_acc_addr);
CREATE INDEX IF NOT EXISTS idx_transactions_to ON transactions(to_acc_addr);
CREATE INDEX IF NOT EXISTS idx_transactions_block_height ON transactions(block_height);
"#;

/// `status` holds the addresses that have read the notification.
pub const CREATE_NOTIFICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    id BIGSERIAL PRIMARY KEY,
    tx_hash VARCHAR(64) NOT NULL,
    timestamp TEXT NOT NULL,
    amount BIGINT NOT NULL DEFAULT 0,
    status TEXT[] NOT NULL DEFAULT '{}',
    from_acc_id BIGINT,
    to_acc_id BIGINT,
    from_acc_addr VARCHAR(40) NOT NULL,
    to_acc_addr VARCHAR(40) NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_from ON notifications(from_acc_addr);
CREATE INDEX IF NOT EXISTS idx_notifications_to ON notifications(to_acc_addr);
"#;

pub const CREATE_NOTIFICATION_TRIGGER: &str = r#"
CREATE OR REPLACE FUNCTION notify_notification_event() RETURNS trigger AS $$
BEGIN
    PERFORM pg_notify('events', json_build_object(
        'notification_id', NEW.id,
        'tx_hash', NEW.tx_hash,
        'timestamp', NEW.timestamp,
        'amount', NEW.amount,
        'from_acc_addr', NEW.from_acc_addr,
        'to_acc_addr', NEW.to_acc_addr
    )::text);
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DROP TRIGGER IF EXISTS notification_events ON notifications;
CREATE TRIGGER notification_events
    AFTER INSERT ON notifications
    FOR EACH ROW EXECUTE PROCEDURE notify_notification_event();
"#;

/// Statements applied in order by `Database::migrate`.
pub const MIGRATIONS: &[&str] = &[
    CREATE_BLOCKS_TABLE,
    CREATE_ACCOUNTS_TABLE,
    CREATE_TRANSACTIONS_TABLE,
    CREATE_NOTIFICATIONS_TABLE,
    CREATE_NOTIFICATION_TRIGGER,
];
