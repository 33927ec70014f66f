//! Database query functions

use sqlx::PgPool;
use crate::models::*;
use crate::error::Result;

pub struct NotificationQueries;

impl NotificationQueries {
    pub async fn count(pool: &PgPool, address: &Address) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE from_acc_addr = $1 OR to_acc_addr = $1"
        )
        .bind(address.as_str())
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// One page of an address's notifications, most recent first.
    pub async fn list(pool: &PgPool, address: &Address, page: i64, limit: i64) -> Result<NotificationPage> {
        let total = Self::count(pool, address).await?;
        if total == 0 {
            return Ok(NotificationPage::empty());
        }

        let txs = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                id AS notification_id,
                tx_hash,
                timestamp,
                amount,
                status,
                from_acc_id,
                to_acc_id,
                from_acc_addr,
                to_acc_addr
            FROM notifications
            WHERE from_acc_addr = $1 OR to_acc_addr = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        )
        .bind(address.as_str())
        .bind(limit)
        .bind(page_offset(page, limit))
        .fetch_all(pool)
        .await?;

        Ok(NotificationPage {
            total,
            total_page: total_pages(total, limit),
            current_page: page,
            txs,
        })
    }

    /// Notifications involving `address` that it has not yet marked read.
    pub async fn count_unread(pool: &PgPool, address: &Address) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE (from_acc_addr = $1 OR to_acc_addr = $1)
              AND NOT ($1 = ANY(status))
            "#
        )
        .bind(address.as_str())
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Appends `address` to the row's read list. `None` when the row does not
    /// exist, does not involve `address`, or was already read by it.
    pub async fn mark_read(pool: &PgPool, notification_id: i64, address: &Address) -> Result<Option<MarkReadResult>> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = array_append(status, $2::TEXT)
            WHERE id = $1
              AND (from_acc_addr = $2 OR to_acc_addr = $2)
              AND NOT ($2 = ANY(status))
            "#
        )
        .bind(notification_id)
        .bind(address.as_str())
        .execute(pool)
        .await?;

        let row_count = result.rows_affected();
        if row_count == 0 {
            return Ok(None);
        }
        Ok(Some(MarkReadResult {
            command: "UPDATE".to_string(),
            row_count,
        }))
    }
}

pub struct BlockQueries;

impl BlockQueries {
    pub async fn get_by_height(pool: &PgPool, height: i64) -> Result<Option<BlockInfo>> {
        let block = sqlx::query_as::<_, BlockInfo>(
            r#"
            SELECT
                height AS block_id,
                hash AS block_hash,
                timestamp,
                num_txs
            FROM blocks
            WHERE height = $1
            "#
        )
        .bind(height)
        .fetch_optional(pool)
        .await?;

        Ok(block)
    }
}

pub struct TransactionQueries;

impl TransactionQueries {
    pub async fn get_by_hash(pool: &PgPool, hash: &TxHash) -> Result<Option<TransactionInfo>> {
        let tx = sqlx::query_as::<_, TransactionInfo>(
            r#"
            SELECT
                hash AS tx_hash,
                block_height AS block_id,
                timestamp,
                tx_type,
                from_acc_addr,
                to_acc_addr,
                amount,
                fee
            FROM transactions
            WHERE hash = $1
            "#
        )
        .bind(hash.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(tx)
    }

    pub async fn list_by_address(pool: &PgPool, address: &Address, page: i64, limit: i64) -> Result<TransactionPage> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transactions WHERE from_acc_addr = $1 OR to_acc_addr = $1"
        )
        .bind(address.as_str())
        .fetch_one(pool)
        .await?;

        let txs = if total == 0 {
            vec![]
        } else {
            sqlx::query_as::<_, TransactionInfo>(
                r#"
                SELECT
                    hash AS tx_hash,
                    block_height AS block_id,
                    timestamp,
                    tx_type,
                    from_acc_addr,
                    to_acc_addr,
                    amount,
                    fee
                FROM transactions
                WHERE from_acc_addr = $1 OR to_acc_addr = $1
                ORDER BY block_height DESC, timestamp DESC
                LIMIT $2 OFFSET $3
                "#
            )
            .bind(address.as_str())
            .bind(limit)
            .bind(page_offset(page, limit))
            .fetch_all(pool)
            .await?
        };

        Ok(TransactionPage {
            total,
            total_page: total_pages(total, limit),
            current_page: if total == 0 { 1 } else { page },
            txs,
        })
    }
}

pub struct AccountQueries;

impl AccountQueries {
    pub async fn get_balance(pool: &PgPool, address: &Address) -> Result<Option<AccountInfo>> {
        let account = sqlx::query_as::<_, AccountInfo>(
            r#"
            SELECT
                address,
                balance,
                public_key,
                sequence,
                permission
            FROM accounts
            WHERE address = $1
            "#
        )
        .bind(address.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }
}
