//! SQL text for the challenge table.
//!
//! The DDL is assembled from a resolved [`TableSpec`] so the three
//! foreign-key column types stay under the control of the external entity
//! factories. Type spellings are the portable ones (`CHAR(N)`,
//! `INT UNSIGNED`, `TINYINT(1)`); SQLite maps them through its affinity
//! rules unchanged.

use gatepass_core::TableSpec;

/// Name of the backing table.
pub const TABLE: &str = "captcha_challenges";

/// CREATE TABLE statement for a resolved spec.
pub fn create_table_sql(spec: &TableSpec) -> String {
    format!(
        "CREATE TABLE {TABLE} (
            captcha_id CHAR({id_len}) NOT NULL,
            captcha_ans CHAR({answer_len}) NOT NULL,
            client_id {client_id},
            mask_uid {mask_id},
            user_uid {user_id},
            ip_addr VARCHAR(45) NOT NULL,
            issued INT UNSIGNED NOT NULL,
            expires INT UNSIGNED NOT NULL,
            valid TINYINT(1) NOT NULL,
            PRIMARY KEY (captcha_id)
        )",
        id_len = spec.id_len,
        answer_len = spec.answer_len,
        client_id = spec.client_id.as_sql(),
        mask_id = spec.mask_id.as_sql(),
        user_id = spec.user_id.as_sql(),
    )
}

/// DROP TABLE statement.
pub fn drop_table_sql() -> String {
    format!("DROP TABLE {TABLE}")
}

/// Statement removing every row while keeping the table.
///
/// SQLite has no TRUNCATE; an unqualified DELETE has the same effect.
pub fn clear_table_sql() -> String {
    format!("DELETE FROM {TABLE}")
}
