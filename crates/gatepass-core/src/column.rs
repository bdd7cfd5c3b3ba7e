//! Column-type capabilities for provisioning.
//!
//! The three foreign-key columns of the challenge table reference entities
//! owned by external factories, and only those factories know how their
//! identifiers are stored (a masked id might be a CHAR(32), a user id a
//! BIGINT UNSIGNED). [`EntityIdColumns`] is the capability they implement;
//! the store invokes it exactly once, while building the CREATE TABLE
//! statement during install.

use std::fmt;

/// The SQL column type for one entity's identifier, e.g. `VARCHAR(64)`.
///
/// The text is spliced verbatim into DDL. Nullability is controlled by the
/// table definition, not by this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnType(String);

impl ColumnType {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// Fixed-length character column.
    pub fn char(len: usize) -> Self {
        Self(format!("CHAR({len})"))
    }

    /// Variable-length character column.
    pub fn varchar(max_len: usize) -> Self {
        Self(format!("VARCHAR({max_len})"))
    }

    /// Unsigned integer column.
    pub fn unsigned_int() -> Self {
        Self("INT UNSIGNED".to_owned())
    }

    /// Unsigned big-integer column.
    pub fn unsigned_bigint() -> Self {
        Self("BIGINT UNSIGNED".to_owned())
    }

    pub fn as_sql(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability supplied by the external entity factories: describe the
/// column type used to store each entity's identifier.
pub trait EntityIdColumns: Send + Sync {
    /// Column type for the API-client entity's identifier.
    fn client_id_column(&self) -> ColumnType;

    /// Column type for the masked-identity entity's identifier.
    fn mask_id_column(&self) -> ColumnType;

    /// Column type for the user entity's identifier.
    fn user_id_column(&self) -> ColumnType;
}

/// Fully resolved shape of the challenge table, ready for DDL generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSpec {
    /// Length of the challenge id column (CHAR(N), primary key).
    pub id_len: usize,
    /// Length of the answer column (CHAR(M)).
    pub answer_len: usize,
    pub client_id: ColumnType,
    pub mask_id: ColumnType,
    pub user_id: ColumnType,
}

impl TableSpec {
    /// Resolve a spec by invoking the entity factories' column capability.
    pub fn resolve(id_len: usize, answer_len: usize, columns: &dyn EntityIdColumns) -> Self {
        Self {
            id_len,
            answer_len,
            client_id: columns.client_id_column(),
            mask_id: columns.mask_id_column(),
            user_id: columns.user_id_column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeFactories;

    impl EntityIdColumns for FakeFactories {
        fn client_id_column(&self) -> ColumnType {
            ColumnType::varchar(64)
        }

        fn mask_id_column(&self) -> ColumnType {
            ColumnType::char(32)
        }

        fn user_id_column(&self) -> ColumnType {
            ColumnType::unsigned_bigint()
        }
    }

    #[test]
    fn test_column_type_rendering() {
        assert_eq!(ColumnType::char(8).as_sql(), "CHAR(8)");
        assert_eq!(ColumnType::varchar(45).as_sql(), "VARCHAR(45)");
        assert_eq!(ColumnType::unsigned_int().as_sql(), "INT UNSIGNED");
        assert_eq!(ColumnType::new("TEXT").to_string(), "TEXT");
    }

    #[test]
    fn test_resolve_invokes_capability() {
        let spec = TableSpec::resolve(8, 4, &FakeFactories);
        assert_eq!(spec.id_len, 8);
        assert_eq!(spec.answer_len, 4);
        assert_eq!(spec.client_id, ColumnType::varchar(64));
        assert_eq!(spec.mask_id, ColumnType::char(32));
        assert_eq!(spec.user_id, ColumnType::unsigned_bigint());
    }
}
