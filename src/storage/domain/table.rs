//! Table definitions applied by the schema processor.

use super::{Item, TableDomainError};
use serde::{Deserialize, Serialize};

/// Column value types understood by relational migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ColumnType {
    /// Auto-incrementing 64-bit primary key.
    Primary,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Boolean flag.
    Boolean,
    /// Double-precision float.
    Float,
    /// Bounded text.
    String {
        /// Maximum character length.
        length: u32,
    },
    /// Unbounded text.
    Text,
    /// JSON document.
    Json,
}

/// Default length for [`ColumnType::String`] columns.
const DEFAULT_STRING_LENGTH: u32 = 255;

/// A single column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    name: String,
    column_type: ColumnType,
    nullable: bool,
}

impl ColumnDefinition {
    /// Creates a non-nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            column_type,
            nullable: false,
        }
    }

    /// Marks the column as nullable. Primary keys ignore this flag.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns whether the column accepts nulls.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable && !matches!(self.column_type, ColumnType::Primary)
    }
}

/// One schema unit: a collection to create and seed, or to drop.
///
/// Definitions are built fluently and then handed to
/// [`crate::storage::services::StorageSchemaProcessor::process`]:
///
/// ```
/// use storage_database::storage::domain::{Item, ItemValue, TableDefinition};
///
/// # fn main() -> Result<(), storage_database::storage::domain::TableDomainError> {
/// let john = Item::from([("name".to_owned(), ItemValue::from("John"))]);
/// let table = TableDefinition::new("users")?
///     .primary("id")?
///     .string("name")?
///     .items([john])
///     .force_insert(true);
///
/// assert_eq!(table.get_items().map(<[Item]>::len), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    name: String,
    columns: Vec<ColumnDefinition>,
    dropping: bool,
    items: Option<Vec<Item>>,
    forcing_insert: bool,
    with_transaction: bool,
}

impl TableDefinition {
    /// Creates a structure-only definition for the named table.
    ///
    /// The name is trimmed. Seeding runs inside a transaction unless
    /// [`Self::use_transaction`] turns it off.
    ///
    /// # Errors
    ///
    /// Returns [`TableDomainError::EmptyTableName`] when the name is empty
    /// after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, TableDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TableDomainError::EmptyTableName);
        }

        Ok(Self {
            name: trimmed.to_owned(),
            columns: Vec::new(),
            dropping: false,
            items: None,
            forcing_insert: false,
            with_transaction: true,
        })
    }

    /// Adds a column.
    ///
    /// # Errors
    ///
    /// Returns [`TableDomainError::EmptyColumnName`] for an empty column name
    /// or [`TableDomainError::DuplicateColumn`] when the name is taken.
    pub fn column(mut self, column: ColumnDefinition) -> Result<Self, TableDomainError> {
        if column.name().is_empty() {
            return Err(TableDomainError::EmptyColumnName(self.name));
        }

        if self.columns.iter().any(|c| c.name() == column.name()) {
            return Err(TableDomainError::DuplicateColumn {
                table: self.name,
                column: column.name,
            });
        }

        self.columns.push(column);
        Ok(self)
    }

    /// Adds an auto-incrementing primary key column.
    ///
    /// # Errors
    ///
    /// See [`Self::column`].
    pub fn primary(self, name: impl Into<String>) -> Result<Self, TableDomainError> {
        self.column(ColumnDefinition::new(name, ColumnType::Primary))
    }

    /// Adds a string column of the default length.
    ///
    /// # Errors
    ///
    /// See [`Self::column`].
    pub fn string(self, name: impl Into<String>) -> Result<Self, TableDomainError> {
        self.column(ColumnDefinition::new(
            name,
            ColumnType::String {
                length: DEFAULT_STRING_LENGTH,
            },
        ))
    }

    /// Sets the seed payload, replacing any previous one.
    #[must_use]
    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    /// Seeds even when the collection already holds records.
    #[must_use]
    pub const fn force_insert(mut self, force: bool) -> Self {
        self.forcing_insert = force;
        self
    }

    /// Chooses whether the apply step runs inside a transaction.
    #[must_use]
    pub const fn use_transaction(mut self, with_transaction: bool) -> Self {
        self.with_transaction = with_transaction;
        self
    }

    /// Turns the definition into a table drop.
    #[must_use]
    pub const fn drop_table(mut self) -> Self {
        self.dropping = true;
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column definitions in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns whether the definition drops the table.
    #[must_use]
    pub const fn is_dropping(&self) -> bool {
        self.dropping
    }

    /// Returns the seed payload, if any.
    #[must_use]
    pub fn get_items(&self) -> Option<&[Item]> {
        self.items.as_deref()
    }

    /// Returns whether seeding proceeds on a non-empty collection.
    #[must_use]
    pub const fn forcing_insert(&self) -> bool {
        self.forcing_insert
    }

    /// Returns whether the apply step runs inside a transaction.
    #[must_use]
    pub const fn with_transaction(&self) -> bool {
        self.with_transaction
    }
}
