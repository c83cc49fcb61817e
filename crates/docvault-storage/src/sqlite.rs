//! SQLite engine wrapper holding documents and orders.
//!
//! [`SqliteStore`] owns an in-memory SQLite connection. The whole database can
//! be exported to bytes and rebuilt from them; the persistence service uses
//! that pair to flush and reload snapshots. Order items are stored as a JSON
//! array in a single TEXT column.

use std::io::Write;

use rusqlite::backup::Progress;
use rusqlite::{params, Connection, DatabaseName, ErrorCode, OptionalExtension};
use tempfile::NamedTempFile;
use tracing::warn;

use docvault_core::{DocumentId, DocumentRecord, LineItem, MimeType, OrderId, OrderRecord};

use crate::error::StorageError;
use crate::schema;

/// Raw `documents` row, before MIME validation.
type DocumentRow = (String, Option<String>, Option<String>, Option<String>);

/// Raw `orders` row, before items are parsed.
type OrderRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<String>,
);

const DOCUMENT_COLUMNS: &str = "id, name, type, base64Content";
const ORDER_COLUMNS: &str = "id, orderNumber, orderDate, customer, total, items, receiptFileName";

/// In-memory SQLite store for documents and orders.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates an empty store with the schema in place.
    pub fn empty() -> Result<Self, StorageError> {
        let conn = schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    /// Rebuilds a store from bytes produced by [`SqliteStore::export_snapshot`]
    /// (or any SQLite database image), then applies pending migrations.
    ///
    /// Bytes that are not a SQLite database yield [`StorageError::Init`].
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, StorageError> {
        Self::restore(bytes).map_err(|err| match err {
            StorageError::Init { .. } => err,
            other => StorageError::Init {
                reason: format!("snapshot is not a usable database: {}", other),
            },
        })
    }

    fn restore(bytes: &[u8]) -> Result<Self, StorageError> {
        let mut image = NamedTempFile::new()?;
        image.write_all(bytes)?;
        image.flush()?;

        let mut conn = Connection::open_in_memory()?;
        conn.restore(DatabaseName::Main, image.path(), None::<fn(Progress)>)?;
        schema::migrate(&mut conn)?;

        // Touch both tables so a header-valid but damaged image fails here.
        conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get::<_, i64>(0))?;
        conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get::<_, i64>(0))?;

        Ok(SqliteStore { conn })
    }

    /// Exports the full database image.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, StorageError> {
        let image = NamedTempFile::new()?;
        self.conn
            .backup(DatabaseName::Main, image.path(), None::<fn(Progress)>)?;
        let bytes = std::fs::read(image.path())?;
        Ok(bytes)
    }

    /// Returns the migration version of the loaded schema.
    pub fn schema_version(&self) -> Result<i64, StorageError> {
        schema::schema_version(&self.conn)
    }

    // -------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------

    /// Inserts a document. An existing ID is rejected with
    /// [`StorageError::DuplicateKey`] and leaves the table unchanged.
    pub fn insert_document(&mut self, doc: &DocumentRecord) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO documents (id, name, type, base64Content) VALUES (?1, ?2, ?3, ?4)",
            params![doc.id.as_str(), doc.name, doc.mime_type.as_str(), doc.content],
        );
        check_insert(result, "documents", doc.id.as_str())
    }

    /// Retrieves a document by ID.
    pub fn get_document(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, StorageError> {
        let row: Option<DocumentRow> = self
            .conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE id = ?1", DOCUMENT_COLUMNS),
                params![id.as_str()],
                read_document_row,
            )
            .optional()?;
        row.map(document_from_row).transpose()
    }

    /// Lists all documents in insertion order.
    ///
    /// Rows that cannot be reconstructed (an unknown stored type) are skipped
    /// with a warning; [`SqliteStore::get_document`] still reports them.
    pub fn list_documents(&self) -> Result<Vec<DocumentRecord>, StorageError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM documents ORDER BY rowid",
            DOCUMENT_COLUMNS
        ))?;
        let rows = stmt.query_map([], read_document_row)?;

        let mut out = Vec::new();
        for row in rows {
            match document_from_row(row?) {
                Ok(doc) => out.push(doc),
                Err(err) => warn!(error = %err, "skipping unreadable document row"),
            }
        }
        Ok(out)
    }

    /// Deletes a document. Returns whether a row was removed; a missing ID is
    /// not an error.
    pub fn delete_document(&mut self, id: &DocumentId) -> Result<bool, StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id.as_str()])?;
        Ok(removed > 0)
    }

    pub fn document_count(&self) -> Result<usize, StorageError> {
        count_rows(&self.conn, "documents")
    }

    // -------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------

    /// Inserts an order, serializing its items to JSON.
    ///
    /// Non-finite amounts are rejected with [`StorageError::InvalidRecord`]
    /// before anything is written.
    pub fn insert_order(&mut self, order: &OrderRecord) -> Result<(), StorageError> {
        order.validate()?;
        let items_json = serde_json::to_string(&order.items)?;
        let result = self.conn.execute(
            "INSERT INTO orders (id, orderNumber, orderDate, customer, total, items, receiptFileName) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                order.id.as_str(),
                order.order_number,
                order.order_date,
                order.customer,
                order.total,
                items_json,
                order.receipt_file_name,
            ],
        );
        check_insert(result, "orders", order.id.as_str())
    }

    /// Retrieves an order by ID.
    pub fn get_order(&self, id: &OrderId) -> Result<Option<OrderRecord>, StorageError> {
        let row: Option<OrderRow> = self
            .conn
            .query_row(
                &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                params![id.as_str()],
                read_order_row,
            )
            .optional()?;
        row.map(order_from_row).transpose()
    }

    /// Lists all orders in insertion order.
    ///
    /// An order whose items column is not a valid item array is skipped with
    /// a warning instead of failing the whole listing.
    pub fn list_orders(&self) -> Result<Vec<OrderRecord>, StorageError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM orders ORDER BY rowid",
            ORDER_COLUMNS
        ))?;
        let rows = stmt.query_map([], read_order_row)?;

        let mut out = Vec::new();
        for row in rows {
            match order_from_row(row?) {
                Ok(order) => out.push(order),
                Err(err) => warn!(error = %err, "skipping unreadable order row"),
            }
        }
        Ok(out)
    }

    pub fn order_count(&self) -> Result<usize, StorageError> {
        count_rows(&self.conn, "orders")
    }
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

/// Maps a primary-key violation to [`StorageError::DuplicateKey`].
fn check_insert(
    result: rusqlite::Result<usize>,
    table: &'static str,
    id: &str,
) -> Result<(), StorageError> {
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(StorageError::DuplicateKey {
                table,
                id: id.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize, StorageError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    usize::try_from(count).map_err(|_| StorageError::Reconstruction {
        reason: format!("negative row count for {}", table),
    })
}

fn read_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn document_from_row(row: DocumentRow) -> Result<DocumentRecord, StorageError> {
    let (id, name, mime, content) = row;
    let mime = mime.unwrap_or_default();
    let mime_type: MimeType = mime.parse().map_err(|_| StorageError::Reconstruction {
        reason: format!("document {} has unsupported type '{}'", id, mime),
    })?;
    Ok(DocumentRecord {
        id: DocumentId(id),
        name: name.unwrap_or_default(),
        mime_type,
        content: content.unwrap_or_default(),
    })
}

fn read_order_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn order_from_row(row: OrderRow) -> Result<OrderRecord, StorageError> {
    let (id, order_number, order_date, customer, total, items_json, receipt_file_name) = row;
    let items: Vec<LineItem> = match items_json.as_deref() {
        None | Some("") => Vec::new(),
        Some(json) => serde_json::from_str(json)?,
    };
    Ok(OrderRecord {
        id: OrderId(id),
        order_number,
        order_date,
        customer,
        total,
        items,
        receipt_file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc(id: &str) -> DocumentRecord {
        DocumentRecord {
            id: DocumentId::from(id),
            name: format!("{}.png", id),
            mime_type: MimeType::Png,
            content: "QQ==".into(),
        }
    }

    fn sample_order(id: &str) -> OrderRecord {
        OrderRecord {
            id: OrderId::from(id),
            order_number: Some("OR-000034".into()),
            order_date: Some("2025-09-04".into()),
            customer: Some("John Doe".into()),
            total: Some(17.25),
            items: vec![
                LineItem { name: "Espresso".into(), quantity: Some(2.0), price: Some(3.5) },
                LineItem { name: "Bagel".into(), quantity: Some(1.0), price: Some(4.25) },
                LineItem { name: "Juice".into(), quantity: Some(1.0), price: Some(6.0) },
            ],
            receipt_file_name: Some("receipt.png".into()),
        }
    }

    #[test]
    fn documents_list_in_insertion_order() {
        let mut store = SqliteStore::empty().unwrap();
        store.insert_document(&sample_doc("b")).unwrap();
        store.insert_document(&sample_doc("a")).unwrap();
        let ids: Vec<String> = store
            .list_documents()
            .unwrap()
            .into_iter()
            .map(|d| d.id.0)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_document_is_rejected() {
        let mut store = SqliteStore::empty().unwrap();
        store.insert_document(&sample_doc("a")).unwrap();

        let mut clash = sample_doc("a");
        clash.name = "other.png".into();
        let err = store.insert_document(&clash).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { table: "documents", ref id } if id == "a"));

        let docs = store.list_documents().unwrap();
        assert_eq!(docs, vec![sample_doc("a")]);
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let mut store = SqliteStore::empty().unwrap();
        store.insert_document(&sample_doc("a")).unwrap();
        assert!(store.delete_document(&DocumentId::from("a")).unwrap());
        assert!(!store.delete_document(&DocumentId::from("a")).unwrap());
        assert_eq!(store.document_count().unwrap(), 0);
    }

    #[test]
    fn order_items_keep_order_and_values() {
        let mut store = SqliteStore::empty().unwrap();
        let order = sample_order("order-1");
        store.insert_order(&order).unwrap();
        let loaded = store.get_order(&OrderId::from("order-1")).unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[test]
    fn order_with_no_optional_fields() {
        let mut store = SqliteStore::empty().unwrap();
        let order = OrderRecord {
            id: OrderId::from("order-2"),
            order_number: None,
            order_date: None,
            customer: None,
            total: None,
            items: vec![],
            receipt_file_name: None,
        };
        store.insert_order(&order).unwrap();
        assert_eq!(store.list_orders().unwrap(), vec![order]);
    }

    #[test]
    fn duplicate_order_is_rejected() {
        let mut store = SqliteStore::empty().unwrap();
        store.insert_order(&sample_order("order-1")).unwrap();
        let err = store.insert_order(&sample_order("order-1")).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { table: "orders", .. }));
        assert_eq!(store.order_count().unwrap(), 1);
    }

    #[test]
    fn snapshot_round_trip_preserves_rows() {
        let mut store = SqliteStore::empty().unwrap();
        store.insert_document(&sample_doc("a")).unwrap();
        store.insert_order(&sample_order("order-1")).unwrap();

        let bytes = store.export_snapshot().unwrap();
        let restored = SqliteStore::from_snapshot(&bytes).unwrap();
        assert_eq!(restored.list_documents().unwrap(), vec![sample_doc("a")]);
        assert_eq!(restored.list_orders().unwrap(), vec![sample_order("order-1")]);
        assert_eq!(restored.schema_version().unwrap(), 1);
    }

    #[test]
    fn non_database_bytes_fail_as_init_error() {
        let garbage = vec![0xAB; 4096];
        let err = SqliteStore::from_snapshot(&garbage).err().unwrap();
        assert!(matches!(err, StorageError::Init { .. }));
    }

    #[test]
    fn unknown_stored_type_is_skipped_in_listing() {
        let mut store = SqliteStore::empty().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO documents (id, name, type, base64Content) VALUES ('x', 'x.gif', 'image/gif', '')",
                [],
            )
            .unwrap();
        store.insert_document(&sample_doc("a")).unwrap();

        assert_eq!(store.list_documents().unwrap(), vec![sample_doc("a")]);
        let err = store.get_document(&DocumentId::from("x")).unwrap_err();
        assert!(matches!(err, StorageError::Reconstruction { .. }));
    }

    #[test]
    fn non_finite_amounts_are_rejected_before_insert() {
        let mut store = SqliteStore::empty().unwrap();
        let mut order = sample_order("order-1");
        order.items[0].quantity = Some(f64::NAN);
        let err = store.insert_order(&order).unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord(_)));

        let mut order = sample_order("order-2");
        order.total = Some(f64::NEG_INFINITY);
        assert!(matches!(
            store.insert_order(&order).unwrap_err(),
            StorageError::InvalidRecord(_)
        ));
        assert_eq!(store.order_count().unwrap(), 0);
    }

    #[test]
    fn null_item_numbers_read_back_as_none() {
        let store = SqliteStore::empty().unwrap();
        store
            .conn
            .execute_batch(
                "INSERT INTO orders (id, items) VALUES ('order-1', '[{\"name\":\"Pen\",\"quantity\":null,\"price\":2.5}]');
                 INSERT INTO orders (id, items) VALUES ('order-2', '[{\"name\":\"Cap\",\"quantity\":1,\"price\":3}]');",
            )
            .unwrap();

        let orders = store.list_orders().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].items[0].quantity, None);
        assert_eq!(orders[0].items[0].price, Some(2.5));
        assert_eq!(orders[1].items[0].quantity, Some(1.0));
    }

    #[test]
    fn malformed_items_skip_only_that_order() {
        let mut store = SqliteStore::empty().unwrap();
        store
            .conn
            .execute("INSERT INTO orders (id, items) VALUES ('order-bad', '{not json')", [])
            .unwrap();
        store.insert_order(&sample_order("order-1")).unwrap();

        assert_eq!(store.list_orders().unwrap(), vec![sample_order("order-1")]);
        assert!(store.get_order(&OrderId::from("order-bad")).is_err());
    }
}
