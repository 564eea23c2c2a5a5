use async_trait::async_trait;

use crate::errors::Result;

pub type Row = Vec<String>;

/// Row-oriented remote table store (a spreadsheet with one sheet per table).
/// Rows include the header row at index 0.
#[async_trait]
pub trait TabularStore: Send + Sync {
    async fn fetch_all_rows(&self, table: &str) -> Result<Vec<Row>>;

    async fn append_row(&self, table: &str, row: Row) -> Result<()>;

    async fn clear_all_rows(&self, table: &str) -> Result<()>;

    /// Replace the full contents of `table` with `rows` in one operation.
    async fn replace_all_rows(&self, table: &str, rows: Vec<Row>) -> Result<()>;

    /// Create `table` with `header` as its first row when it does not exist.
    /// Returns true if the table was created.
    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<bool>;

    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}
