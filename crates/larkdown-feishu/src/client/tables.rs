//! Table creation and cell population.

use std::thread;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use super::FeishuClient;
use crate::blocks::{BlockTypeCode, plain_text_child};
use crate::types::{BlockListData, ChildrenData};

/// Wait after table creation while the remote side materializes the cell
/// structure. A blind sleep, not a poll: the API exposes no readiness
/// signal.
const TABLE_MATERIALIZE_DELAY: Duration = Duration::from_millis(500);

/// Pause between consecutive cell fills to stay under the rate limit.
const CELL_FILL_DELAY: Duration = Duration::from_millis(100);

impl FeishuClient {
    /// Create an empty table block with the given dimensions.
    ///
    /// Returns the table block's id for later cell population, or `None`
    /// on failure.
    pub fn create_table(
        &self,
        document_id: &str,
        block_id: &str,
        rows: usize,
        cols: usize,
    ) -> Option<String> {
        let url = self.children_url(document_id, block_id);
        let payload = json!({
            "children": [{
                "block_type": BlockTypeCode::Table.code(),
                "table": {
                    "property": {
                        "row_size": rows,
                        "column_size": cols,
                    },
                },
            }],
        });

        info!("Creating {rows}x{cols} table in document {document_id}");

        match self.api_post::<ChildrenData>(&url, &payload) {
            Ok(resp) if resp.code == 0 => resp
                .data
                .and_then(|d| d.children.into_iter().next())
                .map(|child| child.block_id),
            Ok(resp) => {
                warn!("Table creation failed: {} - {}", resp.code, resp.msg);
                None
            }
            Err(e) => {
                warn!("Table creation failed: {e}");
                None
            }
        }
    }

    /// Enumerate a table's cell block ids in row-major order.
    ///
    /// Two-level fetch: the table's children are rows, each row's children
    /// are cells. A row whose cells cannot be listed is skipped; an
    /// unlistable table yields an empty vec.
    pub fn table_cells(&self, document_id: &str, table_block_id: &str) -> Vec<String> {
        let url = self.children_url(document_id, table_block_id);

        let rows = match self.api_get::<BlockListData>(&url) {
            Ok(resp) if resp.code == 0 => resp.data.map(|d| d.items).unwrap_or_default(),
            Ok(resp) => {
                warn!("Failed to list table rows: {} - {}", resp.code, resp.msg);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to list table rows: {e}");
                return Vec::new();
            }
        };

        let mut cells = Vec::new();
        for row in rows {
            let row_url = self.children_url(document_id, &row.block_id);
            match self.api_get::<BlockListData>(&row_url) {
                Ok(resp) if resp.code == 0 => {
                    if let Some(data) = resp.data {
                        cells.extend(data.items.into_iter().map(|cell| cell.block_id));
                    }
                }
                Ok(resp) => warn!("Failed to list row cells: {} - {}", resp.code, resp.msg),
                Err(e) => warn!("Failed to list row cells: {e}"),
            }
        }

        cells
    }

    /// Populate one cell with a paragraph of text.
    ///
    /// Best-effort: returns whether the append succeeded.
    pub fn fill_table_cell(&self, document_id: &str, cell_block_id: &str, content: &str) -> bool {
        let url = self.children_url(document_id, cell_block_id);
        let payload = json!({"children": [plain_text_child(content)]});

        match self.api_post::<ChildrenData>(&url, &payload) {
            Ok(resp) if resp.code == 0 => true,
            Ok(resp) => {
                warn!("Cell fill failed: {} - {}", resp.code, resp.msg);
                false
            }
            Err(e) => {
                warn!("Cell fill failed: {e}");
                false
            }
        }
    }

    /// Populate an entire table from a row-major grid.
    ///
    /// Waits for the table structure to materialize, fetches the cell list
    /// once, then fills cells in row-major order. Grid cells beyond the
    /// created dimensions and empty strings are skipped; a failing cell is
    /// logged and processing continues.
    pub fn fill_table(&self, document_id: &str, table_block_id: &str, grid: &[Vec<String>]) -> bool {
        thread::sleep(TABLE_MATERIALIZE_DELAY);

        let cells = self.table_cells(document_id, table_block_id);
        if cells.is_empty() {
            warn!("No cells found for table {table_block_id}");
            return false;
        }

        for (index, content) in cell_assignments(grid, cells.len()) {
            if !self.fill_table_cell(document_id, &cells[index], content) {
                warn!("Failed to fill table cell {index}");
            }
            thread::sleep(CELL_FILL_DELAY);
        }

        true
    }
}

/// Map a row-major grid onto a flat cell list of `cell_count` entries.
///
/// Cell `(r, c)` maps to index `r * cols + c` where `cols` is the grid's
/// maximum row width. Indices beyond `cell_count`, cells missing from
/// ragged rows, and empty strings produce no assignment.
fn cell_assignments(grid: &[Vec<String>], cell_count: usize) -> Vec<(usize, &str)> {
    let rows = grid.len();
    let cols = grid.iter().map(Vec::len).max().unwrap_or(0);

    let mut assignments = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let index = r * cols + c;
            if index >= cell_count {
                break;
            }
            let Some(content) = grid[r].get(c) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }
            assignments.push((index, content.as_str()));
        }
    }

    assignments
}
