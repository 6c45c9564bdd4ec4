/// Wire types for the Google Visualization (gviz) spreadsheet export.
/// Endpoint: https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:json
///
/// Only the fields the lucky draw reads are modelled; serde ignores the rest
/// (`version`, `reqId`, `status`, column metadata...).
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Default, Debug)]
pub struct GvizResponse {
    pub table: GvizTable,
}

/// `rows` and each row's `c` are required: a table missing either is
/// malformed and fails the whole feed rather than dropping rows.
#[derive(Deserialize, Default, Debug)]
pub struct GvizTable {
    pub rows: Vec<GvizRow>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizRow {
    /// One entry per column; empty cells come through as `null`.
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct GvizCell {
    /// Raw cell value. Formatted text lives in `f`, which is not used.
    pub v: Option<Value>,
}

impl GvizRow {
    pub fn value(&self, column: usize) -> Option<&Value> {
        self.c
            .get(column)?
            .as_ref()?
            .v
            .as_ref()
            .filter(|v| !v.is_null())
    }
}
