use serde::Serialize;

/// One row of the `backups` table, written by the external backup script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupRow {
    pub id: i64,
    pub timestamp: String,
    pub total_files: i64,
    pub uploaded_files: i64,
    pub remote_path: String,
}
