use std::path::PathBuf;

use crate::models::scan::{FileSizeEntry, ScanOutput};

/// 產生報表所需的完整請求（已通過驗證）
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub output_path: PathBuf,
    pub search_path: PathBuf,
    pub max_depth: u32,
    pub no_progress: bool,
}

pub struct ReportInput {
    pub scan: ScanOutput,
}

#[derive(Debug)]
pub struct ReportOutput {
    pub listing_rows: usize,
    pub top_files: Vec<FileSizeEntry>,
    pub extension_rows: usize,
    pub charts_added: bool,
}

#[derive(Debug)]
pub struct ReportSummary {
    pub output_path: PathBuf,
    pub file_count: usize,
    pub directory_count: usize,
    pub total_size: u64,
    pub top_files: Vec<FileSizeEntry>,
}
