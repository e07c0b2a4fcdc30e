use log::{info, warn};
use rust_xlsxwriter::{Chart, ChartDataLabel, ChartType, Workbook, Worksheet};

use crate::error::ReportError;
use crate::models::report::{ReportInput, ReportOutput};
use crate::models::scan::{ExtensionStatsMap, FileSizeEntry, FileSizeIndex, ListingRow};
use crate::service::traits::i_service::ReportServiceTrait;

pub const STRUCTURE_SHEET: &str = "Directory Structure";
pub const STATISTICS_SHEET: &str = "Statistics";
pub const TOP_FILES: usize = 10;

/// Excel 允許的最大分組層數
const MAX_OUTLINE_LEVEL: u32 = 7;
const EXTENSION_COL: u16 = 3;
const COUNT_COL: u16 = 4;
const SIZE_COL: u16 = 5;
const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 300;
const NO_EXTENSION_LABEL: &str = "(none)";

/// 報表服務，負責將掃描結果寫入工作簿並實現 ReportServiceTrait
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        ReportService
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportServiceTrait for ReportService {
    fn build(&self, workbook: &mut Workbook, input: &ReportInput) -> Result<ReportOutput, ReportError> {
        let structure = workbook.add_worksheet();
        structure.set_name(STRUCTURE_SHEET)?;
        write_listing(structure, &input.scan.rows)?;
        apply_outline(structure, &input.scan.rows)?;
        structure.autofit();

        let statistics = workbook.add_worksheet();
        statistics.set_name(STATISTICS_SHEET)?;
        let top_files = top_largest(&input.scan.size_index, TOP_FILES);
        write_top_files(statistics, &top_files)?;
        let extension_rows = write_extension_table(statistics, &input.scan.extension_stats)?;
        statistics.autofit();

        let charts_added = if extension_rows > 0 {
            let chart_row = top_files.len().max(extension_rows) as u32 + 1;
            add_pie_charts(statistics, extension_rows as u32, chart_row)?;
            true
        } else {
            warn!("沒有掃描到任何檔案，略過圓餅圖");
            false
        };

        info!(
            "報表內容：目錄結構 {} 列，前 {} 大檔案，{} 種副檔名",
            input.scan.rows.len(),
            top_files.len(),
            extension_rows
        );

        Ok(ReportOutput {
            listing_rows: input.scan.rows.len(),
            top_files,
            extension_rows,
            charts_added,
        })
    }
}

/// 依大小遞減排序並取前 `limit` 筆；大小相同時保留插入順序，檔案不足時只回傳現有數量
pub fn top_largest(index: &FileSizeIndex, limit: usize) -> Vec<FileSizeEntry> {
    let mut sorted: Vec<FileSizeEntry> = index.entries().to_vec();
    sorted.sort_by(|a, b| b.size.cmp(&a.size));
    sorted.truncate(limit);
    sorted
}

fn write_listing(sheet: &mut Worksheet, rows: &[ListingRow]) -> Result<(), ReportError> {
    for (i, row) in rows.iter().enumerate() {
        let r = row_num(i)?;
        match row {
            ListingRow::Directory { path, column, .. } => {
                sheet.write_string(r, col_num(*column)?, path.display().to_string())?;
            }
            ListingRow::File { record, column, .. } => {
                let col = col_num(*column)?;
                sheet.write_string(r, col, record.path.display().to_string())?;
                sheet.write_string(r, col + 1, &record.extension)?;
                sheet.write_number(r, col + 2, record.size as f64)?;
                sheet.write_string(r, col + 3, record.attributes.to_string())?;
            }
        }
    }
    Ok(())
}

/// 以巢狀分組重現每一列的大綱層級：層級 k 的每段連續列各建立一次分組
fn apply_outline(sheet: &mut Worksheet, rows: &[ListingRow]) -> Result<(), ReportError> {
    let levels: Vec<u32> = rows.iter().map(|r| r.outline_level()).collect();
    let deepest = levels.iter().copied().max().unwrap_or(0);
    if deepest > MAX_OUTLINE_LEVEL {
        warn!("大綱層級 {} 超過上限 {}，較深的列將合併在最深層", deepest, MAX_OUTLINE_LEVEL);
    }

    for (first, last) in outline_groups(&levels, deepest.min(MAX_OUTLINE_LEVEL)) {
        sheet.group_rows(row_num(first)?, row_num(last)?)?;
    }
    Ok(())
}

/// 回傳 (起始列, 結束列) 的分組清單，外層在前
pub fn outline_groups(levels: &[u32], max_level: u32) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    for level in 1..=max_level {
        let mut start = None;
        for (i, &row_level) in levels.iter().enumerate() {
            match (row_level >= level, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    groups.push((s, i - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            groups.push((s, levels.len() - 1));
        }
    }
    groups
}

fn write_top_files(sheet: &mut Worksheet, top_files: &[FileSizeEntry]) -> Result<(), ReportError> {
    for (i, entry) in top_files.iter().enumerate() {
        let r = row_num(i)?;
        sheet.write_string(r, 0, entry.path.display().to_string())?;
        sheet.write_number(r, 1, entry.size as f64)?;
    }
    Ok(())
}

fn write_extension_table(sheet: &mut Worksheet, stats: &ExtensionStatsMap) -> Result<usize, ReportError> {
    let mut rows = 0;
    for (i, (extension, entry)) in stats.iter().enumerate() {
        let r = row_num(i)?;
        let label = if extension.is_empty() { NO_EXTENSION_LABEL } else { extension };
        sheet.write_string(r, EXTENSION_COL, label)?;
        sheet.write_number(r, COUNT_COL, entry.count as f64)?;
        sheet.write_number(r, SIZE_COL, entry.size as f64)?;
        rows += 1;
    }
    Ok(rows)
}

fn add_pie_charts(sheet: &mut Worksheet, rows: u32, chart_row: u32) -> Result<(), ReportError> {
    let last = rows - 1;
    let categories = (STATISTICS_SHEET, 0, EXTENSION_COL, last, EXTENSION_COL);

    let mut count_chart = Chart::new(ChartType::Pie);
    count_chart.title().set_name("Files by extension");
    count_chart
        .add_series()
        .set_name("Count")
        .set_categories(categories)
        .set_values((STATISTICS_SHEET, 0, COUNT_COL, last, COUNT_COL))
        .set_data_label(ChartDataLabel::new().show_percentage());
    count_chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);

    let mut size_chart = Chart::new(ChartType::Pie);
    size_chart.title().set_name("Size by extension");
    size_chart
        .add_series()
        .set_name("Size")
        .set_categories(categories)
        .set_values((STATISTICS_SHEET, 0, SIZE_COL, last, SIZE_COL))
        .set_data_label(ChartDataLabel::new().show_percentage());
    size_chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);

    sheet.insert_chart(chart_row, 0, &count_chart)?;
    sheet.insert_chart_with_offset(chart_row, 0, &size_chart, CHART_WIDTH + 20, 0)?;
    Ok(())
}

fn row_num(index: usize) -> Result<u32, ReportError> {
    u32::try_from(index).map_err(|_| ReportError::Workbook(rust_xlsxwriter::XlsxError::RowColumnLimitError))
}

fn col_num(column: u32) -> Result<u16, ReportError> {
    u16::try_from(column).map_err(|_| ReportError::Workbook(rust_xlsxwriter::XlsxError::RowColumnLimitError))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scan::{FileAttributes, FileRecord, ScanOutput};
    use std::path::{Path, PathBuf};

    fn index_of(entries: &[(&str, u64)]) -> FileSizeIndex {
        let mut index = FileSizeIndex::new();
        for (path, size) in entries {
            index.insert(Path::new(path), *size);
        }
        index
    }

    fn file_row(path: &str, extension: &str, size: u64, column: u32) -> ListingRow {
        ListingRow::File {
            record: FileRecord {
                path: PathBuf::from(path),
                extension: extension.to_string(),
                size,
                attributes: FileAttributes::default(),
            },
            column,
            outline_level: column + 1,
        }
    }

    #[test]
    fn test_top_largest_descending() {
        let index = index_of(&[("a.txt", 100), ("b.txt", 50), ("c.log", 10)]);
        let top = top_largest(&index, 3);
        let paths: Vec<_> = top.iter().map(|e| e.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("a.txt"), Path::new("b.txt"), Path::new("c.log")]);
    }

    #[test]
    fn test_top_largest_caps_at_available_files() {
        let index = index_of(&[("x", 5), ("y", 9)]);
        let top = top_largest(&index, TOP_FILES);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].size, 9);
        assert!(top_largest(&FileSizeIndex::new(), TOP_FILES).is_empty());
    }

    #[test]
    fn test_top_largest_takes_ten_and_keeps_ties_stable() {
        let entries: Vec<(String, u64)> = (0..15).map(|i| (format!("f{:02}", i), (i % 3) as u64)).collect();
        let borrowed: Vec<(&str, u64)> = entries.iter().map(|(p, s)| (p.as_str(), *s)).collect();
        let top = top_largest(&index_of(&borrowed), TOP_FILES);

        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].size >= w[1].size));
        let twos: Vec<_> = top.iter().filter(|e| e.size == 2).map(|e| e.path.to_string_lossy().to_string()).collect();
        assert_eq!(twos, vec!["f02", "f05", "f08", "f11", "f14"]);
    }

    #[test]
    fn test_outline_groups_nest() {
        let levels = [1, 2, 2, 3, 3, 2];
        let groups = outline_groups(&levels, 3);
        assert_eq!(groups, vec![(0, 5), (1, 5), (3, 4)]);
    }

    #[test]
    fn test_outline_groups_split_runs() {
        let levels = [1, 2, 1, 2];
        assert_eq!(outline_groups(&levels, 2), vec![(0, 3), (1, 1), (3, 3)]);
        assert!(outline_groups(&[], 0).is_empty());
    }

    #[test]
    fn test_build_writes_both_sheets() {
        let mut size_index = FileSizeIndex::new();
        let mut extension_stats = ExtensionStatsMap::new();
        let mut rows = vec![ListingRow::Directory {
            path: PathBuf::from("/root"),
            column: 0,
            outline_level: 1,
        }];
        for (path, ext, size) in [("/root/a.txt", ".txt", 100), ("/root/b.txt", ".txt", 50), ("/root/Makefile", "", 10)] {
            size_index.insert(Path::new(path), size);
            extension_stats.record(ext, size);
            rows.push(file_row(path, ext, size, 1));
        }
        let input = ReportInput {
            scan: ScanOutput {
                rows,
                size_index,
                extension_stats,
                file_count: 3,
                directory_count: 1,
                total_size: 160,
            },
        };

        let mut workbook = Workbook::new();
        let output = ReportService::new().build(&mut workbook, &input).unwrap();
        assert_eq!(output.listing_rows, 4);
        assert_eq!(output.extension_rows, 2);
        assert_eq!(output.top_files.len(), 3);
        assert!(output.charts_added);
        assert!(workbook.worksheet_from_name(STRUCTURE_SHEET).is_ok());
        assert!(workbook.worksheet_from_name(STATISTICS_SHEET).is_ok());
        assert!(!workbook.save_to_buffer().unwrap().is_empty());
    }

    #[test]
    fn test_build_caps_deep_outline() {
        let mut size_index = FileSizeIndex::new();
        let mut extension_stats = ExtensionStatsMap::new();
        let mut rows = Vec::new();
        let mut dir = PathBuf::from("/deep");
        for nesting in 0..10 {
            rows.push(ListingRow::Directory {
                path: dir.clone(),
                column: nesting,
                outline_level: nesting + 1,
            });
            let file = dir.join("leaf.txt");
            size_index.insert(&file, u64::from(nesting) + 1);
            extension_stats.record(".txt", u64::from(nesting) + 1);
            rows.push(ListingRow::File {
                record: FileRecord {
                    path: file,
                    extension: ".txt".to_string(),
                    size: u64::from(nesting) + 1,
                    attributes: FileAttributes::default(),
                },
                column: nesting + 1,
                outline_level: nesting + 2,
            });
            dir = dir.join(format!("d{}", nesting));
        }
        let input = ReportInput {
            scan: ScanOutput {
                rows,
                size_index,
                extension_stats,
                file_count: 10,
                directory_count: 10,
                total_size: 55,
            },
        };

        let mut workbook = Workbook::new();
        let output = ReportService::new().build(&mut workbook, &input).unwrap();
        assert_eq!(output.listing_rows, 20);
        assert_eq!(output.top_files[0].size, 10);
        assert!(!workbook.save_to_buffer().unwrap().is_empty());
    }

    #[test]
    fn test_build_without_files_skips_charts() {
        let input = ReportInput {
            scan: ScanOutput {
                rows: vec![ListingRow::Directory {
                    path: PathBuf::from("/empty"),
                    column: 0,
                    outline_level: 1,
                }],
                size_index: FileSizeIndex::new(),
                extension_stats: ExtensionStatsMap::new(),
                file_count: 0,
                directory_count: 1,
                total_size: 0,
            },
        };

        let mut workbook = Workbook::new();
        let output = ReportService::new().build(&mut workbook, &input).unwrap();
        assert!(!output.charts_added);
        assert!(output.top_files.is_empty());
        assert!(!workbook.save_to_buffer().unwrap().is_empty());
    }
}
