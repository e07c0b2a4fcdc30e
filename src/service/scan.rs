use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::ReportError;
use crate::models::scan::{FileAttributes, FileRecord, ListingRow, ScanAccumulator, ScanInput, ScanOutput};
use crate::service::traits::i_service::ScanServiceTrait;
use crate::utils::utils::ProgressManager;

/// 掃描服務，負責依深度限制走訪目錄並實現 ScanServiceTrait
pub struct ScanService;

impl ScanService {
    pub fn new() -> Self {
        ScanService
    }
}

impl Default for ScanService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanServiceTrait for ScanService {
    fn scan(&self, input: ScanInput) -> Result<ScanOutput, ReportError> {
        let root = std::path::absolute(&input.root).map_err(|e| scan_error(&input.root, e))?;
        info!("開始掃描目錄：{}，最大深度：{}", root.display(), input.max_depth);

        let progress = ProgressManager::new(input.no_progress);
        let mut acc = ScanAccumulator::default();
        let next_row = match scan_directory(&root, input.max_depth, input.max_depth, &mut acc, &progress) {
            Ok(row) => row,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };

        let file_count = acc.rows.iter().filter(|row| row.is_file()).count();
        let directory_count = acc.rows.len() - file_count;
        progress.finish(file_count as u64, acc.total_size, directory_count as u64);
        info!(
            "掃描完成：{} 列，{} 個目錄，{} 個檔案，{} 種副檔名",
            next_row,
            directory_count,
            file_count,
            acc.extension_stats.len()
        );

        Ok(ScanOutput {
            rows: acc.rows,
            size_index: acc.size_index,
            extension_stats: acc.extension_stats,
            file_count,
            directory_count,
            total_size: acc.total_size,
        })
    }
}

/// 走訪單一目錄：先寫目錄列，再寫其檔案，深度允許時才遞迴子目錄
/// # 回傳
/// - 下一個可寫入的列位置
pub fn scan_directory(
    dir: &Path,
    remaining_depth: u32,
    max_depth: u32,
    acc: &mut ScanAccumulator,
    progress: &ProgressManager,
) -> Result<usize, ReportError> {
    let nesting = max_depth - remaining_depth;
    acc.rows.push(ListingRow::Directory {
        path: dir.to_path_buf(),
        column: nesting,
        outline_level: nesting + 1,
    });

    let (files, subdirs) = read_entries(dir)?;

    for (path, metadata, is_link) in files {
        let record = file_record(&path, &metadata, is_link);
        if !acc.size_index.insert(&record.path, record.size) {
            warn!("重複的檔案路徑：{}", record.path.display());
        }
        acc.extension_stats.record(&record.extension, record.size);
        acc.total_size += record.size;
        progress.update(acc.size_index.len() as u64, acc.total_size, &record.path.display().to_string());
        acc.rows.push(ListingRow::File {
            record,
            column: nesting + 1,
            outline_level: nesting + 2,
        });
    }

    let mut next_row = acc.next_row();
    if remaining_depth > 0 {
        for subdir in subdirs {
            next_row = scan_directory(&subdir, remaining_depth - 1, max_depth, acc, progress)?;
        }
    }
    Ok(next_row)
}

type FileEntry = (PathBuf, Metadata, bool);

/// 讀取目錄內容並依名稱排序，分為檔案與子目錄
fn read_entries(dir: &Path) -> Result<(Vec<FileEntry>, Vec<PathBuf>), ReportError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| scan_error(dir, e))? {
        entries.push(entry.map_err(|e| scan_error(dir, e))?);
    }
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| scan_error(&path, e))?;
        if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_dir() => {
                    debug!("不進入指向目錄的符號連結：{}", path.display());
                }
                Ok(metadata) => files.push((path, metadata, true)),
                Err(e) => warn!("略過失效的符號連結 {}：{}", path.display(), e),
            }
        } else if file_type.is_dir() {
            subdirs.push(path);
        } else {
            let metadata = entry.metadata().map_err(|e| scan_error(&path, e))?;
            files.push((path, metadata, false));
        }
    }
    Ok((files, subdirs))
}

fn file_record(path: &Path, metadata: &Metadata, is_link: bool) -> FileRecord {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    FileRecord {
        path: path.to_path_buf(),
        extension: extension_of(&name),
        size: metadata.len(),
        attributes: read_attributes(&name, metadata, is_link),
    }
}

/// 取得含前導點的副檔名，大小寫保持原樣；沒有副檔名時回傳空字串
///
/// 以最後一個點為準，因此 `.bashrc` 的副檔名為 `.bashrc`，`archive.` 則沒有副檔名。
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) if pos + 1 < file_name.len() => file_name[pos..].to_string(),
        _ => String::new(),
    }
}

#[cfg(windows)]
fn read_attributes(_name: &str, metadata: &Metadata, is_link: bool) -> FileAttributes {
    use std::os::windows::fs::MetadataExt;

    const HIDDEN: u32 = 0x2;
    const SYSTEM: u32 = 0x4;
    const ARCHIVE: u32 = 0x20;
    const REPARSE_POINT: u32 = 0x400;

    let raw = metadata.file_attributes();
    FileAttributes {
        read_only: metadata.permissions().readonly(),
        hidden: raw & HIDDEN != 0,
        system: raw & SYSTEM != 0,
        archive: raw & ARCHIVE != 0,
        reparse_point: is_link || raw & REPARSE_POINT != 0,
    }
}

#[cfg(not(windows))]
fn read_attributes(name: &str, metadata: &Metadata, is_link: bool) -> FileAttributes {
    FileAttributes {
        read_only: metadata.permissions().readonly(),
        hidden: name.starts_with('.'),
        system: false,
        archive: false,
        reparse_point: is_link,
    }
}

fn scan_error(path: &Path, source: io::Error) -> ReportError {
    ReportError::ScanFailed {
        path: path.to_path_buf(),
        source,
    }
}
