use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// 檔案屬性旗標，對應作業系統回報的屬性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileAttributes {
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub archive: bool,
    pub reparse_point: bool,
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.read_only, "ReadOnly"),
            (self.hidden, "Hidden"),
            (self.system, "System"),
            (self.archive, "Archive"),
            (self.reparse_point, "ReparsePoint"),
        ];
        let names: Vec<&str> = flags.iter().filter(|(set, _)| *set).map(|(_, name)| *name).collect();
        if names.is_empty() {
            write!(f, "Normal")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

/// 單一檔案的掃描紀錄
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub extension: String,
    pub size: u64,
    pub attributes: FileAttributes,
}

/// 「目錄結構」工作表中的一列
#[derive(Debug, Clone, PartialEq)]
pub enum ListingRow {
    Directory {
        path: PathBuf,
        column: u32,
        outline_level: u32,
    },
    File {
        record: FileRecord,
        column: u32,
        outline_level: u32,
    },
}

impl ListingRow {
    pub fn outline_level(&self) -> u32 {
        match self {
            ListingRow::Directory { outline_level, .. } | ListingRow::File { outline_level, .. } => *outline_level,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ListingRow::File { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSizeEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// 檔案路徑對應大小的索引，保留插入順序，每個路徑只寫入一次
///
/// 以原始路徑為鍵，無法以 UTF-8 表示的不同檔名不會互相覆蓋。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSizeIndex {
    entries: Vec<FileSizeEntry>,
    positions: HashMap<PathBuf, usize>,
}

impl FileSizeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入路徑與大小；路徑已存在時不覆寫並回傳 false
    pub fn insert(&mut self, path: &Path, size: u64) -> bool {
        if self.positions.contains_key(path) {
            return false;
        }
        self.positions.insert(path.to_path_buf(), self.entries.len());
        self.entries.push(FileSizeEntry { path: path.to_path_buf(), size });
        true
    }

    pub fn get(&self, path: &Path) -> Option<u64> {
        self.positions.get(path).map(|&i| self.entries[i].size)
    }

    pub fn entries(&self) -> &[FileSizeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub count: u64,
    pub size: u64,
}

/// 依副檔名累計的統計，保留第一次出現的順序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionStatsMap {
    order: Vec<String>,
    stats: HashMap<String, ExtensionStats>,
}

impl ExtensionStatsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, extension: &str, size: u64) {
        match self.stats.get_mut(extension) {
            Some(stats) => {
                stats.count += 1;
                stats.size += size;
            }
            None => {
                self.order.push(extension.to_string());
                self.stats.insert(extension.to_string(), ExtensionStats { count: 1, size });
            }
        }
    }

    pub fn get(&self, extension: &str) -> Option<&ExtensionStats> {
        self.stats.get(extension)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionStats)> {
        self.order.iter().map(move |ext| (ext.as_str(), &self.stats[ext]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// 遞迴走訪時傳遞的累加狀態
#[derive(Debug, Default)]
pub struct ScanAccumulator {
    pub rows: Vec<ListingRow>,
    pub size_index: FileSizeIndex,
    pub extension_stats: ExtensionStatsMap,
    pub total_size: u64,
}

impl ScanAccumulator {
    /// 下一個可寫入的列位置
    pub fn next_row(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone)]
pub struct ScanInput {
    pub root: PathBuf,
    pub max_depth: u32,
    pub no_progress: bool,
}

#[derive(Debug)]
pub struct ScanOutput {
    pub rows: Vec<ListingRow>,
    pub size_index: FileSizeIndex,
    pub extension_stats: ExtensionStatsMap,
    pub file_count: usize,
    pub directory_count: usize,
    pub total_size: u64,
}
