use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::ReportError;

pub const OUTPUT_EXTENSION: &str = "xlsx";

#[derive(Parser, Clone, Debug)]
#[command(
    name = "dir_to_xlsx",
    about = "掃描目錄並產生 Excel 報表",
    long_about = "依指定深度遞迴掃描目錄，將目錄結構、前十大檔案與副檔名統計（含圓餅圖）寫入 .xlsx 活頁簿。\n不帶任何參數執行時進入互動模式。"
)]
pub struct Cli {
    /// 要掃描的目錄
    pub search_path: String,
    /// 搜尋深度，0 表示只列出根目錄中的檔案
    #[arg(allow_hyphen_values = true)]
    pub depth: String,
    /// 輸出檔案路徑，未指定時使用 directory_report_<時間>.xlsx
    #[arg(short, long)]
    pub output: Option<String>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["info", "warn", "error"])]
    pub log_level: String,
}

/// 缺少 .xlsx 副檔名（不分大小寫）時補上
pub fn ensure_xlsx_extension(save_path: &str) -> String {
    let has_extension = Path::new(save_path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case(OUTPUT_EXTENSION));
    if has_extension {
        save_path.to_string()
    } else {
        format!("{}.{}", save_path, OUTPUT_EXTENSION)
    }
}

pub fn validate_output_path(save_path: &str) -> Result<PathBuf, ReportError> {
    let path = PathBuf::from(save_path);
    if path.exists() {
        log::error!("輸出檔案已存在：{}", save_path);
        return Err(ReportError::OutputAlreadyExists(path));
    }
    Ok(path)
}

pub fn validate_search_path(search_path: &str) -> Result<PathBuf, ReportError> {
    let path = PathBuf::from(search_path);
    if !path.exists() {
        log::error!("搜尋路徑不存在：{}", search_path);
        return Err(ReportError::InputPathNotFound(path));
    }
    if !path.is_dir() {
        log::error!("搜尋路徑不是目錄：{}", search_path);
        return Err(ReportError::InputPathNotADirectory(path));
    }
    Ok(path)
}

pub fn parse_depth(depth: &str) -> Result<u32, ReportError> {
    depth.trim().parse::<u32>().map_err(|_| {
        log::error!("搜尋深度不是數字：{}", depth);
        ReportError::DepthNotANumber(depth.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_xlsx_extension() {
        assert_eq!(ensure_xlsx_extension("report"), "report.xlsx");
        assert_eq!(ensure_xlsx_extension("report.xlsx"), "report.xlsx");
        assert_eq!(ensure_xlsx_extension("REPORT.XLSX"), "REPORT.XLSX");
        assert_eq!(ensure_xlsx_extension("data.csv"), "data.csv.xlsx");
    }

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth("3").unwrap(), 3);
        assert_eq!(parse_depth(" 0 ").unwrap(), 0);
        assert!(matches!(parse_depth("abc"), Err(ReportError::DepthNotANumber(_))));
        assert!(matches!(parse_depth("-1"), Err(ReportError::DepthNotANumber(_))));
        assert!(matches!(parse_depth("1.5"), Err(ReportError::DepthNotANumber(_))));
    }

    #[test]
    fn test_validate_search_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        assert!(validate_search_path(dir.path().to_str().unwrap()).is_ok());
        assert!(matches!(
            validate_search_path(file.to_str().unwrap()),
            Err(ReportError::InputPathNotADirectory(_))
        ));
        assert!(matches!(
            validate_search_path(dir.path().join("nope").to_str().unwrap()),
            Err(ReportError::InputPathNotFound(_))
        ));
    }

    #[test]
    fn test_cli_parses_positional_arguments() {
        let cli = Cli::parse_from(["dir_to_xlsx", "/tmp", "2", "-o", "out.xlsx", "--no-progress"]);
        assert_eq!(cli.search_path, "/tmp");
        assert_eq!(cli.depth, "2");
        assert_eq!(cli.output.as_deref(), Some("out.xlsx"));
        assert!(cli.no_progress);
        assert_eq!(cli.log_level, "info");
    }
}
