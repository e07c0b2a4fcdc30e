use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 報表流程中所有可回報給使用者的錯誤
///
/// 每個變體的 `Display` 即為表單上顯示的狀態訊息。
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("未提供所有參數（儲存路徑、搜尋路徑、搜尋深度）")]
    MissingInput,

    #[error("檔案已存在：{0}")]
    OutputAlreadyExists(PathBuf),

    #[error("目錄不存在：{0}")]
    InputPathNotFound(PathBuf),

    #[error("這是檔案，而不是目錄：{0}")]
    InputPathNotADirectory(PathBuf),

    #[error("搜尋深度不是有效的非負整數：{0}")]
    DepthNotANumber(String),

    #[error("無法存取檔案：{0}")]
    OutputWriteAccessDenied(PathBuf),

    #[error("寫入檔案 {path} 失敗：{source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("掃描目錄 {path} 失敗：{source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("建立試算表失敗：{0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl ReportError {
    /// 驗證階段的錯誤，發生時尚未進行任何掃描
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReportError::MissingInput
                | ReportError::OutputAlreadyExists(_)
                | ReportError::InputPathNotFound(_)
                | ReportError::InputPathNotADirectory(_)
                | ReportError::DepthNotANumber(_)
        )
    }

    /// 將存檔時的 IO 錯誤分類為權限不足或一般寫入失敗
    pub fn from_save_error(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => ReportError::OutputWriteAccessDenied(path),
            io::ErrorKind::AlreadyExists => ReportError::OutputAlreadyExists(path),
            _ => ReportError::OutputWriteFailed { path, source },
        }
    }
}

impl From<ReportError> for io::Error {
    fn from(err: ReportError) -> Self {
        let kind = match &err {
            ReportError::MissingInput | ReportError::DepthNotANumber(_) => io::ErrorKind::InvalidInput,
            ReportError::OutputAlreadyExists(_) => io::ErrorKind::AlreadyExists,
            ReportError::InputPathNotFound(_) => io::ErrorKind::NotFound,
            ReportError::InputPathNotADirectory(_) => io::ErrorKind::InvalidInput,
            ReportError::OutputWriteAccessDenied(_) => io::ErrorKind::PermissionDenied,
            ReportError::OutputWriteFailed { source, .. } | ReportError::ScanFailed { source, .. } => source.kind(),
            ReportError::Workbook(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
