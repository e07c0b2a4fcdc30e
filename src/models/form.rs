use std::fmt;
use std::path::PathBuf;

use crate::error::ReportError;

/// 表單送出後的結果
#[derive(Debug)]
pub enum FormStatus {
    Success { output_path: PathBuf },
    Failure(ReportError),
}

impl FormStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FormStatus::Success { .. })
    }

    pub fn error(&self) -> Option<&ReportError> {
        match self {
            FormStatus::Failure(err) => Some(err),
            FormStatus::Success { .. } => None,
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::Success { output_path } => {
                write!(f, "成功建立檔案！檔案位於：{}", output_path.display())
            }
            FormStatus::Failure(err) => write!(f, "{}", err),
        }
    }
}

/// 表單狀態機；進入 Reported 時，結果由控制器保存到下一次送出
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Validating,
    Running,
    Reported,
}
