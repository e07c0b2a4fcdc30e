use log::{debug, error, info, warn};

use crate::config::config::{ensure_xlsx_extension, parse_depth, validate_output_path, validate_search_path};
use crate::config::ports::FormInput;
use crate::error::ReportError;
use crate::facade::traits::i_report::ReportFacadeTrait;
use crate::models::form::{FormState, FormStatus};
use crate::models::report::{ReportRequest, ReportSummary};
use crate::utils::utils::format_file_size;

/// 表單控制器：保存三個輸入欄位，`submit` 依序驗證後執行報表流程
///
/// 狀態依 Idle → Validating → Running → Reported 前進；Reported 會保留到下一次送出。
pub struct FormController {
    input: FormInput,
    state: FormState,
    status: Option<FormStatus>,
    no_progress: bool,
    facade: Box<dyn ReportFacadeTrait>,
}

impl FormController {
    pub fn new(facade: Box<dyn ReportFacadeTrait>, no_progress: bool) -> Self {
        FormController {
            input: FormInput::default(),
            state: FormState::Idle,
            status: None,
            no_progress,
            facade,
        }
    }

    pub fn set_input(&mut self, input: FormInput) {
        self.input = input;
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// 最近一次送出的結果
    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    /// 目前顯示的狀態訊息，尚未送出時為空字串
    pub fn status_message(&self) -> String {
        self.status.as_ref().map(|status| status.to_string()).unwrap_or_default()
    }

    /// 依序檢查輸入，第一個失敗的檢查即回傳；輸出路徑會在此補上副檔名
    pub fn validate(&mut self) -> Result<ReportRequest, ReportError> {
        let save_path = self.input.save_path.trim();
        let search_path = self.input.search_path.trim();
        let depth = self.input.depth.trim();
        if save_path.is_empty() || search_path.is_empty() || depth.is_empty() {
            return Err(ReportError::MissingInput);
        }

        let resolved = ensure_xlsx_extension(save_path);
        let search_path = search_path.to_string();
        let depth = depth.to_string();
        if resolved != self.input.save_path {
            debug!("輸出路徑補上副檔名：{}", resolved);
            self.input.save_path = resolved.clone();
        }

        let output_path = validate_output_path(&resolved)?;
        let search_path = validate_search_path(&search_path)?;
        let max_depth = parse_depth(&depth)?;

        Ok(ReportRequest {
            output_path,
            search_path,
            max_depth,
            no_progress: self.no_progress,
        })
    }

    pub fn submit(&mut self) -> &FormStatus {
        self.state = FormState::Validating;
        let status = match self.validate() {
            Ok(request) => {
                self.state = FormState::Running;
                info!(
                    "開始產生報表：{} -> {}（深度 {}）",
                    request.search_path.display(),
                    request.output_path.display(),
                    request.max_depth
                );
                match self.facade.create_report(request) {
                    Ok(summary) => {
                        log_summary(&summary);
                        FormStatus::Success {
                            output_path: summary.output_path,
                        }
                    }
                    Err(e) => FormStatus::Failure(e),
                }
            }
            Err(e) => FormStatus::Failure(e),
        };

        if let FormStatus::Failure(e) = &status {
            if e.is_validation() {
                warn!("輸入驗證失敗：{}", e);
            } else {
                error!("報表未產生：{}", e);
            }
        }
        self.state = FormState::Reported;
        self.status.insert(status)
    }
}

fn log_summary(summary: &ReportSummary) {
    info!(
        "報表完成：{} 個目錄，{} 個檔案，總大小 {}",
        summary.directory_count,
        summary.file_count,
        format_file_size(summary.total_size)
    );
    if let Some(largest) = summary.top_files.first() {
        debug!("最大檔案：{}（{} bytes）", largest.path.display(), largest.size);
    }
}
