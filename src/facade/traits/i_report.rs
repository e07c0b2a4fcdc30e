use crate::error::ReportError;
use crate::models::report::{ReportRequest, ReportSummary};

// Facade 接口，負責協調掃描與報表流程
pub trait ReportFacadeTrait: Send + Sync {
    /// 掃描目錄並產生試算表報表
    /// # 參數
    /// - request: 已驗證的輸出路徑、搜尋路徑與深度
    /// # 回傳
    /// - 成功時返回報表摘要；掃描或存檔失敗時返回對應錯誤，且不會留下輸出檔案
    fn create_report(&self, request: ReportRequest) -> Result<ReportSummary, ReportError>;
}
