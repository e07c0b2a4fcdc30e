use rust_xlsxwriter::Workbook;

use crate::error::ReportError;
use crate::models::report::{ReportInput, ReportOutput};
use crate::models::scan::{ScanInput, ScanOutput};

// Scan 服務接口，負責目錄走訪與統計
pub trait ScanServiceTrait: Send + Sync {
    /// 依深度限制遞迴掃描目錄
    /// # 參數
    /// - input: 掃描根目錄、最大深度與進度顯示設定
    /// # 回傳
    /// - 成功時返回清單列、檔案大小索引與副檔名統計，任何 IO 錯誤都會中止整個掃描
    fn scan(&self, input: ScanInput) -> Result<ScanOutput, ReportError>;
}

// Report 服務接口，負責將掃描結果寫入試算表
pub trait ReportServiceTrait: Send + Sync {
    /// 在工作簿中建立「目錄結構」與「統計」兩張工作表
    /// # 參數
    /// - workbook: 尚未存檔的工作簿
    /// - input: 已完成的掃描結果
    /// # 回傳
    /// - 成功時返回寫入摘要，失敗時返回試算表錯誤
    fn build(&self, workbook: &mut Workbook, input: &ReportInput) -> Result<ReportOutput, ReportError>;
}
