use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info};
use rust_xlsxwriter::{DocProperties, Workbook};

use crate::error::ReportError;
use crate::facade::traits::i_report::ReportFacadeTrait;
use crate::models::report::{ReportInput, ReportRequest, ReportSummary};
use crate::models::scan::ScanInput;
use crate::service::report::ReportService;
use crate::service::scan::ScanService;
use crate::service::traits::i_service::{ReportServiceTrait, ScanServiceTrait};

pub struct ReportFacade {
    scan_service: Box<dyn ScanServiceTrait>,
    report_service: Box<dyn ReportServiceTrait>,
}

impl ReportFacade {
    pub fn new(scan_service: Box<dyn ScanServiceTrait>, report_service: Box<dyn ReportServiceTrait>) -> Self {
        ReportFacade {
            scan_service,
            report_service,
        }
    }
}

impl Default for ReportFacade {
    fn default() -> Self {
        Self::new(Box::new(ScanService::new()), Box::new(ReportService::new()))
    }
}

impl ReportFacadeTrait for ReportFacade {
    fn create_report(&self, request: ReportRequest) -> Result<ReportSummary, ReportError> {
        let mut workbook = Workbook::new();
        let depth = request.max_depth.to_string();
        let search_path = request.search_path.display().to_string();
        let properties = DocProperties::new()
            .set_title("Directory report")
            .set_subject(&search_path)
            .set_custom_property("search_path", search_path.as_str())
            .set_custom_property("max_depth", depth.as_str());
        workbook.set_properties(&properties);

        let scan = self.scan_service.scan(ScanInput {
            root: request.search_path.clone(),
            max_depth: request.max_depth,
            no_progress: request.no_progress,
        })?;
        let file_count = scan.file_count;
        let directory_count = scan.directory_count;
        let total_size = scan.total_size;

        let input = ReportInput { scan };
        let output = self.report_service.build(&mut workbook, &input)?;

        save_workbook(&mut workbook, &request.output_path)?;
        info!("已寫入報表：{}", request.output_path.display());

        Ok(ReportSummary {
            output_path: request.output_path,
            file_count,
            directory_count,
            total_size,
            top_files: output.top_files,
        })
    }
}

/// 先寫入同目錄下的暫存檔，再以不覆寫的方式改名為目標檔案
///
/// 任何失敗都會刪除暫存檔，目標路徑不會出現寫到一半的檔案。
pub fn save_workbook(workbook: &mut Workbook, output_path: &Path) -> Result<(), ReportError> {
    let buffer = workbook.save_to_buffer()?;
    let save_error = |e: std::io::Error| {
        error!("寫入 {} 失敗：{}", output_path.display(), e);
        ReportError::from_save_error(output_path.to_path_buf(), e)
    };

    let parent = match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".dir_to_xlsx")
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(save_error)?;
    tmp.write_all(&buffer).map_err(save_error)?;
    tmp.as_file().sync_all().map_err(save_error)?;
    tmp.persist_noclobber(output_path).map_err(|e| save_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::ReportOutput;
    use crate::models::scan::ScanOutput;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct FailingScan;

    impl ScanServiceTrait for FailingScan {
        fn scan(&self, input: ScanInput) -> Result<ScanOutput, ReportError> {
            Err(ReportError::ScanFailed {
                path: input.root,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    struct SpyReport {
        called: Arc<AtomicBool>,
    }

    impl ReportServiceTrait for SpyReport {
        fn build(&self, workbook: &mut Workbook, input: &ReportInput) -> Result<ReportOutput, ReportError> {
            self.called.store(true, Ordering::SeqCst);
            ReportService::new().build(workbook, input)
        }
    }

    #[test]
    fn test_scan_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let called = Arc::new(AtomicBool::new(false));
        let facade = ReportFacade::new(Box::new(FailingScan), Box::new(SpyReport { called: called.clone() }));
        let output_path = dir.path().join("out.xlsx");

        let err = facade
            .create_report(ReportRequest {
                output_path: output_path.clone(),
                search_path: dir.path().to_path_buf(),
                max_depth: 0,
                no_progress: true,
            })
            .unwrap_err();

        assert!(matches!(err, ReportError::ScanFailed { .. }));
        assert!(!called.load(Ordering::SeqCst));
        assert!(!output_path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_workbook_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("taken.xlsx");
        fs::write(&output_path, b"keep me").unwrap();

        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let err = save_workbook(&mut workbook, &output_path).unwrap_err();

        assert!(matches!(err, ReportError::OutputAlreadyExists(_)));
        assert_eq!(fs::read(&output_path).unwrap(), b"keep me");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_into_read_only_directory_is_access_denied() {
        use std::os::unix::fs::PermissionsExt;

        if unsafe { libc::geteuid() } == 0 {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let result = save_workbook(&mut workbook, &locked.join("out.xlsx"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(ReportError::OutputWriteAccessDenied(_))));
        assert_eq!(fs::read_dir(&locked).unwrap().count(), 0);
    }
}
