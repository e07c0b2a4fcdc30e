use dialoguer::{Confirm, Input};
use std::io;

use crate::action::form::FormController;
use crate::config::ports::{ConfigPort, FormInput};
use crate::facade::report_facade::ReportFacade;
use crate::models::form::FormStatus;
use crate::service::config_service::ConfigService;
use crate::utils::utils::{default_output_name, setup_logging};

pub fn process_interactive_mode() -> io::Result<String> {
    setup_logging(&get_log_level_option()?)?;
    println!("=== 目錄報表產生器：互動模式 ===");

    let mut controller = FormController::new(Box::new(ReportFacade::default()), get_no_progress_option()?);
    let mut last_output = String::new();
    loop {
        let config_service = ConfigService::new(Box::new(InteractiveConfigAdapter::new(controller.input().clone())));
        controller.set_input(config_service.get_input()?);

        let status = controller.submit();
        println!("{}", status);
        if let FormStatus::Success { output_path } = status {
            last_output = output_path.display().to_string();
        }

        if !get_continue_option()? {
            break;
        }
    }
    Ok(last_output)
}

pub fn get_save_path(previous: &str) -> io::Result<String> {
    let initial = if previous.is_empty() { default_output_name() } else { previous.to_string() };
    Input::new()
        .with_prompt("儲存路徑（例如：./report.xlsx）")
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("儲存路徑輸入失敗: {}", e)))
}

pub fn get_search_path(previous: &str) -> io::Result<String> {
    Input::new()
        .with_prompt("要搜尋的目錄（例如：./mydir）")
        .with_initial_text(previous)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("搜尋路徑輸入失敗: {}", e)))
}

pub fn get_depth(previous: &str) -> io::Result<String> {
    Input::new()
        .with_prompt("搜尋深度（0 表示只列出根目錄中的檔案）")
        .with_initial_text(previous)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("搜尋深度輸入失敗: {}", e)))
}

pub fn get_continue_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否再產生一份報表？")
        .default(false)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("選項輸入失敗: {}", e)))
}

pub fn get_no_progress_option() -> io::Result<bool> {
    Ok(false)
}

pub fn get_log_level_option() -> io::Result<String> {
    Ok("warn".to_string())
}

// 互動輸入適配器，以上一次的輸入作為預填內容
pub struct InteractiveConfigAdapter {
    previous: FormInput,
}

impl InteractiveConfigAdapter {
    pub fn new(previous: FormInput) -> Self {
        InteractiveConfigAdapter { previous }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_input(&self) -> io::Result<FormInput> {
        Ok(FormInput {
            save_path: get_save_path(&self.previous.save_path)?,
            search_path: get_search_path(&self.previous.search_path)?,
            depth: get_depth(&self.previous.depth)?,
        })
    }
}
