use std::io;
use clap::Parser;
use crate::action::form::FormController;
use crate::action::interactive::process_interactive_mode;
use crate::config::config::Cli;
use crate::config::ports::{ConfigPort, FormInput};
use crate::facade::report_facade::ReportFacade;
use crate::models::form::FormStatus;
use crate::service::config_service::ConfigService;
use crate::utils::utils::{default_output_name, setup_logging};

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let mut controller = FormController::new(Box::new(ReportFacade::default()), cli.no_progress);
    controller.set_input(config_service.get_input()?);

    let status = controller.submit();
    let message = status.to_string();
    match status {
        FormStatus::Success { output_path } => {
            println!("{}", message);
            Ok(output_path.display().to_string())
        }
        FormStatus::Failure(_) => {
            eprintln!("{}", message);
            Err(io::Error::new(io::ErrorKind::Other, message))
        }
    }
}

// CLI 輸入適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_input(&self) -> io::Result<FormInput> {
        let save_path = match &self.cli.output {
            Some(output) => output.clone(),
            None => {
                let name = default_output_name();
                log::info!("未指定輸出檔案，使用預設名稱：{}", name);
                name
            }
        };
        Ok(FormInput {
            save_path,
            search_path: self.cli.search_path.clone(),
            depth: self.cli.depth.clone(),
        })
    }
}
