use std::io;
use crate::config::ports::{ConfigPort, FormInput};

// 配置服務，包裝實際的輸入來源
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_input(&self) -> io::Result<FormInput> {
        self.config_port.get_input()
    }
}

// 固定值適配器，輸入在建立時即已確定
pub struct StaticConfigAdapter {
    input: FormInput,
}

impl StaticConfigAdapter {
    pub fn new(save_path: &str, search_path: &str, depth: &str) -> Self {
        StaticConfigAdapter {
            input: FormInput {
                save_path: save_path.to_string(),
                search_path: search_path.to_string(),
                depth: depth.to_string(),
            },
        }
    }
}

impl ConfigPort for StaticConfigAdapter {
    fn get_input(&self) -> io::Result<FormInput> {
        Ok(self.input.clone())
    }
}
