use std::io;

// 表單的三個原始輸入，尚未驗證
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub save_path: String,
    pub search_path: String,
    pub depth: String,
}

// 表單輸入來源的 Port
pub trait ConfigPort {
    fn get_input(&self) -> io::Result<FormInput>;
}
