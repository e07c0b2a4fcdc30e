use std::io;

use dir_to_xlsx::action::cli::process_args;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let output = process_args(args)?;
    log::info!("程式執行完成，最後輸出檔案：{}", output);
    Ok(())
}
