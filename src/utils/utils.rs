use std::io;
use std::time::Instant;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                pb.set_style(style);
            }
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    pub fn update(&self, count: u64, total_size: u64, current: &str) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };
        self.pb.set_message(format!(
            "掃描中：{} 檔案，{}，速度：{:.0} 檔案/秒 {}",
            count,
            format_file_size(total_size),
            speed,
            current
        ));
        self.pb.tick();
    }

    pub fn finish(&self, file_count: u64, total_size: u64, dir_count: u64) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(format!(
            "完成，共 {} 個目錄、{} 個檔案，總大小：{}",
            dir_count,
            file_count,
            format_file_size(total_size)
        ));
    }

    pub fn abandon(&self) {
        if !self.no_progress {
            self.pb.abandon_with_message("掃描中止");
        }
    }
}

pub fn format_file_size(size: u64) -> String {
    if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else if size < 1024 * 1024 * 1024 {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", size as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// 預設輸出檔名，例如 directory_report_20250101_120000.xlsx
pub fn default_output_name() -> String {
    format!("directory_report_{}.xlsx", Local::now().format("%Y%m%d_%H%M%S"))
}
