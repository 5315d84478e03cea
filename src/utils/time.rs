//! 时间工具

use std::time::Duration;

/// 格式化为 MM:SS.ms
pub fn format_mmss_ms(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, elapsed.subsec_millis())
}
