use std::time::Duration;

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a byte rate in human units
pub fn format_throughput(bytes: usize, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return "n/a".to_string();
    }
    let rate = bytes as f64 / secs;
    if rate >= 1_000_000_000.0 {
        format!("{:.2} GB/s", rate / 1_000_000_000.0)
    } else if rate >= 1_000_000.0 {
        format!("{:.2} MB/s", rate / 1_000_000.0)
    } else if rate >= 1_000.0 {
        format!("{:.2} KB/s", rate / 1_000.0)
    } else {
        format!("{:.0} B/s", rate)
    }
}
