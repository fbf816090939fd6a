/// Human-readable byte count, switching to KB/MB above 1 KiB/1 MiB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes > 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes > 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Cumulative byte total with thousands separators, e.g. `1,234,567`.
pub fn format_number(total: u64) -> String {
    let digits = total.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
