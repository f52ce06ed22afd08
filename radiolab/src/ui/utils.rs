use chrono::{DateTime, NaiveDate};

/// Human readable file size, e.g. `1.5 MB`
pub fn fmt_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Backend dates arrive as `YYYY-MM-DD` or full RFC 3339 timestamps; both show as
/// `DD.MM.YYYY`. Anything else is shown as-is.
pub fn fmt_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format("%d.%m.%Y %H:%M").to_string();
    }
    raw.to_string()
}

/// Cuts `text` to `max` characters, ending in an ellipsis when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_size() {
        assert_eq!(fmt_size(512), "512 B");
        assert_eq!(fmt_size(1536), "1.5 KB");
        assert_eq!(fmt_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_fmt_date_formats() {
        assert_eq!(fmt_date("2024-03-09"), "09.03.2024");
        assert_eq!(fmt_date("2024-03-09T14:05:00Z"), "09.03.2024 14:05");
        assert_eq!(fmt_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Hallux Valgus", 6), "Hallu…");
    }
}
