/// Escape text for safe interpolation into HTML bodies and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format an experience total (e.g. 150 -> "150 XP").
pub fn format_xp(xp: i64) -> String {
    format!("{} XP", xp.max(0))
}

/// Format a streak counter (e.g. 1 -> "1 day", 3 -> "3 days").
pub fn format_streak(days: i64) -> String {
    if days == 1 {
        "1 day".to_owned()
    } else {
        format!("{} days", days)
    }
}

/// Convert internal generation mode keys to user-facing tab labels.
pub fn mode_display_name(mode: &str) -> String {
    match mode {
        "eli5" => "ELI5".to_owned(),
        "theory" => "Theory".to_owned(),
        "code" => "Code".to_owned(),
        "visual" => "Visual".to_owned(),
        "audio" => "Podcast".to_owned(),
        other => {
            let normalized = other.trim();
            let mut chars = normalized.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => "Unknown".to_owned(),
            }
        }
    }
}
