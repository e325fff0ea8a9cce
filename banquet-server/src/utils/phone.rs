//! Australian phone number formatting
//!
//! All guest phone numbers are Australian mobiles. Wire format is E.164
//! (`+614xxxxxxxx`), display format is the local grouping `0412 345 678`.

/// Strip everything except ASCII digits
fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a phone number to E.164 wire format
///
/// A leading `0` is replaced with the `61` country code; a number without
/// either prefix gets `61` prepended. No length validation is performed:
/// malformed input produces a malformed but non-panicking result, and the
/// gateway's per-recipient error reporting catches it downstream.
pub fn format_au_phone(phone: &str) -> String {
    let mut cleaned = digits_only(phone);

    if let Some(rest) = cleaned.strip_prefix('0') {
        cleaned = format!("61{rest}");
    }

    if !cleaned.starts_with("61") {
        cleaned = format!("61{cleaned}");
    }

    format!("+{cleaned}")
}

/// Format a phone number for display (`0412 345 678`)
pub fn format_phone_display(phone: &str) -> String {
    let cleaned = digits_only(phone);

    let local = if let Some(rest) = cleaned.strip_prefix("61") {
        format!("0{rest}")
    } else if !cleaned.starts_with('0') {
        format!("0{cleaned}")
    } else {
        cleaned
    };

    if local.len() == 10 {
        format!("{} {} {}", &local[0..4], &local[4..7], &local[7..])
    } else {
        local
    }
}

/// Validate an Australian mobile number
///
/// Accepts `04xxxxxxxx` (10 digits) and `614xxxxxxxx` (11 digits, with or
/// without a leading `+`).
pub fn is_valid_au_mobile(phone: &str) -> bool {
    let cleaned = digits_only(phone);

    (cleaned.len() == 10 && cleaned.starts_with("04"))
        || (cleaned.len() == 11 && cleaned.starts_with("614"))
}
