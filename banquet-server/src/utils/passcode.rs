//! RSVP passcode generation
//!
//! Passcodes are short, human-memorable strings ("sara472", "mike831") that a
//! guest types together with their first name to open the RSVP form. They are
//! a lightweight access credential, not a cryptographic one.

use rand::Rng;

/// Generate a passcode from a guest's first name
///
/// Takes up to four lowercase letters of the name (`"guest"` when the name
/// contains no letters) and appends a random 3-digit number in [100, 999].
/// Not unique by construction; guest creation retries on collision within
/// the same account.
pub fn generate_passcode(first_name: &str) -> String {
    let clean_name: String = first_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    let short_name = if clean_name.is_empty() {
        "guest".to_string()
    } else {
        clean_name.chars().take(4).collect()
    };

    let random_num: u32 = rand::thread_rng().gen_range(100..1000);
    format!("{short_name}{random_num}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_suffix_in_range(code: &str, prefix: &str) -> bool {
        let suffix = &code[prefix.len()..];
        suffix.len() == 3
            && suffix.chars().all(|c| c.is_ascii_digit())
            && (100..1000).contains(&suffix.parse::<u32>().unwrap())
    }

    #[test]
    fn test_passcode_from_plain_name() {
        for _ in 0..50 {
            let code = generate_passcode("Sarah");
            assert!(code.starts_with("sara"), "got {code}");
            assert!(digits_suffix_in_range(&code, "sara"));
        }
    }

    #[test]
    fn test_passcode_strips_non_letters() {
        let code = generate_passcode("Mary-Jane 2");
        assert!(code.starts_with("mary"), "got {code}");
    }

    #[test]
    fn test_passcode_short_name_kept_whole() {
        let code = generate_passcode("Jo");
        assert!(code.starts_with("jo"));
        assert!(digits_suffix_in_range(&code, "jo"));
    }

    #[test]
    fn test_passcode_empty_name_falls_back_to_guest() {
        for _ in 0..20 {
            let code = generate_passcode("");
            assert!(code.starts_with("guest"), "got {code}");
            assert!(digits_suffix_in_range(&code, "guest"));
        }
        let code = generate_passcode("123 !!");
        assert!(code.starts_with("guest"));
    }
}
