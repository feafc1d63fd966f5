//! Environment-parsing helpers shared by the server and provider configs.

/// Interprets the common spellings of an on/off environment flag: `1`/`0`, `true`/`false`, `yes`/`no`,
/// `on`/`off`, in any casing. Unset or unrecognised values fall back to `default`, so a typo in a deployment's
/// env file degrades to the documented default instead of refusing to boot.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];
    const FALSY: [&str; 4] = ["0", "false", "no", "off"];
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if TRUTHY.contains(&v.as_str()) => true,
        Some(v) if FALSY.contains(&v.as_str()) => false,
        _ => default,
    }
}

#[cfg(test)]
mod test {
    use super::parse_boolean_flag;

    #[test]
    fn recognised_spellings_override_the_default() {
        for v in ["1", "true", "YES", "On"] {
            assert!(parse_boolean_flag(Some(v.to_string()), false), "{v} should read as true");
        }
        for v in ["0", "false", "No", "OFF", " off "] {
            assert!(!parse_boolean_flag(Some(v.to_string()), true), "{v} should read as false");
        }
    }

    #[test]
    fn unset_or_garbled_values_fall_back_to_the_default() {
        assert!(parse_boolean_flag(None, true));
        assert!(!parse_boolean_flag(None, false));
        assert!(parse_boolean_flag(Some("maybe".to_string()), true));
        assert!(!parse_boolean_flag(Some("maybe".to_string()), false));
    }
}
