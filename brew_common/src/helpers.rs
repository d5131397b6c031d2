use std::str::FromStr;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a number from an optional string value. Returns `Ok(None)` if there is no value, and an error message if the
/// value is present but cannot be parsed.
pub fn parse_number<N>(value: Option<String>) -> Result<Option<N>, String>
where
    N: FromStr,
    N::Err: std::fmt::Display,
{
    match value {
        None => Ok(None),
        Some(s) => s.trim().parse::<N>().map(Some).map_err(|e| format!("'{s}' is not a valid number. {e}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean_flags() {
        assert!(parse_boolean_flag(Some("TRUE".into()), false));
        assert!(parse_boolean_flag(Some(" on ".into()), false));
        assert!(!parse_boolean_flag(Some("0".into()), true));
        assert!(parse_boolean_flag(Some("maybe".into()), true));
        assert!(!parse_boolean_flag(None, false));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number::<u16>(Some("3001".into())), Ok(Some(3001)));
        assert_eq!(parse_number::<u16>(None), Ok(None));
        assert!(parse_number::<u16>(Some("99999".into())).is_err());
    }
}
