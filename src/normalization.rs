use serde::{Deserialize, Deserializer};

/// Normalizes user-submitted text by stripping surrounding whitespace
/// and recomposing it into Unicode Normalization Form C.
///
/// ```
/// use brewlog::normalization::normalize_text;
/// assert_eq!(normalize_text(" カフェ "), "カフェ");
/// ```
pub fn normalize_text(text: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    text.as_ref().trim().nfc().to_string()
}

/// Deserializes a `String` after running it through `normalize_text`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(normalize_text(s))
}

/// Deserializes an optional `String` after running it through
/// `normalize_text`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    let o: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(o.map(normalize_text))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use unicode_normalization::is_nfc;

    use super::normalize_text;

    fn count_whitespace(s: impl AsRef<str>) -> usize {
        s.as_ref().chars().filter(|c| c.is_whitespace()).count()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 2000, ..ProptestConfig::default()
        })]

        #[test]
        fn normalization_works(string in "(\\S.*\\S|\\S+)", space_before in "\\s*", space_after in "\\s*") {
            let normalized = normalize_text(format!("{}{}{}", space_before, string, space_after));

            prop_assert!(is_nfc(&normalized), "{:?} (normalized form of {:?}) is in NFC", normalized, string);

            prop_assert!(!normalized.starts_with(char::is_whitespace) && !normalized.ends_with(char::is_whitespace), "{:?} (normalized form of {:?}) has no leading or trailing whitespace", normalized, string);

            let trimmed = normalized.trim();

            prop_assert_eq!(count_whitespace(&normalized), count_whitespace(&trimmed), "{:?} (normalized form of {:?}) preserves inner whitespace", normalized, string);
        }
    }
}
