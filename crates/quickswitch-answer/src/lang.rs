// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Languages the translation surface knows how to label.
pub const LANGUAGES: [(&str, &str); 28] = [
    ("en", "English"),
    ("de", "German"),
    ("no", "Norwegian"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("tr", "Turkish"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("cs", "Czech"),
    ("el", "Greek"),
    ("he", "Hebrew"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("uk", "Ukrainian"),
    ("ro", "Romanian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
];

pub fn is_known(code: &str) -> bool {
    LANGUAGES.iter().any(|(known, _)| *known == code)
}

/// Display name for a language code, falling back to the code itself.
pub fn name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::{is_known, name};

    #[test]
    fn known_codes_have_names() {
        assert_eq!(name("no"), "Norwegian");
        assert!(is_known("de"));
    }

    #[test]
    fn unknown_codes_fall_back_to_the_code() {
        assert_eq!(name("xx"), "xx");
        assert!(!is_known("xx"));
    }
}
