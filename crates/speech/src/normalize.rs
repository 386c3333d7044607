//! Text cleanup applied before handing a prompt to the synthesizer.

/// Normalize question text for synthesis.
///
/// Expands symbols a voice would otherwise skip or misread, collapses
/// whitespace, and drops characters outside plain prose.
#[must_use]
pub fn normalize_for_speech(text: &str) -> String {
    let mut result = text.to_string();

    let symbols = [
        ("&", " and "),
        ("%", " percent"),
        ("@", " at "),
        ("#", " number "),
        ("+", " plus "),
        ("=", " equals "),
    ];
    for (symbol, spoken) in symbols {
        result = result.replace(symbol, spoken);
    }

    let result: String = result
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,!?;:'-\"".contains(*c))
        .collect();

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
