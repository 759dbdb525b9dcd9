//! Identifier case conversions.
//!
//! The generator and the entry resolver must agree on the file name of a
//! component, so both go through [`kebab_case`].

/// Split an identifier into lowercase-insensitive words.
///
/// Word boundaries are any non-alphanumeric character, a lowercase letter or
/// digit followed by an uppercase letter (`fooBar`), and the last capital of
/// an acronym followed by a lowercase letter (`HTMLParser` -> `HTML`, `Parser`).
fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let camel_hump = prev.is_lowercase() || prev.is_numeric();
            let acronym_end = prev.is_uppercase() && next_is_lower;
            if camel_hump || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// `myWidget`, `My Widget`, `my_widget` -> `my-widget`.
pub fn kebab_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `my-widget` -> `MyWidget`.
pub fn pascal_case(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

/// `my-widget` -> `My widget`.
pub fn sentence_case(input: &str) -> String {
    let lowered: Vec<String> = words(input).iter().map(|w| w.to_lowercase()).collect();
    capitalize(&lowered.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_equivalent_spellings() {
        for input in ["my-widget", "myWidget", "MyWidget", "My Widget", "my_widget", "  my  widget "] {
            assert_eq!(kebab_case(input), "my-widget", "input: {:?}", input);
        }
    }

    #[test]
    fn test_kebab_case_acronyms_and_digits() {
        assert_eq!(kebab_case("HTMLParser"), "html-parser");
        assert_eq!(kebab_case("chart2D"), "chart2-d");
        assert_eq!(kebab_case("widget2"), "widget2");
        assert_eq!(kebab_case("chart\u{0663}D"), "chart\u{0663}-d");
        assert_eq!(kebab_case("panel\u{FF12}Grid"), "panel\u{FF12}-grid");
    }

    #[test]
    fn test_kebab_case_is_idempotent() {
        let once = kebab_case("someFancyName");
        assert_eq!(kebab_case(&once), once);
    }

    #[test]
    fn test_kebab_case_total() {
        assert_eq!(kebab_case(""), "");
        assert_eq!(kebab_case("---"), "");
    }

    #[test]
    fn test_pascal_and_sentence_case() {
        assert_eq!(pascal_case("my-widget"), "MyWidget");
        assert_eq!(pascal_case("dataGrid view"), "DataGridView");
        assert_eq!(sentence_case("myWidget"), "My widget");
    }
}
