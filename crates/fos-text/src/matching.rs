//! Family list parsing and generic fallbacks

use crate::font::GenericFamily;

/// Split a CSS-like family list, trimming quotes and spaces
pub fn split_families(families: &str) -> Vec<String> {
    families
        .split(',')
        .map(|f| f.trim_matches(|c| c == '"' || c == '\'' || c == ' '))
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Well known installed families for a generic family, tried after the
/// fontdb generic mapping fails
pub fn generic_fallbacks(generic: GenericFamily) -> &'static [&'static str] {
    match generic {
        GenericFamily::Default | GenericFamily::Serif => {
            &["Times New Roman", "Times", "DejaVu Serif", "Noto Serif", "Liberation Serif"]
        }
        GenericFamily::SansSerif => &["Arial", "Helvetica", "DejaVu Sans", "Noto Sans", "Liberation Sans"],
        GenericFamily::Monospace => &["Consolas", "Courier New", "DejaVu Sans Mono", "Noto Sans Mono"],
        GenericFamily::Cursive => &["Comic Sans MS", "Brush Script MT"],
        GenericFamily::Fantasy => &["Gabriola", "Impact", "Papyrus"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skips_empty_entries() {
        assert_eq!(split_families(" , ,"), Vec::<String>::new());
        assert_eq!(split_families("Arial,,Helvetica"), vec!["Arial", "Helvetica"]);
    }

    #[test]
    fn test_default_falls_back_to_serif() {
        assert_eq!(
            generic_fallbacks(GenericFamily::Default),
            generic_fallbacks(GenericFamily::Serif)
        );
    }
}
