//! Subject emoji picker for class cards.

/// Pick a display emoji from keywords in the class name.
///
/// Matching is case-insensitive substring; the first rule wins, and
/// unknown subjects get the generic notebook.
pub fn emoji_for_class(name: &str) -> &'static str {
    let n = name.to_lowercase();
    if n.contains("math") || n.contains("calc") {
        "📐"
    } else if n.contains("bio") {
        "🧬"
    } else if n.contains("chem") {
        "🧪"
    } else if n.contains("phys") {
        "⚛️"
    } else if n.contains("cs") || n.contains("computer") || n.contains("data") {
        "💻"
    } else if n.contains("psych") {
        "🧠"
    } else if n.contains("econ") {
        "📊"
    } else if n.contains("art") {
        "🎨"
    } else if n.contains("hist") {
        "📚"
    } else if n.contains("lit") || n.contains("english") {
        "📖"
    } else {
        "📘"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive() {
        assert_eq!(emoji_for_class("BIOLOGY 110"), "🧬");
        assert_eq!(emoji_for_class("Organic Chemistry"), "🧪");
    }

    #[test]
    fn first_rule_wins_for_overlapping_names() {
        // "Mathematical Physics" hits the math rule before physics.
        assert_eq!(emoji_for_class("Mathematical Physics"), "📐");
    }

    #[test]
    fn unknown_subject_gets_default() {
        assert_eq!(emoji_for_class("Underwater Basket Weaving"), "📘");
    }
}
