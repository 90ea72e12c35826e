/// Per-language keyword groups for the lexical scorer.
///
/// Tokens are matched by exact equality after case-folding, in the order
/// loops, conditionals, functions, classes; a token only ever increments
/// one counter. Adding a language is a data change here, not a code change.
pub struct KeywordSet {
    pub loops: &'static [&'static str],
    pub conditionals: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub classes: &'static [&'static str],
}

const PYTHON: KeywordSet = KeywordSet {
    loops: &["for", "while"],
    conditionals: &["if", "elif", "else"],
    functions: &["def", "lambda"],
    classes: &["class"],
};

const JAVASCRIPT: KeywordSet = KeywordSet {
    loops: &["for", "while", "do"],
    conditionals: &["if", "else", "switch", "case"],
    functions: &["function", "=>"],
    classes: &["class"],
};

const JAVA: KeywordSet = KeywordSet {
    loops: &["for", "while", "do"],
    conditionals: &["if", "else", "switch", "case"],
    functions: &["void"],
    classes: &["class", "interface"],
};

const DEFAULT: KeywordSet = KeywordSet {
    loops: &["for", "while"],
    conditionals: &["if", "else"],
    functions: &["function", "def", "fn"],
    classes: &["class"],
};

/// Look up the keyword set for a language tag, case-insensitively.
/// Unrecognized tags get the generic default set.
pub fn for_language(language: &str) -> &'static KeywordSet {
    match language.to_lowercase().as_str() {
        "python" => &PYTHON,
        "javascript" | "typescript" => &JAVASCRIPT,
        "java" => &JAVA,
        _ => &DEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(for_language("Python").loops.contains(&"for"));
        assert!(for_language("PYTHON").functions.contains(&"def"));
    }

    #[test]
    fn test_typescript_shares_javascript_set() {
        assert_eq!(for_language("typescript").functions, for_language("javascript").functions);
    }

    #[test]
    fn test_unknown_language_gets_default() {
        let set = for_language("cobol");
        assert!(set.functions.contains(&"fn"));
        assert!(set.loops.contains(&"while"));
    }
}
