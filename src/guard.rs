/// Token guard for protecting placeholders and plural syntax during machine translation
///
/// Loco strings carry `%name%` placeholders and Symfony-style plural syntax
/// (`{0}`, `[0,1]`, `|]1,Inf[`). Sent as plain text, a translator happily
/// translates `%count%` or turns `[1,2]` into `[1.2]`. The guard wraps both in
/// XML tags the translator is told to ignore, and unwraps them afterwards.
///
/// Format: `%name%` becomes `<var>name</var>`, a syntax literal `L` becomes
/// `<syntax>L</syntax>`. Numeric interval ranges (`[3,5]`, `]5,Inf[`) are
/// wrapped as syntax too, and only wrapped ranges get their comma restored.
///
/// A translator that drops or reorders a wrapped token is not detected; the
/// restored text is written as-is.
use regex::{Captures, Regex};

/// Tag wrapped around placeholder names
pub const VAR_TAG: &str = "var";

/// Tag wrapped around plural syntax literals
pub const SYNTAX_TAG: &str = "syntax";

/// Tags the translator must leave untouched: the guard's own wrappers plus
/// markup commonly found in UI strings.
pub const IGNORE_TAGS: [&str; 6] = [VAR_TAG, SYNTAX_TAG, "a", "strong", "p", "br"];

/// Plural syntax literals protected by default
pub const DEFAULT_SYNTAX_LITERALS: [&str; 8] = [
    "|]1,Inf[", "]1,Inf[", "[2,Inf[", "[0,1]", "{0}", "{1}", "{2}", "[1,2]",
];

/// Interval notation `[a,b]`, `]a,Inf[` and friends, beyond the fixed literals
const INTERVAL_RANGE: &str = r"[\[\]](?:-Inf|-?\d+),(?:\d+|Inf)[\[\]]";

/// Whether a string still carries wrappers from an earlier, interrupted run
pub fn contains_guard_markers(text: &str) -> bool {
    text.contains("<var>") || text.contains("<syntax>")
}

/// Protects placeholders and syntax literals around a translator call
#[derive(Debug, Clone)]
pub struct TokenGuard {
    placeholder: Regex,
    syntax: Regex,
    var_wrapped: Regex,
    syntax_wrapped: Regex,
    shifted_range: Regex,
}

impl TokenGuard {
    /// Create a guard protecting the given syntax literals
    ///
    /// Literals are matched longest first, so `|]1,Inf[` wins over `]1,Inf[`
    /// and a literal is never wrapped twice.
    pub fn new<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literals: Vec<String> = literals
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();

        // Literals first: at the same position the leftmost alternative wins
        let alternation = literals
            .iter()
            .map(|l| regex::escape(l))
            .chain(std::iter::once(INTERVAL_RANGE.to_string()))
            .collect::<Vec<_>>()
            .join("|");

        TokenGuard {
            placeholder: compile(r"%([A-Za-z0-9_.\-]+)%"),
            syntax: compile(&alternation),
            var_wrapped: compile(r"(?s)<var>\s*(.*?)\s*</var>"),
            syntax_wrapped: compile(r"(?s)<syntax>\s*(.*?)\s*</syntax>"),
            // `[1.2]`, `]1.Inf[`: a comma range rendered with a decimal point
            shifted_range: compile(r"([\[\]])\s*(-?\d+|-Inf)\s*\.\s*(\d+|Inf)\s*([\[\]])"),
        }
    }

    /// Wrap every placeholder and syntax literal in protective tags
    ///
    /// # Example
    /// ```ignore
    /// let guard = TokenGuard::default();
    /// assert_eq!(guard.guard("Bye %name%"), "Bye <var>name</var>");
    /// ```
    pub fn guard(&self, text: &str) -> String {
        let wrapped = self.syntax.replace_all(text, |caps: &Captures| {
            format!("<{SYNTAX_TAG}>{}</{SYNTAX_TAG}>", &caps[0])
        });

        self.placeholder
            .replace_all(&wrapped, |caps: &Captures| {
                format!("<{VAR_TAG}>{}</{VAR_TAG}>", &caps[1])
            })
            .into_owned()
    }

    /// Reverse `guard` on translated text
    ///
    /// Range punctuation is repaired inside `<syntax>` wrappers only, so a
    /// bracketed decimal in the surrounding text is left as written.
    pub fn unguard(&self, text: &str) -> String {
        let vars = self
            .var_wrapped
            .replace_all(text, |caps: &Captures| format!("%{}%", &caps[1]));
        self.syntax_wrapped
            .replace_all(&vars, |caps: &Captures| {
                self.shifted_range
                    .replace_all(&caps[1], |range: &Captures| {
                        format!("{}{},{}{}", &range[1], &range[2], &range[3], &range[4])
                    })
                    .into_owned()
            })
            .into_owned()
    }
}

impl Default for TokenGuard {
    fn default() -> Self {
        TokenGuard::new(DEFAULT_SYNTAX_LITERALS)
    }
}

// Patterns are either constants or built from escaped literals.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => unreachable!("invalid guard pattern {pattern}: {e}"),
    }
}
