// Formatter configuration

/// Line ending written by the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineKind {
    Unix,
    Windows,
}

impl NewlineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineKind::Unix => "\n",
            NewlineKind::Windows => "\r\n",
        }
    }
}

/// Quote character used for terminal strings.
///
/// A terminal that contains the preferred quote is always written with the
/// other one, since EBNF has no escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Preserve,
    Single,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Rules longer than this are split one alternative per line
    pub line_width: usize,
    pub newline: NewlineKind,
    pub quote_style: QuoteStyle,
    /// Pad rule names so the `=` of every rule in a block lines up
    pub align_definitions: bool,
    /// A rule preceded by a comment containing this text is copied verbatim
    pub ignore_rule_comment_text: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            line_width: 80,
            newline: NewlineKind::Unix,
            quote_style: QuoteStyle::Preserve,
            align_definitions: true,
            ignore_rule_comment_text: String::from("ebnf-fmt-ignore"),
        }
    }
}
