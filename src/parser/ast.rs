// AST (Abstract Syntax Tree) definitions for EBNF grammars

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Byte offset from the start of the input
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Half-open byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The covered text, or an empty string if the span does not fit `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Root of the tree: one or more rules in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub rules: Vec<SyntaxRule>,
    pub span: Span,
}

impl Syntax {
    /// First rule named `name`, if any.
    pub fn rule(&self, name: &str) -> Option<&SyntaxRule> {
        self.rules.iter().find(|rule| rule.name.name == name)
    }
}

/// `name = definition ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRule {
    pub name: Identifier,
    /// `None` for an empty body (`foo = ;`)
    pub definition: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Which quote character delimited a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

/// Quoted literal; `text` excludes the quotes and is taken verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub text: String,
    pub quote: Quote,
    pub span: Span,
}

/// `? ... ?` with opaque contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialSequence {
    pub text: String,
    pub span: Span,
}

/// Repetition count, only valid left of `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer {
    pub value: usize,
    pub span: Span,
}

/// Leaf expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Identifier(Identifier),
    Terminal(Terminal),
    SpecialSequence(SpecialSequence),
}

impl Atom {
    pub fn span(&self) -> Span {
        match self {
            Atom::Identifier(ident) => ident.span,
            Atom::Terminal(terminal) => terminal.span,
            Atom::SpecialSequence(special) => special.span,
        }
    }
}

/// Binary operators, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Alternation,     // |
    Concatenation,   // ,
    Exception,       // -
    RepetitionCount, // *
}

impl BinaryOperator {
    /// Binding strength used by the precedence climber; all operators are
    /// left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Alternation => 1,
            BinaryOperator::Concatenation => 2,
            BinaryOperator::Exception => 3,
            BinaryOperator::RepetitionCount => 4,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Alternation => '|',
            BinaryOperator::Concatenation => ',',
            BinaryOperator::Exception => '-',
            BinaryOperator::RepetitionCount => '*',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOperator::Alternation => "alternation",
            BinaryOperator::Concatenation => "concatenation",
            BinaryOperator::Exception => "exception",
            BinaryOperator::RepetitionCount => "repetition-count",
        }
    }
}

/// Left operand of a binary expression.
///
/// The repetition-count operator is the only one whose left side is an
/// [`Integer`] rather than a general expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Expression(Box<Expression>),
    Integer(Integer),
}

impl Operand {
    pub fn span(&self) -> Span {
        match self {
            Operand::Expression(expr) => expr.span(),
            Operand::Integer(integer) => integer.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpression {
    pub left: Operand,
    pub operator: BinaryOperator,
    /// Only ever `None` for [`BinaryOperator::Exception`] (`"a" - ;`)
    pub right: Option<Box<Expression>>,
    pub span: Span,
}

/// Bracket kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Optional, // [ ... ]
    Repeated, // { ... }
    Grouped,  // ( ... )
}

impl GroupKind {
    pub fn open(self) -> char {
        match self {
            GroupKind::Optional => '[',
            GroupKind::Repeated => '{',
            GroupKind::Grouped => '(',
        }
    }

    pub fn close(self) -> char {
        match self {
            GroupKind::Optional => ']',
            GroupKind::Repeated => '}',
            GroupKind::Grouped => ')',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    /// `None` for an empty bracket pair
    pub inner: Option<Box<Expression>>,
    pub span: Span,
}

/// Recursive expression node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Atom(Atom),
    Binary(BinaryExpression),
    Group(Group),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Atom(atom) => atom.span(),
            Expression::Binary(binary) => binary.span,
            Expression::Group(group) => group.span,
        }
    }
}

// ===== Structural rendering =====
//
// Spans are ignored, so two trees render identically exactly when they have
// the same shape and leaves.

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = self.quote.as_char();
        write!(f, "{}{}{}", quote, self.text, quote)
    }
}

impl fmt::Display for SpecialSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}?", self.text)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Identifier(ident) => write!(f, "{}", ident),
            Atom::Terminal(terminal) => write!(f, "{}", terminal),
            Atom::SpecialSequence(special) => write!(f, "{}", special),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Expression(expr) => write!(f, "{}", expr),
            Operand::Integer(integer) => write!(f, "{}", integer),
        }
    }
}

impl fmt::Display for BinaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {}", self.operator.symbol(), self.left)?;
        if let Some(right) = &self.right {
            write!(f, " {}", right)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "{}{}{}", self.kind.open(), inner, self.kind.close()),
            None => write!(f, "{}{}", self.kind.open(), self.kind.close()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Atom(atom) => write!(f, "{}", atom),
            Expression::Binary(binary) => write!(f, "{}", binary),
            Expression::Group(group) => write!(f, "{}", group),
        }
    }
}

impl fmt::Display for SyntaxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.definition {
            Some(definition) => write!(f, "{} = {};", self.name, definition),
            None => write!(f, "{} = ;", self.name),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, rule) in self.rules.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}
