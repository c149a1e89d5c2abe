/*!
The basic tokens making up the textual representation of programs
*/

/// The characters a word may not contain: whitespace, the special characters, and the first
/// character of `ARROW`, which is only allowed when not followed by the second
pub const WORD_BREAKS: &str = " \t\r\n;(),{}:.|=-";

/// The keyword for `let`-statements
pub const KEYWORD_LET: &str = "let";

/// The keyword continuing a `let`-statement with another
pub const KEYWORD_IN: &str = "in";

/// The keyword for lambda abstractions
pub const KEYWORD_FN: &str = "fn";

/// The keyword for case analysis. Reserved
pub const KEYWORD_CASE: &str = "case";

/// The keyword separating a case pattern from its body. Reserved
pub const KEYWORD_THEN: &str = "then";

/// The keyword marking a constant type. Accepted and discarded
pub const KEYWORD_CONST: &str = "const";

/// The function type arrow
pub const ARROW: &str = "->";

/// The separator between a lambda's binder and its body
pub const LAMBDA_DOT: &str = ".";

/// The typing judgement character
pub const JUDGE_TYPE: &str = ":";

/// The terminator of a chain of `let`-statements
pub const STATEMENT_DELIM: &str = ";";

/// The assignment character
pub const ASSIGN: &str = "=";

/// The opening delimiter of a parenthesized application
pub const SEXPR_OPEN: &str = "(";

/// The closing delimiter of a parenthesized application
pub const SEXPR_CLOSE: &str = ")";

/// The pipe character. Reserved
pub const PIPE: &str = "|";

/// The comma. Reserved
pub const COMMA: &str = ",";
