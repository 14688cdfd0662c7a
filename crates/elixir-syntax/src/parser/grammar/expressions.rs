//! Operator precedence and primary expressions.
//!
//! Precedence levels, lowest first. Left-associative operators bind `(2L, 2L + 1)`,
//! right-associative ones `(2L + 1, 2L)`; prefix operators parse their operand at `2L`.
//!
//! | level | operators | assoc |
//! |---|---|---|
//! | 1 | `<-` `\\` | left |
//! | 2 | `when` | right |
//! | 3 | `::` | right |
//! | 4 | `\|` | right |
//! | 5 | `=>` (map arguments only) | right |
//! | 6 | `&` | prefix |
//! | 7 | `=` | right |
//! | 8 | `\|\|` `\|\|\|` `or` | left |
//! | 9 | `&&` `&&&` `and` | left |
//! | 10 | `==` `!=` `=~` `===` `!==` | left |
//! | 11 | `<` `>` `<=` `>=` | left |
//! | 12 | `\|>` `<<<` `>>>` `<<~` `~>>` `<~` `~>` `<~>` `<\|>` | left |
//! | 13 | `in` `not in` | left |
//! | 14 | `//` (after a `..` range only) | right |
//! | 15 | `++` `--` `+++` `---` `..` `<>` | right |
//! | 16 | `+` `-` | left |
//! | 17 | `*` `/` | left |
//! | 18 | `**` | left |
//! | 19 | `+` `-` `!` `^` `not` `~~~` | prefix |
//! | 20 | `.` | postfix |
//! | 21 | `@` and `&1` | prefix |

use rowan::Checkpoint;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{EXPR_FIRST, NUMBERS};

enum Assoc {
    Left,
    Right,
}

const fn binding_power(level: u8, assoc: Assoc) -> (u8, u8) {
    match assoc {
        Assoc::Left => (level * 2, level * 2 + 1),
        Assoc::Right => (level * 2 + 1, level * 2),
    }
}

/// Operand binding power of `+ - ! ^ not ~~~`.
const UNARY_BP: u8 = 19 * 2;
/// Operand binding power of `&`.
const CAPTURE_BP: u8 = 6 * 2;
/// Keys and values inside `%{}` stop before `=>`, `|`, `::`, `when`, `<-` and `\\`.
pub(super) const MAP_ELEMENT_BP: u8 = 6 * 2;
/// Stab parameters stop before `when`.
pub(super) const STAB_PARAMETER_BP: u8 = 3 * 2;
/// Right binding power of `when`, used for guards.
pub(super) const GUARD_BP: u8 = 2 * 2;

/// `None` if `kind` is not a binary operator outside map arguments.
pub(super) fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;
    let bp = match kind {
        DefaultArg | LeftArrow => binding_power(1, Assoc::Left),
        KwWhen => binding_power(2, Assoc::Right),
        DoubleColon => binding_power(3, Assoc::Right),
        Bar => binding_power(4, Assoc::Right),
        Eq => binding_power(7, Assoc::Right),
        BarBar | BarBarBar | KwOr => binding_power(8, Assoc::Left),
        AmpAmp | AmpAmpAmp | KwAnd => binding_power(9, Assoc::Left),
        EqEq | NotEq | EqTilde | EqEqEq | NotEqEq => binding_power(10, Assoc::Left),
        Lt | Gt | LtEq | GtEq => binding_power(11, Assoc::Left),
        PipeRight | LtLtLt | GtGtGt | LtLtTilde | TildeGtGt | LtTilde | TildeGt | LtTildeGt
        | LtBarGt => binding_power(12, Assoc::Left),
        KwIn => binding_power(13, Assoc::Left),
        SlashSlash => binding_power(14, Assoc::Right),
        PlusPlus | MinusMinus | PlusPlusPlus | MinusMinusMinus | DotDot | Concat => {
            binding_power(15, Assoc::Right)
        }
        Plus | Minus => binding_power(16, Assoc::Left),
        Star | Slash => binding_power(17, Assoc::Left),
        StarStar => binding_power(18, Assoc::Left),
        _ => return None,
    };
    Some(bp)
}

/// A line break before one of these continues the expression instead of ending it.
fn continues_after_eol(kind: SyntaxKind) -> bool {
    infix_binding_power(kind).is_some() && !EXPR_FIRST.contains(kind)
}

impl Parser<'_> {
    pub(super) fn parse_expr_bp(&mut self, min_bp: u8) -> bool {
        if !self.enter_recursion() {
            return false;
        }

        let checkpoint = self.checkpoint();
        let parsed = self.parse_prefix(checkpoint);
        if parsed {
            self.parse_infix(checkpoint, min_bp);
        }

        self.exit_recursion();
        parsed
    }

    fn parse_infix(&mut self, checkpoint: Checkpoint, min_bp: u8) {
        // Operator of the node last wrapped at `checkpoint`, if any.
        let mut previous: Option<SyntaxKind> = None;
        loop {
            if self.should_stop() {
                break;
            }

            let mut across_eol = false;
            let mut op = self.current();
            if op == SyntaxKind::Eol {
                let next = self.peek_past_eols();
                if !continues_after_eol(next) {
                    break;
                }
                op = next;
                across_eol = true;
            }

            let not_in = !across_eol && op == SyntaxKind::KwNot && self.next_is(SyntaxKind::KwIn);
            let lookup = if not_in { SyntaxKind::KwIn } else { op };
            let Some((l_bp, r_bp)) = infix_binding_power(lookup) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            self.start_node_at(checkpoint, SyntaxKind::BinaryOperation);
            if across_eol {
                self.skip_eols();
            }
            if op == SyntaxKind::SlashSlash && previous != Some(SyntaxKind::DotDot) {
                self.error(DiagnosticKind::RangeStepWithoutRange);
            }
            self.bump();
            if not_in {
                self.eat_token(SyntaxKind::KwIn);
            }
            previous = Some(lookup);
            self.skip_eols();
            if !self.parse_expr_or_error_bp(r_bp) {
                self.error(DiagnosticKind::ExpectedExpression);
            }
            self.finish_node();
        }
    }

    fn parse_prefix(&mut self, checkpoint: Checkpoint) -> bool {
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Caret
            | SyntaxKind::KwNot
            | SyntaxKind::TildeTildeTilde => {
                self.parse_unary(UNARY_BP);
                true
            }
            SyntaxKind::Ampersand if self.nth_raw(1) == SyntaxKind::Integer => {
                self.parse_capture_argument(checkpoint);
                true
            }
            SyntaxKind::Ampersand => {
                self.parse_unary(CAPTURE_BP);
                true
            }
            SyntaxKind::At => {
                self.parse_module_attribute(checkpoint);
                true
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_unary(&mut self, operand_bp: u8) {
        self.start_node(SyntaxKind::UnaryOperation);
        self.bump();
        if !self.parse_expr_or_error_bp(operand_bp) {
            self.error(DiagnosticKind::ExpectedExpression);
        }
        self.finish_node();
    }

    /// `@name`, `@name value`. Binds tighter than `.`, so `@a.b` is `(@a).b`.
    fn parse_module_attribute(&mut self, checkpoint: Checkpoint) {
        self.start_node(SyntaxKind::UnaryOperation);
        self.bump(); // '@'
        if !self.parse_atom_expr() {
            self.parse_expr_or_error_bp(UNARY_BP);
        }
        self.finish_node();
        self.parse_postfix(checkpoint);
    }

    /// `&1`: binds tighter than `.`, so `&1.name` is `(&1).name`.
    fn parse_capture_argument(&mut self, checkpoint: Checkpoint) {
        self.start_node(SyntaxKind::UnaryOperation);
        self.bump(); // '&'
        self.start_node(SyntaxKind::Number);
        self.bump();
        self.finish_node();
        self.finish_node();
        self.parse_postfix(checkpoint);
    }

    fn parse_primary(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_atom_expr() {
            return false;
        }
        self.parse_postfix(checkpoint);
        true
    }

    /// Expression without postfix `.` or access suffixes.
    pub(super) fn parse_atom_expr(&mut self) -> bool {
        let kind = self.current();
        if NUMBERS.contains(kind) {
            self.start_node(SyntaxKind::Number);
            self.bump();
            self.finish_node();
            return true;
        }

        match kind {
            SyntaxKind::Atom | SyntaxKind::KwTrue | SyntaxKind::KwFalse | SyntaxKind::KwNil => {
                self.start_node(SyntaxKind::AtomLiteral);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::AtomQuote => self.parse_quoted_atom(),
            SyntaxKind::DoubleQuote | SyntaxKind::SingleQuote | SyntaxKind::HeredocOpen => {
                self.parse_string()
            }
            SyntaxKind::Tilde => self.parse_sigil(),
            SyntaxKind::Identifier => self.parse_identifier(),
            SyntaxKind::Alias => self.parse_aliases(),
            SyntaxKind::ParenOpen => self.parse_parenthesized(),
            SyntaxKind::BracketOpen => self.parse_list(),
            SyntaxKind::BraceOpen => self.parse_tuple(),
            SyntaxKind::BinaryOpen => self.parse_binary(),
            SyntaxKind::Percent => self.parse_map_or_struct(),
            SyntaxKind::KwFn => self.parse_anonymous_function(),
            _ => return false,
        }
        true
    }

    /// `.name`, `.name(...)`, `.(...)`, `.Alias`, `.{...}` and `[key]` suffixes.
    fn parse_postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    if !self.parse_dot_suffix(checkpoint) {
                        break;
                    }
                }
                SyntaxKind::BracketOpen if !self.preceded_by_trivia() => {
                    self.parse_access(checkpoint);
                }
                _ => break,
            }
        }
    }

    /// Returns `false` when the suffix is malformed and postfix parsing should stop.
    fn parse_dot_suffix(&mut self, checkpoint: Checkpoint) -> bool {
        match self.peek_nth(1) {
            SyntaxKind::Identifier => {
                self.start_node_at(checkpoint, SyntaxKind::RemoteCall);
                self.bump(); // '.'
                self.bump(); // name
                self.parse_call_suffix();
                self.finish_node();
                true
            }
            SyntaxKind::ParenOpen => {
                self.start_node_at(checkpoint, SyntaxKind::AnonymousCall);
                self.bump(); // '.'
                self.parse_call_arguments();
                self.finish_node();
                true
            }
            SyntaxKind::Alias => {
                self.start_node_at(checkpoint, SyntaxKind::QualifiedAlias);
                self.bump(); // '.'
                self.bump(); // alias
                self.finish_node();
                true
            }
            SyntaxKind::BraceOpen => {
                self.start_node_at(checkpoint, SyntaxKind::MultiAlias);
                self.bump(); // '.'
                self.parse_tuple();
                self.finish_node();
                true
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::RemoteCall);
                self.bump(); // '.'
                self.error(DiagnosticKind::ExpectedCallName);
                self.finish_node();
                false
            }
        }
    }

    /// `expr[key]`
    fn parse_access(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::AccessExpression);
        self.open_construct(); // '['
        let saved = self.set_do_block_allowed(true);
        self.skip_eols();
        self.parse_expr_or_error();
        self.skip_eols();
        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::BracketClose, DiagnosticKind::UnclosedBracket);
        self.finish_node();
    }
}
