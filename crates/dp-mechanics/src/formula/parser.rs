//! Parser for substituted formulas.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr  := unary (("+" | "-") unary)*
//! unary := "-"* atom
//! atom  := NUMBER? DIE | NUMBER | "(" expr ")"
//! ```

use std::ops::Range;

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::lexer::Token;

type Span = SimpleSpan;

/// Largest number of dice a single dice term may roll.
pub const MAX_DICE_PER_TERM: u32 = 1000;

/// A parsed formula expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A flat integer.
    Number(i32),
    /// `count` dice of `faces` sides.
    Dice {
        /// Number of dice to roll.
        count: u32,
        /// Sides per die.
        faces: u32,
    },
    /// Unary negation.
    Neg(Box<Expr>),
    /// Addition.
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction.
    Sub(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Total number of dice this expression rolls.
    pub fn dice_count(&self) -> u64 {
        match self {
            Expr::Number(_) => 0,
            Expr::Dice { count, .. } => u64::from(*count),
            Expr::Neg(inner) => inner.dice_count(),
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => lhs.dice_count() + rhs.dice_count(),
        }
    }
}

/// Parse error with source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte range in the formula.
    pub span: Range<usize>,
    /// Human-readable description.
    pub message: String,
}

#[derive(Clone, Copy)]
enum BinOp {
    Add,
    Sub,
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let number = select! { Token::Number(n) => n }.labelled("number");
        let die = select! { Token::Die(faces) => faces }.labelled("die");

        let dice = number
            .clone()
            .or_not()
            .then(die)
            .validate(|(count, faces): (Option<i32>, u32), e, emitter| {
                let span: Span = e.span();
                let count = count.unwrap_or(1).unsigned_abs();
                if faces == 0 {
                    emitter.emit(Rich::custom(span, "a die needs at least one face"));
                } else if i32::try_from(faces).is_err() {
                    emitter.emit(Rich::custom(span, format!("d{faces} has too many faces")));
                }
                if count > MAX_DICE_PER_TERM {
                    emitter.emit(Rich::custom(
                        span,
                        format!("cannot roll more than {MAX_DICE_PER_TERM} dice in one term"),
                    ));
                }
                Expr::Dice { count, faces }
            })
            .labelled("dice");

        let atom = choice((
            dice,
            number.map(Expr::Number),
            expr.delimited_by(just(Token::LParen), just(Token::RParen)),
        ));

        let unary = just(Token::Minus)
            .repeated()
            .foldr(atom, |_minus, rhs| Expr::Neg(Box::new(rhs)));

        let op = choice((
            just(Token::Plus).to(BinOp::Add),
            just(Token::Minus).to(BinOp::Sub),
        ));

        unary
            .clone()
            .foldl(op.then(unary).repeated(), |lhs, (op, rhs)| match op {
                BinOp::Add => Expr::Add(Box::new(lhs), Box::new(rhs)),
                BinOp::Sub => Expr::Sub(Box::new(lhs), Box::new(rhs)),
            })
    })
}

/// Parse a token stream produced from a formula of `source_len` bytes.
pub fn parse(
    tokens: &[(Token, Range<usize>)],
    source_len: usize,
) -> Result<Expr, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let eoi: Span = (source_len..source_len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = expr_parser()
        .then_ignore(end())
        .parse(stream)
        .into_output_errors();

    if let Some(expr) = output
        && errors.is_empty()
    {
        return Ok(expr);
    }

    Err(errors
        .into_iter()
        .map(|e| ParseError {
            span: e.span().into_range(),
            message: e.to_string(),
        })
        .collect())
}
