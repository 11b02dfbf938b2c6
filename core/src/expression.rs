use crate::{name::path_name, TokenType};

/// A lexical piece of a token string. References are the only structure
/// that matters; the rest is kept to decide whether the string reads as
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Piece<'a> {
    Ref(&'a str),
    Number(&'a str),
    Operator(&'a str),
    Space(&'a str),
    Text(&'a str),
}
impl Piece<'_> {
    fn is_operand(&self) -> bool {
        matches!(self, Piece::Ref(_) | Piece::Number(_))
    }
}

peg::parser! {
  grammar template() for str {
    pub(crate) rule pieces() -> Vec<Piece<'input>> = piece()*

    rule piece() -> Piece<'input>
      = "{" path:$((!['{' | '}' | ':' | ';' | '\n'] [_])+) "}" {?
            if path.trim().is_empty() { Err("reference path") } else { Ok(Piece::Ref(path)) }
        }
      / n:$(['0'..='9']+ ("." ['0'..='9']+)?) !['a'..='z' | 'A'..='Z' | '0'..='9' | '%' | '.' | '_' | '('] { Piece::Number(n) }
      / o:$(['+' | '-' | '*' | '/']) { Piece::Operator(o) }
      / s:$([' ' | '\t' | '\r' | '\n']+) { Piece::Space(s) }
      / t:$([_]) { Piece::Text(t) }
  }
}

pub(crate) fn pieces(input: &str) -> Vec<Piece<'_>> {
    template::pieces(input).unwrap_or_else(|_| vec![Piece::Text(input)])
}

fn reference(path: &str) -> String {
    format!("var(--{})", path_name(path.trim()))
}

/// An operator is arithmetic when it has whitespace on both sides or sits
/// directly between two operands. Hyphens inside words never qualify.
fn is_arithmetic(pieces: &[Piece], index: usize) -> bool {
    if !matches!(pieces[index], Piece::Operator(_)) || index == 0 {
        return false;
    }
    match (pieces.get(index - 1), pieces.get(index + 1)) {
        (Some(Piece::Space(_)), Some(Piece::Space(_))) => true,
        (Some(prev), Some(next)) => prev.is_operand() && next.is_operand(),
        _ => false,
    }
}

/// Whether the number at `index` is a whole term of an arithmetic `+` or
/// `-`. A number multiplied or divided by something is a factor, not a term,
/// and stays unitless.
fn is_additive_operand(pieces: &[Piece], arithmetic: &[bool], index: usize) -> bool {
    let operator = |i: usize| match pieces[i] {
        Piece::Operator(o) if arithmetic[i] => Some(o),
        _ => None,
    };
    let before = pieces[..index]
        .iter()
        .rposition(|p| !matches!(p, Piece::Space(_)))
        .and_then(operator);
    let after = pieces[index + 1..]
        .iter()
        .position(|p| !matches!(p, Piece::Space(_)))
        .and_then(|i| operator(index + 1 + i));
    let factor = |o: Option<&str>| matches!(o, Some("*" | "/"));
    let term = |o: Option<&str>| matches!(o, Some("+" | "-"));
    !factor(before) && !factor(after) && (term(before) || term(after))
}

/// Whether the `+`/`-` at `index` is written without surrounding space.
fn is_tight_sum(pieces: &[Piece], arithmetic: &[bool], index: usize) -> bool {
    arithmetic[index]
        && matches!(pieces[index], Piece::Operator("+" | "-"))
        && !matches!(pieces.get(index + 1), Some(Piece::Space(_)))
}

/// Rewrites every `{path.to.token}` into `var(--path-to-token)`.
///
/// When the result mixes a variable with an arithmetic operator it is
/// wrapped in `calc(...)` (unless it already starts with one). Inside the
/// expression `+` and `-` are spaced, as `calc()` requires. Lengths
/// (`dimension`, `spacing`, `borderRadius`) get `px` on bare numbers that
/// are added or subtracted, since `calc()` cannot add a length to a number.
pub fn resolve_references(input: &str, type_: TokenType) -> String {
    let pieces = pieces(input);
    let arithmetic: Vec<bool> = (0..pieces.len()).map(|i| is_arithmetic(&pieces, i)).collect();
    let has_var = input.contains("var(--") || pieces.iter().any(|p| matches!(p, Piece::Ref(_)));
    let expression = has_var && arithmetic.contains(&true);
    let wrap = expression && !input.trim_start().starts_with("calc(");

    let mut out = String::with_capacity(input.len() + 16);
    for (i, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Ref(path) => out.push_str(&reference(path)),
            Piece::Number(n) => {
                out.push_str(n);
                if expression
                    && type_.is_dimension()
                    && is_additive_operand(&pieces, &arithmetic, i)
                {
                    out.push_str("px");
                }
            }
            Piece::Operator(o) if expression && is_tight_sum(&pieces, &arithmetic, i) => {
                out.push(' ');
                out.push_str(o);
                out.push(' ');
            }
            Piece::Operator(s) | Piece::Space(s) | Piece::Text(s) => out.push_str(s),
        }
    }
    if wrap {
        format!("calc({out})")
    } else {
        out
    }
}

/// Substitutes placeholders without any `calc()` handling. Used for the
/// sweep over rendered stylesheets, where a line is more than one value.
pub fn substitute_references(input: &str) -> String {
    pieces(input)
        .into_iter()
        .map(|piece| match piece {
            Piece::Ref(path) => reference(path),
            Piece::Number(s) | Piece::Operator(s) | Piece::Space(s) | Piece::Text(s) => {
                s.to_string()
            }
        })
        .collect()
}
