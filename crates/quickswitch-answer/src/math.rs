// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Calculator for plain arithmetic queries. Deliberately strict about what
//! it claims: a query must contain a `digit operator digit` shape, no
//! letters, and nothing outside the arithmetic character set, so ordinary
//! searches never get swallowed.

/// Returns the trimmed expression when the query qualifies as arithmetic.
pub fn claim(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !has_digit_op_digit(trimmed) {
        return None;
    }
    let allowed =
        |c: char| c.is_ascii_digit() || "+-*/^%.() ".contains(c) || c.is_whitespace();
    if !trimmed.chars().all(allowed) {
        return None;
    }
    Some(trimmed)
}

/// `digit`, optional spaces, operator, optional spaces, `digit`.
fn has_digit_op_digit(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if !c.is_ascii_digit() {
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && chars[j] == ' ' {
            j += 1;
        }
        if j >= chars.len() || !"+-*/^%".contains(chars[j]) {
            continue;
        }
        let mut k = j + 1;
        while k < chars.len() && chars[k] == ' ' {
            k += 1;
        }
        if k < chars.len() && chars[k].is_ascii_digit() {
            return true;
        }
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut num = String::new();
    for c in compact.chars() {
        if c.is_ascii_digit() || c == '.' {
            num.push(c);
            continue;
        }
        let unary_position = num.is_empty()
            && match tokens.last() {
                None => true,
                Some(Token::Op(op)) => *op != ')',
                Some(Token::Number(_)) => false,
            };
        if c == '-' && unary_position {
            num.push(c);
            continue;
        }
        if !num.is_empty() {
            tokens.push(Token::Number(num.parse().ok()?));
            num.clear();
        }
        if "+-*/()^%".contains(c) {
            tokens.push(Token::Op(c));
        }
    }
    if !num.is_empty() {
        tokens.push(Token::Number(num.parse().ok()?));
    }
    Some(tokens)
}

fn precedence(op: char) -> Option<u8> {
    match op {
        '+' | '-' => Some(1),
        '*' | '/' | '%' => Some(2),
        '^' => Some(3),
        _ => None,
    }
}

/// Two-stage evaluation: shunting-yard into postfix, then a stack walk.
/// `^` binds tightest and associates right, so `2^3^2` is `2^(3^2)`.
/// Anything malformed, and any non-finite result, comes back as `None`.
pub fn evaluate(expr: &str) -> Option<f64> {
    let tokens = tokenize(expr)?;

    let mut output: Vec<Token> = Vec::new();
    let mut ops: Vec<char> = Vec::new();
    for token in tokens {
        match token {
            Token::Number(value) => output.push(Token::Number(value)),
            Token::Op('(') => ops.push('('),
            Token::Op(')') => {
                while let Some(&top) = ops.last() {
                    if top == '(' {
                        break;
                    }
                    output.push(Token::Op(ops.pop()?));
                }
                ops.pop();
            }
            Token::Op(op) => {
                let prec = precedence(op)?;
                while let Some(&top) = ops.last() {
                    let Some(top_prec) = precedence(top) else {
                        break;
                    };
                    let right_assoc = op == '^';
                    if top_prec > prec || (top_prec == prec && !right_assoc) {
                        output.push(Token::Op(ops.pop()?));
                    } else {
                        break;
                    }
                }
                ops.push(op);
            }
        }
    }
    while let Some(op) = ops.pop() {
        output.push(Token::Op(op));
    }

    let mut stack: Vec<f64> = Vec::new();
    for token in output {
        match token {
            Token::Number(value) => stack.push(value),
            Token::Op(op) => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                let value = match op {
                    '+' => a + b,
                    '-' => a - b,
                    '*' => a * b,
                    '/' => a / b,
                    '%' => a % b,
                    '^' => a.powf(b),
                    _ => return None,
                };
                stack.push(value);
            }
        }
    }

    let result = match stack.as_slice() {
        [value] => *value,
        _ => return None,
    };
    result.is_finite().then_some(result)
}

/// Integers print bare; everything else rounds to ten decimals with
/// trailing zeros dropped.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let fixed = format!("{value:.10}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::{claim, evaluate, format_result};

    fn eval(expr: &str) -> f64 {
        evaluate(expr).expect("expression evaluates")
    }

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("10-2-3"), 5.0);
    }

    #[test]
    fn power_is_right_associative_and_binds_tightest() {
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("2*3^2"), 18.0);
    }

    #[test]
    fn unary_minus_at_start_after_operator_and_after_paren() {
        assert_eq!(eval("-5+2"), -3.0);
        assert_eq!(eval("3*-2"), -6.0);
        assert_eq!(eval("(-2+5)*2"), 6.0);
    }

    #[test]
    fn modulo_and_division() {
        assert_eq!(eval("10%3"), 1.0);
        assert_eq!(eval("7/2"), 3.5);
    }

    #[test]
    fn division_by_zero_rejected() {
        assert_eq!(evaluate("1/0"), None);
    }

    #[test]
    fn malformed_expressions_rejected() {
        assert_eq!(evaluate("5+"), None);
        assert_eq!(evaluate(""), None);
        assert_eq!(evaluate("5..2+1"), None);
    }

    #[test]
    fn claim_requires_digit_op_digit() {
        assert_eq!(claim("2+3"), Some("2+3"));
        assert_eq!(claim("  2 + 3  "), Some("2 + 3"));
        assert_eq!(claim("5"), None);
        assert_eq!(claim("(5)"), None);
        assert_eq!(claim("5 usd"), None);
        assert_eq!(claim("2+3x"), None);
        assert_eq!(claim("2#3"), None);
        assert_eq!(claim(""), None);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_result(14.0), "14");
        assert_eq!(format_result(-3.0), "-3");
        assert_eq!(format_result(3.5), "3.5");
        assert_eq!(format_result(1.0 / 3.0), "0.3333333333");
    }
}
