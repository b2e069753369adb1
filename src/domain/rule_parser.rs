//! Strategy text parser.
//!
//! Recursive descent over the two config strings a strategy is written as:
//!
//! - indicator lists: `fast = SMA(3), slow = SMA(5), macd = MACD(12,26,9)`
//! - rule lists: `fast crossover slow, rsi < 30`
//!
//! Entries are comma-separated; the commas inside a MACD parameter list are
//! consumed by the definition itself, so no escaping is needed. Indicator
//! kinds are case-insensitive; labels are case-sensitive identifiers.
//! Errors carry the character offset of the failure.

use crate::domain::error::ParseError;
use crate::domain::indicator::{IndicatorKind, IndicatorSpec};
use crate::domain::rule::{CmpOp, Condition, Rule, Side};

/// Parse a comma-separated indicator list. Empty input is an error:
/// a strategy without indicators has nothing for its rules to reference.
pub fn parse_indicators(input: &str) -> Result<Vec<IndicatorSpec>, ParseError> {
    let mut parser = Parser::new(input);
    let mut specs = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.at_end() {
            break;
        }
        specs.push(parser.parse_indicator_def()?);
        parser.skip_whitespace();
        if !parser.consume_char(',') && !parser.at_end() {
            return Err(parser.error("expected ',' between indicator definitions"));
        }
    }

    if specs.is_empty() {
        return Err(ParseError {
            message: "expected at least one indicator definition".into(),
            position: 0,
        });
    }
    Ok(specs)
}

/// Parse a comma-separated rule list for one side. Empty input yields an
/// empty list — a side with no rules never fires.
pub fn parse_rules(input: &str, side: Side) -> Result<Vec<Rule>, ParseError> {
    let mut parser = Parser::new(input);
    let mut rules = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.at_end() {
            break;
        }
        let condition = parser.parse_condition()?;
        rules.push(Rule { side, condition });
        parser.skip_whitespace();
        if !parser.consume_char(',') && !parser.at_end() {
            return Err(parser.error("expected ',' between rules"));
        }
    }

    Ok(rules)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.remaining().is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.pos,
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_word(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let mut word = String::new();
        for ch in self.remaining().chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                break;
            }
        }
        if word.is_empty() {
            return Err(self.error("expected identifier"));
        }
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(format!("identifier '{}' must not start with a digit", word)));
        }
        self.pos += word.len();
        Ok(word)
    }

    fn parse_integer(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected integer"));
        }
        let text = &self.input[start..self.pos];
        text.parse::<usize>().map_err(|_| ParseError {
            message: format!("invalid integer: {}", text),
            position: start,
        })
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        if self.peek() == Some('-') {
            self.advance();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(ParseError {
                message: "expected number".into(),
                position: start,
            });
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", text),
            position: start,
        })
    }

    /// `label = KIND(params)`
    fn parse_indicator_def(&mut self) -> Result<IndicatorSpec, ParseError> {
        let label = self.parse_word()?;
        self.expect_char('=')?;
        let kind_pos = {
            self.skip_whitespace();
            self.pos
        };
        let kind_word = self.parse_word()?;

        let kind = match kind_word.to_uppercase().as_str() {
            "SMA" => IndicatorKind::Sma {
                window: self.parse_single_param()?,
            },
            "RSI" => IndicatorKind::Rsi {
                window: self.parse_single_param()?,
            },
            "MACD" => {
                self.expect_char('(')?;
                let fast = self.parse_integer()?;
                self.expect_char(',')?;
                let slow = self.parse_integer()?;
                self.expect_char(',')?;
                let signal = self.parse_integer()?;
                self.expect_char(')')?;
                IndicatorKind::Macd { fast, slow, signal }
            }
            _ => {
                return Err(ParseError {
                    message: format!("unknown indicator '{}'", kind_word),
                    position: kind_pos,
                });
            }
        };

        Ok(IndicatorSpec { label, kind })
    }

    fn parse_single_param(&mut self) -> Result<usize, ParseError> {
        self.expect_char('(')?;
        let value = self.parse_integer()?;
        self.expect_char(')')?;
        Ok(value)
    }

    /// `label <op> number` or `label crossover|crossunder label`
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let left = self.parse_word()?;
        self.skip_whitespace();

        if let Some(op) = self.parse_cmp_op() {
            let value = self.parse_number()?;
            return Ok(Condition::Threshold {
                indicator: left,
                op,
                value,
            });
        }

        let keyword_pos = self.pos;
        let keyword = self.parse_word()?;
        match keyword.to_lowercase().as_str() {
            "crossover" => {
                let right = self.parse_word()?;
                Ok(Condition::Crossover { left, right })
            }
            "crossunder" => {
                let right = self.parse_word()?;
                Ok(Condition::Crossunder { left, right })
            }
            _ => Err(ParseError {
                message: format!(
                    "expected comparison operator, 'crossover' or 'crossunder', found '{}'",
                    keyword
                ),
                position: keyword_pos,
            }),
        }
    }

    fn parse_cmp_op(&mut self) -> Option<CmpOp> {
        let remaining = self.remaining();
        let (op, len) = if remaining.starts_with(">=") {
            (CmpOp::Ge, 2)
        } else if remaining.starts_with("<=") {
            (CmpOp::Le, 2)
        } else if remaining.starts_with('>') {
            (CmpOp::Gt, 1)
        } else if remaining.starts_with('<') {
            (CmpOp::Lt, 1)
        } else {
            return None;
        };
        self.pos += len;
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_sma() {
        let specs = parse_indicators("fast = SMA(3)").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].label, "fast");
        assert_eq!(specs[0].kind, IndicatorKind::Sma { window: 3 });
    }

    #[test]
    fn parse_indicator_list() {
        let specs = parse_indicators("fast = SMA(3), slow = SMA(5), rsi = RSI(14)").unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].label, "slow");
        assert_eq!(specs[2].kind, IndicatorKind::Rsi { window: 14 });
    }

    #[test]
    fn parse_macd_params() {
        let specs = parse_indicators("macd = MACD(12, 26, 9)").unwrap();
        assert_eq!(
            specs[0].kind,
            IndicatorKind::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }

    #[test]
    fn indicator_kind_case_insensitive() {
        let specs = parse_indicators("a = sma(5), b = Rsi(7)").unwrap();
        assert_eq!(specs[0].kind, IndicatorKind::Sma { window: 5 });
        assert_eq!(specs[1].kind, IndicatorKind::Rsi { window: 7 });
    }

    #[test]
    fn unknown_indicator_rejected() {
        let err = parse_indicators("b = BOLLINGER(20)").unwrap_err();
        assert!(err.message.contains("unknown indicator 'BOLLINGER'"));
        assert_eq!(err.position, 4);
    }

    #[test]
    fn empty_indicator_list_rejected() {
        assert!(parse_indicators("").is_err());
        assert!(parse_indicators("   ").is_err());
    }

    #[test]
    fn trailing_comma_tolerated() {
        let specs = parse_indicators("fast = SMA(3),").unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn macd_commas_do_not_split_the_list() {
        let specs = parse_indicators("macd = MACD(12,26,9), fast = SMA(3)").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].label, "fast");
    }

    #[test]
    fn missing_paren_reports_position() {
        let err = parse_indicators("fast = SMA 3)").unwrap_err();
        assert!(err.message.contains("expected '('"));
    }

    #[test]
    fn parse_threshold_rule() {
        let rules = parse_rules("rsi < 30", Side::Buy).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].side, Side::Buy);
        assert_eq!(
            rules[0].condition,
            Condition::Threshold {
                indicator: "rsi".into(),
                op: CmpOp::Lt,
                value: 30.0,
            }
        );
    }

    #[test]
    fn parse_all_comparison_ops() {
        for (text, op) in [
            ("rsi > 70", CmpOp::Gt),
            ("rsi < 30", CmpOp::Lt),
            ("rsi >= 70", CmpOp::Ge),
            ("rsi <= 30", CmpOp::Le),
        ] {
            let rules = parse_rules(text, Side::Sell).unwrap();
            match &rules[0].condition {
                Condition::Threshold { op: parsed, .. } => assert_eq!(*parsed, op),
                other => panic!("unexpected condition {:?}", other),
            }
        }
    }

    #[test]
    fn parse_negative_and_decimal_thresholds() {
        let rules = parse_rules("hist > -0.5", Side::Buy).unwrap();
        match &rules[0].condition {
            Condition::Threshold { value, .. } => assert!((value - (-0.5)).abs() < f64::EPSILON),
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn parse_crossover_rule() {
        let rules = parse_rules("fast crossover slow", Side::Buy).unwrap();
        assert_eq!(
            rules[0].condition,
            Condition::Crossover {
                left: "fast".into(),
                right: "slow".into(),
            }
        );
    }

    #[test]
    fn parse_crossunder_rule() {
        let rules = parse_rules("fast CROSSUNDER slow", Side::Sell).unwrap();
        assert_eq!(
            rules[0].condition,
            Condition::Crossunder {
                left: "fast".into(),
                right: "slow".into(),
            }
        );
    }

    #[test]
    fn parse_rule_list() {
        let rules = parse_rules("fast crossover slow, rsi < 30", Side::Buy).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|r| r.side == Side::Buy));
    }

    #[test]
    fn empty_rule_list_is_empty() {
        assert!(parse_rules("", Side::Buy).unwrap().is_empty());
        assert!(parse_rules("  ", Side::Sell).unwrap().is_empty());
    }

    #[test]
    fn garbage_connective_rejected() {
        let err = parse_rules("fast above slow", Side::Buy).unwrap_err();
        assert!(err.message.contains("found 'above'"));
        assert_eq!(err.position, 5);
    }

    #[test]
    fn macd_derived_label_in_rule() {
        let rules = parse_rules("macd crossover macd_signal", Side::Buy).unwrap();
        assert_eq!(
            rules[0].condition,
            Condition::Crossover {
                left: "macd".into(),
                right: "macd_signal".into(),
            }
        );
    }

    #[test]
    fn missing_threshold_value_reports_position() {
        let err = parse_rules("rsi <", Side::Buy).unwrap_err();
        assert!(err.message.contains("expected number"));
    }
}
