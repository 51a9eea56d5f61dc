use super::{CronError, Position};

/// Decoded value form of one cron field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSpec {
    /// `*`: matches every value.
    Any,
    /// A single literal value.
    Simple(u32),
    /// Comma-separated values, strictly ascending.
    Multi(Vec<u32>),
    /// Inclusive range `a-b`.
    Range(u32, u32),
    /// `*/n`: matches values divisible by `n`.
    Step(u32),
}

/// One parsed cron field, bound to its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    position: Position,
    spec: ElementSpec,
}

impl Element {
    /// Parse and validate a single field expression for `position`.
    pub fn parse(expression: &str, position: Position) -> Result<Element, CronError> {
        let spec = decode(expression, position)?;
        validate(&spec, position)?;
        Ok(Element { position, spec })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn spec(&self) -> &ElementSpec {
        &self.spec
    }

    /// Whether `value` (the corresponding field of some instant)
    /// satisfies this element.
    pub fn matches(&self, value: u32) -> bool {
        match &self.spec {
            ElementSpec::Any => true,
            ElementSpec::Simple(v) => *v == value,
            ElementSpec::Multi(values) => values.contains(&value),
            ElementSpec::Range(low, high) => (*low..=*high).contains(&value),
            ElementSpec::Step(n) => value % n == 0,
        }
    }
}

fn decode(expression: &str, position: Position) -> Result<ElementSpec, CronError> {
    if expression == "*" {
        return Ok(ElementSpec::Any);
    }

    if let Some(divisor) = expression.strip_prefix("*/") {
        let n = parse_value(divisor, position)?;
        return Ok(ElementSpec::Step(n));
    }

    if expression.contains(',') {
        let values = expression
            .split(',')
            .map(|part| parse_value(part, position))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ElementSpec::Multi(values));
    }

    if let Some((low, high)) = expression.split_once('-') {
        return Ok(ElementSpec::Range(
            parse_value(low, position)?,
            parse_value(high, position)?,
        ));
    }

    Ok(ElementSpec::Simple(parse_value(expression, position)?))
}

fn parse_value(text: &str, position: Position) -> Result<u32, CronError> {
    text.parse::<u32>().map_err(|_| {
        CronError::InvalidExpression(format!("{text:?} in {position} field"))
    })
}

fn validate(spec: &ElementSpec, position: Position) -> Result<(), CronError> {
    let check_bounds = |value: u32| -> Result<(), CronError> {
        let (low, high) = position.bounds();
        let in_bounds = value >= low && high.map_or(true, |h| value <= h);
        if in_bounds {
            Ok(())
        } else {
            Err(CronError::InvalidExpression(format!(
                "value {value} out of range in {position} field"
            )))
        }
    };

    match spec {
        ElementSpec::Any => Ok(()),
        ElementSpec::Simple(v) => check_bounds(*v),
        ElementSpec::Multi(values) => {
            for v in values {
                check_bounds(*v)?;
            }
            if values.windows(2).any(|w| w[0] >= w[1]) {
                return Err(CronError::InvalidOrder(position.as_str()));
            }
            Ok(())
        }
        ElementSpec::Range(low, high) => {
            check_bounds(*low)?;
            check_bounds(*high)?;
            if low > high {
                return Err(CronError::InvalidOrder(position.as_str()));
            }
            Ok(())
        }
        ElementSpec::Step(n) => match position.step_divisors() {
            None => {
                if *n == 0 {
                    Err(CronError::InvalidExpression(format!(
                        "step divisor 0 in {position} field"
                    )))
                } else {
                    Ok(())
                }
            }
            Some(divisors) => {
                if divisors.contains(n) {
                    Ok(())
                } else {
                    Err(CronError::InvalidExpression(format!(
                        "step divisor {n} not allowed in {position} field"
                    )))
                }
            }
        },
    }
}
