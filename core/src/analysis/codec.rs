use ndarray::Array1;
use serde_json::value::RawValue;
use serde_json::Value;
use thiserror::Error;

/// A decoded lead signal.
///
/// The variant is picked from the literal form of the whole list: a single
/// float literal turns every sample into `f64`, otherwise samples stay exact
/// integers.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Integer(Array1<i128>),
    Float(Array1<f64>),
}

impl Signal {
    pub fn len(&self) -> usize {
        match self {
            Signal::Integer(samples) => samples.len(),
            Signal::Float(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<i64>> for Signal {
    fn from(samples: Vec<i64>) -> Self {
        Signal::Integer(samples.into_iter().map(i128::from).collect())
    }
}

impl From<Vec<f64>> for Signal {
    fn from(samples: Vec<f64>) -> Self {
        Signal::Float(Array1::from(samples))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalFormatError {
    #[error("Invalid signal format. Must be a valid JSON list of numbers (integers or floats).")]
    Syntax(String),

    #[error("Invalid signal format. Must be a list of numbers (integers or floats).")]
    NotAList,

    #[error("Invalid signal format. Must be a list of numbers (integers or floats), element {index} is not a number.")]
    NonNumeric { index: usize },
}

enum Literal {
    Integer(i128),
    Float(f64),
}

/// Parses one JSON number literal. Integer literals stay exact while they
/// fit an `i128`; floats use the native `f64` parse, so out-of-range
/// magnitudes saturate to infinity.
fn read_number(literal: &str) -> Option<Literal> {
    if !literal.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        return None;
    }
    let is_float = literal.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
    if !is_float {
        if let Ok(value) = literal.parse::<i128>() {
            return Some(Literal::Integer(value));
        }
    }
    literal.parse::<f64>().ok().map(Literal::Float)
}

pub fn decode(text: &str) -> Result<Signal, SignalFormatError> {
    // Raw values check the JSON grammar without converting numbers.
    let document: &RawValue =
        serde_json::from_str(text).map_err(|e| SignalFormatError::Syntax(e.to_string()))?;
    let document = document.get().trim();
    if !document.starts_with('[') {
        return Err(SignalFormatError::NotAList);
    }

    let items: Vec<&RawValue> =
        serde_json::from_str(document).map_err(|e| SignalFormatError::Syntax(e.to_string()))?;

    let literals = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            read_number(item.get().trim()).ok_or(SignalFormatError::NonNumeric { index })
        })
        .collect::<Result<Vec<Literal>, _>>()?;

    if literals.iter().any(|l| matches!(l, Literal::Float(_))) {
        let samples: Vec<f64> = literals
            .iter()
            .map(|l| match *l {
                Literal::Integer(v) => v as f64,
                Literal::Float(v) => v,
            })
            .collect();
        Ok(Signal::Float(Array1::from(samples)))
    } else {
        let samples: Vec<i128> = literals
            .iter()
            .filter_map(|l| match *l {
                Literal::Integer(v) => Some(v),
                Literal::Float(_) => None,
            })
            .collect();
        Ok(Signal::Integer(Array1::from(samples)))
    }
}

/// Writes a signal back to its textual list form, e.g. `[1, 2.5, -3.0]`.
/// Non-finite floats have no JSON form and are written as `null`.
pub fn encode(signal: &Signal) -> String {
    let items: Vec<String> = match signal {
        Signal::Integer(samples) => samples.iter().map(|v| v.to_string()).collect(),
        Signal::Float(samples) => samples.iter().map(|&v| Value::from(v).to_string()).collect(),
    };
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_integer_list() {
        let signal = decode("[1,2,3,-4,2,-6]").unwrap();
        assert_eq!(signal, Signal::from(vec![1i64, 2, 3, -4, 2, -6]));
    }

    #[test]
    fn any_float_literal_promotes_whole_list() {
        let signal = decode("[1, 2.5, -3]").unwrap();
        assert_eq!(signal, Signal::from(vec![1.0, 2.5, -3.0]));

        let signal = decode("[1.0, 2]").unwrap();
        assert!(matches!(signal, Signal::Float(_)));
    }

    #[test]
    fn empty_list_is_valid() {
        let signal = decode("[]").unwrap();
        assert!(signal.is_empty());
        assert!(matches!(signal, Signal::Integer(_)));
    }

    #[test]
    fn keeps_full_unsigned_range() {
        let signal = decode("[18446744073709551615, -9223372036854775808]").unwrap();
        match signal {
            Signal::Integer(samples) => {
                assert_eq!(samples[0], u64::MAX as i128);
                assert_eq!(samples[1], i64::MIN as i128);
            }
            _ => panic!("expected integer signal"),
        }
    }

    #[test]
    fn oversized_floats_saturate_to_infinity() {
        let signal = decode("[1e400, -1]").unwrap();
        assert_eq!(signal, Signal::from(vec![f64::INFINITY, -1.0]));

        let signal = decode("[-1E400, 2.0]").unwrap();
        assert_eq!(signal, Signal::from(vec![f64::NEG_INFINITY, 2.0]));
    }

    #[test]
    fn integers_beyond_i128_become_floats() {
        let signal = decode("[1, 1000000000000000000000000000000000000000000]").unwrap();
        assert_eq!(signal, Signal::from(vec![1.0, 1e42]));
    }

    #[test]
    fn surrounding_whitespace_is_allowed() {
        assert_eq!(decode("  [ 1 , -2 ]\n").unwrap(), Signal::from(vec![1i64, -2]));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(decode("invalid"), Err(SignalFormatError::Syntax(_))));
        assert!(matches!(decode("[1, 2,"), Err(SignalFormatError::Syntax(_))));
        assert!(matches!(decode(""), Err(SignalFormatError::Syntax(_))));
    }

    #[test]
    fn rejects_non_list() {
        assert_eq!(decode("42"), Err(SignalFormatError::NotAList));
        assert_eq!(decode("{\"a\": 1}"), Err(SignalFormatError::NotAList));
        assert_eq!(decode("\"[1, 2]\""), Err(SignalFormatError::NotAList));
    }

    #[test]
    fn rejects_non_numeric_elements() {
        assert_eq!(decode("[1, \"2\", 3]"), Err(SignalFormatError::NonNumeric { index: 1 }));
        assert_eq!(decode("[true]"), Err(SignalFormatError::NonNumeric { index: 0 }));
        assert_eq!(decode("[1, null]"), Err(SignalFormatError::NonNumeric { index: 1 }));
        assert_eq!(decode("[[1], 2]"), Err(SignalFormatError::NonNumeric { index: 0 }));
    }

    #[test]
    fn messages_describe_expected_shape() {
        let message = decode("invalid").unwrap_err().to_string();
        assert!(message.starts_with("Invalid signal format."));
        assert!(message.contains("list of numbers"));
    }

    #[test]
    fn encodes_in_list_form() {
        assert_eq!(encode(&Signal::from(vec![1i64, 2, 3, -4, 2, -6])), "[1, 2, 3, -4, 2, -6]");
        assert_eq!(encode(&Signal::from(vec![1.0, -2.5])), "[1.0, -2.5]");
        assert_eq!(encode(&Signal::from(Vec::<i64>::new())), "[]");
    }

    #[test]
    fn encoded_floats_decode_as_floats() {
        let signal = Signal::from(vec![1.0, 2.0, -3.0]);
        assert_eq!(decode(&encode(&signal)).unwrap(), signal);
    }
}
