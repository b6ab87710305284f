use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid triple '{0}'. Expected three comma-separated numbers (e.g., '1.0,-2.5,3').")]
    InvalidTripleFormat(String),

    #[error("Component {index} of '{input}' is not a finite number.")]
    InvalidComponent { index: usize, input: String },
}

/// Parses `X,Y,Z` into three finite floats.
pub fn parse_triple(s: &str) -> Result<[f64; 3], ParseError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ParseError::InvalidTripleFormat(s.to_string()));
    }

    let mut values = [0.0; 3];
    for (index, (slot, part)) in values.iter_mut().zip(&parts).enumerate() {
        *slot = part
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidComponent {
                index: index + 1,
                input: s.to_string(),
            })?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_triples() {
        assert_eq!(parse_triple("1,2,3").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_triple(" -1.5 , 0.25,1e1 ").unwrap(), [-1.5, 0.25, 10.0]);
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert_eq!(
            parse_triple("1,2").unwrap_err(),
            ParseError::InvalidTripleFormat("1,2".to_string())
        );
        assert!(matches!(
            parse_triple("1,2,3,4"),
            Err(ParseError::InvalidTripleFormat(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_or_non_finite_components() {
        assert_eq!(
            parse_triple("1,x,3").unwrap_err(),
            ParseError::InvalidComponent {
                index: 2,
                input: "1,x,3".to_string()
            }
        );
        assert!(matches!(
            parse_triple("1,2,inf"),
            Err(ParseError::InvalidComponent { index: 3, .. })
        ));
    }
}
