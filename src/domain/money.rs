use std::fmt;

/// Monetary values are plain IEEE doubles, exactly as they are stored in the document.
pub type Amount = f64;

/// Format an amount with a currency symbol and two decimals.
/// Example: (9.99, "$") -> "$9.99", (-12.5, "€") -> "-€12.50"
pub fn format_amount(amount: Amount, currency: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{:.2}", sign, currency, amount.abs())
}

/// Parse a user-supplied decimal string into an amount.
/// Accepts an optional sign, at most one currency symbol after it and
/// thousands separators: "50", "12.5", "$1,200.00", "-€3".
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut chars = rest.chars();
    let body = match chars.next() {
        Some(c) if is_currency_symbol(c) => chars.as_str(),
        _ => rest,
    };

    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(ParseAmountError::InvalidFormat);
    }

    let digits: String = body.chars().filter(|c| *c != ',').collect();
    let value: Amount = digits
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;
    if !value.is_finite() {
        return Err(ParseAmountError::InvalidFormat);
    }

    Ok(if negative { -value } else { value })
}

fn is_currency_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '+')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
