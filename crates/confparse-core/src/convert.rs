//! Built-in value converters
//!
//! Each converter matches `ConfigParserCallback` and can be used directly in
//! a `ConfigTableItem`.

use crate::error::{Error, Result};
use crate::parser::{ConfigLine, ConfigTarget};
use crate::strings::{self, WHITESPACE};
use tracing::debug;

fn mismatch(line: &ConfigLine<'_>, expected: &'static str) -> Error {
    Error::TargetMismatch {
        lvalue: line.lvalue.to_string(),
        expected,
    }
}

/// Store an unsigned decimal integer; anything but digits is rejected
pub fn parse_int(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Int(i) = target else {
        return Err(mismatch(line, "an integer"));
    };

    let rvalue = line.rvalue;
    if !strings::is_number(rvalue) {
        return Err(Error::InvalidFormat(format!(
            "{} = '{}' is not a number",
            line.lvalue, rvalue
        )));
    }

    **i = if rvalue.is_empty() {
        0
    } else {
        rvalue.parse::<i32>().map_err(|e| {
            Error::InvalidFormat(format!("{} = '{}': {}", line.lvalue, rvalue, e))
        })?
    };

    Ok(())
}

/// Store a boolean
///
/// Unrecognized words leave the target untouched and are not an error,
/// unlike `parse_int`.
pub fn parse_bool(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Bool(b) = target else {
        return Err(mismatch(line, "a boolean"));
    };

    match strings::parse_boolean(line.rvalue) {
        Some(v) => **b = v,
        None => debug!(
            "{}:{}: ignoring non-boolean {} = '{}'",
            line.filename.display(),
            line.line,
            line.lvalue,
            line.rvalue
        ),
    }

    Ok(())
}

/// Store a copy of the value, or unset it when the value is empty
pub fn parse_string(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::String(s) = target else {
        return Err(mismatch(line, "a string"));
    };

    **s = if line.rvalue.is_empty() {
        None
    } else {
        Some(line.rvalue.to_string())
    };

    Ok(())
}

/// Store a byte size such as `512`, `10K`, `3M` or `1G`
///
/// The target is reset to 0 before parsing.
pub fn parse_bytes(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Size(size) = target else {
        return Err(mismatch(line, "a size"));
    };

    **size = 0;
    **size = strings::parse_bytes(line.rvalue)?;

    Ok(())
}

/// Store a percentage written as `70%`
pub fn parse_percent(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Size(percent) = target else {
        return Err(mismatch(line, "a size"));
    };

    **percent = strings::parse_percent(line.rvalue)?;

    Ok(())
}

/// Append the whitespace-separated words of the value to a list
///
/// Repeating the key keeps adding to the same list.
pub fn parse_strv(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Strv(strv) = target else {
        return Err(mismatch(line, "a string list"));
    };

    strv.extend(strings::str_to_strv(line.rvalue, WHITESPACE));

    Ok(())
}

pub fn parse_float(line: &ConfigLine<'_>, target: &mut ConfigTarget<'_>) -> Result<()> {
    let ConfigTarget::Float(f) = target else {
        return Err(mismatch(line, "a float"));
    };

    **f = strings::parse_float(line.rvalue).ok_or_else(|| {
        Error::InvalidFormat(format!(
            "{} = '{}' is not a float",
            line.lvalue, line.rvalue
        ))
    })?;

    Ok(())
}
