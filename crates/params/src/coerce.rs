//! String-to-value coercion and assignment into the target record.

use crate::error::Violation;
use crate::field::Setter;

/// Coerce `raw` per the field's value kind and write it into `target`.
pub(crate) fn assign<T>(
    target: &mut T,
    field: &str,
    setter: Setter<T>,
    raw: &str,
) -> Result<(), Violation> {
    match setter {
        Setter::Text(set) => set(target, raw.to_string()),
        Setter::Bool(set) => set(target, parse_bool(field, raw)?),
    }
    Ok(())
}

/// Booleans accept exactly `true` and `false`, case sensitively.
pub(crate) fn parse_bool(field: &str, raw: &str) -> Result<bool, Violation> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Violation::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            expected: "boolean",
        }),
    }
}
