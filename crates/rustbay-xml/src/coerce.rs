//! Optional text-to-integer coercion applied to decoded text and attribute values.

use crate::value::Value;

/// Coerce decoded text into a [`Value`].
///
/// With `convert_integers` disabled the text is kept as is. Enabled, the text becomes an
/// integer only when it is exactly the decimal rendering of that integer, so `"00123"`,
/// `"+5"`, `" 7"` and `"1.5"` all stay text. Values outside the `i64` range stay text.
#[must_use]
pub fn coerce(text: &str, convert_integers: bool) -> Value {
    if convert_integers {
        if let Ok(n) = text.parse::<i64>() {
            if n.to_string() == text {
                return Value::Integer(n);
            }
        }
    }
    Value::Text(text.to_owned())
}
