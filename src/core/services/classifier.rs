use crate::core::models::field::FieldType;

/// The twelve boolean literals recognized by classification, matching
/// what the generated `parse_bool` helper accepts as true or false.
const BOOL_TOKENS: [&str; 12] = [
    "1", "0", "t", "f", "T", "F", "true", "false", "TRUE", "FALSE", "True", "False",
];

/// Infers the type of a raw env value. Total: never fails, anything
/// unrecognized is a string.
///
/// Precedence matters because the textual forms overlap: bool wins over
/// int so that `"0"` and `"1"` classify as bool, and int wins over float
/// so that `"007"` stays an integer. No trimming happens here: a value
/// like `"  123  "` is a string, exactly as the file defined it.
pub fn classify(raw: &str) -> FieldType {
    if BOOL_TOKENS.contains(&raw) {
        return FieldType::Bool;
    }
    if raw.parse::<i64>().is_ok() {
        return FieldType::Int;
    }
    if raw.parse::<f64>().is_ok() {
        return FieldType::Float;
    }
    FieldType::Str
}
