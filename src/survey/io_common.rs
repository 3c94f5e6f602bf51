use serde_json::Value as JSValue;
use survey_voting::SurveyValue;

/// Reads a cell that was stored as text. Blank cells are missing values and
/// cells that read as finite numbers are numbers.
pub fn parse_text_cell(s: &str) -> SurveyValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return SurveyValue::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() => SurveyValue::Number(x),
        _ => SurveyValue::Text(s.to_string()),
    }
}

pub fn json_to_value(v: &JSValue) -> SurveyValue {
    match v {
        JSValue::Null => SurveyValue::Null,
        JSValue::Number(n) => n
            .as_f64()
            .map(SurveyValue::Number)
            .unwrap_or(SurveyValue::Null),
        JSValue::String(s) => SurveyValue::Text(s.clone()),
        JSValue::Bool(b) => SurveyValue::Text(b.to_string()),
        // Nested values are kept in their textual form.
        x => SurveyValue::Text(x.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_cells() {
        assert_eq!(parse_text_cell(""), SurveyValue::Null);
        assert_eq!(parse_text_cell("  "), SurveyValue::Null);
        assert_eq!(parse_text_cell("3"), SurveyValue::Number(3.0));
        assert_eq!(parse_text_cell("-12.5"), SurveyValue::Number(-12.5));
        assert_eq!(parse_text_cell("nan"), SurveyValue::from("nan"));
        assert_eq!(parse_text_cell("1 Stimme"), SurveyValue::from("1 Stimme"));
    }

    #[test]
    fn json_values() {
        assert_eq!(json_to_value(&json!(null)), SurveyValue::Null);
        assert_eq!(json_to_value(&json!(2)), SurveyValue::Number(2.0));
        assert_eq!(json_to_value(&json!("Neutral.")), SurveyValue::from("Neutral."));
        assert_eq!(json_to_value(&json!(["a"])), SurveyValue::from("[\"a\"]"));
    }
}
