use polars::prelude::{Column, NamedFrom, Series};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Float,
    Boolean,
    Text,
}

// All-null columns stay numeric; a mix of kinds falls back to text.
fn infer_kind(values: &[Option<&Value>]) -> ColumnKind {
    let mut present = values.iter().flatten().peekable();
    if present.peek().is_none() {
        return ColumnKind::Float;
    }
    let mut numbers = true;
    let mut booleans = true;
    for value in present {
        numbers &= value.is_number();
        booleans &= value.is_boolean();
    }
    if numbers {
        ColumnKind::Float
    } else if booleans {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Builds one field column from the per-row values, `None` meaning absent or null.
pub(crate) fn field_column(name: &str, values: &[Option<&Value>]) -> Column {
    let series = match infer_kind(values) {
        ColumnKind::Float => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| value.and_then(Value::as_f64))
                .collect::<Vec<Option<f64>>>(),
        ),
        ColumnKind::Boolean => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| value.and_then(Value::as_bool))
                .collect::<Vec<Option<bool>>>(),
        ),
        ColumnKind::Text => Series::new(
            name.into(),
            values
                .iter()
                .map(|value| value.map(as_text))
                .collect::<Vec<Option<String>>>(),
        ),
    };
    Column::from(series)
}
