use serde_json::Value;

/// Read-only view over one raw provider record. Field names vary by endpoint
/// and vintage, so lookups take dotted paths and fall back to a
/// case-insensitive key scan at each level.
#[derive(Debug, Clone)]
pub struct RawRecord {
    value: Value,
}

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Resolve a dotted path such as `lot.acres`. Returns `None` for missing
    /// keys and for explicit JSON nulls, which the provider uses
    /// interchangeably.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut current = &self.value;
        for segment in path.split('.') {
            current = lookup_key(current, segment)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn numeric_field(&self, path: &str) -> Option<f64> {
        self.field(path).and_then(numeric_value)
    }

    pub fn string_field(&self, path: &str) -> Option<String> {
        self.field(path).and_then(string_value)
    }
}

fn lookup_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(key) {
        return Some(found);
    }
    map.iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, found)| found)
}

/// Shared sanitize-then-parse primitive for every numeric extractor. Accepts
/// JSON numbers, numeric strings with currency symbols or thousands
/// separators, and strings still wrapped in stray quotes from double
/// JSON-encoding. Non-finite results are treated as unparseable.
pub(crate) fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|parsed| parsed.is_finite()),
        Value::String(raw) => parse_numeric_str(raw),
        _ => None,
    }
}

pub(crate) fn parse_numeric_str(raw: &str) -> Option<f64> {
    let unquoted = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let cleaned: String = unquoted
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// String counterpart: trims whitespace and stray quote characters, and maps
/// blank results to `None` so "" never masquerades as data.
pub(crate) fn string_value(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(raw) => raw.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };

    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
