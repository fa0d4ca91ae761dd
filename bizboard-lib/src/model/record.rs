//! Dynamic table record

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A dynamic record from the table endpoint.
///
/// Records hold field values as a JSON object, allowing dynamic access to
/// any field by name. The table protocol is schema-agnostic: the column
/// list decides which fields a table renders, the record just carries them.
///
/// # Example
///
/// ```
/// use bizboard_lib::model::Record;
///
/// let record = Record::new()
///     .set("Business Name", "Acme Corp")
///     .set("State", "CA");
///
/// assert_eq!(record.get_str("Business Name"), Some("Acme Corp"));
/// assert_eq!(record.display("Mobile Number"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Sets a field value, consuming and returning the record for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as a string slice, if it exists and is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the display text for a field.
    ///
    /// Strings render as-is, numbers and booleans via their JSON form,
    /// `null` and missing fields as the empty string.
    pub fn display(&self, field: &str) -> String {
        match self.fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_by_value_kind() {
        let record = Record::new()
            .set("name", "O'Brien & Sons")
            .set("count", 42)
            .set("missing_phone", Value::Null);

        assert_eq!(record.display("name"), "O'Brien & Sons");
        assert_eq!(record.display("count"), "42");
        assert_eq!(record.display("missing_phone"), "");
        assert_eq!(record.display("nonexistent"), "");
    }

    #[test]
    fn round_trips_through_json() {
        let record = Record::new().set("City", "Austin").set("State", "TX");
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
