/// Messages from the latest validation pass, keyed by field in rules order.
///
/// A field that passes maps to an empty list; a field without rules is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, field: &str, messages: Vec<String>) {
        self.fields.push((field.to_owned(), messages));
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
    }

    /// First message for `field`, the usual thing to render under an input.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)?.first().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(f, _)| f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(f, _)| f.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True iff no field has a message.
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, m)| m.is_empty())
    }

    pub fn message_count(&self) -> usize {
        self.fields.iter().map(|(_, m)| m.len()).sum()
    }
}
