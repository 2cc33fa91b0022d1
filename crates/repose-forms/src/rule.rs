use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Outcome of one rule applied to one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn invalid(message: impl Into<String>) -> Self {
        Validity::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(m) => Some(m),
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(m) => Some(m),
        }
    }
}

impl From<Result<(), String>> for Validity {
    fn from(r: Result<(), String>) -> Self {
        match r {
            Ok(()) => Validity::Valid,
            Err(m) => Validity::Invalid(m),
        }
    }
}

/// Pure check of a single field value.
///
/// Rules must be total: a rule that panics is a bug in the caller, and
/// validation does not catch it.
#[derive(Clone)]
pub struct Rule(Rc<dyn Fn(&Value) -> Validity>);

impl Rule {
    pub fn new(check: impl Fn(&Value) -> Validity + 'static) -> Self {
        Self(Rc::new(check))
    }

    /// Rule from a predicate and the message reported when it returns false.
    pub fn when(predicate: impl Fn(&Value) -> bool + 'static, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |v| {
            if predicate(v) {
                Validity::Valid
            } else {
                Validity::Invalid(message.clone())
            }
        })
    }

    pub fn check(&self, value: &Value) -> Validity {
        (self.0)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(..)")
    }
}

/// Field name → ordered rules. Field order is insertion order and decides the
/// order of keys in `FormErrors`.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    fields: Vec<(String, Vec<Rule>)>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rules for `name`. Naming a field twice appends to its rule list.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let name = name.into();
        let rules = rules.into_iter();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((name, rules.collect())),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&[Rule]> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(n, r)| (n.as_str(), r.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
