use bytes::Bytes;
use repose_reactive::{DeepTrack, Signal};
use serde_json::{Map, Value};

/// One entry of a [`JsonBody`]: either a plain JSON value or a cell whose
/// current value is read at send time.
#[derive(Debug, Clone)]
pub enum BodyValue {
    Value(Value),
    Cell(Signal<Value>),
}

impl BodyValue {
    fn resolve(&self) -> Value {
        match self {
            BodyValue::Value(v) => v.clone(),
            BodyValue::Cell(cell) => cell.get_untracked(),
        }
    }
}

impl From<Value> for BodyValue {
    fn from(v: Value) -> Self {
        BodyValue::Value(v)
    }
}

impl From<Signal<Value>> for BodyValue {
    fn from(cell: Signal<Value>) -> Self {
        BodyValue::Cell(cell)
    }
}

impl From<&Signal<Value>> for BodyValue {
    fn from(cell: &Signal<Value>) -> Self {
        BodyValue::Cell(cell.clone())
    }
}

/// Key/value object encoded as JSON when sent. Keys keep insertion order; a
/// repeated key replaces the earlier value in place.
#[derive(Debug, Clone, Default)]
pub struct JsonBody {
    fields: Vec<(String, BodyValue)>,
}

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<BodyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BodyValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Current value of every field, cells dereferenced.
    pub fn resolve(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.resolve()))
            .collect();
        Value::Object(map)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.resolve())
    }
}

/// Anything other than an object becomes a single `"value"` field.
impl From<Value> for JsonBody {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, BodyValue::Value(v)))
                    .collect(),
            },
            other => Self::new().field("value", other),
        }
    }
}

impl DeepTrack for JsonBody {
    fn track_deep(&self) {
        for (_, value) in &self.fields {
            if let BodyValue::Cell(cell) = value {
                cell.track();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// Multipart form payload; the transport picks the boundary and the
/// `Content-Type` header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: Some(file_name.into()),
                content_type: content_type.map(str::to_owned),
                data: data.into(),
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }
}

/// What a caller may put in `FetchOptions::body`.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Encoded as JSON text; sets `Content-Type: application/json` unless the
    /// caller already chose a content type.
    Json(JsonBody),
    /// Raw blob, sent as is.
    Bytes(Bytes),
    /// Multipart form, sent as is.
    Form(FormData),
    /// Raw text, sent as is.
    Text(String),
}

impl From<JsonBody> for RequestBody {
    fn from(body: JsonBody) -> Self {
        RequestBody::Json(body)
    }
}

impl From<FormData> for RequestBody {
    fn from(form: FormData) -> Self {
        RequestBody::Form(form)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes.into())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl DeepTrack for RequestBody {
    fn track_deep(&self) {
        if let RequestBody::Json(json) = self {
            json.track_deep();
        }
    }
}
