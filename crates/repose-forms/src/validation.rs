use std::cell::RefCell;
use std::rc::{Rc, Weak};

use repose_reactive::{Computed, Dispose, ReadSignal, Signal, watch};
use serde::Serialize;
use serde_json::Value;

use crate::errors::FormErrors;
use crate::rule::FormRules;

/// Validation state for one form. Clones share state.
#[derive(Clone)]
pub struct UseFormValidation {
    inner: Rc<FormInner>,
}

struct FormInner {
    rules: FormRules,
    snapshot: Box<dyn Fn() -> Value>,
    errors: Signal<FormErrors>,
    is_form_valid: Computed<bool>,
    watcher: RefCell<Option<Dispose>>,
}

/// Validates `form_state` against `rules` now and after every write to it.
///
/// Field values are read from the serialized form, so a struct field `age`
/// reaches the rules for `"age"` as a `serde_json::Value`; fields the form
/// does not have are `Value::Null`.
pub fn use_form_validation<F>(form_state: &Signal<F>, rules: FormRules) -> UseFormValidation
where
    F: Serialize + 'static,
{
    let snapshot = {
        let form_state = form_state.clone();
        move || form_state.with_untracked(serialize_form)
    };

    let errors = Signal::new(FormErrors::default());
    let is_form_valid = Computed::new({
        let errors = errors.clone();
        move || errors.with(FormErrors::is_valid)
    });

    let form = UseFormValidation {
        inner: Rc::new(FormInner {
            rules,
            snapshot: Box::new(snapshot),
            errors,
            is_form_valid,
            watcher: RefCell::new(None),
        }),
    };

    let weak: Weak<FormInner> = Rc::downgrade(&form.inner);
    let dispose = watch(
        {
            let form_state = form_state.clone();
            move || form_state.track()
        },
        move |()| {
            if let Some(inner) = weak.upgrade() {
                inner.validate();
            }
        },
    );
    *form.inner.watcher.borrow_mut() = Some(dispose);

    form.validate();
    form
}

impl UseFormValidation {
    /// Re-runs every rule and replaces `errors`. Returns whether the form is
    /// valid; the result is not stored anywhere else.
    pub fn validate(&self) -> bool {
        self.inner.validate()
    }

    pub fn errors(&self) -> ReadSignal<FormErrors> {
        self.inner.errors.read_only()
    }

    pub fn is_form_valid(&self) -> Computed<bool> {
        self.inner.is_form_valid.clone()
    }

    /// Messages for one field from the latest pass (tracked read).
    pub fn field_errors(&self, field: &str) -> Vec<String> {
        self.inner
            .errors
            .with(|e| e.get(field).map(<[String]>::to_vec).unwrap_or_default())
    }

    /// Stops re-validating on form writes.
    pub fn dispose(&self) {
        if let Some(d) = self.inner.watcher.borrow_mut().take() {
            d.run();
        }
    }
}

impl FormInner {
    fn validate(&self) -> bool {
        let state = (self.snapshot)();
        let mut errors = FormErrors::new();

        for (field, rules) in self.rules.iter() {
            let value = state.get(field).unwrap_or(&Value::Null);
            let messages: Vec<String> = rules
                .iter()
                .filter_map(|rule| rule.check(value).into_message())
                .collect();
            errors.push(field, messages);
        }

        let valid = errors.is_valid();
        log::trace!(
            "validate: {} field(s), {} message(s)",
            errors.len(),
            errors.message_count()
        );
        self.errors.set(errors);
        valid
    }
}

impl Drop for FormInner {
    fn drop(&mut self) {
        if let Some(d) = self.watcher.get_mut().take() {
            d.run();
        }
    }
}

fn serialize_form<F: Serialize>(form: &F) -> Value {
    match serde_json::to_value(form) {
        Ok(v) => v,
        Err(e) => {
            log::error!("use_form_validation: form state does not serialize: {e}");
            Value::Null
        }
    }
}
