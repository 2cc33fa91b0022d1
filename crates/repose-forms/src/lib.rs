//! # Form validation
//!
//! `use_form_validation` keeps a `FormErrors` signal in sync with a form held
//! in a `Signal<F>`:
//!
//! ```rust
//! use repose_forms::{FormRules, rules, use_form_validation};
//! use repose_reactive::signal;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Signup {
//!     email: String,
//!     age: i32,
//! }
//!
//! let form = signal(Signup { email: "ada@example.org".into(), age: -1 });
//! let v = use_form_validation(
//!     &form,
//!     FormRules::new()
//!         .field("email", [rules::required("Email is required"), rules::email("Not an email")])
//!         .field("age", [rules::positive("Age must be positive")]),
//! );
//!
//! assert!(!v.is_form_valid().get());
//! assert_eq!(v.field_errors("age"), vec!["Age must be positive"]);
//!
//! form.update(|f| f.age = 30);
//! assert!(v.is_form_valid().get());
//! ```
//!
//! Every rule of a field runs on every pass, so a field can report several
//! messages at once. Validation never fails with an error; invalid input shows
//! up only as messages.

pub mod errors;
pub mod rule;
pub mod rules;
pub mod validation;


pub use errors::FormErrors;
pub use rule::{FormRules, Rule, Validity};
pub use validation::{UseFormValidation, use_form_validation};
