//! Integration tests for form validation and submission.

use formbind::{Codec, Decoder, ErrorTree, FieldPath, Form, FormConfig, DEFAULT_ERROR_MESSAGE};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn path(text: &str) -> FieldPath {
    FieldPath::parse(text).unwrap()
}

fn signup() -> Form<formbind::ExactCodec<Box<dyn formbind::Decoder>>> {
    Form::new(Codec::form(
        Codec::object()
            .field("email", Codec::string().pattern("@").unwrap().error("Enter a valid email"))
            .field(
                "guests",
                Codec::readonly_array(
                    Codec::object()
                        .field("name", Codec::string().min_len(1))
                        .field("age", Codec::number_from_string()),
                ),
            ),
        Codec::partial().field("note", Codec::string().max_len(20)),
    ))
}

#[test]
fn test_valid_form() {
    let form = signup();
    let data = json!({
        "email": "ada@example.com",
        "guests": [{"name": "Ada", "age": "36"}]
    });

    assert!(form.validate(&data).is_none());
}

#[test]
fn test_errors_mirror_form_shape() {
    let form = signup();
    let data = json!({
        "email": "ada",
        "guests": [
            {"name": "Ada", "age": "36"},
            {"name": "", "age": "young"}
        ],
        "note": "this note is much too long"
    });

    let errors = form.validate(&data).unwrap();

    assert_eq!(
        errors.to_json(),
        json!({
            "email": "Enter a valid email",
            "guests": [null, {"name": "length must be at least 1, got 0", "age": DEFAULT_ERROR_MESSAGE}],
            "note": "length must be at most 20, got 26"
        })
    );
}

#[test]
fn test_default_message_sees_failing_entry() {
    let form = Form::with_config(
        Codec::form(
            Codec::object().field("guests", Codec::array(Codec::number_from_string())),
            Codec::partial(),
        ),
        FormConfig::new().default_error_message(|entry| {
            let got = entry.value.as_ref().map_or("nothing".to_string(), |v| v.to_string());
            format!("{} is not a number", got)
        }),
    );

    let errors = form.validate(&json!({"guests": ["1", "two"]})).unwrap();

    assert_eq!(errors.message_at(&path("guests[1]")), Some("\"two\" is not a number"));
    assert!(errors.get(&path("guests[0]")).is_none());
}

#[test]
fn test_form_exposes_codec_and_config() {
    let form = Form::with_config(
        Codec::form(Codec::object().field("email", Codec::string()), Codec::partial()),
        FormConfig::new().default_error_message(|_| "Required".to_string()),
    );

    assert!(form.codec().decode(&json!({"email": "a@b.c"})).is_success());

    let errors = form.codec().decode(&json!({})).into_result().unwrap_err();
    assert_eq!(form.config().message_for(errors.first()), "Required");
}

#[test]
fn test_submit_flow() {
    let form = signup();
    let data = json!({"email": "ada@example.com", "guests": []});

    let response = form.submit(&data, |decoded| {
        assert_eq!(decoded["email"], json!("ada@example.com"));
        Some(ErrorTree::form_level("Registration is closed").merge(ErrorTree::field(
            "email",
            ErrorTree::message("Already registered"),
        )))
    });

    let errors = response.unwrap();
    assert_eq!(errors.form_error(), Some("Registration is closed"));
    assert_eq!(errors.message_at(&path("email")), Some("Already registered"));
}

#[test]
fn test_submit_returns_validation_errors_first() {
    let form = signup();

    let response = form.submit(&json!({"guests": []}), |_| {
        panic!("handler must not run for invalid data")
    });

    assert_eq!(
        response.unwrap().message_at(&path("email")),
        Some(DEFAULT_ERROR_MESSAGE)
    );
}

#[test]
fn test_missing_array_field_reports_diagnostic() {
    let errors = signup().validate(&json!({"email": "ada@example.com"})).unwrap();

    assert_eq!(
        errors.message_at(&path("guests")),
        Some("Expected next context entry to exist.")
    );
}

#[test]
fn test_concurrent_validation() {
    let form = Arc::new(signup());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let form = Arc::clone(&form);
            thread::spawn(move || {
                let errors = form
                    .validate(&json!({
                        "email": format!("user{}@example.com", i),
                        "guests": [{"name": format!("Guest{}", i), "age": i}]
                    }))
                    .unwrap();
                assert_eq!(errors.message_at(&path("guests[0].age")), Some(DEFAULT_ERROR_MESSAGE));
                assert_eq!(errors.leaf_count(), 1);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
