use serde_json::{Map, Value};
use validator::Validate;
use vitrine_core::VitrineError;

/// Fallback text for rules declared without a `message`.
fn default_message(code: &str) -> String {
    match code {
        "required" | "length" => "is required".to_string(),
        "email" => "must be a valid email".to_string(),
        "url" => "must be a valid URL".to_string(),
        other => other.to_string(),
    }
}

/// Records are flat, so only field-level errors can occur.
fn field_messages(errs: &validator::ValidationErrors) -> Map<String, Value> {
    let mut fields = Map::new();
    for (field, errors) in errs.field_errors() {
        let messages = errors
            .iter()
            .map(|e| match &e.message {
                Some(message) => Value::String(message.to_string()),
                None => Value::String(default_message(&e.code)),
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }
    fields
}

/// Run the form's field rules. Failures become `Unprocessable` with a
/// `field → [messages]` map in `errors`.
pub fn validate_form<T: Validate>(form: &T, error_message: &str) -> Result<(), VitrineError> {
    form.validate().map_err(|errs| {
        let fields = field_messages(&errs);
        VitrineError::unprocessable(error_message).with_errors(Value::Object(fields))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::ErrorKind;

    #[derive(Debug, Validate)]
    struct Upload {
        #[validate(length(min = 1, message = "title is required"))]
        title: String,
        #[validate(url)]
        link: String,
    }

    #[test]
    fn field_errors_are_keyed_by_name() {
        let err = validate_form(
            &Upload {
                title: String::new(),
                link: "not a url".into(),
            },
            "Document is invalid",
        )
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unprocessable);
        let errors = err.errors.unwrap();
        assert_eq!(errors["title"][0], "title is required");
        assert_eq!(errors["link"][0], "must be a valid URL");
    }

    #[test]
    fn rule_without_message_uses_default_text() {
        #[derive(Debug, Validate)]
        struct Contact {
            #[validate(email)]
            email: String,
        }

        let err = validate_form(&Contact { email: "nope".into() }, "invalid").unwrap_err();
        assert_eq!(err.errors.unwrap()["email"][0], "must be a valid email");
    }

    #[test]
    fn valid_form_passes() {
        let form = Upload {
            title: "Guide".into(),
            link: "https://example.org/guide.pdf".into(),
        };
        assert!(validate_form(&form, "invalid").is_ok());
    }
}
