/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs.
use leadflow_api::models::{LeadCategory, LeadSubmission, Qualification};
use leadflow_api::pipeline::validate;
use proptest::prelude::*;

fn submission(
    name: &str,
    email: &str,
    phone: &str,
    company: &str,
    message: &str,
    source: Option<String>,
) -> LeadSubmission {
    LeadSubmission {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        company: company.to_string(),
        message: message.to_string(),
        source,
    }
}

// Property: validation never panics, whatever the form contains
proptest! {
    #[test]
    fn validation_never_panics(
        name in "\\PC*",
        email in "\\PC*",
        phone in "\\PC*",
        company in "\\PC*",
        message in "\\PC*",
        source in proptest::option::of("\\PC*")
    ) {
        let _ = validate(submission(&name, &email, &phone, &company, &message, source));
    }

    #[test]
    fn non_blank_required_fields_are_accepted_and_trimmed(
        name in "[a-zA-Z][a-zA-Z ]{0,30}[a-zA-Z]",
        email in "[a-z]{1,10}@[a-z]{1,10}\\.[a-z]{2,4}",
        phone in "[0-9]{7,12}",
        company in "[a-zA-Z]{1,20}",
        message in "[a-zA-Z0-9 ]{1,80}"
    ) {
        // message may still be blank after trimming when it's all spaces
        prop_assume!(!message.trim().is_empty());

        let form = validate(submission(
            &format!("  {}  ", name),
            &email,
            &phone,
            &company,
            &message,
            None,
        )).unwrap();

        prop_assert_eq!(form.name, name.trim().to_string());
        prop_assert_eq!(form.email, email);
        prop_assert_eq!(form.source, "Web Form".to_string());
    }

    #[test]
    fn whitespace_only_email_is_always_rejected(ws in "[ \\t]{0,10}") {
        let result = validate(submission("Jane", &ws, "555", "Co", "hi", None));
        prop_assert!(result.is_err());
    }

    // Category parsing accepts the three known temperatures in any case
    // and nothing else.
    #[test]
    fn category_parse_roundtrips_known_values(
        pick in 0usize..3,
        upper in proptest::bool::ANY
    ) {
        let raw = ["hot", "warm", "cold"][pick];
        let value = if upper { raw.to_uppercase() } else { raw.to_string() };
        let parsed = LeadCategory::parse(&value).unwrap();
        prop_assert_eq!(parsed.as_str(), raw.to_uppercase());
    }

    #[test]
    fn unknown_categories_never_parse(s in "[a-z]{1,10}") {
        prop_assume!(!matches!(s.as_str(), "hot" | "warm" | "cold"));
        prop_assert!(LeadCategory::parse(&s).is_none());
    }
}

// The fallback annotation is always a sane, storable qualification.
#[test]
fn fallback_qualification_invariants() {
    let fallback = Qualification::fallback();
    assert!((1..=10).contains(&fallback.score));
    assert!(matches!(
        fallback.category,
        LeadCategory::Hot | LeadCategory::Warm | LeadCategory::Cold
    ));
    assert!(!fallback.reason.is_empty());
    assert!(!fallback.action.is_empty());
}
