/// Replace every `$key$` placeholder in the body with its value.
///
/// Substitution is literal, not pattern-based: each key in the mapping
/// is wrapped in dollar signs and replaced wherever that exact token
/// occurs. Keys absent from the body are skipped silently, and tokens
/// in the body with no matching key are left as they are. There is no
/// escape for a literal `$...$` sequence that happens to match a key.
pub fn substitute<'a, I>(body: &str, values: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut resolved = body.to_string();
    for (key, value) in values {
        let placeholder = format!("${key}$");
        log::debug!("Replacing [{placeholder}] with [{value}]");
        resolved = resolved.replace(&placeholder, value);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::substitute;

    #[test]
    fn test_replaces_every_occurrence_of_a_key() {
        let body = "Hi $Name$, your code is $Code$. Bye $Name$.";
        let values = [("Name", "Alice"), ("Code", "1234")];
        let resolved = substitute(body, values);
        assert_eq!(resolved, "Hi Alice, your code is 1234. Bye Alice.");
        assert!(!resolved.contains("$Name$"));
        assert!(!resolved.contains("$Code$"));
    }

    #[test]
    fn test_unknown_tokens_are_left_in_place() {
        let body = "Hi $Name$, ref $Unknown$";
        let resolved = substitute(body, [("Name", "Bob")]);
        assert_eq!(resolved, "Hi Bob, ref $Unknown$");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let body = "Hi $name$";
        let resolved = substitute(body, [("Name", "Alice")]);
        assert_eq!(resolved, "Hi $name$");
    }

    #[test]
    fn test_same_input_gives_same_output() {
        let body = "Dear $Name$";
        let values = [("Name", "Carol")];
        assert_eq!(substitute(body, values), substitute(body, values));
        // the source body is borrowed, never mutated
        assert_eq!(body, "Dear $Name$");
    }

    #[test]
    fn test_email_address_is_a_valid_placeholder() {
        let body = "Your login is $EmailAddress$";
        let resolved = substitute(body, [("EmailAddress", "a@x.com")]);
        assert_eq!(resolved, "Your login is a@x.com");
    }
}
