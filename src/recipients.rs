use std::io::Read;

use crate::error::CampaignError;

/// Required column naming each recipient's delivery address. Matched
/// exactly: `Email` or `email_address` do not count.
pub const EMAIL_ADDRESS_FIELD: &str = "EmailAddress";

/// One row of the recipient table: field name to value, in column
/// order. Every field, `EmailAddress` included, doubles as a template
/// variable for the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRecord {
    fields: Vec<(String, String)>,
}

impl RecipientRecord {
    pub fn email_address(&self) -> &str {
        self.get(EMAIL_ADDRESS_FIELD).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

/// Parse the recipient table: a header row naming the fields, then one
/// row per recipient, order preserved.
///
/// A table with no data rows and a header without `EmailAddress` are
/// both rejected before anything is sent.
pub fn parse_recipients<R: Read>(table: R) -> Result<Vec<RecipientRecord>, CampaignError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(table);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(RecipientRecord { fields });
    }

    if records.is_empty() {
        return Err(CampaignError::Validation(
            "the recipient table is too short; it needs a header row and at least one data row"
                .into(),
        ));
    }

    if !headers.iter().any(|name| name == EMAIL_ADDRESS_FIELD) {
        return Err(CampaignError::Validation(format!(
            "the {EMAIL_ADDRESS_FIELD} field was not included in the recipient table; it is required"
        )));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_file_order_and_column_order() {
        let table = "EmailAddress,Name,Team\na@x.com,Alice,Red\nb@x.com,Bob,Blue\n";
        let records = parse_recipients(table.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email_address(), "a@x.com");
        assert_eq!(records[1].email_address(), "b@x.com");
        let fields: Vec<_> = records[0].fields().collect();
        assert_eq!(
            fields,
            vec![("EmailAddress", "a@x.com"), ("Name", "Alice"), ("Team", "Red")]
        );
    }

    #[test]
    fn test_header_only_table_is_too_short() {
        let err = parse_recipients("EmailAddress,Name\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CampaignError::Validation(msg) if msg.contains("too short")));
    }

    #[test]
    fn test_empty_input_is_too_short() {
        let err = parse_recipients("".as_bytes()).unwrap_err();
        assert!(matches!(err, CampaignError::Validation(msg) if msg.contains("too short")));
    }

    #[test]
    fn test_missing_email_address_column_is_rejected() {
        let table = "Email,Name\na@x.com,Alice\n";
        let err = parse_recipients(table.as_bytes()).unwrap_err();
        assert!(matches!(err, CampaignError::Validation(msg) if msg.contains("EmailAddress")));
    }

    #[test]
    fn test_field_name_match_is_case_sensitive() {
        let table = "email_address,Name\na@x.com,Alice\n";
        let err = parse_recipients(table.as_bytes()).unwrap_err();
        assert!(matches!(err, CampaignError::Validation(_)));
    }

    #[test]
    fn test_short_rows_fill_missing_fields_with_empty_values() {
        let table = "EmailAddress,Name\na@x.com\n";
        let records = parse_recipients(table.as_bytes()).unwrap();
        assert_eq!(records[0].get("Name"), Some(""));
    }
}
