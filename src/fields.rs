//! Identity field extraction
//!
//! Fields are read by label number: each field is bound to the label its text
//! receives when the analysis service enumerates one specific ID-card layout.
//! Nothing checks that the text looks like the expected field; a reordered or
//! different document silently yields wrong values.

use serde::{Deserialize, Serialize};

use crate::detection::DetectionSet;

/// The six extracted identity fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    FirstName,
    LastName,
    DateOfBirth,
    Nationality,
    PlaceOfBirth,
    DateOfExpiry,
}

impl IdentityField {
    pub const ALL: [IdentityField; 6] = [
        IdentityField::FirstName,
        IdentityField::LastName,
        IdentityField::DateOfBirth,
        IdentityField::Nationality,
        IdentityField::PlaceOfBirth,
        IdentityField::DateOfExpiry,
    ];

    /// Detection label this field is read from
    pub const fn label(self) -> u32 {
        match self {
            IdentityField::FirstName => 33,
            IdentityField::LastName => 29,
            IdentityField::DateOfBirth => 42,
            IdentityField::Nationality => 43,
            IdentityField::PlaceOfBirth => 49,
            IdentityField::DateOfExpiry => 56,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            IdentityField::FirstName => "First Name",
            IdentityField::LastName => "Last Name",
            IdentityField::DateOfBirth => "Date of Birth",
            IdentityField::Nationality => "Nationality",
            IdentityField::PlaceOfBirth => "Place of Birth",
            IdentityField::DateOfExpiry => "Date of Expiry",
        }
    }
}

/// Extracted field values; missing labels yield empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: String,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Place of Birth")]
    pub place_of_birth: String,
    #[serde(rename = "Date of Expiry")]
    pub date_of_expiry: String,
}

impl FieldRecord {
    /// Read every field from its fixed label
    pub fn from_detections(detections: &DetectionSet) -> Self {
        let lookup = |field: IdentityField| {
            detections
                .text(field.label())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            first_name: lookup(IdentityField::FirstName),
            last_name: lookup(IdentityField::LastName),
            date_of_birth: lookup(IdentityField::DateOfBirth),
            nationality: lookup(IdentityField::Nationality),
            place_of_birth: lookup(IdentityField::PlaceOfBirth),
            date_of_expiry: lookup(IdentityField::DateOfExpiry),
        }
    }

    pub fn get(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::FirstName => &self.first_name,
            IdentityField::LastName => &self.last_name,
            IdentityField::DateOfBirth => &self.date_of_birth,
            IdentityField::Nationality => &self.nationality,
            IdentityField::PlaceOfBirth => &self.place_of_birth,
            IdentityField::DateOfExpiry => &self.date_of_expiry,
        }
    }

    /// `(field, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (IdentityField, &str)> + '_ {
        IdentityField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::PixelBox;

    /// A set whose label N carries the text "T{N}", with overrides
    fn numbered_set(count: u32, overrides: &[(u32, &str)]) -> DetectionSet {
        DetectionSet::from_entries((1..=count).map(|label| {
            let text = overrides
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, t)| t.to_string())
                .unwrap_or_else(|| format!("T{}", label));
            (text, PixelBox::new(0.0, 0.0, 1.0, 1.0))
        }))
    }

    #[test]
    fn test_reads_fixed_labels() {
        let set = numbered_set(
            60,
            &[
                (29, "MUSTERMANN"),
                (33, "ERIKA"),
                (42, "12.08.1983"),
                (43, "DEUTSCH"),
                (49, "BERLIN"),
                (56, "01.08.2031"),
            ],
        );

        let record = FieldRecord::from_detections(&set);
        assert_eq!(record.first_name, "ERIKA");
        assert_eq!(record.last_name, "MUSTERMANN");
        assert_eq!(record.date_of_birth, "12.08.1983");
        assert_eq!(record.nationality, "DEUTSCH");
        assert_eq!(record.place_of_birth, "BERLIN");
        assert_eq!(record.date_of_expiry, "01.08.2031");
    }

    #[test]
    fn test_missing_labels_are_empty() {
        let record = FieldRecord::from_detections(&numbered_set(10, &[]));
        assert_eq!(record.get(IdentityField::DateOfExpiry), "");
        assert_eq!(record, FieldRecord::default());
    }

    #[test]
    fn test_partial_coverage() {
        // Labels up to 45: Place of Birth (49) and Date of Expiry (56) absent
        let record = FieldRecord::from_detections(&numbered_set(45, &[]));
        assert_eq!(record.first_name, "T33");
        assert_eq!(record.nationality, "T43");
        assert_eq!(record.place_of_birth, "");
        assert_eq!(record.date_of_expiry, "");
    }

    #[test]
    fn test_unmapped_label_does_not_affect_record() {
        let a = numbered_set(60, &[(7, "FOO")]);
        let b = numbered_set(60, &[(7, "BAR")]);

        assert_eq!(
            FieldRecord::from_detections(&a),
            FieldRecord::from_detections(&b)
        );
    }

    #[test]
    fn test_serializes_with_display_names_in_order() {
        let record = FieldRecord::from_detections(&numbered_set(33, &[(33, "ERIKA")]));
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.starts_with("{\"First Name\":\"ERIKA\",\"Last Name\":\"T29\""));
        assert!(json.ends_with("\"Date of Expiry\":\"\"}"));
    }

    #[test]
    fn test_iter_matches_display_names() {
        let record = FieldRecord::default();
        let names: Vec<&str> = record.iter().map(|(f, _)| f.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "First Name",
                "Last Name",
                "Date of Birth",
                "Nationality",
                "Place of Birth",
                "Date of Expiry"
            ]
        );
    }
}
