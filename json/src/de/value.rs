//! DICOM value deserialization
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DicomJsonPerson {
    #[serde(rename = "Alphabetic", default)]
    alphabetic: String,
    #[serde(rename = "Ideographic")]
    ideographic: Option<String>,
    #[serde(rename = "Phonetic")]
    phonetic: Option<String>,
}

impl fmt::Display for DicomJsonPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DicomJsonPerson {
                alphabetic,
                ideographic: None,
                phonetic: None,
            } => write!(f, "{alphabetic}"),
            DicomJsonPerson {
                alphabetic,
                ideographic: Some(ideographic),
                phonetic: None,
            } => write!(f, "{alphabetic}={ideographic}"),
            DicomJsonPerson {
                alphabetic,
                ideographic: None,
                phonetic: Some(phonetic),
            } => write!(f, "{alphabetic}=={phonetic}"),
            DicomJsonPerson {
                alphabetic,
                ideographic: Some(ideographic),
                phonetic: Some(phonetic),
            } => write!(f, "{alphabetic}={ideographic}={phonetic}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkDataUri(String);

impl fmt::Display for BulkDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText<N> {
    Number(N),
    Text(String),
}

impl<N> NumberOrText<N>
where
    N: Clone,
    N: FromStr,
{
    pub fn to_num(&self) -> Result<N, <N as FromStr>::Err> {
        match self {
            NumberOrText::Number(num) => Ok(num.clone()),
            NumberOrText::Text(text) => text.trim().parse(),
        }
    }
}

impl<N> std::fmt::Display for NumberOrText<N>
where
    N: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberOrText::Number(number) => std::fmt::Display::fmt(number, f),
            NumberOrText::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DicomJsonPerson, NumberOrText};

    #[test]
    fn person_names_join_component_groups() {
        let p: DicomJsonPerson = serde_json::from_str(r#"{"Alphabetic": "Doe^John"}"#).unwrap();
        assert_eq!(p.to_string(), "Doe^John");

        let p: DicomJsonPerson = serde_json::from_str(
            r#"{"Alphabetic": "Yamada^Tarou", "Ideographic": "山田^太郎", "Phonetic": "やまだ^たろう"}"#,
        )
        .unwrap();
        assert_eq!(p.to_string(), "Yamada^Tarou=山田^太郎=やまだ^たろう");

        let p: DicomJsonPerson = serde_json::from_str(r#"{"Phonetic": "やまだ^たろう"}"#).unwrap();
        assert_eq!(p.to_string(), "==やまだ^たろう");
    }

    #[test]
    fn numbers_or_text() {
        let n: NumberOrText<f64> = serde_json::from_str("2.5").unwrap();
        assert_eq!(n.to_num(), Ok(2.5));

        let n: NumberOrText<f64> = serde_json::from_str("\"-inf\"").unwrap();
        assert_eq!(n.to_num(), Ok(f64::NEG_INFINITY));

        let n: NumberOrText<i64> = serde_json::from_str("\" 12 \"").unwrap();
        assert_eq!(n.to_num(), Ok(12));
        assert_eq!(n.to_string(), " 12 ");
    }
}
