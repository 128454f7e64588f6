use super::{SocialLink, require, InvalidPayloadError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterData {
    pub applicant: Applicant,
    pub recipient: Recipient,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub subject: String,
    /// Display string, shown as given.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linktree: Option<String>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub company: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub role: String,
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl CoverLetterData {
    pub fn validate(&self) -> Result<(), InvalidPayloadError> {
        require(&self.applicant.full_name, "applicant.fullName")?;
        require(&self.body, "body")
    }

    /// One paragraph per non-empty line of `body`.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

impl Applicant {
    /// "Street, 12345 City" from whichever address parts are present.
    pub fn address_line(&self) -> Option<String> {
        let locality = [super::non_blank(&self.postal_code), super::non_blank(&self.city)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let parts: Vec<&str> = [super::non_blank(&self.street), Some(locality.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(body: &str) -> CoverLetterData {
        CoverLetterData {
            body: body.to_string(),
            ..CoverLetterData::default()
        }
    }

    #[test]
    fn empty_lines_are_dropped() {
        assert_eq!(letter("A\n\nB").paragraphs(), vec!["A", "B"]);
        assert_eq!(letter("A\r\n  \r\nB\r\n").paragraphs(), vec!["A", "B"]);
        assert!(letter("").paragraphs().is_empty());
    }

    #[test]
    fn paragraph_count_matches_non_empty_lines() {
        for body in ["one", "a\nb\nc", "\n\nx\n\n", "x\n \ty\n"] {
            let expected = body.split('\n').filter(|l| !l.trim().is_empty()).count();
            assert_eq!(letter(body).paragraphs().len(), expected, "{:?}", body);
        }
    }

    #[test]
    fn address_line_skips_missing_parts() {
        let mut applicant = Applicant::default();
        assert_eq!(applicant.address_line(), None);
        applicant.city = Some("Berlin".into());
        assert_eq!(applicant.address_line().as_deref(), Some("Berlin"));
        applicant.postal_code = Some("10115".into());
        applicant.street = Some("Hauptstr. 1".into());
        assert_eq!(applicant.address_line().as_deref(), Some("Hauptstr. 1, 10115 Berlin"));
    }
}
