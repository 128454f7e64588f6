use super::{SocialLink, optional_year, require, year, InvalidPayloadError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CVData {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub technical_skills: Vec<SkillGroup>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    pub label: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    /// A date or `"Present"`; shown as given.
    pub end_date: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub program: String,
    #[serde(deserialize_with = "year")]
    pub start_year: String,
    #[serde(deserialize_with = "year")]
    pub end_year: String,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "optional_year")]
    pub year: Option<String>,
    #[serde(default)]
    pub case_study_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    /// Image reference: URL, data URI or path below the asset root.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linktree: Option<String>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

impl CVData {
    pub fn validate(&self) -> Result<(), InvalidPayloadError> {
        require(&self.full_name, "fullName")
    }
}

impl Project {
    /// Where the project's link icon points: the case study, else the live site.
    pub fn link(&self) -> Option<&str> {
        super::non_blank(&self.case_study_url).or_else(|| super::non_blank(&self.live_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn years_accept_strings_and_numbers() {
        let education: Education = serde_json::from_value(json!({
            "institution": "TU Berlin", "program": "CS", "startYear": 2014, "endYear": "2018"
        }))
        .unwrap();
        assert_eq!(education.start_year, "2014");
        assert_eq!(education.end_year, "2018");
        assert!(education.details.is_empty());

        let project: Project = serde_json::from_value(json!({"title": "P", "year": 2023})).unwrap();
        assert_eq!(project.year.as_deref(), Some("2023"));
        let project: Project = serde_json::from_value(json!({"title": "P", "year": null})).unwrap();
        assert_eq!(project.year, None);
    }

    #[test]
    fn project_link_prefers_case_study() {
        let mut project = Project {
            title: "P".into(),
            live_url: Some("https://live".into()),
            ..Project::default()
        };
        assert_eq!(project.link(), Some("https://live"));
        project.case_study_url = Some("https://case".into());
        assert_eq!(project.link(), Some("https://case"));
        project.case_study_url = Some(" ".into());
        assert_eq!(project.link(), Some("https://live"));
    }

    #[test]
    fn field_names_are_camel_case() {
        let cv: CVData = serde_json::from_value(json!({
            "fullName": "Jane", "technicalSkills": [{"label": "Rust", "items": ["tokio"]}],
            "softSkills": ["Calm"], "contact": {"email": "a@b.c", "socials": [{"label": "GitHub", "url": "u"}]}
        }))
        .unwrap();
        assert_eq!(cv.technical_skills[0].items, vec!["tokio"]);
        assert_eq!(cv.soft_skills, vec!["Calm"]);
        assert_eq!(cv.contact.socials[0].label, "GitHub");
    }
}
