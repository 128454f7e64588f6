//! Built-in example documents, used by the CLI when stdin is empty.

use super::{Applicant, CVData, Contact, CoverLetterData, Education, Experience, Project, Recipient, SkillGroup, SocialLink};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CVData {
    pub fn sample() -> Self {
        Self {
            full_name: "Jane Doe".into(),
            title: "Senior Software Engineer".into(),
            summary: "Backend engineer with eight years of experience building reliable \
                      services, document pipelines and developer tooling."
                .into(),
            technical_skills: vec![
                SkillGroup { label: "Languages".into(), items: strings(&["Rust", "TypeScript", "SQL"]) },
                SkillGroup { label: "Infrastructure".into(), items: strings(&["PostgreSQL", "Docker", "Kubernetes"]) },
            ],
            soft_skills: strings(&["Mentoring", "Technical writing"]),
            languages: strings(&["English", "German"]),
            interests: strings(&["Climbing", "Typography"]),
            experience: vec![
                Experience {
                    company: "Northwind GmbH".into(),
                    role: "Senior Software Engineer".into(),
                    location: Some("Berlin".into()),
                    start_date: "03/2021".into(),
                    end_date: "Present".into(),
                    highlights: strings(&[
                        "Designed a PDF rendering service handling 40k documents per day.",
                        "Cut p99 latency of the billing API by 60%.",
                        "Introduced contract tests across six teams.",
                    ]),
                    website: Some("https://example.com/northwind".into()),
                },
                Experience {
                    company: "Contoso Labs".into(),
                    role: "Software Engineer".into(),
                    location: None,
                    start_date: "09/2017".into(),
                    end_date: "02/2021".into(),
                    highlights: strings(&["Built the event ingestion pipeline."]),
                    website: None,
                },
            ],
            education: vec![Education {
                institution: "Technische Universität Berlin".into(),
                program: "M.Sc. Computer Science".into(),
                start_year: "2015".into(),
                end_year: "2017".into(),
                details: strings(&["Thesis on incremental layout algorithms"]),
            }],
            projects: vec![
                Project {
                    title: "Typesetter".into(),
                    summary: "A small typesetting engine with variable font support.".into(),
                    tech_stack: strings(&["Rust", "HarfBuzz"]),
                    year: Some("2024".into()),
                    case_study_url: Some("https://example.com/projects/typesetter".into()),
                    live_url: None,
                    thumbnail: None,
                },
                Project {
                    title: "Trailhead".into(),
                    summary: "Route planning for alpine tours.".into(),
                    tech_stack: strings(&["TypeScript", "PostGIS"]),
                    year: Some("2022".into()),
                    case_study_url: None,
                    live_url: Some("https://example.com/trailhead".into()),
                    thumbnail: None,
                },
            ],
            contact: Contact {
                email: "jane.doe@example.com".into(),
                phone: "+49 30 1234567".into(),
                location: "Berlin, Germany".into(),
                website: Some("https://example.com".into()),
                linktree: Some("https://linktr.ee/janedoe".into()),
                socials: vec![
                    SocialLink { label: "LinkedIn".into(), url: "https://www.linkedin.com/in/janedoe".into() },
                    SocialLink { label: "GitHub".into(), url: "https://github.com/janedoe".into() },
                ],
            },
        }
    }
}

impl CoverLetterData {
    pub fn sample() -> Self {
        Self {
            applicant: Applicant {
                full_name: "Jane Doe".into(),
                street: Some("Hauptstraße 1".into()),
                postal_code: Some("10115".into()),
                city: Some("Berlin".into()),
                phone: "+49 30 1234567".into(),
                email: "jane.doe@example.com".into(),
                linktree: Some("https://linktr.ee/janedoe".into()),
                socials: vec![SocialLink {
                    label: "LinkedIn".into(),
                    url: "https://www.linkedin.com/in/janedoe".into(),
                }],
            },
            recipient: Recipient {
                company: "Example AG".into(),
                contact_person: Some("Frau Muster".into()),
                role: "Senior Backend Engineer".into(),
                address_lines: strings(&["Musterweg 5"]),
                city: Some("80331 München".into()),
            },
            job_url: Some("https://example.com/jobs/42".into()),
            subject: String::new(),
            date: "19. Oktober 2026".into(),
            body: "Sehr geehrte Frau Muster,\n\n\
                   mit großem Interesse habe ich Ihre Ausschreibung gelesen.\n\
                   In den letzten Jahren habe ich Dokument-Pipelines und verteilte Dienste gebaut.\n\
                   Ich freue mich auf ein persönliches Gespräch."
                .into(),
        }
    }
}
