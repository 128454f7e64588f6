use super::{block, contact_row, flex, paragraph, ComposeError, ContactLinks, ContactStyles};
use crate::icons::{icon_link_with, IconKind};
use crate::model::{non_blank, CoverLetterData};
use crate::theme::{letter_theme, LetterTheme, CONTACT_ICON_SIZE, LINK_ICON_SIZE};
use dossier_idf::{IRNode, InlineNode, NodeMetadata};

const CLOSING: &str = "Mit freundlichen Grüßen";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterOptions {
    pub signature_url: Option<String>,
}

/// The subject shown for every letter, derived from the recipient's role.
pub fn subject_line(data: &CoverLetterData) -> String {
    format!("Bewerbung als {}", data.recipient.role.trim())
}

/// Lays out a cover letter. Pagination is left to natural flow; only the
/// subject row and the closing block refuse to split across pages.
pub fn compose_cover_letter(data: &CoverLetterData, options: &LetterOptions) -> Result<IRNode, ComposeError> {
    data.validate()?;
    let theme = letter_theme();

    let mut children = vec![
        header(theme, data),
        block(NodeMetadata::styled(&theme.divider), vec![]),
        recipient(theme, data),
        subject_row(theme, data),
    ];

    let subject = subject_line(data);
    let secondary = data.subject.trim();
    if !secondary.is_empty() && secondary != subject {
        children.push(paragraph(&theme.secondary_subject, secondary));
    }

    children.extend(data.paragraphs().into_iter().enumerate().map(|(i, text)| IRNode::Paragraph {
        meta: NodeMetadata::styled(&theme.body).with_id(format!("body-paragraph-{}", i)),
        children: vec![InlineNode::text(text.trim())],
    }));

    children.push(closing(theme, data, options));

    Ok(IRNode::Root(vec![block(NodeMetadata::styled(&theme.page), children)]))
}

fn header(theme: &LetterTheme, data: &CoverLetterData) -> IRNode {
    let applicant = &data.applicant;
    let styles = ContactStyles {
        row: &theme.contact_row,
        item: &theme.contact_item,
        link: &theme.contact_link,
        icon_size: CONTACT_ICON_SIZE,
    };
    let links = ContactLinks {
        website: None,
        linktree: non_blank(&applicant.linktree),
        socials: &applicant.socials,
    };

    let mut main = vec![paragraph(&theme.name, applicant.full_name.trim())];
    if let Some(address) = applicant.address_line() {
        main.push(paragraph(&theme.address, address));
    }
    main.push(contact_row(&styles, &[applicant.phone.as_str(), applicant.email.as_str()], &links));

    let mut columns = vec![block(NodeMetadata::styled(&theme.header_main), main)];
    if !data.date.trim().is_empty() {
        columns.push(IRNode::Paragraph {
            meta: NodeMetadata::styled(&theme.date).with_id("date"),
            children: vec![InlineNode::text(data.date.trim())],
        });
    }
    flex(NodeMetadata::styled(&theme.header).with_id("header"), columns)
}

fn recipient(theme: &LetterTheme, data: &CoverLetterData) -> IRNode {
    let recipient = &data.recipient;
    let mut lines = vec![paragraph(&theme.recipient_company, recipient.company.trim())];
    if let Some(person) = non_blank(&recipient.contact_person) {
        lines.push(paragraph(&theme.recipient_line, person));
    }
    lines.extend(
        recipient
            .address_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| paragraph(&theme.recipient_line, line)),
    );
    if let Some(city) = non_blank(&recipient.city) {
        lines.push(paragraph(&theme.recipient_line, city));
    }
    block(NodeMetadata::styled(&theme.recipient).with_id("recipient"), lines)
}

fn subject_row(theme: &LetterTheme, data: &CoverLetterData) -> IRNode {
    let mut children = vec![paragraph(&theme.subject, subject_line(data))];
    if let (Some(url), Some(icon)) = (non_blank(&data.job_url), IconKind::External.icon()) {
        let meta = NodeMetadata::default().with_id("subject-job-link");
        children.push(icon_link_with(meta, icon, url, LINK_ICON_SIZE));
    }
    flex(NodeMetadata::styled(&theme.subject_row).with_id("subject"), children)
}

fn closing(theme: &LetterTheme, data: &CoverLetterData, options: &LetterOptions) -> IRNode {
    let mut children = vec![paragraph(&theme.recipient_line, CLOSING)];
    if let Some(src) = non_blank(&options.signature_url) {
        children.push(IRNode::Image {
            meta: NodeMetadata::styled(&theme.signature).with_id("signature"),
            src: src.to_string(),
        });
    }
    children.push(paragraph(&theme.signature_name, data.applicant.full_name.trim()));
    block(NodeMetadata::styled(&theme.closing).with_id("closing"), children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::test_helpers::{count_kind, node};
    use crate::model::{Applicant, Recipient};

    fn letter(body: &str, job_url: Option<&str>) -> CoverLetterData {
        CoverLetterData {
            applicant: Applicant {
                full_name: "Jane Doe".into(),
                city: Some("Berlin".into()),
                email: "j@x.com".into(),
                ..Applicant::default()
            },
            recipient: Recipient {
                company: "ACME GmbH".into(),
                role: "Engineer".into(),
                address_lines: vec!["Hauptstr. 1".into(), " ".into()],
                ..Recipient::default()
            },
            job_url: job_url.map(str::to_string),
            subject: String::new(),
            date: "1. Januar 2026".into(),
            body: body.into(),
        }
    }

    fn paragraphs(tree: &IRNode) -> usize {
        tree.find_all(|n| n.id().is_some_and(|id| id.starts_with("body-paragraph-"))).len()
    }

    #[test]
    fn one_paragraph_per_non_empty_line() {
        let options = LetterOptions::default();
        assert_eq!(paragraphs(&compose_cover_letter(&letter("A\n\nB", None), &options).unwrap()), 2);
        assert_eq!(paragraphs(&compose_cover_letter(&letter("A\r\nB\r\n\r\nC", None), &options).unwrap()), 3);
        assert_eq!(paragraphs(&compose_cover_letter(&letter("\nonly\n", None), &options).unwrap()), 1);
    }

    #[test]
    fn job_url_adds_the_subject_icon() {
        let tree = compose_cover_letter(&letter("A", Some("https://jobs.example/1")), &LetterOptions::default()).unwrap();
        let subject = node(&tree, "subject");
        assert_eq!(subject.text_content(), "Bewerbung als Engineer");
        assert_eq!(count_kind(subject, "vector"), 1);
        match node(&tree, "subject-job-link") {
            IRNode::Link { href, .. } => assert_eq!(href, "https://jobs.example/1"),
            other => panic!("expected a link, got {:?}", other.kind()),
        }
    }

    #[test]
    fn no_job_url_means_no_icon() {
        for job_url in [None, Some("  ")] {
            let tree = compose_cover_letter(&letter("A", job_url), &LetterOptions::default()).unwrap();
            let subject = node(&tree, "subject");
            assert_eq!(count_kind(subject, "vector"), 0);
            assert!(tree.find_by_id("subject-job-link").is_none());
        }
    }

    #[test]
    fn closing_and_signature() {
        let tree = compose_cover_letter(&letter("A", None), &LetterOptions::default()).unwrap();
        let closing = node(&tree, "closing");
        assert_eq!(closing.text_content(), "Mit freundlichen Grüßen\nJane Doe");
        assert_eq!(count_kind(&tree, "image"), 0);

        let options = LetterOptions { signature_url: Some("sig.png".into()) };
        let tree = compose_cover_letter(&letter("A", None), &options).unwrap();
        assert_eq!(tree.image_sources(), vec!["sig.png"]);
    }

    #[test]
    fn recipient_skips_blank_lines() {
        let tree = compose_cover_letter(&letter("A", None), &LetterOptions::default()).unwrap();
        assert_eq!(node(&tree, "recipient").text_content(), "ACME GmbH\nHauptstr. 1");
    }

    #[test]
    fn distinct_subject_is_shown_below() {
        let mut data = letter("A", None);
        data.subject = "Initiativbewerbung".into();
        let tree = compose_cover_letter(&data, &LetterOptions::default()).unwrap();
        assert!(tree.text_content().contains("Initiativbewerbung"));

        data.subject = "Bewerbung als Engineer".into();
        let tree = compose_cover_letter(&data, &LetterOptions::default()).unwrap();
        assert_eq!(tree.text_content().matches("Bewerbung als Engineer").count(), 1);
    }

    #[test]
    fn header_has_name_address_and_date() {
        let tree = compose_cover_letter(&letter("A", None), &LetterOptions::default()).unwrap();
        let header = node(&tree, "header").text_content();
        assert!(header.starts_with("Jane Doe\nBerlin"));
        assert!(header.ends_with("1. Januar 2026"));
    }

    #[test]
    fn empty_body_is_rejected() {
        assert!(compose_cover_letter(&letter(" ", None), &LetterOptions::default()).is_err());
    }
}
