use super::{
    block, comma_joined, contact_row, flex, heading, hyperlink, paragraph, span, ComposeError, ContactLinks,
    ContactStyles,
};
use crate::icons::{icon_link, IconKind};
use crate::model::{non_blank, CVData, Education, Experience, Project};
use crate::theme::{cv_theme, CvTheme, CONTACT_ICON_SIZE, LINK_ICON_SIZE};
use dossier_idf::{IRNode, InlineNode, NodeMetadata};

/// Target of the fixed "See all projects" link next to the projects heading.
pub const ALL_PROJECTS_URL: &str = "https://example.com/projects";

/// Highlights shown per experience entry; the rest are dropped.
const MAX_HIGHLIGHTS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvOptions {
    pub portrait_url: Option<String>,
    /// Footer date shown verbatim instead of today's date.
    pub creation_date: Option<String>,
}

/// The footer date: the override as given, or today as `19 October 2026`.
pub fn status_date(creation_date: Option<&str>) -> String {
    match creation_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => date.to_string(),
        None => chrono::Local::now().format("%-d %B %Y").to_string(),
    }
}

pub fn compose_cv(data: &CVData, options: &CvOptions) -> Result<IRNode, ComposeError> {
    data.validate()?;
    let theme = cv_theme();

    let mut children = vec![header(theme, data, options), block(NodeMetadata::styled(&theme.divider), vec![])];

    if !data.summary.trim().is_empty() {
        children.push(section(theme, "section-summary", "Summary", vec![paragraph(&theme.body, data.summary.trim())]));
    }

    let has_experience = !data.experience.is_empty();
    if has_experience {
        let entries = data
            .experience
            .iter()
            .enumerate()
            .map(|(i, entry)| experience_entry(theme, i, entry))
            .collect();
        children.push(section(theme, "section-experience", "Experience", entries));
    }

    let mut later = Vec::new();
    if !data.education.is_empty() {
        let entries = data
            .education
            .iter()
            .enumerate()
            .map(|(i, entry)| education_entry(theme, i, entry))
            .collect();
        later.push(section(theme, "section-education", "Education", entries));
    }

    let skill_groups: Vec<IRNode> = data
        .technical_skills
        .iter()
        .filter(|group| !group.label.trim().is_empty() || !group.items.is_empty())
        .map(|group| {
            let mut inlines = vec![span(&theme.skill_label, format!("{}:", group.label.trim()))];
            let items = comma_joined(&group.items);
            if !items.is_empty() {
                inlines.push(InlineNode::text(format!(" {}", items)));
            }
            IRNode::Paragraph {
                meta: NodeMetadata::styled(&theme.body),
                children: inlines,
            }
        })
        .collect();
    if !skill_groups.is_empty() {
        later.push(section(
            theme,
            "section-technical-skills",
            "Technical Skills",
            vec![flex(NodeMetadata::styled(&theme.skills_row), skill_groups)],
        ));
    }

    if let Some(node) = joined_section(theme, "section-soft-skills", "Soft Skills", &data.soft_skills) {
        later.push(node);
    }

    if !data.projects.is_empty() {
        later.push(projects_section(theme, &data.projects));
    }

    if let Some(node) = joined_section(theme, "section-languages", "Languages", &data.languages) {
        later.push(node);
    }
    if let Some(node) = joined_section(theme, "section-interests", "Interests", &data.interests) {
        later.push(node);
    }

    // The break only separates experience from what follows; never a trailing blank page.
    if has_experience && !later.is_empty() {
        children.push(IRNode::PageBreak);
    }
    children.extend(later);

    children.push(block(
        NodeMetadata::styled(&theme.footer).with_id("footer"),
        vec![paragraph(&theme.footer, format!("Status: {}", status_date(options.creation_date.as_deref())))],
    ));

    Ok(IRNode::Root(vec![block(NodeMetadata::styled(&theme.page), children)]))
}

fn header(theme: &CvTheme, data: &CVData, options: &CvOptions) -> IRNode {
    let contact = &data.contact;
    let styles = ContactStyles {
        row: &theme.contact_row,
        item: &theme.contact_item,
        link: &theme.contact_link,
        icon_size: CONTACT_ICON_SIZE,
    };
    let links = ContactLinks {
        website: non_blank(&contact.website),
        linktree: non_blank(&contact.linktree),
        socials: &contact.socials,
    };

    let mut main = vec![paragraph(&theme.name, data.full_name.trim())];
    if !data.title.trim().is_empty() {
        main.push(paragraph(&theme.title, data.title.trim()));
    }
    main.push(contact_row(
        &styles,
        &[contact.email.as_str(), contact.phone.as_str(), contact.location.as_str()],
        &links,
    ));

    let mut columns = vec![block(NodeMetadata::styled(&theme.header_main), main)];
    if let Some(src) = non_blank(&options.portrait_url) {
        columns.push(IRNode::Image {
            meta: NodeMetadata::styled(&theme.portrait).with_id("portrait"),
            src: src.to_string(),
        });
    }
    flex(NodeMetadata::styled(&theme.header).with_id("header"), columns)
}

fn section(theme: &CvTheme, id: &str, title: &str, mut content: Vec<IRNode>) -> IRNode {
    content.insert(0, heading(&theme.section_title, title));
    block(NodeMetadata::styled(&theme.section).with_id(id), content)
}

/// A comma-joined one-line section, or nothing when every entry is blank.
fn joined_section(theme: &CvTheme, id: &str, title: &str, items: &[String]) -> Option<IRNode> {
    let text = comma_joined(items);
    (!text.is_empty()).then(|| section(theme, id, title, vec![paragraph(&theme.body, text)]))
}

fn bullet(theme: &CvTheme, id: String, text: &str) -> IRNode {
    flex(
        NodeMetadata::styled(&theme.bullet_row).with_id(id),
        vec![paragraph(&theme.bullet_marker, "•"), paragraph(&theme.bullet_content, text.trim())],
    )
}

fn experience_entry(theme: &CvTheme, index: usize, entry: &Experience) -> IRNode {
    let mut meta_text = format!("{} – {}", entry.start_date.trim(), entry.end_date.trim());
    if let Some(location) = non_blank(&entry.location) {
        meta_text.push_str(" · ");
        meta_text.push_str(location);
    }
    let mut meta_row = vec![paragraph(&theme.muted, meta_text)];
    if let (Some(website), Some(icon)) = (non_blank(&entry.website), IconKind::External.icon()) {
        meta_row.push(icon_link(icon, website, LINK_ICON_SIZE));
    }

    let mut children = vec![
        paragraph(&theme.company, entry.company.trim()),
        paragraph(&theme.role, entry.role.trim()),
        flex(NodeMetadata::styled(&theme.meta_row), meta_row),
    ];
    children.extend(
        entry
            .highlights
            .iter()
            .take(MAX_HIGHLIGHTS)
            .enumerate()
            .map(|(j, text)| bullet(theme, format!("experience-{}-highlight-{}", index, j), text)),
    );
    block(NodeMetadata::styled(&theme.entry).with_id(format!("experience-{}", index)), children)
}

fn education_entry(theme: &CvTheme, index: usize, entry: &Education) -> IRNode {
    let mut children = vec![
        paragraph(&theme.company, entry.institution.trim()),
        paragraph(&theme.role, entry.program.trim()),
        paragraph(&theme.muted, format!("{} – {}", entry.start_year.trim(), entry.end_year.trim())),
    ];
    children.extend(
        entry
            .details
            .iter()
            .filter(|d| !d.trim().is_empty())
            .enumerate()
            .map(|(j, text)| bullet(theme, format!("education-{}-detail-{}", index, j), text)),
    );
    block(NodeMetadata::styled(&theme.entry).with_id(format!("education-{}", index)), children)
}

fn projects_section(theme: &CvTheme, projects: &[Project]) -> IRNode {
    let title_row = flex(
        NodeMetadata::styled(&theme.title_row),
        vec![
            heading(&theme.section_title, "Matching Projects"),
            IRNode::Paragraph {
                meta: NodeMetadata::styled(&theme.all_projects_link).with_id("all-projects-link"),
                children: vec![hyperlink(ALL_PROJECTS_URL, "See all projects")],
            },
        ],
    );
    let cards = projects
        .iter()
        .enumerate()
        .map(|(i, project)| project_card(theme, i, project))
        .collect();
    block(
        NodeMetadata::styled(&theme.section).with_id("section-projects"),
        vec![title_row, flex(NodeMetadata::styled(&theme.card_grid), cards)],
    )
}

fn project_card(theme: &CvTheme, index: usize, project: &Project) -> IRNode {
    let mut children = Vec::new();
    if let Some(src) = non_blank(&project.thumbnail) {
        children.push(IRNode::Image {
            meta: NodeMetadata::styled(&theme.card_thumbnail),
            src: src.to_string(),
        });
    }
    children.push(paragraph(&theme.card_title, project.title.trim()));

    let meta_text = [non_blank(&project.year).map(str::to_string), Some(comma_joined(&project.tech_stack))]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    let mut meta_row = Vec::new();
    if !meta_text.is_empty() {
        meta_row.push(paragraph(&theme.muted, meta_text));
    }
    if let (Some(link), Some(icon)) = (project.link(), IconKind::External.icon()) {
        meta_row.push(icon_link(icon, link, LINK_ICON_SIZE));
    }
    if !meta_row.is_empty() {
        children.push(flex(NodeMetadata::styled(&theme.meta_row), meta_row));
    }

    if !project.summary.trim().is_empty() {
        children.push(paragraph(&theme.body, project.summary.trim()));
    }
    block(NodeMetadata::styled(&theme.card).with_id(format!("project-{}", index)), children)
}
