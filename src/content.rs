use std::sync::LazyLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::navigation::SECTION_IDS;

pub static PROJECTS: LazyLock<Vec<Project>> =
    LazyLock::new(|| load("projects", include_str!("../content/projects.json")));
pub static TESTIMONIALS: LazyLock<Vec<Testimonial>> =
    LazyLock::new(|| load("testimonials", include_str!("../content/testimonials.json")));
pub static SKILLS: LazyLock<Vec<Skill>> =
    LazyLock::new(|| load("skills", include_str!("../content/skills.json")));

fn load<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::error!("failed to parse {name} content: {e}");
        Vec::new()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Project {
    pub fn href(&self) -> String {
        format!("/projects/{}", self.id)
    }

    /// Cards only have room for a few tags.
    pub fn card_tech(&self) -> &[String] {
        &self.tech[..self.tech.len().min(3)]
    }
}

pub fn project(slug: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == slug)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub emoji: String,
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub section: &'static str,
    pub label: &'static str,
}

impl NavItem {
    pub fn href(&self) -> String {
        format!("#{}", self.section)
    }
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        section: SECTION_IDS[0],
        label: "ABOUT",
    },
    NavItem {
        section: SECTION_IDS[1],
        label: "PROJECTS",
    },
    NavItem {
        section: SECTION_IDS[2],
        label: "SKILLS",
    },
    NavItem {
        section: SECTION_IDS[3],
        label: "CONTACT",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_parses() {
        let projects: Vec<Project> =
            serde_json::from_str(include_str!("../content/projects.json")).unwrap();
        assert!(!projects.is_empty());
        let testimonials: Vec<Testimonial> =
            serde_json::from_str(include_str!("../content/testimonials.json")).unwrap();
        assert!(!testimonials.is_empty());
        let skills: Vec<Skill> =
            serde_json::from_str(include_str!("../content/skills.json")).unwrap();
        assert!(!skills.is_empty());
    }

    #[test]
    fn test_project_lookup() {
        let alpha = project("project-alpha").unwrap();
        assert_eq!(alpha.title, "Project Alpha");
        assert_eq!(alpha.href(), "/projects/project-alpha");
        assert!(project("missing").is_none());
    }

    #[test]
    fn test_project_ids_are_unique() {
        let mut ids = PROJECTS.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_card_tech_is_capped() {
        let mut p = project("project-beta").unwrap().clone();
        assert_eq!(p.card_tech().len(), 3);
        p.tech.truncate(1);
        assert_eq!(p.card_tech(), ["Rust".to_string()]);
    }

    #[test]
    fn test_nav_items_cover_known_sections() {
        let sections = NAV_ITEMS.iter().map(|i| i.section).collect::<Vec<_>>();
        assert_eq!(sections, SECTION_IDS);
        assert_eq!(NAV_ITEMS[3].href(), "#contact-form");
    }

    #[test]
    fn test_optional_fields_default() {
        let t: Testimonial = serde_json::from_str(r#"{"id":"x","name":"A","text":"hi"}"#).unwrap();
        assert_eq!(t.role, None);
    }
}
