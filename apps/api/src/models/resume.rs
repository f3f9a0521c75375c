use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A résumé as handed over by ingestion or generation. Read-only to the analysis core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    /// Document order. Ordering checks depend on it.
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<SectionContent>,
}

impl Section {
    /// The section type after reconciling the `type` tag with its human-readable title.
    /// A known tag wins; a custom tag falls back to whatever the title maps to.
    pub fn effective_type(&self) -> SectionType {
        match &self.kind {
            SectionType::Custom(raw) => {
                let from_tag = SectionType::from_label(raw);
                if from_tag.is_known() {
                    return from_tag;
                }
                self.title
                    .as_deref()
                    .map(SectionType::from_label)
                    .unwrap_or_else(|| self.kind.clone())
            }
            known => known.clone(),
        }
    }

    pub fn items(&self) -> &[Item] {
        match &self.content {
            Some(SectionContent::Items(list)) => &list.items,
            _ => &[],
        }
    }

    pub fn has_content(&self) -> bool {
        match &self.content {
            None => false,
            Some(SectionContent::Text(t)) => !t.text.trim().is_empty(),
            Some(SectionContent::Items(list)) => !list.items.is_empty(),
            Some(SectionContent::Fields(fields)) => !fields.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionType {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Achievements,
    Languages,
    Volunteering,
    Footer,
    Custom(String),
}

/// Heading synonyms seen in the wild, normalized to a known section type.
const SECTION_SYNONYMS: &[(&str, SectionType)] = &[
    ("header", SectionType::Header),
    ("contact", SectionType::Header),
    ("contact information", SectionType::Header),
    ("contact info", SectionType::Header),
    ("personal information", SectionType::Header),
    ("summary", SectionType::Summary),
    ("professional summary", SectionType::Summary),
    ("profile", SectionType::Summary),
    ("professional profile", SectionType::Summary),
    ("objective", SectionType::Summary),
    ("career objective", SectionType::Summary),
    ("about me", SectionType::Summary),
    ("experience", SectionType::Experience),
    ("work experience", SectionType::Experience),
    ("professional experience", SectionType::Experience),
    ("employment", SectionType::Experience),
    ("employment history", SectionType::Experience),
    ("work history", SectionType::Experience),
    ("career history", SectionType::Experience),
    ("relevant experience", SectionType::Experience),
    ("education", SectionType::Education),
    ("academic background", SectionType::Education),
    ("education and training", SectionType::Education),
    ("skills", SectionType::Skills),
    ("technical skills", SectionType::Skills),
    ("core competencies", SectionType::Skills),
    ("competencies", SectionType::Skills),
    ("key skills", SectionType::Skills),
    ("areas of expertise", SectionType::Skills),
    ("certifications", SectionType::Certifications),
    ("certificates", SectionType::Certifications),
    ("licenses", SectionType::Certifications),
    ("licenses and certifications", SectionType::Certifications),
    ("projects", SectionType::Projects),
    ("personal projects", SectionType::Projects),
    ("key projects", SectionType::Projects),
    ("achievements", SectionType::Achievements),
    ("accomplishments", SectionType::Achievements),
    ("awards", SectionType::Achievements),
    ("honors and awards", SectionType::Achievements),
    ("languages", SectionType::Languages),
    ("volunteering", SectionType::Volunteering),
    ("volunteer experience", SectionType::Volunteering),
    ("volunteer work", SectionType::Volunteering),
    ("community involvement", SectionType::Volunteering),
    ("footer", SectionType::Footer),
];

impl SectionType {
    /// Maps a free-form heading onto the known vocabulary, or keeps it as `Custom`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label
            .trim()
            .trim_end_matches(':')
            .replace('&', "and")
            .replace(['_', '-'], " ")
            .to_lowercase();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        SECTION_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == normalized)
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| SectionType::Custom(label.trim().to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SectionType::Custom(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            SectionType::Header => "header",
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Certifications => "certifications",
            SectionType::Projects => "projects",
            SectionType::Achievements => "achievements",
            SectionType::Languages => "languages",
            SectionType::Volunteering => "volunteering",
            SectionType::Footer => "footer",
            SectionType::Custom(raw) => raw,
        }
    }
}

impl From<String> for SectionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "header" => SectionType::Header,
            "summary" => SectionType::Summary,
            "experience" => SectionType::Experience,
            "education" => SectionType::Education,
            "skills" => SectionType::Skills,
            "certifications" => SectionType::Certifications,
            "projects" => SectionType::Projects,
            "achievements" => SectionType::Achievements,
            "languages" => SectionType::Languages,
            "volunteering" => SectionType::Volunteering,
            "footer" => SectionType::Footer,
            _ => SectionType::Custom(raw),
        }
    }
}

impl Serialize for SectionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SectionType::from)
    }
}

/// Section body. Plain text, a list of items, or an arbitrary object such as header contact fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(TextContent),
    Items(ItemList),
    Fields(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemList {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Text(String),
    Entry(Box<ItemEntry>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honors: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemEntry {
    /// Job title, whichever field the producer used for it.
    pub fn role_label(&self) -> Option<&str> {
        self.position
            .as_deref()
            .or(self.title.as_deref())
            .or(self.role.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Date fields in the order they describe an entry: start, single date, end.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        [&self.start_date, &self.date, &self.end_date]
            .into_iter()
            .filter_map(|d| d.as_deref())
            .filter(|d| !d.trim().is_empty())
    }
}

/// Style metadata. Only formatting checks look at it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
