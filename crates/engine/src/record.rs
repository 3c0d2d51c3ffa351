//! Company records and the fixed field schema.
//!
//! Field order is the sheet's column order. CSV ingestion maps cells to
//! fields by position, gviz ingestion by header label, and exports write
//! columns in this same order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One field of a [`CompanyRecord`], in sheet column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    WebsiteUrl,
    Industry,
    Headquarters,
    FoundingYear,
    EmployeeCount,
    FundingRaised,
    Revenue,
    Valuation,
    Description,
    FoundersAndLinkedin,
    KeyContacts,
    SocialMediaLinks,
    AiModelsUsed,
    PrimaryAiUseCase,
    AiFrameworksUsed,
    AiProductsServices,
    PatentDetails,
    AiResearchPapers,
    Partnerships,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Field; 20] = [
        Field::Name,
        Field::WebsiteUrl,
        Field::Industry,
        Field::Headquarters,
        Field::FoundingYear,
        Field::EmployeeCount,
        Field::FundingRaised,
        Field::Revenue,
        Field::Valuation,
        Field::Description,
        Field::FoundersAndLinkedin,
        Field::KeyContacts,
        Field::SocialMediaLinks,
        Field::AiModelsUsed,
        Field::PrimaryAiUseCase,
        Field::AiFrameworksUsed,
        Field::AiProductsServices,
        Field::PatentDetails,
        Field::AiResearchPapers,
        Field::Partnerships,
    ];

    /// Number of positionally mapped columns.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based column position in the CSV export.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Stable snake_case identifier used in settings files and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::WebsiteUrl => "website_url",
            Field::Industry => "industry",
            Field::Headquarters => "headquarters",
            Field::FoundingYear => "founding_year",
            Field::EmployeeCount => "employee_count",
            Field::FundingRaised => "funding_raised",
            Field::Revenue => "revenue",
            Field::Valuation => "valuation",
            Field::Description => "description",
            Field::FoundersAndLinkedin => "founders_and_linkedin",
            Field::KeyContacts => "key_contacts",
            Field::SocialMediaLinks => "social_media_links",
            Field::AiModelsUsed => "ai_models_used",
            Field::PrimaryAiUseCase => "primary_ai_use_case",
            Field::AiFrameworksUsed => "ai_frameworks_used",
            Field::AiProductsServices => "ai_products_services",
            Field::PatentDetails => "patent_details",
            Field::AiResearchPapers => "ai_research_papers",
            Field::Partnerships => "partnerships",
        }
    }

    /// Default column header in the source sheet.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Company Name",
            Field::WebsiteUrl => "Website",
            Field::Industry => "Industry",
            Field::Headquarters => "Headquarters",
            Field::FoundingYear => "Founding Year",
            Field::EmployeeCount => "No. of Employees",
            Field::FundingRaised => "Funding Raised",
            Field::Revenue => "Revenue",
            Field::Valuation => "Valuation",
            Field::Description => "Company Description",
            Field::FoundersAndLinkedin => "Founders & LinkedIn",
            Field::KeyContacts => "Key Contacts",
            Field::SocialMediaLinks => "Social Media Links",
            Field::AiModelsUsed => "AI Models Used",
            Field::PrimaryAiUseCase => "Primary AI Use Case",
            Field::AiFrameworksUsed => "AI Frameworks Used",
            Field::AiProductsServices => "AI Products/Services",
            Field::PatentDetails => "Patent Details",
            Field::AiResearchPapers => "AI Research Papers",
            Field::Partnerships => "Partnerships",
        }
    }

    /// Short label shown next to the value on the detail page.
    pub fn display_label(self) -> &'static str {
        match self {
            Field::Name => "Company",
            Field::WebsiteUrl => "Website",
            Field::Industry => "Industry",
            Field::Headquarters => "Headquarters",
            Field::FoundingYear => "Founded",
            Field::EmployeeCount => "Team Size",
            Field::FundingRaised => "Funding Raised",
            Field::Revenue => "Revenue",
            Field::Valuation => "Valuation",
            Field::Description => "Description",
            Field::FoundersAndLinkedin => "Founders & LinkedIn",
            Field::KeyContacts => "Key Contacts",
            Field::SocialMediaLinks => "Social Media",
            Field::AiModelsUsed => "AI Models",
            Field::PrimaryAiUseCase => "Primary Use Case",
            Field::AiFrameworksUsed => "Frameworks",
            Field::AiProductsServices => "Products/Services",
            Field::PatentDetails => "Patents",
            Field::AiResearchPapers => "Research Papers",
            Field::Partnerships => "Partnerships",
        }
    }

    /// True for fields whose value is a URL rendered as a link.
    pub fn is_link(self) -> bool {
        matches!(self, Field::WebsiteUrl)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a field key is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the snake_case key, case-insensitively. Hyphens are read as
    /// underscores so `website-url` works on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == normalized)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A normalized company entry derived from one source row.
///
/// Every value is opaque text. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    pub name: String,
    pub website_url: String,
    pub industry: String,
    pub headquarters: String,
    pub founding_year: String,
    pub employee_count: String,
    pub funding_raised: String,
    pub revenue: String,
    pub valuation: String,
    pub description: String,
    pub founders_and_linkedin: String,
    pub key_contacts: String,
    pub social_media_links: String,
    pub ai_models_used: String,
    pub primary_ai_use_case: String,
    pub ai_frameworks_used: String,
    pub ai_products_services: String,
    pub patent_details: String,
    pub ai_research_papers: String,
    pub partnerships: String,
}

impl CompanyRecord {
    /// Build a record from cells in column order.
    ///
    /// Missing trailing cells leave their fields empty; cells past the last
    /// mapped column are ignored.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut record = Self::default();
        for (field, cell) in Field::ALL.iter().zip(cells) {
            record.set(*field, cell.into());
        }
        record
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::WebsiteUrl => &self.website_url,
            Field::Industry => &self.industry,
            Field::Headquarters => &self.headquarters,
            Field::FoundingYear => &self.founding_year,
            Field::EmployeeCount => &self.employee_count,
            Field::FundingRaised => &self.funding_raised,
            Field::Revenue => &self.revenue,
            Field::Valuation => &self.valuation,
            Field::Description => &self.description,
            Field::FoundersAndLinkedin => &self.founders_and_linkedin,
            Field::KeyContacts => &self.key_contacts,
            Field::SocialMediaLinks => &self.social_media_links,
            Field::AiModelsUsed => &self.ai_models_used,
            Field::PrimaryAiUseCase => &self.primary_ai_use_case,
            Field::AiFrameworksUsed => &self.ai_frameworks_used,
            Field::AiProductsServices => &self.ai_products_services,
            Field::PatentDetails => &self.patent_details,
            Field::AiResearchPapers => &self.ai_research_papers,
            Field::Partnerships => &self.partnerships,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::WebsiteUrl => &mut self.website_url,
            Field::Industry => &mut self.industry,
            Field::Headquarters => &mut self.headquarters,
            Field::FoundingYear => &mut self.founding_year,
            Field::EmployeeCount => &mut self.employee_count,
            Field::FundingRaised => &mut self.funding_raised,
            Field::Revenue => &mut self.revenue,
            Field::Valuation => &mut self.valuation,
            Field::Description => &mut self.description,
            Field::FoundersAndLinkedin => &mut self.founders_and_linkedin,
            Field::KeyContacts => &mut self.key_contacts,
            Field::SocialMediaLinks => &mut self.social_media_links,
            Field::AiModelsUsed => &mut self.ai_models_used,
            Field::PrimaryAiUseCase => &mut self.primary_ai_use_case,
            Field::AiFrameworksUsed => &mut self.ai_frameworks_used,
            Field::AiProductsServices => &mut self.ai_products_services,
            Field::PatentDetails => &mut self.patent_details,
            Field::AiResearchPapers => &mut self.ai_research_papers,
            Field::Partnerships => &mut self.partnerships,
        };
        *slot = value;
    }

    /// Iterate `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// A record with no name cannot be routed to a detail view.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_column_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.position(), i);
        }
        assert_eq!(Field::COUNT, 20);
    }

    #[test]
    fn test_from_cells_short_row_pads_with_empty() {
        let rec = CompanyRecord::from_cells(["Acme", "https://acme.ai", "Robotics"]);
        assert_eq!(rec.name, "Acme");
        assert_eq!(rec.website_url, "https://acme.ai");
        assert_eq!(rec.industry, "Robotics");
        assert_eq!(rec.headquarters, "");
        assert_eq!(rec.partnerships, "");
    }

    #[test]
    fn test_from_cells_ignores_extra_columns() {
        let mut cells: Vec<String> = (0..25).map(|i| format!("c{}", i)).collect();
        cells[19] = "Partners".into();
        let rec = CompanyRecord::from_cells(cells);
        assert_eq!(rec.partnerships, "Partners");
        assert_eq!(rec.name, "c0");
    }

    #[test]
    fn test_get_set_cover_every_field() {
        let mut rec = CompanyRecord::default();
        for field in Field::ALL {
            rec.set(field, field.key().to_uppercase());
        }
        for (field, value) in rec.fields() {
            assert_eq!(value, field.key().to_uppercase());
        }
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("name".parse::<Field>().unwrap(), Field::Name);
        assert_eq!("Industry".parse::<Field>().unwrap(), Field::Industry);
        assert_eq!("website-url".parse::<Field>().unwrap(), Field::WebsiteUrl);
        assert_eq!(
            " headquarters ".parse::<Field>().unwrap(),
            Field::Headquarters
        );
        let err = "ceo".parse::<Field>().unwrap_err();
        assert_eq!(err.to_string(), "unknown field 'ceo'");
    }

    #[test]
    fn test_record_serializes_snake_case_in_column_order() {
        let rec = CompanyRecord {
            name: "Acme".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&rec).unwrap();
        let mut last = 0;
        for field in Field::ALL {
            let needle = format!("\"{}\":", field.key());
            let pos = json.find(&needle).unwrap_or_else(|| panic!("missing {}", needle));
            assert!(pos >= last, "{} out of order in {}", field, json);
            last = pos;
        }
        assert!(json.starts_with("{\"name\":\"Acme\""));
    }
}
