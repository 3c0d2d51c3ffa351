//! View models for the company card and the detail page.
//!
//! The presentation layer renders these; nothing here knows about terminals
//! or HTML.

use serde::Serialize;

use crate::record::{CompanyRecord, Field};

/// Shown in place of an empty card value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown when a company has no description.
pub const NO_DESCRIPTION: &str = "No company description available.";

const SECTIONS: &[(&str, &[Field])] = &[
    (
        "Company Overview",
        &[
            Field::WebsiteUrl,
            Field::Industry,
            Field::Headquarters,
            Field::FoundingYear,
            Field::EmployeeCount,
        ],
    ),
    (
        "Financial Profile",
        &[Field::FundingRaised, Field::Revenue, Field::Valuation],
    ),
    (
        "AI Technology",
        &[
            Field::AiModelsUsed,
            Field::PrimaryAiUseCase,
            Field::AiFrameworksUsed,
            Field::AiProductsServices,
        ],
    ),
    (
        "Advanced Details",
        &[Field::PatentDetails, Field::AiResearchPapers, Field::Partnerships],
    ),
    (
        "Team & Connections",
        &[
            Field::FoundersAndLinkedin,
            Field::KeyContacts,
            Field::SocialMediaLinks,
        ],
    ),
];

/// `value`, or [`NOT_AVAILABLE`] when empty.
pub fn or_na(value: &str) -> &str {
    if value.is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Website without scheme or leading `www.`, for compact display.
///
/// `https://www.acme.ai/about` becomes `acme.ai/about`.
pub fn display_website(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => rest.strip_prefix("www.").unwrap_or(rest),
        None => url,
    }
}

/// Summary shown for each company in the directory list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card<'a> {
    pub name: &'a str,
    pub industry: &'a str,
    pub headquarters: &'a str,
    pub valuation: &'a str,
    pub website: &'a str,
    pub website_display: &'a str,
}

impl<'a> Card<'a> {
    pub fn from_record(record: &'a CompanyRecord) -> Self {
        Self {
            name: &record.name,
            industry: or_na(&record.industry),
            headquarters: or_na(&record.headquarters),
            valuation: or_na(&record.valuation),
            website: &record.website_url,
            website_display: or_na(display_website(&record.website_url)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailItem<'a> {
    pub field: Field,
    pub label: &'static str,
    pub value: &'a str,
    pub is_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection<'a> {
    pub title: &'static str,
    pub items: Vec<DetailItem<'a>>,
}

/// The detail page for one company. Empty values and sections with no
/// values are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub sections: Vec<DetailSection<'a>>,
}

impl<'a> DetailView<'a> {
    pub fn from_record(record: &'a CompanyRecord) -> Self {
        let description = if record.description.is_empty() {
            NO_DESCRIPTION
        } else {
            &record.description
        };

        let sections = SECTIONS
            .iter()
            .filter_map(|&(title, fields)| {
                let items: Vec<DetailItem<'a>> = fields
                    .iter()
                    .filter_map(|&field| {
                        let value = record.get(field);
                        (!value.is_empty()).then(|| DetailItem {
                            field,
                            label: field.display_label(),
                            value,
                            is_link: field.is_link(),
                        })
                    })
                    .collect();
                (!items.is_empty()).then(|| DetailSection { title, items })
            })
            .collect();

        Self {
            name: &record.name,
            description,
            sections,
        }
    }
}
