//! Filter kind registry.
//!
//! The single source of truth for what each filter kind's config looks like:
//! which fields exist, which are required, and what a fresh config contains.
//! Hosts use it to render the palette of addable kinds and generic forms;
//! the model uses it to decode and validate configs.
//!
//! Adding a kind means adding a variant to [`FilterKind`], a config struct in
//! `model.rs`, and a spec here. The `match`es below are exhaustive, so a missing
//! spec is a compile error rather than a runtime surprise.

use crate::error::{Result, SmartSearchError};
use crate::model::{
    AllConfig, CampaignParticipationConfig, FilterConfig, FilterKind, MostActiveConfig,
    PersonTagsConfig, RandomConfig, SurveySubmissionConfig, TagCondition, UserConfig,
};
use chrono::NaiveDate;

/// Value type of a config field, as a form would need to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    IntegerList,
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// One of a fixed set of tokens.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Schema for one filter kind.
#[derive(Debug, Clone)]
pub struct KindSpec {
    pub kind: FilterKind,
    pub fields: &'static [FieldSpec],
}

impl KindSpec {
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn default_config(&self) -> FilterConfig {
        default_config(self.kind)
    }
}

static ALL: KindSpec = KindSpec {
    kind: FilterKind::All,
    fields: &[],
};

static MOST_ACTIVE: KindSpec = KindSpec {
    kind: FilterKind::MostActive,
    fields: &[
        FieldSpec::required("days", FieldType::Integer),
        FieldSpec::required("count", FieldType::Integer),
    ],
};

static RANDOM: KindSpec = KindSpec {
    kind: FilterKind::Random,
    fields: &[FieldSpec::required("size", FieldType::Integer)],
};

static PERSON_TAGS: KindSpec = KindSpec {
    kind: FilterKind::PersonTags,
    fields: &[
        FieldSpec::required("condition", FieldType::Choice(&["all", "any", "none"])),
        FieldSpec::required("tags", FieldType::IntegerList),
        FieldSpec::optional("min_matching", FieldType::Integer),
    ],
};

static CAMPAIGN_PARTICIPATION: KindSpec = KindSpec {
    kind: FilterKind::CampaignParticipation,
    fields: &[
        FieldSpec::required("operator", FieldType::Choice(&["in", "notin"])),
        FieldSpec::required("state", FieldType::Choice(&["booked", "signed_up"])),
        FieldSpec::optional("campaign", FieldType::Integer),
        FieldSpec::optional("after", FieldType::Date),
        FieldSpec::optional("before", FieldType::Date),
    ],
};

static SURVEY_SUBMISSION: KindSpec = KindSpec {
    kind: FilterKind::SurveySubmission,
    fields: &[
        FieldSpec::required("survey", FieldType::Integer),
        FieldSpec::optional("after", FieldType::Date),
        FieldSpec::optional("before", FieldType::Date),
    ],
};

static USER: KindSpec = KindSpec {
    kind: FilterKind::User,
    fields: &[FieldSpec::required("is_user", FieldType::Boolean)],
};

/// Schema for a kind.
pub fn spec_for(kind: FilterKind) -> &'static KindSpec {
    match kind {
        FilterKind::All => &ALL,
        FilterKind::MostActive => &MOST_ACTIVE,
        FilterKind::Random => &RANDOM,
        FilterKind::PersonTags => &PERSON_TAGS,
        FilterKind::CampaignParticipation => &CAMPAIGN_PARTICIPATION,
        FilterKind::SurveySubmission => &SURVEY_SUBMISSION,
        FilterKind::User => &USER,
    }
}

/// Schema for a kind given its wire name.
///
/// An unknown name usually means the backend knows a kind this client
/// doesn't, so it is logged as well as returned.
pub fn lookup(type_name: &str) -> Result<&'static KindSpec> {
    match type_name.parse::<FilterKind>() {
        Ok(kind) => Ok(spec_for(kind)),
        Err(err) => {
            tracing::warn!(type_name, "filter type not in registry");
            Err(err)
        }
    }
}

/// Kinds offered for new filters, in display order.
pub fn palette() -> impl Iterator<Item = &'static KindSpec> {
    FilterKind::ALL_KINDS.into_iter().map(spec_for)
}

/// Starting config for a freshly picked kind. Not necessarily valid yet:
/// a new tags filter has no tags until the user picks some.
pub fn default_config(kind: FilterKind) -> FilterConfig {
    match kind {
        FilterKind::All => AllConfig::default().into(),
        FilterKind::MostActive => MostActiveConfig::default().into(),
        FilterKind::Random => RandomConfig::default().into(),
        FilterKind::PersonTags => PersonTagsConfig::default().into(),
        FilterKind::CampaignParticipation => CampaignParticipationConfig::default().into(),
        FilterKind::SurveySubmission => SurveySubmissionConfig::default().into(),
        FilterKind::User => UserConfig::default().into(),
    }
}

/// Checks that a raw config is an object carrying every required field and
/// no explicit `null` for an optional one.
pub fn check_fields(kind: FilterKind, config: &serde_json::Value) -> Result<()> {
    let Some(object) = config.as_object() else {
        return Err(SmartSearchError::invalid(kind, "config must be a JSON object"));
    };
    let spec = spec_for(kind);
    for field in spec.required_fields() {
        if object.get(field).map_or(true, serde_json::Value::is_null) {
            return Err(SmartSearchError::MissingField { kind, field });
        }
    }
    for (name, value) in object {
        if value.is_null() && spec.field(name).is_some_and(|f| !f.required) {
            return Err(SmartSearchError::invalid(
                kind,
                format!("`{name}` must be omitted rather than null"),
            ));
        }
    }
    Ok(())
}

/// Range and consistency checks on a decoded config.
pub fn validate(config: &FilterConfig) -> Result<()> {
    let kind = config.kind();
    match config {
        FilterConfig::All(_) | FilterConfig::User(_) => Ok(()),
        FilterConfig::MostActive(c) => {
            if c.days == 0 {
                return Err(SmartSearchError::invalid(kind, "days must be at least 1"));
            }
            if c.count == 0 {
                return Err(SmartSearchError::invalid(kind, "count must be at least 1"));
            }
            Ok(())
        }
        FilterConfig::Random(c) => {
            if c.size == 0 {
                return Err(SmartSearchError::invalid(kind, "size must be at least 1"));
            }
            Ok(())
        }
        FilterConfig::PersonTags(c) => {
            if c.tags.is_empty() {
                return Err(SmartSearchError::invalid(kind, "at least one tag is required"));
            }
            if let Some(min) = c.min_matching {
                if c.condition != TagCondition::Any {
                    return Err(SmartSearchError::invalid(
                        kind,
                        "min_matching only applies to the `any` condition",
                    ));
                }
                if min == 0 || min as usize > c.tags.len() {
                    return Err(SmartSearchError::invalid(
                        kind,
                        format!("min_matching must be between 1 and {}", c.tags.len()),
                    ));
                }
            }
            Ok(())
        }
        FilterConfig::CampaignParticipation(c) => check_window(kind, c.after, c.before),
        FilterConfig::SurveySubmission(c) => {
            if c.survey == 0 {
                return Err(SmartSearchError::invalid(kind, "a survey must be chosen"));
            }
            check_window(kind, c.after, c.before)
        }
    }
}

fn check_window(kind: FilterKind, after: Option<NaiveDate>, before: Option<NaiveDate>) -> Result<()> {
    match (after, before) {
        (Some(after), Some(before)) if after > before => Err(SmartSearchError::invalid(
            kind,
            format!("after ({after}) is later than before ({before})"),
        )),
        _ => Ok(()),
    }
}
