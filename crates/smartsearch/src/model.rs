//! Core data types: filter kinds, operators, per-kind configs and the
//! backend-facing [`TargetSpecification`].
//!
//! A [`Filter`] serializes to exactly `{"type", "op", "config"}`. Decoding goes
//! through the [registry](crate::registry) so an unknown `type` or a config
//! missing a required field comes back as a typed error instead of a generic
//! serde message.

use crate::error::{Result, SmartSearchError};
use crate::identity::FilterId;
use crate::registry;
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The closed set of filter kinds this client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    All,
    MostActive,
    Random,
    PersonTags,
    CampaignParticipation,
    SurveySubmission,
    User,
}

impl FilterKind {
    /// Every kind, in palette order.
    pub const ALL_KINDS: [FilterKind; 7] = [
        FilterKind::All,
        FilterKind::MostActive,
        FilterKind::Random,
        FilterKind::PersonTags,
        FilterKind::CampaignParticipation,
        FilterKind::SurveySubmission,
        FilterKind::User,
    ];

    /// Wire name, as used in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::All => "all",
            FilterKind::MostActive => "most_active",
            FilterKind::Random => "random",
            FilterKind::PersonTags => "person_tags",
            FilterKind::CampaignParticipation => "campaign_participation",
            FilterKind::SurveySubmission => "survey_submission",
            FilterKind::User => "user",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = SmartSearchError;

    fn from_str(s: &str) -> Result<Self> {
        FilterKind::ALL_KINDS
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SmartSearchError::UnknownKind(s.to_string()))
    }
}

/// Set-algebra operator applied by the backend when it evaluates a filter.
///
/// The vocabulary belongs to the backend. Known tokens get their own variant;
/// anything else is kept in `Other` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    #[default]
    Add,
    Sub,
    Limit,
    Other(String),
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Limit => "limit",
            Operation::Other(token) => token,
        }
    }

    fn from_token(token: String) -> Self {
        match token.as_str() {
            "add" => Operation::Add,
            "sub" => Operation::Sub,
            "limit" => Operation::Limit,
            _ => Operation::Other(token),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Operation::from_token(s.to_string()))
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Operation::from_token)
    }
}

// --- Per-kind configs ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllConfig {}

/// People with the most activity in the last `days` days, capped at `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MostActiveConfig {
    pub days: u32,
    pub count: u32,
}

impl Default for MostActiveConfig {
    fn default() -> Self {
        Self { days: 30, count: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomConfig {
    pub size: u32,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { size: 10 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagCondition {
    #[serde(rename = "all")]
    All,
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "none")]
    NoneOf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonTagsConfig {
    pub condition: TagCondition,
    pub tags: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_matching: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationOperator {
    #[default]
    In,
    NotIn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationState {
    #[default]
    Booked,
    SignedUp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignParticipationConfig {
    pub operator: ParticipationOperator,
    pub state: ParticipationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "calendar_date::deserialize"
    )]
    pub after: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "calendar_date::deserialize"
    )]
    pub before: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveySubmissionConfig {
    pub survey: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "calendar_date::deserialize"
    )]
    pub after: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "calendar_date::deserialize"
    )]
    pub before: Option<NaiveDate>,
}

/// Dates in configs are exactly `YYYY-MM-DD`. Anything chrono would accept
/// but write back differently (`2024-1-5`) is refused, so stored dates
/// survive a load and save unchanged.
mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let date = NaiveDate::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)?;
        if date.format(FORMAT).to_string() != raw {
            return Err(de::Error::custom(format!(
                "date `{raw}` must be written as YYYY-MM-DD"
            )));
        }
        Ok(Some(date))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub is_user: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self { is_user: true }
    }
}

/// Kind-specific configuration. The variant *is* the filter's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterConfig {
    All(AllConfig),
    MostActive(MostActiveConfig),
    Random(RandomConfig),
    PersonTags(PersonTagsConfig),
    CampaignParticipation(CampaignParticipationConfig),
    SurveySubmission(SurveySubmissionConfig),
    User(UserConfig),
}

impl FilterConfig {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterConfig::All(_) => FilterKind::All,
            FilterConfig::MostActive(_) => FilterKind::MostActive,
            FilterConfig::Random(_) => FilterKind::Random,
            FilterConfig::PersonTags(_) => FilterKind::PersonTags,
            FilterConfig::CampaignParticipation(_) => FilterKind::CampaignParticipation,
            FilterConfig::SurveySubmission(_) => FilterKind::SurveySubmission,
            FilterConfig::User(_) => FilterKind::User,
        }
    }

    /// Decodes a raw JSON config as the given kind.
    ///
    /// Only checks shape; range checks live in [`registry::validate`].
    pub fn from_value(kind: FilterKind, value: serde_json::Value) -> Result<Self> {
        registry::check_fields(kind, &value)?;
        let decoded = match kind {
            FilterKind::All => serde_json::from_value(value).map(FilterConfig::All),
            FilterKind::MostActive => serde_json::from_value(value).map(FilterConfig::MostActive),
            FilterKind::Random => serde_json::from_value(value).map(FilterConfig::Random),
            FilterKind::PersonTags => serde_json::from_value(value).map(FilterConfig::PersonTags),
            FilterKind::CampaignParticipation => {
                serde_json::from_value(value).map(FilterConfig::CampaignParticipation)
            }
            FilterKind::SurveySubmission => {
                serde_json::from_value(value).map(FilterConfig::SurveySubmission)
            }
            FilterKind::User => serde_json::from_value(value).map(FilterConfig::User),
        };
        decoded.map_err(|e| SmartSearchError::invalid(kind, e.to_string()))
    }
}

impl From<AllConfig> for FilterConfig {
    fn from(config: AllConfig) -> Self {
        FilterConfig::All(config)
    }
}

impl From<MostActiveConfig> for FilterConfig {
    fn from(config: MostActiveConfig) -> Self {
        FilterConfig::MostActive(config)
    }
}

impl From<RandomConfig> for FilterConfig {
    fn from(config: RandomConfig) -> Self {
        FilterConfig::Random(config)
    }
}

impl From<PersonTagsConfig> for FilterConfig {
    fn from(config: PersonTagsConfig) -> Self {
        FilterConfig::PersonTags(config)
    }
}

impl From<CampaignParticipationConfig> for FilterConfig {
    fn from(config: CampaignParticipationConfig) -> Self {
        FilterConfig::CampaignParticipation(config)
    }
}

impl From<SurveySubmissionConfig> for FilterConfig {
    fn from(config: SurveySubmissionConfig) -> Self {
        FilterConfig::SurveySubmission(config)
    }
}

impl From<UserConfig> for FilterConfig {
    fn from(config: UserConfig) -> Self {
        FilterConfig::User(config)
    }
}

// --- Filters ---

/// One audience-selection rule: `{type, op, config}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct Filter {
    pub op: Operation,
    pub config: FilterConfig,
}

impl Filter {
    pub fn new(op: Operation, config: impl Into<FilterConfig>) -> Self {
        Self {
            op,
            config: config.into(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.config.kind()
    }

    /// Range and consistency checks for this filter's config.
    pub fn validate(&self) -> Result<()> {
        registry::validate(&self.config)
    }

    /// Parses a single filter from JSON, keeping registry errors typed.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawFilter =
            serde_json::from_str(json).map_err(|e| SmartSearchError::Malformed(e.to_string()))?;
        raw.try_into()
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Filter", 3)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("op", &self.op)?;
        state.serialize_field("config", &self.config)?;
        state.end()
    }
}

/// Wire shape before the registry has looked at it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFilter {
    #[serde(rename = "type")]
    kind: String,
    op: Operation,
    config: serde_json::Value,
}

impl TryFrom<RawFilter> for Filter {
    type Error = SmartSearchError;

    fn try_from(raw: RawFilter) -> Result<Self> {
        let kind = registry::lookup(&raw.kind)?.kind;
        let config = FilterConfig::from_value(kind, raw.config)?;
        Ok(Filter { op: raw.op, config })
    }
}

/// A [`Filter`] held in a store, tagged with its client-local id.
///
/// Not serializable: ids never leave the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterWithId {
    pub(crate) id: FilterId,
    pub(crate) filter: Filter,
}

impl FilterWithId {
    pub fn id(&self) -> FilterId {
        self.id
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn kind(&self) -> FilterKind {
        self.filter.kind()
    }

    pub fn op(&self) -> &Operation {
        &self.filter.op
    }

    pub fn config(&self) -> &FilterConfig {
        &self.filter.config
    }

    pub fn into_filter(self) -> Filter {
        self.filter
    }
}

/// The backend payload: filters in evaluation order, identity stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpecification(Vec<Filter>);

impl TargetSpecification {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.0
    }

    pub fn into_filters(self) -> Vec<Filter> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }

    /// Parses a specification, reporting the first bad filter with its
    /// typed registry error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawFilter> =
            serde_json::from_str(json).map_err(|e| SmartSearchError::Malformed(e.to_string()))?;
        raw.into_iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<Filter> for TargetSpecification {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for TargetSpecification {
    type Item = Filter;
    type IntoIter = std::vec::IntoIter<Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TargetSpecification {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// --- Targets ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOwner {
    Task,
    Campaign,
}

/// Which task or campaign a target specification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub org_id: u64,
    pub owner: TargetOwner,
    pub owner_id: u64,
}

impl TargetRef {
    pub fn task(org_id: u64, task_id: u64) -> Self {
        Self {
            org_id,
            owner: TargetOwner::Task,
            owner_id: task_id,
        }
    }

    pub fn campaign(org_id: u64, campaign_id: u64) -> Self {
        Self {
            org_id,
            owner: TargetOwner::Campaign,
            owner_id: campaign_id,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = match self.owner {
            TargetOwner::Task => "task",
            TargetOwner::Campaign => "campaign",
        };
        write!(f, "org {} {} {}", self.org_id, owner, self.owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_serializes_type_op_config() {
        let filter = Filter::new(Operation::Add, MostActiveConfig { days: 30, count: 50 });
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"type": "most_active", "op": "add", "config": {"days": 30, "count": 50}})
        );
    }

    #[test]
    fn all_filter_config_is_empty_object() {
        let filter = Filter::new(Operation::Add, AllConfig {});
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"type": "all", "op": "add", "config": {}})
        );
    }

    #[test]
    fn unknown_operation_is_preserved_verbatim() {
        let filter = Filter::from_json(r#"{"type":"all","op":"intersect","config":{}}"#).unwrap();
        assert_eq!(filter.op, Operation::Other("intersect".to_string()));
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            r#"{"type":"all","op":"intersect","config":{}}"#
        );
    }

    #[test]
    fn unknown_kind_is_reported() {
        let err = Filter::from_json(r#"{"type":"vip","op":"add","config":{}}"#).unwrap_err();
        assert!(matches!(err, SmartSearchError::UnknownKind(name) if name == "vip"));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = Filter::from_json(r#"{"type":"most_active","op":"add","config":{"days":7}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SmartSearchError::MissingField {
                kind: FilterKind::MostActive,
                field: "count"
            }
        ));
    }

    #[test]
    fn foreign_config_field_is_rejected() {
        let err = Filter::from_json(
            r#"{"type":"random","op":"limit","config":{"size":5,"seed":1}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SmartSearchError::InvalidConfig {
                kind: FilterKind::Random,
                ..
            }
        ));
    }

    #[test]
    fn id_field_is_not_accepted_on_the_wire() {
        let err = Filter::from_json(r#"{"id":3,"type":"all","op":"add","config":{}}"#).unwrap_err();
        assert!(matches!(err, SmartSearchError::Malformed(_)));
    }

    #[test]
    fn optional_fields_stay_absent() {
        let json = r#"[{"type":"campaign_participation","op":"sub","config":{"operator":"notin","state":"signed_up","after":"2024-01-01"}}]"#;
        let spec = TargetSpecification::from_json(json).unwrap();
        assert_eq!(spec.to_json().unwrap(), json);
    }

    #[test]
    fn dates_must_be_zero_padded() {
        let err = Filter::from_json(
            r#"{"type":"survey_submission","op":"add","config":{"survey":3,"after":"2024-1-5"}}"#,
        )
        .unwrap_err();
        match err {
            SmartSearchError::InvalidConfig { kind, reason } => {
                assert_eq!(kind, FilterKind::SurveySubmission);
                assert!(reason.contains("YYYY-MM-DD"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Filter::from_json(
            r#"{"type":"campaign_participation","op":"add","config":{"operator":"in","state":"booked","before":"05/01/2024"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SmartSearchError::InvalidConfig { .. }));
    }

    #[test]
    fn null_optional_field_is_rejected() {
        for config in [
            r#"{"survey":3,"after":null}"#,
            r#"{"survey":3,"before":null}"#,
        ] {
            let json = format!(r#"{{"type":"survey_submission","op":"add","config":{config}}}"#);
            let err = Filter::from_json(&json).unwrap_err();
            assert!(
                matches!(err, SmartSearchError::InvalidConfig { kind: FilterKind::SurveySubmission, .. }),
                "{config}: {err:?}"
            );
        }
        let err = Filter::from_json(
            r#"{"type":"person_tags","op":"add","config":{"condition":"any","tags":[1],"min_matching":null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SmartSearchError::InvalidConfig { .. }));
    }

    #[test]
    fn stored_dates_round_trip_verbatim() {
        let json = r#"[{"type":"survey_submission","op":"add","config":{"survey":3,"after":"2024-01-05","before":"2024-12-31"}}]"#;
        let spec = TargetSpecification::from_json(json).unwrap();
        assert_eq!(spec.to_json().unwrap(), json);
    }

    #[test]
    fn serde_deserialize_goes_through_registry() {
        let result: std::result::Result<Filter, _> =
            serde_json::from_str(r#"{"type":"nope","op":"add","config":{}}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Unknown filter type: nope"));
    }

    #[test]
    fn kind_round_trips_through_its_wire_name() {
        for kind in FilterKind::ALL_KINDS {
            assert_eq!(kind.as_str().parse::<FilterKind>().unwrap(), kind);
        }
        assert!("MOST_ACTIVE".parse::<FilterKind>().is_err());
    }

    #[test]
    fn target_ref_display() {
        assert_eq!(TargetRef::task(1, 7).to_string(), "org 1 task 7");
        assert_eq!(TargetRef::campaign(2, 3).to_string(), "org 2 campaign 3");
    }
}
