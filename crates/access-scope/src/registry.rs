//! Exception registry: named groups of employee numbers whose visibility is
//! governed by the group instead of their recorded general direction.
//!
//! A group may grant its members to one general direction (the grantee) and
//! hide them from another (the excluded-from direction). The registry merges
//! every group into one [`GeneralDirectionRule`] per general direction at
//! construction time, so lookups do not scale with the number of groups.
//! Membership is not assumed disjoint: one employee number may appear in
//! several groups.
//!
//! The registry is built once at startup, wrapped in an `Arc`, and shared
//! read-only by the predicate and the filter builder.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constraint::Constraint;
use crate::employee::{Employee, EmployeeNumber};
use crate::error::RegistryError;
use crate::scope::GeneralDirectionId;

/// Current supported registry document version.
const SUPPORTED_VERSION: u32 = 1;

/// Name of the built-in legacy group.
pub const LEGACY_GROUP_NAME: &str = "GD28-legacy";

/// General direction granted the legacy employee numbers.
const LEGACY_GRANTEE: u32 = 28;

/// General direction the legacy employee numbers are hidden from.
const LEGACY_EXCLUDED_FROM: u32 = 18;

/// Employee numbers that logically belong to general direction 28 even when
/// recorded under 18.
pub const LEGACY_EMPLOYEE_NUMBERS: [u32; 12] = [
    20902, 10829, 48461, 7057, 20882, 24493, 28875, 22515, 30874, 15492, 26934, 35561,
];

/// A named set of employee numbers with the general directions it affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionGroup {
    name: String,
    grantee: Option<GeneralDirectionId>,
    excluded_from: Option<GeneralDirectionId>,
    members: BTreeSet<EmployeeNumber>,
}

impl ExceptionGroup {
    /// Validate and build a group.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the name is blank, when the group
    /// affects no general direction, or when it has no members.
    pub fn new(
        name: impl Into<String>,
        grantee: Option<GeneralDirectionId>,
        excluded_from: Option<GeneralDirectionId>,
        members: impl IntoIterator<Item = EmployeeNumber>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyGroupName { index: 0 });
        }
        if grantee.is_none() && excluded_from.is_none() {
            return Err(RegistryError::UnanchoredGroup { name });
        }
        let members: BTreeSet<_> = members.into_iter().collect();
        if members.is_empty() {
            return Err(RegistryError::EmptyMembers { name });
        }
        Ok(Self {
            name,
            grantee,
            excluded_from,
            members,
        })
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// General direction granted visibility of the members.
    #[must_use]
    pub const fn grantee(&self) -> Option<GeneralDirectionId> {
        self.grantee
    }

    /// General direction the members are hidden from.
    #[must_use]
    pub const fn excluded_from(&self) -> Option<GeneralDirectionId> {
        self.excluded_from
    }

    /// Member employee numbers.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<EmployeeNumber> {
        &self.members
    }

    /// Whether `number` belongs to the group.
    #[must_use]
    pub fn contains(&self, number: EmployeeNumber) -> bool {
        self.members.contains(&number)
    }
}

/// How an employee relates to one general direction's visibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralDirectionOutcome {
    /// The employee number is hidden from the general direction.
    Excluded,
    /// The employee is recorded under the general direction.
    Contained,
    /// The employee number is granted to the general direction.
    Granted,
    /// None of the above.
    Outside,
}

impl GeneralDirectionOutcome {
    /// Whether the general-direction tier is satisfied.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Contained | Self::Granted)
    }
}

/// Merged exception rule for one general direction.
///
/// An employee is visible within general direction `gd` when its number is
/// not excluded from `gd`, and it is either recorded under `gd` or its number
/// is granted to `gd`. Exclusion wins over a grant.
///
/// [`GeneralDirectionRule::outcome`] applies the rule to one record and
/// [`GeneralDirectionRule::to_constraint`] expresses the same rule as a
/// constraint; keep the two in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralDirectionRule {
    general_direction: GeneralDirectionId,
    granted: BTreeSet<EmployeeNumber>,
    excluded: BTreeSet<EmployeeNumber>,
}

impl GeneralDirectionRule {
    /// Rule with no exceptions: plain general-direction equality.
    #[must_use]
    pub const fn plain(general_direction: GeneralDirectionId) -> Self {
        Self {
            general_direction,
            granted: BTreeSet::new(),
            excluded: BTreeSet::new(),
        }
    }

    /// General direction the rule is keyed on.
    #[must_use]
    pub const fn general_direction(&self) -> GeneralDirectionId {
        self.general_direction
    }

    /// Employee numbers granted to the general direction.
    #[must_use]
    pub const fn granted(&self) -> &BTreeSet<EmployeeNumber> {
        &self.granted
    }

    /// Employee numbers hidden from the general direction.
    #[must_use]
    pub const fn excluded(&self) -> &BTreeSet<EmployeeNumber> {
        &self.excluded
    }

    /// Classify `employee` against the rule.
    #[must_use]
    pub fn outcome(&self, employee: &Employee) -> GeneralDirectionOutcome {
        let number = employee.employee_number;
        if self.excluded.contains(&number) {
            GeneralDirectionOutcome::Excluded
        } else if employee.scope.general_direction_id == Some(self.general_direction) {
            GeneralDirectionOutcome::Contained
        } else if self.granted.contains(&number) {
            GeneralDirectionOutcome::Granted
        } else {
            GeneralDirectionOutcome::Outside
        }
    }

    /// Express the rule as a constraint over employee fields.
    ///
    /// # Examples
    /// ```
    /// use access_scope::{Constraint, ExceptionRegistry, GeneralDirectionId};
    ///
    /// let registry = ExceptionRegistry::builtin();
    /// let rule = registry.general_direction_rule(GeneralDirectionId::new(5));
    /// assert_eq!(
    ///     rule.to_constraint(),
    ///     Constraint::GeneralDirection(GeneralDirectionId::new(5))
    /// );
    /// ```
    #[must_use]
    pub fn to_constraint(&self) -> Constraint {
        let recorded = Constraint::GeneralDirection(self.general_direction);
        let visible = if self.granted.is_empty() {
            recorded
        } else {
            Constraint::any([recorded, Constraint::employee_number_in(self.granted.clone())])
        };
        if self.excluded.is_empty() {
            visible
        } else {
            Constraint::all([
                visible,
                Constraint::negate(Constraint::employee_number_in(self.excluded.clone())),
            ])
        }
    }
}

/// Immutable, process-wide table of exception groups.
///
/// # Examples
/// ```
/// use access_scope::{EmployeeNumber, ExceptionRegistry, GeneralDirectionId};
///
/// let registry = ExceptionRegistry::builtin();
/// let number = EmployeeNumber::new(20902);
/// assert!(registry.is_granted(GeneralDirectionId::new(28), number));
/// assert!(registry.is_excluded(GeneralDirectionId::new(18), number));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExceptionRegistry {
    groups: Vec<ExceptionGroup>,
    rules: BTreeMap<GeneralDirectionId, GeneralDirectionRule>,
}

impl ExceptionRegistry {
    /// Registry holding only the legacy general-direction 18/28 group.
    #[must_use]
    pub fn builtin() -> Self {
        let legacy = ExceptionGroup {
            name: LEGACY_GROUP_NAME.to_owned(),
            grantee: Some(GeneralDirectionId::new(LEGACY_GRANTEE)),
            excluded_from: Some(GeneralDirectionId::new(LEGACY_EXCLUDED_FROM)),
            members: LEGACY_EMPLOYEE_NUMBERS
                .into_iter()
                .map(EmployeeNumber::new)
                .collect(),
        };
        Self::index(vec![legacy])
    }

    /// Build a registry from validated groups.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateGroup`] when two groups share a name.
    pub fn new(groups: Vec<ExceptionGroup>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for group in &groups {
            if !seen.insert(group.name.as_str()) {
                return Err(RegistryError::DuplicateGroup {
                    name: group.name.clone(),
                });
            }
        }
        Ok(Self::index(groups))
    }

    /// Parse a registry document from JSON.
    ///
    /// ```json
    /// {
    ///   "version": 1,
    ///   "groups": [
    ///     {"name": "GD16-VLCPC-exception", "grantee": 16, "excludedFrom": 18,
    ///      "employeeNumbers": [31001, 31002]}
    ///   ]
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the JSON is malformed, the version is
    /// unsupported, no groups are declared, or a group fails validation.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawRegistry = serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
            message: e.to_string(),
        })?;

        Self::from_raw(raw)
    }

    /// Load a registry document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }
        if raw.groups.is_empty() {
            return Err(RegistryError::EmptyGroups);
        }

        let groups = raw
            .groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                ExceptionGroup::new(
                    group.name,
                    group.grantee.map(GeneralDirectionId::new),
                    group.excluded_from.map(GeneralDirectionId::new),
                    group.employee_numbers.into_iter().map(EmployeeNumber::new),
                )
                .map_err(|err| match err {
                    RegistryError::EmptyGroupName { .. } => RegistryError::EmptyGroupName { index },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(groups)
    }

    fn index(groups: Vec<ExceptionGroup>) -> Self {
        let mut rules: BTreeMap<GeneralDirectionId, GeneralDirectionRule> = BTreeMap::new();
        for group in &groups {
            if let Some(grantee) = group.grantee {
                rules
                    .entry(grantee)
                    .or_insert_with(|| GeneralDirectionRule::plain(grantee))
                    .granted
                    .extend(group.members.iter().copied());
            }
            if let Some(excluded_from) = group.excluded_from {
                rules
                    .entry(excluded_from)
                    .or_insert_with(|| GeneralDirectionRule::plain(excluded_from))
                    .excluded
                    .extend(group.members.iter().copied());
            }
        }
        Self { groups, rules }
    }

    /// Declared groups, in document order.
    #[must_use]
    pub fn groups(&self) -> &[ExceptionGroup] {
        &self.groups
    }

    /// Find a group by name.
    #[must_use]
    pub fn find_group(&self, name: &str) -> Option<&ExceptionGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Whether `number` is granted to users acting for `acting_gd`.
    #[must_use]
    pub fn is_granted(&self, acting_gd: GeneralDirectionId, number: EmployeeNumber) -> bool {
        self.rules
            .get(&acting_gd)
            .is_some_and(|rule| rule.granted.contains(&number))
    }

    /// Whether `number` is hidden from users acting for `acting_gd`.
    #[must_use]
    pub fn is_excluded(&self, acting_gd: GeneralDirectionId, number: EmployeeNumber) -> bool {
        self.rules
            .get(&acting_gd)
            .is_some_and(|rule| rule.excluded.contains(&number))
    }

    /// Merged rule for `general_direction`.
    ///
    /// General directions untouched by any group get a plain equality rule.
    #[must_use]
    pub fn general_direction_rule(
        &self,
        general_direction: GeneralDirectionId,
    ) -> Cow<'_, GeneralDirectionRule> {
        self.rules.get(&general_direction).map_or_else(
            || Cow::Owned(GeneralDirectionRule::plain(general_direction)),
            Cow::Borrowed,
        )
    }

    /// General directions with at least one exception.
    pub fn governed_general_directions(&self) -> impl Iterator<Item = GeneralDirectionId> + '_ {
        self.rules.keys().copied()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRegistry {
    version: u32,
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawGroup {
    name: String,
    #[serde(default)]
    grantee: Option<u32>,
    #[serde(default)]
    excluded_from: Option<u32>,
    employee_numbers: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::scope::OrganizationalScope;

    const MERGED_REGISTRY_JSON: &str = r#"{
        "version": 1,
        "groups": [
            {"name": "GD16-VLCPC-exception", "grantee": 16, "excludedFrom": 18,
             "employeeNumbers": [31001, 20902]},
            {"name": "GD17-Procesos-exception", "grantee": 17, "excludedFrom": 18,
             "employeeNumbers": [32001, 20902]},
            {"name": "GD28-legacy", "grantee": 28, "excludedFrom": 18,
             "employeeNumbers": [20902, 10829]}
        ]
    }"#;

    fn gd(id: u32) -> GeneralDirectionId {
        GeneralDirectionId::new(id)
    }

    fn number(value: u32) -> EmployeeNumber {
        EmployeeNumber::new(value)
    }

    #[rstest]
    fn builtin_registry_holds_the_legacy_group() {
        let registry = ExceptionRegistry::builtin();
        let group = registry
            .find_group(LEGACY_GROUP_NAME)
            .expect("legacy group present");
        assert_eq!(group.members().len(), LEGACY_EMPLOYEE_NUMBERS.len());
        assert_eq!(group.grantee(), Some(gd(28)));
        assert_eq!(group.excluded_from(), Some(gd(18)));
    }

    #[rstest]
    fn overlapping_groups_merge_per_general_direction() {
        let registry = ExceptionRegistry::from_json(MERGED_REGISTRY_JSON).expect("valid registry");

        assert!(registry.is_granted(gd(16), number(20902)));
        assert!(registry.is_granted(gd(17), number(20902)));
        assert!(registry.is_granted(gd(28), number(20902)));
        assert!(!registry.is_granted(gd(16), number(32001)));

        let excluded = registry.general_direction_rule(gd(18)).excluded().clone();
        let expected: BTreeSet<_> = [31001, 32001, 20902, 10829].into_iter().map(number).collect();
        assert_eq!(excluded, expected);
    }

    #[rstest]
    fn unknown_general_direction_gets_a_plain_rule() {
        let registry = ExceptionRegistry::builtin();
        let rule = registry.general_direction_rule(gd(5));
        assert!(matches!(rule, Cow::Owned(_)));
        assert!(rule.granted().is_empty());
        assert!(rule.excluded().is_empty());
    }

    #[rstest]
    #[case(20902, 18, GeneralDirectionOutcome::Excluded)]
    #[case(99, 18, GeneralDirectionOutcome::Contained)]
    #[case(99, 5, GeneralDirectionOutcome::Outside)]
    fn general_direction_18_outcomes(
        #[case] value: u32,
        #[case] recorded_gd: u32,
        #[case] expected: GeneralDirectionOutcome,
    ) {
        let registry = ExceptionRegistry::builtin();
        let employee = Employee::new(
            number(value),
            "Someone",
            OrganizationalScope::general_direction(recorded_gd),
        );
        assert_eq!(
            registry.general_direction_rule(gd(18)).outcome(&employee),
            expected
        );
    }

    #[rstest]
    #[case(20902, 18, GeneralDirectionOutcome::Granted)]
    #[case(20902, 28, GeneralDirectionOutcome::Contained)]
    #[case(99, 28, GeneralDirectionOutcome::Contained)]
    #[case(99, 18, GeneralDirectionOutcome::Outside)]
    fn general_direction_28_outcomes(
        #[case] value: u32,
        #[case] recorded_gd: u32,
        #[case] expected: GeneralDirectionOutcome,
    ) {
        let registry = ExceptionRegistry::builtin();
        let employee = Employee::new(
            number(value),
            "Someone",
            OrganizationalScope::general_direction(recorded_gd),
        );
        assert_eq!(
            registry.general_direction_rule(gd(28)).outcome(&employee),
            expected
        );
    }

    #[rstest]
    fn exclusion_wins_over_grant_for_the_same_direction() {
        let group = ExceptionGroup::new("self-conflict", Some(gd(9)), Some(gd(9)), [number(1)])
            .expect("valid group");
        let registry = ExceptionRegistry::new(vec![group]).expect("valid registry");
        let employee = Employee::new(number(1), "X", OrganizationalScope::general_direction(9));
        assert_eq!(
            registry.general_direction_rule(gd(9)).outcome(&employee),
            GeneralDirectionOutcome::Excluded
        );
    }

    #[rstest]
    fn duplicate_group_names_are_rejected() {
        let make = || ExceptionGroup::new("twin", Some(gd(1)), None, [number(1)]);
        let groups = vec![make().expect("valid group"), make().expect("valid group")];
        assert_eq!(
            ExceptionRegistry::new(groups),
            Err(RegistryError::DuplicateGroup {
                name: "twin".to_owned()
            })
        );
    }

    #[rstest]
    #[case(r#"{"version": 2, "groups": []}"#, RegistryError::UnsupportedVersion { expected: 1, actual: 2 })]
    #[case(r#"{"version": 1, "groups": []}"#, RegistryError::EmptyGroups)]
    #[case(
        r#"{"version": 1, "groups": [{"name": "  ", "grantee": 3, "employeeNumbers": [1]}]}"#,
        RegistryError::EmptyGroupName { index: 0 }
    )]
    #[case(
        r#"{"version": 1, "groups": [{"name": "floating", "employeeNumbers": [1]}]}"#,
        RegistryError::UnanchoredGroup { name: "floating".to_owned() }
    )]
    #[case(
        r#"{"version": 1, "groups": [{"name": "hollow", "grantee": 3, "employeeNumbers": []}]}"#,
        RegistryError::EmptyMembers { name: "hollow".to_owned() }
    )]
    fn invalid_documents_are_rejected(#[case] json: &str, #[case] expected: RegistryError) {
        assert_eq!(ExceptionRegistry::from_json(json), Err(expected));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            ExceptionRegistry::from_json("not json"),
            Err(RegistryError::ParseError { .. })
        ));
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        let result = ExceptionRegistry::from_file(Path::new("/nonexistent/registry.json"));
        assert!(matches!(result, Err(RegistryError::IoError { .. })));
    }
}
