use crate::api::{push_filter, ApiClient, Query};
use crate::cascade::SelectOption;
use crate::error::ApiError;
use crate::models::NamedRecord;

/// What a cascade level selects. Decides which endpoint fills its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Country,
    State,
    District,
    Organization,
    Department,
    Class,
    Section,
}

impl LevelKind {
    pub fn label(self) -> &'static str {
        match self {
            LevelKind::Country => "Country",
            LevelKind::State => "State",
            LevelKind::District => "District",
            LevelKind::Organization => "Organization",
            LevelKind::Department => "Department",
            LevelKind::Class => "Class",
            LevelKind::Section => "Section",
        }
    }

    pub fn placeholder(self) -> String {
        format!("Select {}", self.label())
    }

    /// Form field name used for validation messages.
    pub fn field(self) -> &'static str {
        match self {
            LevelKind::Country => "country",
            LevelKind::State => "state",
            LevelKind::District => "district",
            LevelKind::Organization => "organization",
            LevelKind::Department => "department",
            LevelKind::Class => "class",
            LevelKind::Section => "section",
        }
    }
}

fn parent<'a>(lineage: &'a [(LevelKind, String)], kind: LevelKind) -> Option<&'a str> {
    lineage.iter().find(|(k, _)| *k == kind).map(|(_, v)| v.as_str())
}

fn segments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn missing(kind: LevelKind) -> ApiError {
    ApiError::Rejected {
        message: format!("Please select a {} first.", kind.label().to_lowercase()),
        errors: vec![],
    }
}

/// Endpoint path segments and query for the options of `kind`, given the selections above it.
/// `organization_scope` stands in for an organization level the cascade does not have
/// (org admin screens are pinned to the signed-in organization).
pub fn option_route(
    kind: LevelKind,
    lineage: &[(LevelKind, String)],
    organization_scope: Option<&str>,
) -> Result<(Vec<String>, Query), ApiError> {
    let mut query = Query::new();
    let path = match kind {
        LevelKind::Country => segments(&["locations", "countries"]),
        LevelKind::State => {
            let country = parent(lineage, LevelKind::Country).ok_or_else(|| missing(LevelKind::Country))?;
            push_filter(&mut query, "country", Some(country));
            segments(&["locations", "states"])
        }
        LevelKind::District => {
            let country = parent(lineage, LevelKind::Country).ok_or_else(|| missing(LevelKind::Country))?;
            let state = parent(lineage, LevelKind::State).ok_or_else(|| missing(LevelKind::State))?;
            push_filter(&mut query, "country", Some(country));
            push_filter(&mut query, "state", Some(state));
            segments(&["locations", "districts"])
        }
        LevelKind::Organization => {
            push_filter(&mut query, "country", parent(lineage, LevelKind::Country));
            push_filter(&mut query, "state", parent(lineage, LevelKind::State));
            push_filter(&mut query, "district", parent(lineage, LevelKind::District));
            segments(&["master", "organizations", "options"])
        }
        LevelKind::Department => {
            let organization = parent(lineage, LevelKind::Organization)
                .or(organization_scope)
                .ok_or_else(|| missing(LevelKind::Organization))?;
            segments(&["organizations", organization, "departments"])
        }
        LevelKind::Class => {
            let department = parent(lineage, LevelKind::Department).ok_or_else(|| missing(LevelKind::Department))?;
            segments(&["departments", department, "classes"])
        }
        LevelKind::Section => {
            let class = parent(lineage, LevelKind::Class).ok_or_else(|| missing(LevelKind::Class))?;
            segments(&["classes", class, "sections"])
        }
    };
    Ok((path, query))
}

/// Loads the options for one cascade level.
pub async fn fetch_level_options(
    client: ApiClient,
    kind: LevelKind,
    lineage: Vec<(LevelKind, String)>,
    organization_scope: Option<String>,
) -> Result<Vec<SelectOption>, ApiError> {
    let (path, query) = option_route(kind, &lineage, organization_scope.as_deref())?;
    let path: Vec<&str> = path.iter().map(String::as_str).collect();
    match kind {
        LevelKind::Country | LevelKind::State | LevelKind::District => {
            let names: Vec<String> = client.get_request(&path, &query).await?.into_data()?;
            Ok(names.into_iter().map(SelectOption::plain).collect())
        }
        _ => {
            let records: Vec<NamedRecord> = client.get_request(&path, &query).await?.into_data()?;
            Ok(records.into_iter().map(SelectOption::from).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage(pairs: &[(LevelKind, &str)]) -> Vec<(LevelKind, String)> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn organizations_are_filtered_by_full_location() {
        let chain = lineage(&[
            (LevelKind::Country, "India"),
            (LevelKind::State, "Karnataka"),
            (LevelKind::District, "Bangalore"),
        ]);
        let (path, query) = option_route(LevelKind::Organization, &chain, None).unwrap();
        assert_eq!(path, ["master", "organizations", "options"]);
        assert_eq!(
            query,
            vec![
                ("country", "India".to_string()),
                ("state", "Karnataka".to_string()),
                ("district", "Bangalore".to_string()),
            ]
        );
    }

    #[test]
    fn departments_use_scope_when_no_organization_level() {
        let (path, _) = option_route(LevelKind::Department, &[], Some("org-7")).unwrap();
        assert_eq!(path, ["organizations", "org-7", "departments"]);
        let chain = lineage(&[(LevelKind::Organization, "org-1")]);
        let (path, _) = option_route(LevelKind::Department, &chain, Some("org-7")).unwrap();
        assert_eq!(path, ["organizations", "org-1", "departments"]);
    }

    #[test]
    fn missing_parent_is_reported() {
        let err = option_route(LevelKind::Section, &[], None).unwrap_err();
        assert_eq!(err.user_message(), "Please select a class first.");
    }
}
