use std::fmt;
use serde::{Deserialize, Serialize};
use crate::cascade::SelectOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    MasterAdmin,
    OrgAdmin,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "rows", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

/// `{id, name}` shape returned by option endpoints (organizations, departments, classes, sections).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

impl From<NamedRecord> for SelectOption {
    fn from(record: NamedRecord) -> Self {
        SelectOption::new(record.id, record.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_organizations: u32,
    #[serde(default)]
    pub active_organizations: u32,
    #[serde(default)]
    pub total_logins: u32,
    #[serde(default)]
    pub total_account_managers: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub account_manager_id: Option<String>,
    #[serde(default)]
    pub account_manager_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub country: String,
    pub state: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_manager_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountManager {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub organization_count: u32,
}

impl fmt::Display for AccountManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountManagerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Name (and optional code) posted when creating a department, class, section or subject.
#[derive(Debug, Clone, Serialize)]
pub struct StructurePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subject {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) if !code.is_empty() => write!(f, "{} ({})", self.name, code),
            _ => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    #[default]
    Principal,
    Hod,
    Teacher,
    Student,
}

impl LoginType {
    pub const ALL: &'static [LoginType] = &[
        LoginType::Principal,
        LoginType::Hod,
        LoginType::Teacher,
        LoginType::Student,
    ];

    /// Number of leading levels of the login cascade
    /// (country, state, district, organization, department, class, section)
    /// that must be chosen for this login type.
    pub fn required_depth(self) -> usize {
        match self {
            LoginType::Principal => 4,
            LoginType::Hod | LoginType::Teacher => 5,
            LoginType::Student => 7,
        }
    }
}

impl fmt::Display for LoginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            LoginType::Principal => "Principal",
            LoginType::Hod => "HOD",
            LoginType::Teacher => "Teacher",
            LoginType::Student => "Student",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogin {
    pub login_type: LoginType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub organization_ids: Vec<String>,
    pub organization_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub aadhar: String,
    pub roll_number: String,
    pub department_id: String,
    pub class_id: String,
    pub section_id: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub experience: u32,
    pub department_id: String,
}

/// Teacher-subject assignment as returned by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub department_id: String,
    pub class_id: String,
    pub section_id: String,
    pub teacher_id: String,
    #[serde(default)]
    pub subject_ids: Vec<String>,
    #[serde(default)]
    pub is_class_teacher: bool,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub subject_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    pub department_id: String,
    pub class_id: String,
    pub section_id: String,
    pub teacher_id: String,
    pub subject_ids: Vec<String>,
    pub is_class_teacher: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_rows_alias_and_defaults() {
        let page: Page<NamedRecord> =
            serde_json::from_str(r#"{"rows":[{"_id":"d1","name":"Science"}],"totalCount":1}"#).unwrap();
        assert_eq!(page.items[0].id, "d1");
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn new_login_serialises_both_organization_fields() {
        let login = NewLogin {
            login_type: LoginType::Hod,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            password: "secret123".into(),
            organization_ids: vec!["org1".into()],
            organization_id: "org1".into(),
            department_id: Some("d1".into()),
            class_id: None,
            section_id: None,
            qualification: None,
            experience: None,
            roll_number: None,
        };
        let json = serde_json::to_value(&login).unwrap();
        assert_eq!(json["loginType"], "hod");
        assert_eq!(json["organizationIds"][0], "org1");
        assert_eq!(json["organizationId"], "org1");
        assert!(json.get("classId").is_none());
    }

    #[test]
    fn login_type_depths() {
        assert_eq!(LoginType::Principal.required_depth(), 4);
        assert_eq!(LoginType::Teacher.required_depth(), 5);
        assert_eq!(LoginType::Student.required_depth(), 7);
    }
}
