//! Typed calls for each REST resource. Every function takes an owned client so
//! it can be handed straight to `Task::perform`.

use serde::de::IgnoredAny;
use tracing::info;
use crate::api::{push_filter, ApiClient, Query};
use crate::error::ApiError;
use crate::models::{
    AccountManager, AccountManagerPayload, AssignmentPayload, AssignmentRecord, Credentials, DashboardStats,
    LoginResponse, NamedRecord, NewLogin, Organization, OrganizationPayload, Page, Student, StudentPayload,
    StructurePayload, Subject, Teacher, TeacherPayload,
};

fn paging(page: u32, limit: u32) -> Query {
    vec![("page", page.max(1).to_string()), ("limit", limit.max(1).to_string())]
}

pub async fn login(client: ApiClient, credentials: Credentials) -> Result<LoginResponse, ApiError> {
    let response: LoginResponse = client.post_request(&["auth", "login"], &credentials).await?.into_data()?;
    info!("Signed in as {} ({:?})", response.user.email, response.user.role);
    Ok(response)
}

pub async fn dashboard_stats(client: ApiClient) -> Result<DashboardStats, ApiError> {
    client.get_request(&["master", "dashboard"], &[]).await?.into_data()
}

// ---- organizations ----

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationFilter {
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub search: String,
}

pub async fn list_organizations(
    client: ApiClient,
    filter: OrganizationFilter,
    page: u32,
    limit: u32,
) -> Result<Page<Organization>, ApiError> {
    let mut query = paging(page, limit);
    push_filter(&mut query, "country", filter.country.as_deref());
    push_filter(&mut query, "state", filter.state.as_deref());
    push_filter(&mut query, "district", filter.district.as_deref());
    push_filter(&mut query, "search", Some(&filter.search));
    client.get_request(&["master", "organizations"], &query).await?.into_data()
}

pub async fn create_organization(client: ApiClient, payload: OrganizationPayload) -> Result<Organization, ApiError> {
    client.post_request(&["master", "organizations"], &payload).await?.into_data()
}

pub async fn update_organization(
    client: ApiClient,
    id: String,
    payload: OrganizationPayload,
) -> Result<Organization, ApiError> {
    client.put_request(&["master", "organizations", id.as_str()], &payload).await?.into_data()
}

pub async fn toggle_organization_status(client: ApiClient, id: String) -> Result<(), ApiError> {
    client
        .patch_request::<IgnoredAny>(&["master", "organizations", id.as_str(), "status"])
        .await?
        .into_result()
        .map(|_| ())
}

pub async fn delete_organization(client: ApiClient, id: String) -> Result<(), ApiError> {
    delete(client, &["master", "organizations", id.as_str()]).await
}

// ---- account managers ----

pub async fn list_account_managers(
    client: ApiClient,
    search: String,
    page: u32,
    limit: u32,
) -> Result<Page<AccountManager>, ApiError> {
    let mut query = paging(page, limit);
    push_filter(&mut query, "search", Some(&search));
    client.get_request(&["master", "account-managers"], &query).await?.into_data()
}

/// Every account manager, for the organization form's pick list.
pub async fn all_account_managers(client: ApiClient) -> Result<Vec<AccountManager>, ApiError> {
    let page: Page<AccountManager> = client
        .get_request(&["master", "account-managers"], &paging(1, 1000))
        .await?
        .into_data()?;
    Ok(page.items)
}

pub async fn create_account_manager(
    client: ApiClient,
    payload: AccountManagerPayload,
) -> Result<AccountManager, ApiError> {
    client.post_request(&["master", "account-managers"], &payload).await?.into_data()
}

pub async fn delete_account_manager(client: ApiClient, id: String) -> Result<(), ApiError> {
    delete(client, &["master", "account-managers", id.as_str()]).await
}

// ---- academic structure ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    Department,
    Class,
    Section,
    Subject,
}

impl StructureKind {
    pub fn label(self) -> &'static str {
        match self {
            StructureKind::Department => "Department",
            StructureKind::Class => "Class",
            StructureKind::Section => "Section",
            StructureKind::Subject => "Subject",
        }
    }

    /// Collection path under the parent record.
    pub fn collection_path(self, parent_id: &str) -> [&str; 3] {
        match self {
            StructureKind::Department => ["organizations", parent_id, "departments"],
            StructureKind::Class => ["departments", parent_id, "classes"],
            StructureKind::Section => ["classes", parent_id, "sections"],
            StructureKind::Subject => ["departments", parent_id, "subjects"],
        }
    }

    pub fn item_path(self, id: &str) -> [&str; 2] {
        match self {
            StructureKind::Department => ["departments", id],
            StructureKind::Class => ["classes", id],
            StructureKind::Section => ["sections", id],
            StructureKind::Subject => ["subjects", id],
        }
    }
}

pub async fn create_structure(
    client: ApiClient,
    kind: StructureKind,
    parent_id: String,
    payload: StructurePayload,
) -> Result<NamedRecord, ApiError> {
    client.post_request(&kind.collection_path(&parent_id), &payload).await?.into_data()
}

pub async fn delete_structure(client: ApiClient, kind: StructureKind, id: String) -> Result<(), ApiError> {
    delete(client, &kind.item_path(&id)).await
}

pub async fn list_subjects(client: ApiClient, department_id: String) -> Result<Vec<Subject>, ApiError> {
    client
        .get_request(&StructureKind::Subject.collection_path(&department_id), &[])
        .await?
        .into_data()
}

// ---- logins ----

pub async fn create_login(client: ApiClient, login: NewLogin) -> Result<(), ApiError> {
    client
        .post_request::<IgnoredAny, _>(&["master", "logins"], &login)
        .await?
        .into_result()
        .map(|_| ())
}

// ---- students ----

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub department_id: Option<String>,
    pub class_id: Option<String>,
    pub section_id: Option<String>,
    pub search: String,
}

pub async fn list_students(
    client: ApiClient,
    filter: StudentFilter,
    page: u32,
    limit: u32,
) -> Result<Page<Student>, ApiError> {
    let mut query = paging(page, limit);
    push_filter(&mut query, "departmentId", filter.department_id.as_deref());
    push_filter(&mut query, "classId", filter.class_id.as_deref());
    push_filter(&mut query, "sectionId", filter.section_id.as_deref());
    push_filter(&mut query, "search", Some(&filter.search));
    client.get_request(&["org", "students"], &query).await?.into_data()
}

pub async fn create_student(client: ApiClient, payload: StudentPayload) -> Result<Student, ApiError> {
    client.post_request(&["org", "students"], &payload).await?.into_data()
}

pub async fn delete_student(client: ApiClient, id: String) -> Result<(), ApiError> {
    delete(client, &["org", "students", id.as_str()]).await
}

// ---- teachers ----

pub async fn list_teachers(client: ApiClient, search: String, page: u32, limit: u32) -> Result<Page<Teacher>, ApiError> {
    let mut query = paging(page, limit);
    push_filter(&mut query, "search", Some(&search));
    client.get_request(&["org", "teachers"], &query).await?.into_data()
}

pub async fn teacher_options(client: ApiClient, department_id: String) -> Result<Vec<NamedRecord>, ApiError> {
    let mut query = Query::new();
    push_filter(&mut query, "departmentId", Some(&department_id));
    client.get_request(&["org", "teachers", "options"], &query).await?.into_data()
}

pub async fn create_teacher(client: ApiClient, payload: TeacherPayload) -> Result<Teacher, ApiError> {
    client.post_request(&["org", "teachers"], &payload).await?.into_data()
}

pub async fn delete_teacher(client: ApiClient, id: String) -> Result<(), ApiError> {
    delete(client, &["org", "teachers", id.as_str()]).await
}

// ---- assignments ----

pub async fn list_assignments(client: ApiClient) -> Result<Vec<AssignmentRecord>, ApiError> {
    client.get_request(&["org", "assignments"], &[]).await?.into_data()
}

pub async fn create_assignment(client: ApiClient, payload: AssignmentPayload) -> Result<AssignmentRecord, ApiError> {
    client.post_request(&["org", "assignments"], &payload).await?.into_data()
}

pub async fn delete_assignment(client: ApiClient, id: String) -> Result<(), ApiError> {
    delete(client, &["org", "assignments", id.as_str()]).await
}

async fn delete(client: ApiClient, path: &[&str]) -> Result<(), ApiError> {
    client.delete_request::<IgnoredAny>(path).await?.into_result()?;
    info!("Deleted {}", path.join("/"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_paths() {
        assert_eq!(StructureKind::Class.collection_path("d1"), ["departments", "d1", "classes"]);
        assert_eq!(StructureKind::Subject.collection_path("d1"), ["departments", "d1", "subjects"]);
        assert_eq!(StructureKind::Section.item_path("s9"), ["sections", "s9"]);
    }

    #[test]
    fn paging_never_sends_zero() {
        assert_eq!(paging(0, 0), vec![("page", "1".to_string()), ("limit", "1".to_string())]);
    }
}
