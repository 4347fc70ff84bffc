use std::path::PathBuf;
use std::time::Instant;
use iced_aw::date_picker::Date;
use crate::api::resources::StructureKind;
use crate::app::state::{
    CascadeId, DeleteTarget, LoginField, ManagerField, OrgField, Screen, SetupField, StudentField, TeacherField,
};
use crate::cascade::{FetchTicket, SelectOption};
use crate::csv_template::CsvTemplate;
use crate::error::{ApiError, TemplateError};
use crate::models::{
    AccountManager, AssignmentRecord, DashboardStats, LoginResponse, LoginType, NamedRecord, Organization, Page,
    Student, Subject, Teacher,
};

#[derive(Debug, Clone)]
pub enum Message {
    LoginEmailChanged(String),
    LoginPasswordChanged(String),
    LoginPressed,
    LoggedIn(Result<LoginResponse, ApiError>),
    Logout,
    Navigate(Screen),
    //
    Tick(Instant),
    DismissToast(u64),
    //
    CascadeSelected(CascadeId, usize, String),
    CascadeOptionsLoaded(CascadeId, FetchTicket, Result<Vec<SelectOption>, ApiError>),
    // Delete confirmation
    RequestDelete(DeleteTarget, String),
    DeleteAnswerChanged(String),
    ConfirmDelete,
    CancelDelete,
    Deleted(DeleteTarget, Result<(), ApiError>),
    //
    RefreshDashboard,
    DashboardLoaded(Result<DashboardStats, ApiError>),
    // Organizations
    OrgSearchChanged(String),
    OrgApplyFilter,
    OrgResetFilter,
    OrgPageRequested(u32),
    OrganizationsLoaded(Result<Page<Organization>, ApiError>),
    OpenOrganizationForm(Option<Organization>),
    CloseOrganizationForm,
    OrgFormFieldChanged(OrgField, String),
    OrgFormManagerSelected(AccountManager),
    AccountManagerOptionsLoaded(Result<Vec<AccountManager>, ApiError>),
    SubmitOrganization,
    OrganizationSaved(Result<Organization, ApiError>),
    ToggleOrganizationStatus(String),
    OrganizationStatusToggled(Result<(), ApiError>),
    // Organization setup
    SetupFieldChanged(SetupField, String),
    CreateStructure(StructureKind),
    StructureCreated(StructureKind, Result<NamedRecord, ApiError>),
    SubjectsLoaded(String, Result<Vec<Subject>, ApiError>),
    // Logins
    LoginTypeSelected(LoginType),
    LoginFieldChanged(LoginField, String),
    SubmitLogin,
    LoginCreated(Result<(), ApiError>),
    DownloadTemplate(CsvTemplate),
    TemplateSaved(Result<PathBuf, TemplateError>),
    // Account managers
    ManagerSearchChanged(String),
    ManagerApplySearch,
    ManagerPageRequested(u32),
    AccountManagersLoaded(Result<Page<AccountManager>, ApiError>),
    ToggleManagerForm(bool),
    ManagerFieldChanged(ManagerField, String),
    SubmitManager,
    ManagerSaved(Result<AccountManager, ApiError>),
    // Students
    StudentSearchChanged(String),
    StudentApplyFilter,
    StudentResetFilter,
    StudentPageRequested(u32),
    StudentsLoaded(Result<Page<Student>, ApiError>),
    ToggleStudentForm(bool),
    StudentFieldChanged(StudentField, String),
    ChooseBirthDate,
    CancelBirthDate,
    SubmitBirthDate(Date),
    SubmitStudent,
    StudentSaved(Result<Student, ApiError>),
    // Teachers
    TeacherSearchChanged(String),
    TeacherApplySearch,
    TeacherPageRequested(u32),
    TeachersLoaded(Result<Page<Teacher>, ApiError>),
    ToggleTeacherForm(bool),
    TeacherFieldChanged(TeacherField, String),
    SubmitTeacher,
    TeacherSaved(Result<Teacher, ApiError>),
    // Assignments
    LoadAssignments,
    AssignmentsLoaded(Result<Vec<AssignmentRecord>, ApiError>),
    ToggleDepartment(String),
    ToggleSection(String),
    ToggleAssignmentForm(bool),
    AssignmentTeacherSelected(SelectOption),
    AssignmentSubjectToggled(String, bool),
    AssignmentClassTeacherToggled(bool),
    AssignmentOptionsLoaded(String, Result<(Vec<NamedRecord>, Vec<Subject>), ApiError>),
    SubmitAssignment,
    AssignmentSaved(Result<AssignmentRecord, ApiError>),
    // Settings
    ThemeSelected(&'static str),
    SettingsApiUrlChanged(String),
    SettingsPageLimitSelected(u32),
    SaveSettings,
    //
    NoOp,
}
