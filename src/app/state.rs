use std::collections::BTreeSet;
use std::time::Instant;
use iced::Theme;
use iced_aw::date_picker::Date;
use crate::api::ApiClient;
use crate::api::options::LevelKind;
use crate::api::resources::{OrganizationFilter, StructureKind, StudentFilter};
use crate::cascade::{Cascade, SelectOption};
use crate::config::{load_config, AppConfig};
use crate::confirm::DeleteChallenge;
use crate::grouping::Expansion;
use crate::models::{
    AccountManager, AssignmentRecord, DashboardStats, LoginType, Organization, Role, SessionUser, Student,
    Subject, Teacher,
};
use crate::pagination::Pagination;
use crate::validation::FieldErrors;

pub const TOAST_TTL_SECS: u64 = 4;

pub const LOCATION_CHAIN: [LevelKind; 3] = [LevelKind::Country, LevelKind::State, LevelKind::District];
pub const ORGANIZATION_CHAIN: [LevelKind; 7] = [
    LevelKind::Country,
    LevelKind::State,
    LevelKind::District,
    LevelKind::Organization,
    LevelKind::Department,
    LevelKind::Class,
    LevelKind::Section,
];
pub const CLASS_CHAIN: [LevelKind; 3] = [LevelKind::Department, LevelKind::Class, LevelKind::Section];

/// Index of each level inside `ORGANIZATION_CHAIN`.
pub const ORG_LEVEL: usize = 3;
pub const DEPARTMENT_LEVEL: usize = 4;
pub const CLASS_LEVEL: usize = 5;
pub const SECTION_LEVEL: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
    Organizations,
    OrganizationSetup,
    Logins,
    AccountManagers,
    Students,
    Teachers,
    Assignments,
    Settings,
}

impl Screen {
    pub fn allowed_for(self, role: Role) -> bool {
        match self {
            Screen::Login | Screen::Settings => true,
            Screen::Dashboard
            | Screen::Organizations
            | Screen::OrganizationSetup
            | Screen::Logins
            | Screen::AccountManagers => role == Role::MasterAdmin,
            Screen::Students | Screen::Teachers | Screen::Assignments => role == Role::OrgAdmin,
        }
    }

    pub fn home(role: Role) -> Screen {
        match role {
            Role::MasterAdmin => Screen::Dashboard,
            Role::OrgAdmin => Screen::Students,
        }
    }
}

/// Every cascade on every screen, so fetch results can find their way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeId {
    OrganizationFilter,
    OrganizationForm,
    Setup,
    LoginForm,
    StudentFilter,
    StudentForm,
    TeacherForm,
    AssignmentForm,
}

impl CascadeId {
    /// Cascades that live inside the signed-in organization.
    pub fn is_org_scoped(self) -> bool {
        matches!(
            self,
            CascadeId::StudentFilter | CascadeId::StudentForm | CascadeId::TeacherForm | CascadeId::AssignmentForm
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Organization(String),
    AccountManager(String),
    Structure(StructureKind, String),
    Student(String),
    Teacher(String),
    Assignment(String),
}

// ---- per-screen state ----

#[derive(Debug, Default)]
pub struct DashboardPage {
    pub stats: Option<DashboardStats>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgField {
    Name,
    Email,
    Phone,
    Address,
}

#[derive(Debug)]
pub struct OrganizationForm {
    pub editing_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub location: Cascade<LevelKind>,
    pub account_manager: Option<AccountManager>,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl OrganizationForm {
    pub fn blank() -> Self {
        Self {
            editing_id: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            location: Cascade::new(LOCATION_CHAIN),
            account_manager: None,
            errors: FieldErrors::new(),
            is_saving: false,
        }
    }

    pub fn editing(org: &Organization) -> Self {
        let mut form = Self::blank();
        form.editing_id = Some(org.id.clone());
        form.name = org.name.clone();
        form.email = org.email.clone();
        form.phone = org.phone.clone();
        form.address = org.address.clone();
        for (level, value) in [&org.country, &org.state, &org.district].into_iter().enumerate() {
            if value.is_empty() {
                break;
            }
            form.location.preset(level, SelectOption::plain(value.clone()));
        }
        form.account_manager = org.account_manager_id.as_ref().map(|id| AccountManager {
            id: id.clone(),
            name: org.account_manager_name.clone().unwrap_or_else(|| id.clone()),
            email: String::new(),
            phone: String::new(),
            organization_count: 0,
        });
        form
    }

    pub fn set(&mut self, field: OrgField, value: String) {
        let (slot, key) = match field {
            OrgField::Name => (&mut self.name, "name"),
            OrgField::Email => (&mut self.email, "email"),
            OrgField::Phone => (&mut self.phone, "phone"),
            OrgField::Address => (&mut self.address, "address"),
        };
        *slot = value;
        self.errors.remove(key);
    }
}

#[derive(Debug)]
pub struct OrganizationsPage {
    pub filter: Cascade<LevelKind>,
    pub search: String,
    pub applied: OrganizationFilter,
    pub rows: Vec<Organization>,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub form: Option<OrganizationForm>,
    pub account_managers: Vec<AccountManager>,
}

impl OrganizationsPage {
    pub fn new(limit: u32) -> Self {
        Self {
            filter: Cascade::new(LOCATION_CHAIN),
            search: String::new(),
            applied: OrganizationFilter::default(),
            rows: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
            is_loading: false,
            form: None,
            account_managers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Department,
    Class,
    Section,
    SubjectName,
    SubjectCode,
}

#[derive(Debug)]
pub struct SetupPage {
    pub chain: Cascade<LevelKind>,
    pub new_department: String,
    pub new_class: String,
    pub new_section: String,
    pub new_subject_name: String,
    pub new_subject_code: String,
    pub subjects: Vec<Subject>,
    /// Department the loaded `subjects` belong to.
    pub subjects_for: Option<String>,
    pub subjects_loading: bool,
    pub errors: FieldErrors,
    pub saving: Option<StructureKind>,
}

impl Default for SetupPage {
    fn default() -> Self {
        Self {
            chain: Cascade::new(ORGANIZATION_CHAIN),
            new_department: String::new(),
            new_class: String::new(),
            new_section: String::new(),
            new_subject_name: String::new(),
            new_subject_code: String::new(),
            subjects: Vec::new(),
            subjects_for: None,
            subjects_loading: false,
            errors: FieldErrors::new(),
            saving: None,
        }
    }
}

impl SetupPage {
    pub fn set(&mut self, field: SetupField, value: String) {
        let (slot, key) = match field {
            SetupField::Department => (&mut self.new_department, "department"),
            SetupField::Class => (&mut self.new_class, "class"),
            SetupField::Section => (&mut self.new_section, "section"),
            SetupField::SubjectName => (&mut self.new_subject_name, "subject"),
            SetupField::SubjectCode => (&mut self.new_subject_code, "subjectCode"),
        };
        *slot = value;
        self.errors.remove(key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
    Phone,
    Password,
    Qualification,
    Experience,
    RollNumber,
}

#[derive(Debug)]
pub struct LoginsPage {
    pub login_type: LoginType,
    pub chain: Cascade<LevelKind>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub qualification: String,
    pub experience: String,
    pub roll_number: String,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl Default for LoginsPage {
    fn default() -> Self {
        Self {
            login_type: LoginType::default(),
            chain: Cascade::new(ORGANIZATION_CHAIN),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            qualification: String::new(),
            experience: String::new(),
            roll_number: String::new(),
            errors: FieldErrors::new(),
            is_saving: false,
        }
    }
}

impl LoginsPage {
    pub fn set(&mut self, field: LoginField, value: String) {
        let (slot, key) = match field {
            LoginField::Name => (&mut self.name, "name"),
            LoginField::Email => (&mut self.email, "email"),
            LoginField::Phone => (&mut self.phone, "phone"),
            LoginField::Password => (&mut self.password, "password"),
            LoginField::Qualification => (&mut self.qualification, "qualification"),
            LoginField::Experience => (&mut self.experience, "experience"),
            LoginField::RollNumber => (&mut self.roll_number, "rollNumber"),
        };
        *slot = value;
        self.errors.remove(key);
    }

    /// Clears the personal fields but keeps login type and the chosen organization chain.
    pub fn clear_personal_fields(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.password.clear();
        self.qualification.clear();
        self.experience.clear();
        self.roll_number.clear();
        self.errors.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerField {
    Name,
    Email,
    Phone,
}

#[derive(Debug, Default)]
pub struct AccountManagerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl AccountManagerForm {
    pub fn set(&mut self, field: ManagerField, value: String) {
        let (slot, key) = match field {
            ManagerField::Name => (&mut self.name, "name"),
            ManagerField::Email => (&mut self.email, "email"),
            ManagerField::Phone => (&mut self.phone, "phone"),
        };
        *slot = value;
        self.errors.remove(key);
    }
}

#[derive(Debug)]
pub struct AccountManagersPage {
    pub search: String,
    pub applied_search: String,
    pub rows: Vec<AccountManager>,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub form: Option<AccountManagerForm>,
}

impl AccountManagersPage {
    pub fn new(limit: u32) -> Self {
        Self {
            search: String::new(),
            applied_search: String::new(),
            rows: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
            is_loading: false,
            form: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    Phone,
    Aadhar,
    RollNumber,
}

#[derive(Debug)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub aadhar: String,
    pub roll_number: String,
    pub placement: Cascade<LevelKind>,
    pub date_of_birth: Option<Date>,
    pub show_date_picker: bool,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            aadhar: String::new(),
            roll_number: String::new(),
            placement: Cascade::new(CLASS_CHAIN),
            date_of_birth: None,
            show_date_picker: false,
            errors: FieldErrors::new(),
            is_saving: false,
        }
    }
}

impl StudentForm {
    pub fn set(&mut self, field: StudentField, value: String) {
        let (slot, key) = match field {
            StudentField::Name => (&mut self.name, "name"),
            StudentField::Email => (&mut self.email, "email"),
            StudentField::Phone => (&mut self.phone, "phone"),
            StudentField::Aadhar => (&mut self.aadhar, "aadhar"),
            StudentField::RollNumber => (&mut self.roll_number, "rollNumber"),
        };
        *slot = value;
        self.errors.remove(key);
    }
}

#[derive(Debug)]
pub struct StudentsPage {
    pub filter: Cascade<LevelKind>,
    pub search: String,
    pub applied: StudentFilter,
    pub rows: Vec<Student>,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub form: Option<StudentForm>,
}

impl StudentsPage {
    pub fn new(limit: u32) -> Self {
        Self {
            filter: Cascade::new(CLASS_CHAIN),
            search: String::new(),
            applied: StudentFilter::default(),
            rows: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
            is_loading: false,
            form: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherField {
    Name,
    Email,
    Phone,
    Qualification,
    Experience,
}

#[derive(Debug)]
pub struct TeacherForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    pub experience: String,
    pub department: Cascade<LevelKind>,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl Default for TeacherForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            qualification: String::new(),
            experience: String::new(),
            department: Cascade::new([LevelKind::Department]),
            errors: FieldErrors::new(),
            is_saving: false,
        }
    }
}

impl TeacherForm {
    pub fn set(&mut self, field: TeacherField, value: String) {
        let (slot, key) = match field {
            TeacherField::Name => (&mut self.name, "name"),
            TeacherField::Email => (&mut self.email, "email"),
            TeacherField::Phone => (&mut self.phone, "phone"),
            TeacherField::Qualification => (&mut self.qualification, "qualification"),
            TeacherField::Experience => (&mut self.experience, "experience"),
        };
        *slot = value;
        self.errors.remove(key);
    }
}

#[derive(Debug)]
pub struct TeachersPage {
    pub search: String,
    pub applied_search: String,
    pub rows: Vec<Teacher>,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub form: Option<TeacherForm>,
}

impl TeachersPage {
    pub fn new(limit: u32) -> Self {
        Self {
            search: String::new(),
            applied_search: String::new(),
            rows: Vec::new(),
            pagination: Pagination::new(1, limit, 0),
            is_loading: false,
            form: None,
        }
    }
}

#[derive(Debug)]
pub struct AssignmentForm {
    pub placement: Cascade<LevelKind>,
    pub teachers: Vec<SelectOption>,
    pub teacher: Option<SelectOption>,
    pub subjects: Vec<Subject>,
    pub selected_subjects: BTreeSet<String>,
    pub is_class_teacher: bool,
    /// Department whose teachers and subjects are loaded (or loading).
    pub options_for: Option<String>,
    pub options_loading: bool,
    pub errors: FieldErrors,
    pub is_saving: bool,
}

impl Default for AssignmentForm {
    fn default() -> Self {
        Self {
            placement: Cascade::new(CLASS_CHAIN),
            teachers: Vec::new(),
            teacher: None,
            subjects: Vec::new(),
            selected_subjects: BTreeSet::new(),
            is_class_teacher: false,
            options_for: None,
            options_loading: false,
            errors: FieldErrors::new(),
            is_saving: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct AssignmentsPage {
    pub records: Vec<AssignmentRecord>,
    pub is_loading: bool,
    pub expansion: Expansion,
    pub form: Option<AssignmentForm>,
}

#[derive(Debug, Default)]
pub struct SettingsForm {
    pub api_base_url: String,
    pub page_limit: u32,
    pub error: Option<String>,
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub api: ApiClient,
    pub current_screen: Screen,
    pub session: Option<SessionUser>,
    //
    pub login_email: String,
    pub login_password: String,
    pub login_error: Option<String>,
    pub is_signing_in: bool,
    //
    pub toasts: Vec<Toast>,
    pub next_toast_id: u64,
    pub delete_challenge: Option<DeleteChallenge<DeleteTarget>>,
    //
    pub dashboard: DashboardPage,
    pub organizations: OrganizationsPage,
    pub setup: SetupPage,
    pub logins: LoginsPage,
    pub account_managers: AccountManagersPage,
    pub students: StudentsPage,
    pub teachers: TeachersPage,
    pub assignments: AssignmentsPage,
    pub settings: SettingsForm,
}

impl App {
    pub fn with_config(config: AppConfig) -> Self {
        let limit = config.page_limit;
        Self {
            theme: config.theme(),
            api: ApiClient::new(&config.api_base_url, config.request_timeout()),
            current_screen: Screen::default(),
            session: None,
            login_email: String::new(),
            login_password: String::new(),
            login_error: None,
            is_signing_in: false,
            toasts: Vec::new(),
            next_toast_id: 0,
            delete_challenge: None,
            dashboard: DashboardPage::default(),
            organizations: OrganizationsPage::new(limit),
            setup: SetupPage::default(),
            logins: LoginsPage::default(),
            account_managers: AccountManagersPage::new(limit),
            students: StudentsPage::new(limit),
            teachers: TeachersPage::new(limit),
            assignments: AssignmentsPage::default(),
            settings: SettingsForm::default(),
            config,
        }
    }

    /// Drops everything tied to the signed-in user.
    pub fn reset_session_state(&mut self) {
        let limit = self.config.page_limit;
        self.session = None;
        self.api.set_token(None);
        self.delete_challenge = None;
        self.dashboard = DashboardPage::default();
        self.organizations = OrganizationsPage::new(limit);
        self.setup = SetupPage::default();
        self.logins = LoginsPage::default();
        self.account_managers = AccountManagersPage::new(limit);
        self.students = StudentsPage::new(limit);
        self.teachers = TeachersPage::new(limit);
        self.assignments = AssignmentsPage::default();
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn organization_scope(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.organization_id.clone())
    }

    pub fn cascade(&self, id: CascadeId) -> Option<&Cascade<LevelKind>> {
        match id {
            CascadeId::OrganizationFilter => Some(&self.organizations.filter),
            CascadeId::OrganizationForm => self.organizations.form.as_ref().map(|f| &f.location),
            CascadeId::Setup => Some(&self.setup.chain),
            CascadeId::LoginForm => Some(&self.logins.chain),
            CascadeId::StudentFilter => Some(&self.students.filter),
            CascadeId::StudentForm => self.students.form.as_ref().map(|f| &f.placement),
            CascadeId::TeacherForm => self.teachers.form.as_ref().map(|f| &f.department),
            CascadeId::AssignmentForm => self.assignments.form.as_ref().map(|f| &f.placement),
        }
    }

    pub fn cascade_mut(&mut self, id: CascadeId) -> Option<&mut Cascade<LevelKind>> {
        match id {
            CascadeId::OrganizationFilter => Some(&mut self.organizations.filter),
            CascadeId::OrganizationForm => self.organizations.form.as_mut().map(|f| &mut f.location),
            CascadeId::Setup => Some(&mut self.setup.chain),
            CascadeId::LoginForm => Some(&mut self.logins.chain),
            CascadeId::StudentFilter => Some(&mut self.students.filter),
            CascadeId::StudentForm => self.students.form.as_mut().map(|f| &mut f.placement),
            CascadeId::TeacherForm => self.teachers.form.as_mut().map(|f| &mut f.department),
            CascadeId::AssignmentForm => self.assignments.form.as_mut().map(|f| &mut f.placement),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(load_config())
    }
}
