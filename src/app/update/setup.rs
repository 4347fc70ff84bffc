use iced::Task;
use tracing::{debug, info};
use crate::api::resources::{self, StructureKind};
use crate::app::state::{CascadeId, ToastKind, CLASS_LEVEL, DEPARTMENT_LEVEL, ORG_LEVEL, SECTION_LEVEL};
use crate::error::ApiError;
use crate::models::{NamedRecord, StructurePayload, Subject};
use super::apply_failure;
use super::super::{App, Message};

/// Cascade level holding the parent a new record of `kind` is created under.
fn parent_level(kind: StructureKind) -> usize {
    match kind {
        StructureKind::Department => ORG_LEVEL,
        StructureKind::Class | StructureKind::Subject => DEPARTMENT_LEVEL,
        StructureKind::Section => CLASS_LEVEL,
    }
}

/// Cascade level listing records of `kind`, if it is a cascade level at all.
fn listing_level(kind: StructureKind) -> Option<usize> {
    match kind {
        StructureKind::Department => Some(DEPARTMENT_LEVEL),
        StructureKind::Class => Some(CLASS_LEVEL),
        StructureKind::Section => Some(SECTION_LEVEL),
        StructureKind::Subject => None,
    }
}

fn input_field(kind: StructureKind) -> &'static str {
    match kind {
        StructureKind::Department => "department",
        StructureKind::Class => "class",
        StructureKind::Section => "section",
        StructureKind::Subject => "subject",
    }
}

impl App {
    pub(crate) fn create_structure(&mut self, kind: StructureKind) -> Task<Message> {
        let setup = &mut self.setup;
        if setup.saving.is_some() {
            return Task::none();
        }
        let field = input_field(kind);
        let Some(parent_id) = setup.chain.selected(parent_level(kind)).map(str::to_string) else {
            let parent = setup.chain.levels()[parent_level(kind)].key;
            setup.errors.insert(field, format!("Please select a {} first", parent.label().to_lowercase()));
            return Task::none();
        };
        let (name, code) = match kind {
            StructureKind::Department => (setup.new_department.trim(), None),
            StructureKind::Class => (setup.new_class.trim(), None),
            StructureKind::Section => (setup.new_section.trim(), None),
            StructureKind::Subject => {
                let code = setup.new_subject_code.trim();
                (setup.new_subject_name.trim(), (!code.is_empty()).then(|| code.to_string()))
            }
        };
        if name.is_empty() {
            setup.errors.insert(field, format!("{} name is required", kind.label()));
            return Task::none();
        }
        let payload = StructurePayload { name: name.to_string(), code };
        setup.saving = Some(kind);
        Task::perform(
            resources::create_structure(self.api.clone(), kind, parent_id, payload),
            move |result| Message::StructureCreated(kind, result),
        )
    }

    pub(crate) fn structure_created(
        &mut self,
        kind: StructureKind,
        result: Result<NamedRecord, ApiError>,
    ) -> Task<Message> {
        self.setup.saving = None;
        match result {
            Ok(record) => {
                info!("Created {} {} ({})", kind.label(), record.name, record.id);
                match kind {
                    StructureKind::Department => self.setup.new_department.clear(),
                    StructureKind::Class => self.setup.new_class.clear(),
                    StructureKind::Section => self.setup.new_section.clear(),
                    StructureKind::Subject => {
                        self.setup.new_subject_name.clear();
                        self.setup.new_subject_code.clear();
                    }
                }
                self.toast(ToastKind::Success, format!("{} \"{}\" created.", kind.label(), record.name));
                self.structure_changed(kind)
            }
            Err(err) => {
                let toast = apply_failure(&mut self.setup.errors, &err);
                self.report_form_failure(&format!("Could not create {}", kind.label()), &err, toast);
                Task::none()
            }
        }
    }

    pub(crate) fn structure_deleted(&mut self, kind: StructureKind) -> Task<Message> {
        self.structure_changed(kind)
    }

    fn structure_changed(&mut self, kind: StructureKind) -> Task<Message> {
        match listing_level(kind) {
            Some(level) => {
                let refresh = self.refresh_cascade_level(CascadeId::Setup, level);
                // A deleted department may take the loaded subject list with it.
                Task::batch([refresh, self.sync_setup_subjects()])
            }
            None => self.reload_setup_subjects(),
        }
    }

    /// Keeps the subject list in step with the selected department.
    pub(crate) fn sync_setup_subjects(&mut self) -> Task<Message> {
        let selected = self.setup.chain.selected(DEPARTMENT_LEVEL).map(str::to_string);
        if selected == self.setup.subjects_for {
            return Task::none();
        }
        self.setup.subjects.clear();
        self.setup.subjects_for = selected;
        self.reload_setup_subjects()
    }

    fn reload_setup_subjects(&mut self) -> Task<Message> {
        let Some(department_id) = self.setup.subjects_for.clone() else {
            self.setup.subjects_loading = false;
            return Task::none();
        };
        self.setup.subjects_loading = true;
        let key = department_id.clone();
        Task::perform(
            resources::list_subjects(self.api.clone(), department_id),
            move |result| Message::SubjectsLoaded(key.clone(), result),
        )
    }

    pub(crate) fn subjects_loaded(
        &mut self,
        department_id: String,
        result: Result<Vec<Subject>, ApiError>,
    ) -> Task<Message> {
        if self.setup.subjects_for.as_deref() != Some(department_id.as_str()) {
            debug!("Dropping subjects for department {} (no longer selected)", department_id);
            return Task::none();
        }
        self.setup.subjects_loading = false;
        match result {
            Ok(subjects) => self.setup.subjects = subjects,
            Err(err) => {
                self.setup.subjects.clear();
                self.report_error("Could not load subjects", &err);
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use crate::cascade::SelectOption;
    use crate::config::AppConfig;
    use super::*;

    fn app_with_department() -> App {
        let mut app = App::with_config(AppConfig::default());
        let chain = &mut app.setup.chain;
        chain.preset(0, SelectOption::plain("India"));
        chain.preset(1, SelectOption::plain("Karnataka"));
        chain.preset(2, SelectOption::plain("Bangalore"));
        chain.preset(ORG_LEVEL, SelectOption::new("org-1", "Greenwood High"));
        app
    }

    #[test]
    fn class_needs_a_department() {
        let mut app = app_with_department();
        app.setup.new_class = "Grade 5".into();
        let _ = app.update(Message::CreateStructure(StructureKind::Class));
        assert_eq!(app.setup.errors.get("class"), Some("Please select a department first"));
        assert_eq!(app.setup.saving, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut app = app_with_department();
        let _ = app.update(Message::CreateStructure(StructureKind::Department));
        assert_eq!(app.setup.errors.get("department"), Some("Department name is required"));
    }

    #[test]
    fn created_department_refreshes_level() {
        let mut app = app_with_department();
        app.setup.new_department = "Science".into();
        let _ = app.update(Message::CreateStructure(StructureKind::Department));
        assert_eq!(app.setup.saving, Some(StructureKind::Department));
        let record = NamedRecord { id: "d1".into(), name: "Science".into() };
        let _ = app.update(Message::StructureCreated(StructureKind::Department, Ok(record)));
        assert!(app.setup.new_department.is_empty());
        assert!(app.setup.chain.is_loading(DEPARTMENT_LEVEL));
        assert_eq!(app.setup.saving, None);
    }

    #[test]
    fn subjects_follow_selected_department() {
        let mut app = app_with_department();
        app.setup.chain.preset(DEPARTMENT_LEVEL, SelectOption::new("d1", "Science"));
        let _ = app.sync_setup_subjects();
        assert_eq!(app.setup.subjects_for.as_deref(), Some("d1"));
        assert!(app.setup.subjects_loading);

        app.setup.chain.preset(DEPARTMENT_LEVEL, SelectOption::new("d2", "Arts"));
        let _ = app.sync_setup_subjects();
        let late = vec![Subject { id: "s1".into(), name: "Physics".into(), code: None }];
        let _ = app.update(Message::SubjectsLoaded("d1".into(), Ok(late)));
        assert!(app.setup.subjects.is_empty());
        assert!(app.setup.subjects_loading);
    }
}
