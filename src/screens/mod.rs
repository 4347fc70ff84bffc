pub mod widgets;
pub mod login;
pub mod nav_menu;
pub mod settings;
pub mod dashboard;
pub mod organizations;
pub mod setup;
pub mod logins;
pub mod account_managers;
pub mod students;
pub mod teachers;
pub mod assignments;

pub use login::login_screen;
pub use nav_menu::nav_menu;
pub use settings::settings_screen;
pub use dashboard::dashboard_screen;
pub use organizations::organizations_screen;
pub use setup::setup_screen;
pub use logins::logins_screen;
pub use account_managers::account_managers_screen;
pub use students::students_screen;
pub use teachers::teachers_screen;
pub use assignments::assignments_screen;
