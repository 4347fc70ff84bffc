mod api;
mod app;
mod cascade;
mod config;
mod confirm;
mod csv_template;
mod error;
mod grouping;
mod models;
mod pagination;
mod screens;
mod style;
mod validation;

use app::App;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(App::title, App::update, App::view)
        .theme(|app: &App| app.theme.clone())
        .subscription(App::subscription)
        .window_size(iced::Size::new(1400.0, 800.0))
        .run_with(App::new)
}
