//! Terminal UI
//!
//! One screen at a time. Screens read view-model state every frame and
//! dispatch user actions as background tasks; notices from every
//! view-model are collected into a single toast line.

pub mod app;
mod render;

pub use app::App;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use shared::Role;

use crate::core::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
    Orders,
    Inventory,
    Finance,
    History,
    Employees,
}

impl Screen {
    /// Entries of the home menu, in display order
    pub const MENU: [Screen; 5] = [
        Screen::Orders,
        Screen::Inventory,
        Screen::Finance,
        Screen::History,
        Screen::Employees,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Iniciar sesión",
            Screen::Home => "Inicio",
            Screen::Orders => "Pedidos",
            Screen::Inventory => "Inventario",
            Screen::Finance => "Finanzas",
            Screen::History => "Historial",
            Screen::Employees => "Empleados",
        }
    }

    /// Whether a user with `role` (None = logged out) may open this screen
    pub fn is_allowed(&self, role: Option<Role>) -> bool {
        match (self, role) {
            (Screen::Login, _) => true,
            (_, None) => false,
            (Screen::Employees, Some(role)) => role.is_manager(),
            (_, Some(_)) => true,
        }
    }

    /// Home menu filtered by role
    pub fn menu_for(role: Role) -> Vec<Screen> {
        Self::MENU
            .into_iter()
            .filter(|s| s.is_allowed(Some(role)))
            .collect()
    }
}

/// Take over the terminal until the user quits
pub async fn run(state: AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&state);
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| render::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    app.handle_key(key);
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}
