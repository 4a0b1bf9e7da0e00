//! UI state and key handling

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;
use shared::Role;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use super::Screen;
use crate::core::AppState;
use crate::state::Subscription;
use crate::viewmodels::{
    EmployeesViewModel, FinanceViewModel, HistoryViewModel, InventoryViewModel, LoginViewModel,
    Notice, OrdersViewModel, ViewStatus,
};

const TOAST_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    /// Command line of the current screen
    pub input: Input,
    pub input_mode: InputMode,
    pub email: Input,
    pub password: Input,
    pub login_field: LoginField,
    /// Cursor in the current screen's list
    pub selected: usize,
    pub toast: Arc<Mutex<Option<(Notice, Instant)>>>,
    pub login: Arc<LoginViewModel>,
    pub orders: Arc<OrdersViewModel>,
    pub inventory: Arc<InventoryViewModel>,
    pub finance: Arc<FinanceViewModel>,
    pub history: Arc<HistoryViewModel>,
    pub employees: Arc<EmployeesViewModel>,
    _subscriptions: Vec<Subscription>,
}

impl App {
    pub fn new(state: &AppState) -> Self {
        let login = Arc::new(LoginViewModel::new(state));
        let orders = Arc::new(OrdersViewModel::new(state));
        let inventory = Arc::new(InventoryViewModel::new(state));
        let finance = Arc::new(FinanceViewModel::new(state));
        let history = Arc::new(HistoryViewModel::new(state));
        let employees = Arc::new(EmployeesViewModel::new(state));

        let toast: Arc<Mutex<Option<(Notice, Instant)>>> = Arc::new(Mutex::new(None));
        let statuses: [&ViewStatus; 6] = [
            &login.status,
            &orders.status,
            &inventory.status,
            &finance.status,
            &history.status,
            &employees.status,
        ];
        let subscriptions = statuses
            .into_iter()
            .map(|status| {
                let toast = toast.clone();
                status.notice.subscribe(move |notice| {
                    if let Some(notice) = notice {
                        *toast.lock() = Some((notice.clone(), Instant::now()));
                    }
                })
            })
            .collect();

        let screen = if login.session.with(Option::is_some) {
            Screen::Home
        } else {
            Screen::Login
        };

        Self {
            screen,
            should_quit: false,
            input: Input::default(),
            input_mode: InputMode::default(),
            email: Input::default(),
            password: Input::default(),
            login_field: LoginField::default(),
            selected: 0,
            toast,
            login,
            orders,
            inventory,
            finance,
            history,
            employees,
            _subscriptions: subscriptions,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.login.role()
    }

    /// Toast still within its display time
    pub fn current_toast(&self) -> Option<Notice> {
        let guard = self.toast.lock();
        guard
            .as_ref()
            .filter(|(_, shown)| shown.elapsed() < TOAST_TTL)
            .map(|(notice, _)| notice.clone())
    }

    fn toast_error(&self, text: impl Into<String>) {
        *self.toast.lock() = Some((Notice::Error(text.into()), Instant::now()));
    }

    /// Per-frame housekeeping
    pub fn tick(&mut self) {
        match self.screen {
            Screen::Login if self.login.session.with(Option::is_some) => {
                self.password.reset();
                self.navigate(Screen::Home);
            }
            Screen::Login | Screen::Home => {}
            _ if !self.screen.is_allowed(self.role()) => self.navigate(Screen::Home),
            _ => {}
        }
    }

    pub fn navigate(&mut self, screen: Screen) {
        if !screen.is_allowed(self.role()) {
            self.toast_error(format!("Acceso restringido: {}", screen.title()));
            return;
        }
        tracing::debug!(screen = screen.title(), "Navigate");
        self.screen = screen;
        self.selected = 0;
        self.input.reset();
        self.input_mode = InputMode::Normal;

        match screen {
            Screen::Orders => {
                self.orders.spawn_load_menu();
            }
            Screen::Inventory => {
                self.inventory.spawn_load();
            }
            Screen::Finance => {
                self.finance.spawn_report();
            }
            Screen::History => {
                self.history.spawn_load();
            }
            Screen::Employees => {
                self.employees.spawn_load();
            }
            Screen::Login | Screen::Home => {}
        }
    }

    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Orders => self.orders.menu.with(Vec::len),
            Screen::Inventory => self.inventory.items.with(Vec::len),
            Screen::History => self.history.orders_list.with(Vec::len),
            Screen::Employees => self.employees.employees.with(Vec::len),
            _ => 0,
        }
    }

    fn move_selection(&mut self, up: bool) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        self.selected = if up {
            self.selected.saturating_sub(1)
        } else {
            (self.selected + 1).min(len - 1)
        };
        if self.screen == Screen::History {
            self.history.select(self.selected);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Home => self.handle_home_key(key),
            _ => match self.input_mode {
                InputMode::Editing => self.handle_editing_key(key),
                InputMode::Normal => self.handle_screen_key(key),
            },
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_field = match self.login_field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => {
                if self.login.status.busy.get() {
                    return;
                }
                self.login.spawn_login(
                    self.email.value().to_string(),
                    self.password.value().to_string(),
                );
            }
            _ => {
                let field = match self.login_field {
                    LoginField::Email => &mut self.email,
                    LoginField::Password => &mut self.password,
                };
                field.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('x') => {
                self.login.logout();
                self.screen = Screen::Login;
            }
            KeyCode::Char(c) => {
                let (Some(role), Some(n)) = (self.role(), c.to_digit(10)) else {
                    return;
                };
                let menu = Screen::menu_for(role);
                if let Some(screen) = (n as usize).checked_sub(1).and_then(|i| menu.get(i)) {
                    self.navigate(*screen);
                }
            }
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = self.input.value().trim().to_string();
                self.input.reset();
                if !line.is_empty() {
                    self.run_command(&line);
                }
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_screen_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.navigate(Screen::Home);
                return;
            }
            KeyCode::Char('e') | KeyCode::Char('/') => {
                self.input_mode = InputMode::Editing;
                if key.code == KeyCode::Char('/') {
                    self.input = Input::new("/".into());
                }
                return;
            }
            KeyCode::Up => return self.move_selection(true),
            KeyCode::Down => return self.move_selection(false),
            _ => {}
        }

        match self.screen {
            Screen::Orders => self.orders_key(key.code),
            Screen::Inventory => self.inventory_key(key.code),
            Screen::Finance => self.finance_key(key.code),
            Screen::History => self.history_key(key.code),
            Screen::Employees => self.employees_key(key.code),
            Screen::Login | Screen::Home => {}
        }
    }

    fn selected_plate_id(&self) -> Option<String> {
        self.orders
            .menu
            .with(|menu| menu.get(self.selected).map(|p| p.id.clone()))
    }

    fn selected_item_id(&self) -> Option<String> {
        self.inventory
            .items
            .with(|items| items.get(self.selected).map(|i| i.id.clone()))
    }

    fn selected_employee(&self) -> Option<(String, Role)> {
        self.employees.employees.with(|list| {
            list.get(self.selected)
                .map(|e| (e.uid.clone(), e.role))
        })
    }

    fn orders_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('+') | KeyCode::Right => {
                if let Some(id) = self.selected_plate_id() {
                    self.orders.increment(&id);
                }
            }
            KeyCode::Char('-') | KeyCode::Left => {
                if let Some(id) = self.selected_plate_id() {
                    self.orders.decrement(&id);
                }
            }
            KeyCode::Char('f') => {
                if !self.orders.finalizing.get() {
                    self.orders.spawn_finalize();
                }
            }
            KeyCode::Char('c') => self.orders.cancel_order(),
            KeyCode::Char('r') => {
                self.orders.spawn_load_menu();
            }
            _ => {}
        }
    }

    fn inventory_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('+') | KeyCode::Right => {
                if let Some(id) = self.selected_item_id() {
                    self.inventory.spawn_adjust(id, 1.0);
                }
            }
            KeyCode::Char('-') | KeyCode::Left => {
                if let Some(id) = self.selected_item_id() {
                    self.inventory.spawn_adjust(id, -1.0);
                }
            }
            KeyCode::Char('l') => {
                self.inventory.spawn_shopping_list();
            }
            KeyCode::Char('r') => {
                self.inventory.spawn_load();
            }
            _ => {}
        }
    }

    fn finance_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('r') => {
                self.finance.spawn_report();
            }
            KeyCode::Char('b') => {
                self.finance.spawn_best_sellers();
            }
            KeyCode::Char('s') => {
                self.finance.spawn_recommendation();
            }
            KeyCode::Char('p') => {
                self.finance.spawn_promotion();
            }
            _ => {}
        }
    }

    fn history_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.history.select(self.selected),
            KeyCode::Char('d') => {
                self.history.spawn_delete_selected();
                self.selected = 0;
            }
            KeyCode::Char('r') => {
                self.history.spawn_load();
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn employees_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('g') => {
                if let Some((uid, role)) = self.selected_employee() {
                    let next = match role {
                        Role::Manager => Role::Server,
                        Role::Server => Role::Manager,
                    };
                    self.employees.spawn_change_role(uid, next);
                }
            }
            KeyCode::Char('d') => {
                if let Some((uid, _)) = self.selected_employee() {
                    self.employees.spawn_delete(uid);
                    self.selected = 0;
                }
            }
            KeyCode::Char('r') => {
                self.employees.spawn_load();
            }
            _ => {}
        }
    }

    /// Run a command typed in the input line
    fn run_command(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = parts.first() else {
            return;
        };

        match (self.screen, head) {
            (Screen::Finance, _) if !head.starts_with('/') => {
                self.finance.spawn_ask(line.to_string());
            }
            (Screen::Orders, "/nuevo") if parts.len() >= 3 => {
                self.orders
                    .spawn_start_order(parts[1].to_string(), parts[2..].join(" "));
            }
            (Screen::Orders, "/cantidad") if parts.len() == 2 => {
                let Some(id) = self.selected_plate_id() else {
                    return;
                };
                match parts[1].parse::<i32>() {
                    Ok(qty) => {
                        if self.orders.quantity_of(&id) == 0 && qty > 0 {
                            self.orders.add_plate(&id, qty);
                        } else {
                            self.orders.set_quantity(&id, qty);
                        }
                    }
                    Err(_) => self.toast_error(format!("Cantidad inválida: {}", parts[1])),
                }
            }
            (Screen::Inventory, "/crear") if parts.len() >= 4 => {
                let Ok(quantity) = parts[parts.len() - 2].parse::<f64>() else {
                    self.toast_error("Uso: /crear <nombre> <cantidad> <unidad>");
                    return;
                };
                let name = parts[1..parts.len() - 2].join(" ");
                let unit = parts[parts.len() - 1].to_string();
                let vm = self.inventory.clone();
                tokio::spawn(async move {
                    vm.create_item(&name, quantity, &unit).await;
                });
            }
            (Screen::Inventory, "/ajustar") if parts.len() == 2 => {
                match (self.selected_item_id(), parts[1].parse::<f64>()) {
                    (Some(id), Ok(delta)) => {
                        self.inventory.spawn_adjust(id, delta);
                    }
                    _ => self.toast_error("Uso: /ajustar <delta> (seleccione un ítem)"),
                }
            }
            (Screen::Inventory, "/fijar") if parts.len() == 2 => {
                match (self.selected_item_id(), parts[1].parse::<f64>()) {
                    (Some(id), Ok(quantity)) => {
                        let vm = self.inventory.clone();
                        tokio::spawn(async move {
                            vm.set_quantity(&id, quantity).await;
                        });
                    }
                    _ => self.toast_error("Uso: /fijar <cantidad> (seleccione un ítem)"),
                }
            }
            (Screen::Employees, "/crear") if parts.len() == 4 => match parts[3].parse::<Role>() {
                Ok(role) => {
                    self.employees
                        .spawn_create(parts[1].to_string(), parts[2].to_string(), role);
                }
                Err(e) => self.toast_error(e.message),
            },
            _ => self.toast_error(format!("Comando no reconocido: {}", head)),
        }
    }

    /// Key hints for the footer
    pub fn hints(&self) -> &'static str {
        if self.input_mode == InputMode::Editing {
            return "Enter: ejecutar | Esc: salir de edición";
        }
        match self.screen {
            Screen::Login => "Tab: cambiar campo | Enter: entrar | Esc: salir",
            Screen::Home => "1-5: abrir | x: cerrar sesión | q: salir",
            Screen::Orders => {
                "/nuevo <email> <nombre> | ↑↓ plato | +/- cantidad | /cantidad <n> | f: finalizar | c: cancelar | Esc: inicio"
            }
            Screen::Inventory => {
                "/crear <nombre> <cantidad> <unidad> | /ajustar <d> | /fijar <n> | +/- | l: lista de compras | Esc: inicio"
            }
            Screen::Finance => {
                "r: reporte | b: más vendidos | s: estrategia | p: promoción | e: preguntar | Esc: inicio"
            }
            Screen::History => "↑↓ seleccionar | d: eliminar | r: recargar | Esc: inicio",
            Screen::Employees => {
                "/crear <email> <clave> <gerente|mesero> | g: cambiar rol | d: eliminar | Esc: inicio"
            }
        }
    }
}
