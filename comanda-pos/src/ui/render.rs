//! Screen rendering

use ratatui::{prelude::*, widgets::*};

use super::Screen;
use super::app::{App, InputMode, LoginField};
use crate::advisory::prompts::LOW_STOCK_THRESHOLD;

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Screen
            Constraint::Length(3), // Toast
            Constraint::Length(3), // Input
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.screen {
        Screen::Login => draw_login(f, app, chunks[1]),
        Screen::Home => draw_home(f, app, chunks[1]),
        Screen::Orders => draw_orders(f, app, chunks[1]),
        Screen::Inventory => draw_inventory(f, app, chunks[1]),
        Screen::Finance => draw_finance(f, app, chunks[1]),
        Screen::History => draw_history(f, app, chunks[1]),
        Screen::Employees => draw_employees(f, app, chunks[1]),
    }
    draw_toast(f, app, chunks[2]);
    draw_input(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app
        .login
        .session
        .with(|s| s.as_ref().map(|s| format!("{} ({})", s.email, s.role.as_str())))
        .unwrap_or_else(|| "sin sesión".to_string());

    let title = Paragraph::new(Line::from(vec![
        Span::raw(" Comanda "),
        Span::styled(
            format!(" {} ", app.screen.title()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" | "),
        Span::styled(user, Style::default().fg(Color::Green)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(title, area);
}

fn draw_toast(f: &mut Frame, app: &App, area: Rect) {
    let busy = [
        &app.login.status,
        &app.orders.status,
        &app.inventory.status,
        &app.finance.status,
        &app.history.status,
        &app.employees.status,
    ]
    .iter()
    .any(|s| s.busy.get());

    let line = match app.current_toast() {
        Some(notice) => {
            let color = if notice.is_error() { Color::Red } else { Color::Green };
            Line::from(Span::styled(notice.text().to_string(), Style::default().fg(color)))
        }
        None if busy => Line::from(Span::styled(
            "Procesando...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        )),
        None => Line::from(""),
    };
    f.render_widget(
        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let style = match app.input_mode {
        InputMode::Normal => Style::default().fg(Color::Gray),
        InputMode::Editing => Style::default().fg(Color::Yellow),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.hints()));

    let width = area.width.max(3) - 3;
    let scroll = app.input.visual_scroll(width as usize);
    let input = Paragraph::new(app.input.value())
        .style(style)
        .scroll((0, scroll as u16))
        .block(block);
    f.render_widget(input, area);

    if app.input_mode == InputMode::Editing && !matches!(app.screen, Screen::Login | Screen::Home) {
        f.set_cursor_position((
            area.x + ((app.input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn draw_login(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);
    let columns = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(r)[1]
    };
    let email_area = columns(rows[1]);
    let password_area = columns(rows[2]);

    let field_style = |field: LoginField| {
        if app.login_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    f.render_widget(
        Paragraph::new(app.email.value())
            .style(field_style(LoginField::Email))
            .block(panel("Email")),
        email_area,
    );
    let masked = "*".repeat(app.password.value().chars().count());
    f.render_widget(
        Paragraph::new(masked)
            .style(field_style(LoginField::Password))
            .block(panel("Contraseña")),
        password_area,
    );

    let (target, input) = match app.login_field {
        LoginField::Email => (email_area, &app.email),
        LoginField::Password => (password_area, &app.password),
    };
    f.set_cursor_position((target.x + input.visual_cursor() as u16 + 1, target.y + 1));
}

fn draw_home(f: &mut Frame, app: &App, area: Rect) {
    let Some(role) = app.role() else {
        return;
    };
    let items: Vec<ListItem> = Screen::menu_for(role)
        .iter()
        .enumerate()
        .map(|(i, s)| ListItem::new(format!(" {}. {}", i + 1, s.title())))
        .collect();
    f.render_widget(List::new(items).block(panel("Menú")), area);
}

fn draw_orders(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let cart = app.orders.cart.get();
    let menu_items: Vec<ListItem> = app.orders.menu.with(|menu| {
        menu.iter()
            .map(|plate| {
                let qty = cart
                    .as_ref()
                    .and_then(|o| o.line(&plate.id))
                    .map_or(0, |l| l.quantity);
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<28}", plate.name)),
                    Span::styled(money(plate.price), Style::default().fg(Color::Green)),
                    Span::styled(
                        if qty > 0 { format!("  x{}", qty) } else { String::new() },
                        Style::default().fg(Color::Yellow),
                    ),
                ]))
            })
            .collect()
    });
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(
        List::new(menu_items).block(panel("Menú")).highlight_style(highlight()),
        columns[0],
        &mut state,
    );

    let mut lines = Vec::new();
    match &cart {
        None => lines.push(Line::from("Sin pedido activo. Use /nuevo <email> <nombre>.")),
        Some(order) => {
            lines.push(Line::from(vec![
                Span::raw("Cliente: "),
                Span::styled(order.customer_name().to_string(), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(""));
            for line in order.lines() {
                lines.push(Line::from(format!(
                    "{} x{} = {}",
                    line.name,
                    line.quantity,
                    money(line.unit_price * f64::from(line.quantity))
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Total: {}", money(order.total())),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        }
    }
    f.render_widget(
        Paragraph::new(lines).block(panel("Pedido actual")).wrap(Wrap { trim: true }),
        columns[1],
    );
}

fn draw_inventory(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let items: Vec<ListItem> = app.inventory.items.with(|items| {
        items
            .iter()
            .map(|item| {
                let style = if item.is_low(LOW_STOCK_THRESHOLD) {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(
                    format!("{:<24}{} {}", item.name, item.quantity, item.unit),
                    style,
                ))
            })
            .collect()
    });
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(
        List::new(items).block(panel("Inventario")).highlight_style(highlight()),
        columns[0],
        &mut state,
    );

    let low = app.inventory.low_stock().len();
    let advice = app.inventory.advice.get();
    let text = if advice.is_empty() {
        format!("{} ítems con stock bajo. Pulse 'l' para pedir una lista de compras.", low)
    } else {
        advice
    };
    f.render_widget(
        Paragraph::new(text).block(panel("Lista de compras (IA)")).wrap(Wrap { trim: true }),
        columns[1],
    );
}

fn draw_finance(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Min(3),
        ])
        .split(area);

    let kpis = match app.finance.report.get() {
        None => vec![Line::from("Sin reporte. Pulse 'r'.")],
        Some(report) => vec![
            Line::from(format!("Pedidos: {}", report.order_count)),
            Line::from(format!("Ingreso bruto: {}", money(report.gross_revenue))),
            Line::from(format!("Ticket promedio: {}", money(report.average_order_value))),
            Line::from(format!(
                "Ticket mín / máx: {} / {}",
                report.min_ticket.map_or("-".to_string(), money),
                report.max_ticket.map_or("-".to_string(), money)
            )),
            Line::from(format!("Clientes únicos: {}", report.unique_customers)),
        ],
    };
    f.render_widget(Paragraph::new(kpis).block(panel("Indicadores")), rows[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let trend: Vec<ListItem> = app
        .finance
        .trend
        .get()
        .iter()
        .map(|d| ListItem::new(format!("{}  {}", d.date.format("%Y-%m-%d"), money(d.revenue))))
        .collect();
    f.render_widget(List::new(trend).block(panel("Tendencia diaria")), middle[0]);

    let top: Vec<ListItem> = app
        .finance
        .top_products
        .get()
        .iter()
        .enumerate()
        .map(|(i, p)| ListItem::new(format!("{}. {} ({})", i + 1, p.name, p.quantity)))
        .collect();
    f.render_widget(List::new(top).block(panel("Más vendidos")), middle[1]);

    f.render_widget(
        Paragraph::new(app.finance.answer.get())
            .block(panel("Asistente IA"))
            .wrap(Wrap { trim: true }),
        rows[2],
    );
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = app.history.orders_list.with(|orders| {
        orders
            .iter()
            .map(|o| {
                ListItem::new(format!(
                    "{}  {:<20}{}",
                    o.created_at().format("%Y-%m-%d %H:%M"),
                    o.customer_name(),
                    money(o.total())
                ))
            })
            .collect()
    });
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(
        List::new(items).block(panel("Pedidos")).highlight_style(highlight()),
        columns[0],
        &mut state,
    );

    let detail: Vec<Line> = match app.history.selected_order() {
        None => vec![Line::from("Seleccione un pedido.")],
        Some(order) => {
            let mut lines = vec![
                Line::from(format!("Pedido: {}", order.id().unwrap_or("-"))),
                Line::from(format!("Cliente: {}", order.customer_name())),
                Line::from(""),
            ];
            lines.extend(order.lines().iter().map(|l| {
                Line::from(format!("{} x{} @ {}", l.name, l.quantity, money(l.unit_price)))
            }));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Total: {}", money(order.total()))));
            lines
        }
    };
    f.render_widget(
        Paragraph::new(detail).block(panel("Detalle")).wrap(Wrap { trim: true }),
        columns[1],
    );
}

fn draw_employees(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app.employees.employees.with(|list| {
        list.iter()
            .map(|e| {
                let color = if e.role.is_manager() { Color::Magenta } else { Color::White };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<32}", e.email)),
                    Span::styled(e.role.as_str(), Style::default().fg(color)),
                ]))
            })
            .collect()
    });
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(
        List::new(items).block(panel("Empleados")).highlight_style(highlight()),
        area,
        &mut state,
    );
}
