use crate::todo::models::{Priority, PriorityFilter};
use crate::todo::storage::Storage;
use crate::tui::app::App;
use crate::tui::edit::InputLine;
use crate::tui::state::{Focus, InputMode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

const FILTERS: [PriorityFilter; 4] = [
    PriorityFilter::All,
    PriorityFilter::Only(Priority::Urgent),
    PriorityFilter::Only(Priority::Medium),
    PriorityFilter::Only(Priority::Low),
];

pub fn draw<S: Storage>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Panes
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(chunks[1]);

    draw_header(frame, chunks[0], app);
    draw_lists_pane(frame, panes[0], app);
    draw_active_list(frame, panes[1], app);
    draw_footer(frame, chunks[2], app);

    if app.help_mode {
        draw_help_window(frame);
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Urgent => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn input_line<'a>(line: &'a InputLine, editing: bool, placeholder: &'a str) -> Line<'a> {
    if editing {
        let (before_cursor, after_cursor) = line.split_at_cursor();
        Line::from(vec![
            Span::raw(before_cursor),
            Span::styled("█", Style::default().fg(Color::Cyan)),
            Span::raw(after_cursor),
        ])
    } else {
        Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    }
}

fn draw_header<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let header_text = match app.store.active_list() {
        Some(list) => format!("Listes de tâches - {}", list.name),
        None => "Listes de tâches".to_string(),
    };
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Todo"))
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(header, area);
}

fn draw_lists_pane<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let editing = app.input_mode == InputMode::NewList;
    let input = Paragraph::new(input_line(&app.list_input, editing, "n: Nouvelle liste"))
        .block(pane_block("Nouvelle liste", editing));
    frame.render_widget(input, chunks[0]);

    let focused = app.focus == Focus::Lists && !app.input_mode.is_editing();
    if app.store.lists().is_empty() {
        let empty = Paragraph::new("Aucune liste")
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block("Listes", focused));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let active_id = app.store.active_list_id();
    let items: Vec<ListItem> = app
        .store
        .lists()
        .iter()
        .map(|list| {
            let style = if Some(list.id) == active_id {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} ({})", list.name, list.total_items()),
                style,
            )))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("Listes", focused))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(app.list_cursor));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_active_list<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(active) = app.store.active_list() else {
        let hint = Paragraph::new("Sélectionne ou crée une liste à gauche.")
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block("Tâches", false));
        frame.render_widget(hint, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Item form
            Constraint::Length(3), // Filters and bulk actions
            Constraint::Min(0),    // Items
        ])
        .split(area);

    let editing = app.input_mode == InputMode::NewItem;
    let mut form = input_line(&app.item_input, editing, "a: Ajouter une tâche");
    form.spans.push(Span::raw("  "));
    form.spans.push(Span::styled(
        format!("[{}]", app.pending_priority),
        Style::default().fg(priority_color(app.pending_priority)),
    ));
    let form = Paragraph::new(form).block(pane_block("Ajouter une tâche", editing));
    frame.render_widget(form, chunks[0]);

    draw_filter_bar(frame, chunks[1], app);

    let focused = app.focus == Focus::Items && !app.input_mode.is_editing();
    let visible = app.visible_items();
    if visible.is_empty() {
        let empty = Paragraph::new("Aucune tâche dans cette liste.")
            .style(Style::default().fg(Color::DarkGray))
            .block(pane_block(&active.name, focused));
        frame.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let is_selected = app.store.is_selected(item.id);
            let checkbox = if is_selected { "[x]" } else { "[ ]" };
            let text_style = if is_selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", checkbox), text_style),
                Span::styled(item.text.clone(), text_style),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", item.priority),
                    Style::default().fg(priority_color(item.priority)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(&active.name, focused))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(app.item_cursor));
    }
    frame.render_stateful_widget(list, chunks[2], &mut list_state);
}

fn draw_filter_bar<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let counts = app.counts();
    let current = app.store.filter();
    let mut spans = Vec::new();

    for filter in FILTERS {
        let style = if filter == current {
            Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!(" {} ({}) ", filter.label(), counts.for_filter(filter)),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let selected = app.store.selection().len();
    let enabled = |on: bool| {
        if on {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    spans.push(Span::raw("| "));
    spans.push(Span::styled(
        format!("Finir sélection ({})", selected),
        enabled(selected > 0),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("Tout terminer ({})", counts.total),
        enabled(counts.total > 0),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn draw_footer<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let footer_text = match app.input_mode {
        InputMode::NewList => "NOUVELLE LISTE | Enter: créer | Esc: annuler".to_string(),
        InputMode::NewItem => {
            "NOUVELLE TÂCHE | Enter: ajouter | Tab: priorité | Esc: fermer".to_string()
        }
        InputMode::Normal => format!(
            "Tâches: {} | Sélection: {} | Tab: panneau | Space: sélectionner | ?: aide | q: quitter",
            app.counts().total,
            app.store.selection().len()
        ),
    };

    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow));

    frame.render_widget(footer, area);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = [
        "Listes de tâches - Raccourcis clavier",
        "",
        "NAVIGATION:",
        "  ↑↓ / j/k          Déplacer le curseur",
        "  Tab               Changer de panneau (listes / tâches)",
        "  Enter             Ouvrir la liste sous le curseur",
        "",
        "LISTES ET TÂCHES:",
        "  n                 Nouvelle liste",
        "  a                 Ajouter une tâche (Tab: priorité)",
        "  p                 Changer la priorité des nouvelles tâches",
        "  d                 Supprimer la tâche",
        "",
        "FILTRES:",
        "  f                 Filtre suivant",
        "  0 / 1 / 2 / 3     Tous / Urgente / Moyenne / Basse",
        "",
        "TERMINER:",
        "  Space             Sélectionner / désélectionner",
        "  c                 Finir la sélection",
        "  C                 Tout terminer",
        "  Esc               Vider la sélection",
        "",
        "  ?                 Afficher cette aide (? ou Esc pour fermer)",
        "  q / Ctrl+C        Quitter",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Aide ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    let area = centered_rect(80, 80, frame.size());

    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
