use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table};

use super::app::{LogEntry, StatusMessage, DRAWER_ITEMS};
use crate::models::ChargingPoint;

const BRAND_BLUE: Color = Color::Rgb(0x17, 0x50, 0x97);
const BRAND_ORANGE: Color = Color::Rgb(0xFF, 0x56, 0x27);

pub const TABLE_HEADERS: [&str; 8] = [
    "ID",
    "Nome",
    "Endereço",
    "Tipo de Recarga",
    "Status",
    "Horário Funcionamento",
    "Responsável",
    "Contato",
];

pub fn render_header(title: &str) -> Paragraph<'static> {
    let text = Line::from(vec![
        Span::styled(
            " ☰ ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            title.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);

    Paragraph::new(text).style(Style::default().bg(BRAND_BLUE))
}

/// Table cells for one record, in [`TABLE_HEADERS`] order
pub fn record_cells(record: &ChargingPoint) -> [String; 8] {
    [
        record.id.to_string(),
        record.nome.clone(),
        record.endereco.clone(),
        record.tipo_recarga.clone(),
        record.status_label().to_string(),
        record.horario_funcionamento.clone(),
        record.responsavel_nome.clone(),
        record.responsavel_contato.clone(),
    ]
}

pub fn render_records_table(records: &[ChargingPoint]) -> Table<'static> {
    let header = Row::new(TABLE_HEADERS.to_vec()).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let status_color = if record.status {
                Color::Green
            } else {
                Color::DarkGray
            };
            let mut cells: Vec<ratatui::widgets::Cell> =
                record_cells(record).into_iter().map(Into::into).collect();
            cells[4] = ratatui::widgets::Cell::from(Span::styled(
                record.status_label(),
                Style::default().fg(status_color),
            ));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(15),
        Constraint::Percentage(18),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(22),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Pontos de Recarga ({})", records.len())),
        )
        .row_highlight_style(
            Style::default()
                .bg(BRAND_ORANGE)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

pub fn render_drawer(index: usize) -> List<'static> {
    let items: Vec<ListItem> = DRAWER_ITEMS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == index {
                Style::default().bg(BRAND_BLUE).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!(" {} ", label), style)))
        })
        .collect();

    List::new(items).block(Block::default().borders(Borders::ALL).title("Menu"))
}

pub fn render_input_line<'a>(
    label: &str,
    value: &str,
    focused: bool,
    missing: bool,
) -> Paragraph<'a> {
    let border = if missing {
        Color::Red
    } else if focused {
        BRAND_ORANGE
    } else {
        Color::Gray
    };

    let title = if missing {
        format!("{} (obrigatório)", label)
    } else {
        label.to_string()
    };

    Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    )
}

pub fn render_status_toggle(active: bool, focused: bool) -> Paragraph<'static> {
    let (label, color) = if active {
        ("[x] Ativo", Color::Green)
    } else {
        ("[ ] Inativo", Color::DarkGray)
    };
    let border = if focused { BRAND_ORANGE } else { Color::Gray };

    Paragraph::new(Span::styled(label, Style::default().fg(color))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("Status (espaço alterna)"),
    )
}

pub fn render_status_line(
    status: Option<&StatusMessage>,
    pending: Option<&str>,
    hints: &str,
) -> Paragraph<'static> {
    let line = if let Some(label) = pending {
        Line::from(Span::styled(
            format!("{}...", label),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(message) = status {
        let color = if message.is_error {
            Color::Red
        } else {
            Color::Green
        };
        Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
    } else {
        Line::from(Span::styled(
            hints.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    };

    Paragraph::new(line)
}

fn level_color(level: tracing::Level) -> Color {
    match level {
        tracing::Level::ERROR => Color::Red,
        tracing::Level::WARN => BRAND_ORANGE,
        tracing::Level::INFO => Color::Green,
        _ => Color::DarkGray,
    }
}

/// One log panel line: time, level, message
pub fn log_line(entry: &LogEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            entry.timestamp.format("%H:%M:%S ").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<5} ", entry.level),
            Style::default().fg(level_color(entry.level)),
        ),
        Span::raw(entry.message.clone()),
    ])
}

/// Log panel, newest entry first; `scroll` is clamped to the last entry
pub fn render_log_panel(logs: &[LogEntry], scroll: usize) -> List<'static> {
    let offset = scroll.min(logs.len().saturating_sub(1));
    let items: Vec<ListItem> = logs
        .iter()
        .skip(offset)
        .map(|entry| ListItem::new(log_line(entry)))
        .collect();

    let title = if logs.is_empty() {
        "Logs".to_string()
    } else {
        format!("Logs {}/{}", offset + 1, logs.len())
    };

    List::new(items).block(Block::default().borders(Borders::TOP).title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cells_order() {
        let record = ChargingPoint {
            id: 12,
            nome: "Posto A".into(),
            endereco: "Rua 1".into(),
            tipo_recarga: "AC".into(),
            status: true,
            horario_funcionamento: "08:00-18:00".into(),
            responsavel_nome: "Ana".into(),
            responsavel_contato: "11999990000".into(),
            created_at: None,
            updated_at: None,
        };

        let cells = record_cells(&record);
        assert_eq!(cells.len(), TABLE_HEADERS.len());
        assert_eq!(cells[0], "12");
        assert_eq!(cells[4], "Ativo");
        assert_eq!(cells[7], "11999990000");
    }

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: chrono::Utc::now(),
            level: tracing::Level::WARN,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_log_line_carries_level_and_message() {
        let line = log_line(&entry("Reload failed"));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("WARN"));
        assert!(text.ends_with("Reload failed"));
    }

    #[test]
    fn test_log_panel_scroll_is_clamped() {
        let logs = vec![entry("a"), entry("b"), entry("c")];
        assert_eq!(render_log_panel(&logs, 100).len(), 1);
        assert_eq!(render_log_panel(&logs, 1).len(), 2);
        assert_eq!(render_log_panel(&[], 5).len(), 0);
    }
}
