use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table},
};

use crate::domain::InputPurpose;
use crate::model::{GridData, SortDirection};

pub struct GridUI;

impl GridUI {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, uidata: &GridData, frame: &mut Frame) {
        let [table_area, status_area, input_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_grid(uidata, frame, table_area);
        self.draw_statusline(uidata, frame, status_area);
        self.draw_inputline(uidata, frame, input_area);

        if uidata.show_popup {
            self.draw_popup(uidata, frame);
        }
    }

    fn draw_grid(&self, uidata: &GridData, frame: &mut Frame, area: Rect) {
        let title = Line::from(format!(" {} ", uidata.name).bold());
        let instructions = Line::from(vec![
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);

        if uidata.rows.is_empty() {
            let empty = Paragraph::new("No records to show".dark_gray())
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            uidata
                .titles
                .iter()
                .zip(uidata.columns.iter())
                .enumerate()
                .map(|(cidx, (title, key))| {
                    let mut label = title.clone();
                    if *key == uidata.sort.column {
                        label.push_str(match uidata.sort.direction {
                            SortDirection::Ascending => " ▲",
                            SortDirection::Descending => " ▼",
                        });
                    }
                    let style = if cidx == uidata.selected_column {
                        Style::new().bold().reversed()
                    } else {
                        Style::new().bold()
                    };
                    Cell::from(label).style(style)
                })
                .collect::<Vec<Cell>>(),
        );

        let rows = uidata
            .rows
            .iter()
            .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))))
            .collect::<Vec<Row>>();

        let widths = uidata
            .widths
            .iter()
            .map(|w| Constraint::Length(*w as u16))
            .collect::<Vec<Constraint>>();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
    }

    fn draw_statusline(&self, uidata: &GridData, frame: &mut Frame, area: Rect) {
        let direction = match uidata.sort.direction {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        };
        let line = Line::from(vec![
            Span::from(format!(
                " {} records | page {}/{} | sort: {} {} | ",
                uidata.nrows, uidata.page, uidata.total_pages, uidata.sort.column, direction
            )),
            Span::from(uidata.status_message.clone()).dark_gray(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_inputline(&self, uidata: &GridData, frame: &mut Frame, area: Rect) {
        if !uidata.active_input {
            return;
        }
        let prompt = match uidata.input_purpose {
            Some(InputPurpose::RenameColumn) => " rename: ",
            Some(InputPurpose::OpenFile) => " open: ",
            None => " > ",
        };
        let line = Line::from(vec![
            Span::from(prompt).bold().yellow(),
            Span::from(uidata.input.input.clone()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor_position((
            area.x + (prompt.len() + uidata.input.cursor_pos) as u16,
            area.y,
        ));
    }

    fn draw_popup(&self, uidata: &GridData, frame: &mut Frame) {
        let area = Self::popup_area(frame.area(), 60, 70);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .border_set(border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str()).block(block),
            area,
        );
    }

    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
            .flex(ratatui::layout::Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
            .flex(ratatui::layout::Flex::Center)
            .areas(area);
        area
    }
}
