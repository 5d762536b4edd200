use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, trace};

use ratatui::crossterm::event::KeyEvent;

use crate::domain::{GridConfig, GridError, HELP_TEXT, InputPurpose, Message, PAGE_SIZE};
use crate::inputter::{InputResult, Inputter};
use crate::store::{Record, RowStore};

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction. The column is not validated against the
/// loaded header; sorting by an unknown column keeps the input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// User supplied display labels for columns, keyed by the underlying column
/// name. Purely cosmetic, never used for sorting or data access.
#[derive(Default)]
pub struct TitleOverrides(HashMap<String, String>);

impl TitleOverrides {
    pub fn set_title(&mut self, key: &str, title: String) {
        self.0.insert(key.to_string(), title);
    }

    pub fn title_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.0.get(key).map(String::as_str).unwrap_or(fallback)
    }
}

// Cells of a numeric looking column are compared as floats, with parseable
// values ordering before unparseable ones and a string comparison as the
// fallback. Absent cells order before present ones. A "NaN" cell counts as
// unparseable; letting it through would break the total order sort_by
// requires.
fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let a_val = a.parse::<f64>().ok().filter(|v| !v.is_nan());
            let b_val = b.parse::<f64>().ok().filter(|v| !v.is_nan());
            match (a_val, b_val) {
                (Some(a_float), Some(b_float)) => a_float.total_cmp(&b_float),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(b),
            }
        }
    }
}

/// Record indices in display order: a stable ascending sort by the sort
/// column, reversed in full for descending. Reversing the stable ascending
/// order flips the relative order of equal keys as well, which is exactly
/// how the grid behaves.
pub fn sorted_order(records: &[Record], sort: &SortSpec) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&l, &r| {
        compare_cells(
            records[l].get(&sort.column).map(String::as_str),
            records[r].get(&sort.column).map(String::as_str),
        )
    });
    if sort.direction == SortDirection::Descending {
        order.reverse();
    }
    order
}

/// The records visible on the given 1-based page: the half-open slice
/// `[(page-1)*PAGE_SIZE, (page-1)*PAGE_SIZE + PAGE_SIZE)` of the sorted
/// sequence. Out-of-range pages on either side yield an empty slice, there
/// is no clamping.
pub fn visible_page<'a>(records: &'a [Record], sort: &SortSpec, page: usize) -> Vec<&'a Record> {
    let Some(page_idx) = page.checked_sub(1) else {
        return Vec::new();
    };
    let from = page_idx.saturating_mul(PAGE_SIZE);
    sorted_order(records, sort)
        .into_iter()
        .skip(from)
        .take(PAGE_SIZE)
        .map(|idx| &records[idx])
        .collect()
}

/// Prebuilt snapshot of everything the UI needs to render a frame.
pub struct GridData {
    pub name: String,
    pub columns: Vec<String>,
    pub titles: Vec<String>,
    pub widths: Vec<usize>,
    pub rows: Vec<Vec<String>>,
    pub nrows: usize,
    pub page: usize,
    pub total_pages: usize,
    pub selected_column: usize,
    pub sort: SortSpec,
    pub show_popup: bool,
    pub popup_message: String,
    pub input: InputResult,
    pub input_purpose: Option<InputPurpose>,
    pub active_input: bool,
    pub status_message: String,
}

impl GridData {
    pub fn empty() -> Self {
        GridData {
            name: String::new(),
            columns: Vec::new(),
            titles: Vec::new(),
            widths: Vec::new(),
            rows: Vec::new(),
            nrows: 0,
            page: 1,
            total_pages: 1,
            selected_column: 0,
            sort: SortSpec {
                column: String::new(),
                direction: SortDirection::Ascending,
            },
            show_popup: false,
            popup_message: String::new(),
            input: InputResult::default(),
            input_purpose: None,
            active_input: false,
            status_message: String::new(),
        }
    }
}

pub struct Model {
    config: GridConfig,
    pub status: Status,
    store: RowStore,
    sort: SortSpec,
    page: usize,
    selected_column: usize,
    titles: TitleOverrides,
    input: Inputter,
    input_purpose: Option<InputPurpose>,
    last_input: InputResult,
    active_input: bool,
    show_popup: bool,
    popup_message: String,
    status_message: String,
    uidata: GridData,
}

impl Model {
    pub fn init(config: &GridConfig) -> Self {
        let mut model = Self {
            config: config.clone(),
            status: Status::EMPTY,
            store: RowStore::default(),
            sort: SortSpec {
                column: String::new(),
                direction: SortDirection::Ascending,
            },
            page: 1,
            selected_column: 0,
            titles: TitleOverrides::default(),
            input: Inputter::default(),
            input_purpose: None,
            last_input: InputResult::default(),
            active_input: false,
            show_popup: false,
            popup_message: String::new(),
            status_message: "Started csvgrid!".to_string(),
            uidata: GridData::empty(),
        };
        model.update_grid_data();
        model
    }

    /// Load the initially given file. In contrast to a runtime open, a
    /// failure here is propagated to the caller.
    pub fn load_file(&mut self, path: &Path) -> Result<(), GridError> {
        let store = RowStore::load(path)?;
        self.install_store(store);
        Ok(())
    }

    pub fn get_uidata(&self) -> &GridData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_input
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Message) -> Result<(), GridError> {
        trace!("Update: {message:?}");
        if self.active_input {
            if let Message::RawKey(key) = message {
                self.raw_input(key);
            }
            return Ok(());
        }
        if self.show_popup {
            match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.close_popup(),
                Message::Resize(width, height) => self.resize(width, height),
                _ => (),
            }
            return Ok(());
        }
        match message {
            Message::Quit => self.quit(),
            Message::NextPage => self.set_page(self.page + 1),
            Message::PrevPage => self.set_page(self.page.saturating_sub(1).max(1)),
            Message::FirstPage => self.set_page(1),
            Message::MoveLeft => self.move_selection_left(),
            Message::MoveRight => self.move_selection_right(),
            Message::SortAscending => self.sort_selected_column(SortDirection::Ascending),
            Message::SortDescending => self.sort_selected_column(SortDirection::Descending),
            Message::RenameColumn => self.enter_input(InputPurpose::RenameColumn),
            Message::OpenFile => self.enter_input(InputPurpose::OpenFile),
            Message::Help => self.show_help(),
            Message::Resize(width, height) => self.resize(width, height),
            Message::Exit | Message::RawKey(_) => (),
        }
        Ok(())
    }

    /// Replace the current sort spec. The column is taken as given, whether
    /// it exists in the header or not.
    pub fn set_sort(&mut self, column: String, direction: SortDirection) {
        self.sort = SortSpec { column, direction };
        self.update_grid_data();
    }

    /// Replace the 1-based page index without any bounds check against the
    /// record count.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.update_grid_data();
    }

    // -------------------- Message handling ---------------------- //

    fn install_store(&mut self, store: RowStore) {
        if self.status == Status::EMPTY {
            // The default sort is fixed once, when the first file arrives.
            self.sort = SortSpec {
                column: store.columns().first().cloned().unwrap_or_default(),
                direction: SortDirection::Ascending,
            };
        }
        // The sort spec, page index and title overrides survive a reload.
        self.store = store;
        self.status = Status::READY;
        self.selected_column = self
            .selected_column
            .min(self.store.columns().len().saturating_sub(1));
        self.set_status_message(format!(
            "Loaded \"{}\" with {} records",
            self.store.name(),
            self.store.len()
        ));
        self.update_grid_data();
    }

    fn open_file(&mut self, raw: &str) {
        let expanded = match shellexpand::full(raw) {
            Ok(path) => path.into_owned(),
            Err(e) => {
                error!("Cannot expand path \"{raw}\": {e}");
                return;
            }
        };
        // A failed open keeps the previous records in place.
        match RowStore::load(Path::new(&expanded)) {
            Ok(store) => self.install_store(store),
            Err(e) => error!("Loading \"{expanded}\" failed: {e:?}"),
        }
    }

    fn sort_selected_column(&mut self, direction: SortDirection) {
        if let Some(column) = self.store.columns().get(self.selected_column) {
            let column = column.clone();
            info!("Sorting by \"{column}\" {direction:?}");
            self.set_sort(column, direction);
        }
    }

    fn move_selection_left(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
        self.update_grid_data();
    }

    fn move_selection_right(&mut self) {
        if self.selected_column + 1 < self.store.columns().len() {
            self.selected_column += 1;
            self.update_grid_data();
        }
    }

    fn enter_input(&mut self, purpose: InputPurpose) {
        self.input.clear();
        if purpose == InputPurpose::RenameColumn {
            let Some(key) = self.store.columns().get(self.selected_column) else {
                return;
            };
            let title = self.titles.title_or(key, key).to_string();
            self.input.set(&title);
        }
        trace!("Entering input mode for {purpose:?}");
        self.input_purpose = Some(purpose);
        self.active_input = true;
        self.last_input = self.input.get();
        self.update_grid_data();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            self.handle_input();
        }
        self.update_grid_data();
    }

    fn handle_input(&mut self) {
        self.active_input = false;
        let result = self.last_input.clone();
        let purpose = self.input_purpose.take();
        if result.canceled {
            return;
        }
        match purpose {
            Some(InputPurpose::RenameColumn) => {
                if let Some(key) = self.store.columns().get(self.selected_column).cloned() {
                    // An empty title is accepted.
                    self.titles.set_title(&key, result.input);
                }
            }
            Some(InputPurpose::OpenFile) => self.open_file(&result.input),
            None => info!("Input committed without purpose!"),
        }
    }

    fn show_help(&mut self) {
        self.show_popup = true;
        self.popup_message = HELP_TEXT.to_string();
        self.update_grid_data();
    }

    fn close_popup(&mut self) {
        self.show_popup = false;
        self.update_grid_data();
    }

    fn resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized to w:{width}, h:{height}");
        self.update_grid_data();
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    // The grid snapshot is rebuilt wholesale on every state change, never
    // patched incrementally.
    fn update_grid_data(&mut self) {
        let records = self.store.records();
        let columns = self.store.columns();
        let titles: Vec<String> = columns
            .iter()
            .map(|key| self.titles.title_or(key, key).to_string())
            .collect();
        let rows: Vec<Vec<String>> = visible_page(records, &self.sort, self.page)
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|key| record.get(key).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        let widths = Self::column_widths(&titles, &rows, self.config.max_column_width);

        self.uidata = GridData {
            name: self.store.name().to_string(),
            columns: columns.to_vec(),
            titles,
            widths,
            rows,
            nrows: records.len(),
            page: self.page,
            total_pages: records.len().div_ceil(PAGE_SIZE).max(1),
            selected_column: self.selected_column,
            sort: self.sort.clone(),
            show_popup: self.show_popup,
            popup_message: self.popup_message.clone(),
            input: self.last_input.clone(),
            input_purpose: self.input_purpose,
            active_input: self.active_input,
            status_message: self.status_message.clone(),
        };
    }

    fn column_widths(titles: &[String], rows: &[Vec<String>], max_width: usize) -> Vec<usize> {
        titles
            .iter()
            .enumerate()
            .map(|(cidx, title)| {
                let cells = rows.iter().map(|row| row[cidx].chars().count()).max();
                let width = std::cmp::max(title.chars().count() + 2, cells.unwrap_or(0));
                std::cmp::min(width, max_width)
            })
            .collect()
    }
}
