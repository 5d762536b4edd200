use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use std::io::Error;

// Fixed number of records shown per page.
pub const PAGE_SIZE: usize = 7;

pub const HELP_TEXT: &str = "csvgrid - paginated CSV data grid

n / PageDown ... next page
p / PageUp ..... previous page
g .............. first page
Left / Right ... select column
s / S .......... sort by selected column (ascending / descending)
r .............. rename selected column title
o .............. open another CSV file
? .............. show this help
Esc ............ close popup / cancel input
q .............. quit
";

#[derive(Debug)]
pub enum GridError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
}

impl From<Error> for GridError {
    fn from(err: Error) -> Self {
        GridError::IoError(err)
    }
}

impl From<PolarsError> for GridError {
    fn from(err: PolarsError) -> Self {
        GridError::PolarsError(err)
    }
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            event_poll_time: 100,
            max_column_width: 24,
        }
    }
}

// What the active line input is going to be used for once committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputPurpose {
    RenameColumn,
    OpenFile,
}

#[derive(Debug)]
pub enum Message {
    Quit,
    NextPage,
    PrevPage,
    FirstPage,
    MoveLeft,
    MoveRight,
    SortAscending,
    SortDescending,
    RenameColumn,
    OpenFile,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}
