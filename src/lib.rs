pub mod controller;
pub mod domain;
pub mod inputter;
pub mod model;
pub mod store;
pub mod ui;
