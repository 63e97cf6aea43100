mod category_handler;

pub use category_handler::{run, CategoryCommand, CategoryContext};
