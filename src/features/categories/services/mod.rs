pub mod category_service;
pub mod list_view;
pub mod tree_builder;
pub mod tree_view;

pub use category_service::CategoryService;
pub use list_view::{search, CategoryListView};
pub use tree_builder::{children_of, CategoryForest};
pub use tree_view::{TreeAction, TreeHandler, TreeRow, TreeView};
