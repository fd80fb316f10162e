pub mod gateway;

pub use gateway::{page_window, Gateway, RowSet, MAX_PAGE_SIZE};
