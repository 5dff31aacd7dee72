pub mod errors;
pub mod page;
pub mod table;

#[cfg(test)]
pub mod test_server;

pub use errors::page_error_message;
pub use page::Page;
pub use table::Table;
