//! Tab content rendering: one module per resource collection.

pub mod books;
pub mod loans;
pub mod members;
