pub mod cover;

pub use cover::{CoverLookup, DisabledCover, GoogleBooksClient};
