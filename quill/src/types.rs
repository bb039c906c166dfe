//! Common type definitions.
//!
//! - Type aliases for entity IDs ([`AuthorId`], [`PostId`])
//! - [`Operation`] and [`Resource`], used to describe a rejected mutation in errors and logs

use std::fmt;

// Type aliases for IDs
pub type AuthorId = i64;
pub type PostId = i64;

// Owner-scoped operations. There is no *-All variant: nobody can mutate another author's resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateOwn,
    DeleteOwn,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Authors,
    Posts,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateOwn => write!(f, "create"),
            Operation::DeleteOwn => write!(f, "delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Authors => write!(f, "author"),
            Resource::Posts => write!(f, "post"),
        }
    }
}
