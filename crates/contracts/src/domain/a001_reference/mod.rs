pub mod aggregate;

pub use aggregate::{label_of, NamedOption, ReferenceKind};
