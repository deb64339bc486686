//! Request middleware

mod actor;

pub use actor::CurrentActor;
