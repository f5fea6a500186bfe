//! Collaborators outside the service

pub mod suggestions;
