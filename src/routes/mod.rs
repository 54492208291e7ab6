//! Route modules for Folio Server

pub mod documents;
pub mod health;
pub mod upload;
