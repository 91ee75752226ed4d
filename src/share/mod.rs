//! Sharing appointment details with the assigned field user

pub mod whatsapp;

pub use whatsapp::{Platform, WhatsAppLink};
