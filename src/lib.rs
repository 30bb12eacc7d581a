//! lensbot - relays image messages captioned `/explain` or `/ai` through an
//! image host and a description worker, replying with the generated text.

pub mod command;
pub mod config;
pub mod creds;
pub mod describe;
pub mod health;
pub mod relay;
pub mod session;
pub mod telegram;
pub mod transport;
