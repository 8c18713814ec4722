mod booking;
mod common;
mod directory;
mod store;
