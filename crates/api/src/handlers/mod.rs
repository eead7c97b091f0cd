pub mod genres;
pub mod health;
pub mod tasks;
