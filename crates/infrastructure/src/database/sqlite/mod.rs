pub mod sqlite_genre_repository;
pub mod sqlite_task_repository;

pub use sqlite_genre_repository::SqliteGenreRepository;
pub use sqlite_task_repository::SqliteTaskRepository;
