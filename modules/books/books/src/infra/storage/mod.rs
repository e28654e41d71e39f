pub mod entity;
pub mod memory;
pub mod migrations;
pub mod sea_orm_repo;

pub use memory::InMemoryBooksRepository;
pub use sea_orm_repo::SeaOrmBooksRepository;
