pub mod memory;
pub mod seaorm;

pub use memory::MemoryStudentRepository;
pub use seaorm::SeaOrmStudentRepository;
