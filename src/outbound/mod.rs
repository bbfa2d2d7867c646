pub mod clip;
pub mod console;
pub mod image_provider;
pub mod openai;
pub mod qdrant;
pub mod test_mocks;
